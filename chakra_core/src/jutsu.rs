//! Static jutsu catalogue: what each gesture summons and how it looks.

use crate::clock::Timestamp;
use crate::gesture::Gesture;

/// Overlay animation style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectShape {
    Circle,
    Clone,
    Lightning,
    Wave,
    Rectangle,
    Spiral,
    Hexagon,
    Burst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jutsu {
    pub name:  &'static str,
    /// Packed ARGB (0xAARRGGBB, A=0xFF).
    pub color: u32,
    pub shape: EffectShape,
}

impl Gesture {
    pub fn jutsu(self) -> Jutsu {
        let (name, color, shape) = match self {
            Gesture::Fist         => ("Fire Style: Fireball Jutsu", 0xFFFF4500, EffectShape::Circle),
            Gesture::OpenPalm     => ("Shadow Clone Jutsu",         0xFF808080, EffectShape::Clone),
            Gesture::PeaceSign    => ("Lightning Style: Chidori",   0xFF00FFFF, EffectShape::Lightning),
            Gesture::ThumbsUp     => ("Water Style: Water Dragon",  0xFF0000FF, EffectShape::Wave),
            Gesture::RockSign     => ("Earth Style: Rock Barrier",  0xFF8B4513, EffectShape::Rectangle),
            Gesture::GunSign      => ("Wind Style: Air Bullet",     0xFFFFFFFF, EffectShape::Spiral),
            Gesture::ThreeFingers => ("Ice Style: Crystal Mirror",  0xFFC8C8FF, EffectShape::Hexagon),
            Gesture::Point        => ("Gentle Fist: Chakra Strike", 0xFFFF00FF, EffectShape::Burst),
        };
        Jutsu { name, color, shape }
    }
}

/// A confirmed, paid-for activation.  Handed to the renderer and audio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivationEvent {
    pub action:       Gesture,
    pub activated_at: Timestamp,
}

impl ActivationEvent {
    pub fn jutsu(&self) -> Jutsu {
        self.action.jutsu()
    }
}
