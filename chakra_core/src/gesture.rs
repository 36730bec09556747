//! The closed gesture set and the finger-pattern rule table that names it.
//!
//! A hand tracker reduces each frame to five booleans (thumb first).  The
//! table below turns those into a [`GestureLabel`]; a hand whose pattern
//! matches no rule is [`GestureLabel::Unrecognized`], which is distinct from
//! "no hand in view" (`None` at the call sites).

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// FingerStates
// ════════════════════════════════════════════════════════════════════════════

/// Extended (`true`) / curled (`false`) state per finger:
/// `[thumb, index, middle, ring, pinky]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerStates(pub [bool; 5]);

impl FingerStates {
    pub const THUMB:  usize = 0;
    pub const INDEX:  usize = 1;
    pub const MIDDLE: usize = 2;
    pub const RING:   usize = 3;
    pub const PINKY:  usize = 4;

    /// Build from 0/1 flags; any non-zero value counts as extended.
    pub fn from_bits(bits: [u8; 5]) -> Self {
        FingerStates(bits.map(|b| b != 0))
    }

    pub fn extended_count(&self) -> usize {
        self.0.iter().filter(|&&up| up).count()
    }

    pub fn is_extended(&self, finger: usize) -> bool {
        self.0.get(finger).copied().unwrap_or(false)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Gesture — the action identifiers
// ════════════════════════════════════════════════════════════════════════════

/// Every gesture the classifier can name.  Each one triggers one jutsu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gesture {
    Fist,
    OpenPalm,
    PeaceSign,
    ThumbsUp,
    RockSign,
    GunSign,
    ThreeFingers,
    Point,
}

impl Gesture {
    pub const ALL: [Gesture; 8] = [
        Gesture::Fist,
        Gesture::OpenPalm,
        Gesture::PeaceSign,
        Gesture::ThumbsUp,
        Gesture::RockSign,
        Gesture::GunSign,
        Gesture::ThreeFingers,
        Gesture::Point,
    ];

    /// Display name, also used as the key in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Gesture::Fist         => "Fist",
            Gesture::OpenPalm     => "Open Palm",
            Gesture::PeaceSign    => "Peace Sign",
            Gesture::ThumbsUp     => "Thumbs Up",
            Gesture::RockSign     => "Rock Sign",
            Gesture::GunSign      => "Gun Sign",
            Gesture::ThreeFingers => "Three Fingers",
            Gesture::Point        => "Point",
        }
    }

    /// Inverse of [`Gesture::name`].  Case and surrounding whitespace are
    /// ignored; `_` and `-` are accepted in place of spaces.
    pub fn from_name(name: &str) -> Option<Gesture> {
        let wanted: String = name
            .trim()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c.to_ascii_lowercase() })
            .collect();
        Gesture::ALL
            .iter()
            .copied()
            .find(|g| g.name().to_ascii_lowercase() == wanted)
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureLabel — classifier output for a frame with a hand in view
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureLabel {
    Recognized(Gesture),
    /// A hand is visible but its pose matches no rule.
    Unrecognized,
}

impl GestureLabel {
    pub fn gesture(self) -> Option<Gesture> {
        match self {
            GestureLabel::Recognized(g) => Some(g),
            GestureLabel::Unrecognized  => None,
        }
    }
}

impl From<Gesture> for GestureLabel {
    fn from(g: Gesture) -> Self {
        GestureLabel::Recognized(g)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureLabel::Recognized(g) => write!(f, "{}", g),
            GestureLabel::Unrecognized  => f.write_str("Unknown"),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify — the rule table
// ════════════════════════════════════════════════════════════════════════════

const X: bool = true;
const O: bool = false;

/// Exact patterns, checked after the all-curled / all-extended rules.
const PATTERNS: [([bool; 5], Gesture); 6] = [
    ([O, X, X, O, O], Gesture::PeaceSign),
    ([X, O, O, O, O], Gesture::ThumbsUp),
    ([O, X, O, O, X], Gesture::RockSign),
    ([X, X, O, O, O], Gesture::GunSign),
    ([X, X, X, O, O], Gesture::ThreeFingers),
    ([O, X, O, O, O], Gesture::Point),
];

/// Name the pose described by `fingers`.
pub fn classify(fingers: FingerStates) -> GestureLabel {
    match fingers.extended_count() {
        0 => GestureLabel::Recognized(Gesture::Fist),
        5 => GestureLabel::Recognized(Gesture::OpenPalm),
        _ => PATTERNS
            .iter()
            .find(|(pattern, _)| *pattern == fingers.0)
            .map(|&(_, g)| GestureLabel::Recognized(g))
            .unwrap_or(GestureLabel::Unrecognized),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
