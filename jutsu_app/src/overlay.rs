//! Everything drawn on top of the camera frame: jutsu effects, the tracked
//! hand diagram, and the HUD.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ TITLE                                    Gesture: Fist  ▓▓░░ │
//! │ FPS 60   CHAKRA [██████████░░░░] 70%     Active: Fireball    │
//! │                                          Cooldown: 1.4s      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─hand─┐                                                    │
//! │  │|| | |│             (effects, centred)                     │
//! │  └──────┘                                                    │
//! │ Q:Quit | R:Reset Chakra | P:Pause | 1-5 fingers, Tab hand    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::f32::consts::PI;

use chakra_core::{ActiveEffect, EffectShape, GestureLabel, LevelBand};

use crate::frame::{text_width, Frame};
use crate::tracking::Detection;

const PANEL_H:    usize = 110;
const WHITE:      u32   = 0xFFFFFFFF;
const GREEN:      u32   = 0xFF00FF00;
const YELLOW:     u32   = 0xFFFFFF00;
const RED:        u32   = 0xFFFF3030;
const CYAN:       u32   = 0xFF00FFFF;
const ORANGE:     u32   = 0xFFFF9600;
const DIM:        u32   = 0xFFC8C8C8;
const BAR_BG:     u32   = 0xFF323232;

// ════════════════════════════════════════════════════════════════════════════
// Effects
// ════════════════════════════════════════════════════════════════════════════

/// Draw one active effect; its size grows and its opacity fades with
/// progress through `duration`.
pub fn draw_effect(frame: &mut Frame, effect: &ActiveEffect, duration: f64) {
    let jutsu    = effect.jutsu();
    let progress = effect.progress(duration) as f32;
    let alpha    = 0.5 * (1.0 - progress);
    if alpha <= 0.0 { return; }

    let (w, h)   = (frame.width() as f32, frame.height() as f32);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let radius   = w.min(h) / 3.0 * progress;
    let color    = jutsu.color;
    let c        = (cx as isize, cy as isize);

    match jutsu.shape {
        EffectShape::Circle => {
            frame.fill_circle(c.0, c.1, radius as isize, color, alpha);
        }
        EffectShape::Lightning => {
            for i in 0..5 {
                let offset = 50.0 * (progress * 10.0 + i as f32).sin();
                let start = ((cx + offset) as isize, (cy - radius) as isize);
                let end   = ((cx - offset) as isize, (cy + radius) as isize);
                frame.draw_line(start, end, 3, color, alpha);
            }
        }
        EffectShape::Clone => {
            for i in 0..3 {
                let angle = (i as f32 * 120.0 + progress * 360.0).to_radians();
                let pos = ((cx + 100.0 * angle.cos()) as isize, (cy + 100.0 * angle.sin()) as isize);
                frame.fill_circle(pos.0, pos.1, 30, color, alpha);
            }
        }
        EffectShape::Wave => {
            let mut x = 0.0;
            while x < w {
                let y = cy + 30.0 * (x / 50.0 + progress * 10.0).sin();
                frame.draw_line((x as isize, y as isize), ((x + 10.0) as isize, y as isize), 2, color, alpha);
                x += 20.0;
            }
        }
        EffectShape::Rectangle => {
            let size = (100.0 + 50.0 * progress) as isize;
            frame.shade_rect(c.0 - size, c.1 - size, 2 * size as usize, 2 * size as usize, color, alpha);
        }
        EffectShape::Spiral => {
            let points: Vec<(isize, isize)> = (0..100)
                .map(|i| {
                    let t = i as f32 / 100.0;
                    let angle = t * 4.0 * PI;
                    let r = t * radius;
                    ((cx + r * angle.cos()) as isize, (cy + r * angle.sin()) as isize)
                })
                .collect();
            for pair in points.windows(2) {
                frame.draw_line(pair[0], pair[1], 2, color, alpha);
            }
        }
        EffectShape::Hexagon => {
            let points: Vec<(f32, f32)> = (0..6)
                .map(|i| {
                    let angle = (i as f32 * 60.0).to_radians();
                    (cx + radius * angle.cos(), cy + radius * angle.sin())
                })
                .collect();
            frame.fill_polygon(&points, color, alpha);
        }
        EffectShape::Burst => {
            for i in 0..8 {
                let angle = (i as f32 * 45.0).to_radians();
                let end = ((cx + radius * angle.cos()) as isize, (cy + radius * angle.sin()) as isize);
                frame.draw_line(c, end, 3, color, alpha);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand diagram (tracker annotation)
// ════════════════════════════════════════════════════════════════════════════

const HAND_X: usize = 20;
const HAND_Y: usize = PANEL_H + 20;
const FINGER_W: usize = 14;
const FINGER_GAP: usize = 6;

/// Five bars, tall when extended, drawn under the HUD panel.
pub fn draw_hand(frame: &mut Frame, detection: &Detection) {
    let Some(fingers) = detection.fingers else { return };
    let color = match detection.label {
        Some(GestureLabel::Recognized(_)) => GREEN,
        _ => ORANGE,
    };
    let palm_y = HAND_Y + 60;
    let palm_w = 5 * FINGER_W + 4 * FINGER_GAP;
    frame.fill_rect(HAND_X, palm_y, palm_w, 30, color);
    for i in 0..5 {
        let len = if fingers.is_extended(i) { 55 } else { 15 };
        let x = HAND_X + i * (FINGER_W + FINGER_GAP);
        frame.fill_rect(x, palm_y - len, FINGER_W, len, color);
    }
    frame.draw_text(
        &format!("Fingers: {}", fingers.extended_count()),
        HAND_X, palm_y + 40, 2, YELLOW,
    );
    if detection.label == Some(GestureLabel::Unrecognized) {
        frame.draw_text("Unknown", HAND_X, palm_y + 60, 2, DIM);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HUD
// ════════════════════════════════════════════════════════════════════════════

/// Display-only snapshot of application state for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HudView {
    pub fps:            u32,
    pub chakra_pct:     f64,
    pub band:           Option<LevelBand>,
    /// Gesture being held (or just confirmed and still shown).
    pub gesture:        Option<String>,
    pub hold_progress:  f64,
    pub active_jutsu:   Option<String>,
    pub cooldown:       f64,
    pub paused:         bool,
}

pub fn band_color(band: Option<LevelBand>) -> u32 {
    match band {
        Some(LevelBand::High) | None => GREEN,
        Some(LevelBand::Medium)      => YELLOW,
        Some(LevelBand::Low)         => RED,
    }
}

pub fn draw_hud(frame: &mut Frame, hud: &HudView) {
    let w = frame.width();
    let h = frame.height();

    // ── top panel ─────────────────────────────────────────────────────────
    frame.shade_rect(0, 0, w, PANEL_H, 0xFF000000, 0.4);
    let title = "REAL-TIME JUTSU RECOGNITION";
    frame.draw_text(title, w.saturating_sub(text_width(title, 3)) / 2, 12, 3, WHITE);

    frame.draw_text(&format!("FPS: {}", hud.fps), 10, 45, 2, GREEN);

    // ── chakra bar ────────────────────────────────────────────────────────
    frame.draw_text("CHAKRA:", 10, 75, 2, WHITE);
    let (bar_x, bar_y, bar_w, bar_h) = (80, 72, 300, 16);
    frame.fill_rect(bar_x, bar_y, bar_w, bar_h, BAR_BG);
    let fill = (bar_w as f64 * (hud.chakra_pct / 100.0).clamp(0.0, 1.0)) as usize;
    frame.fill_rect(bar_x, bar_y, fill, bar_h, band_color(hud.band));
    frame.draw_border(bar_x, bar_y, bar_w, bar_h, WHITE);
    frame.draw_text(&format!("{}%", hud.chakra_pct as u32), bar_x + bar_w + 10, 75, 2, WHITE);

    // ── right column ──────────────────────────────────────────────────────
    let col_x = w.saturating_sub(340);
    if let Some(g) = &hud.gesture {
        frame.draw_text(&format!("Gesture: {}", g), col_x, 45, 2, YELLOW);
        let prog_w = (120.0 * hud.hold_progress.clamp(0.0, 1.0)) as usize;
        frame.fill_rect(col_x, 60, 120, 4, BAR_BG);
        frame.fill_rect(col_x, 60, prog_w, 4, YELLOW);
    }
    if let Some(j) = &hud.active_jutsu {
        frame.draw_text(&format!("Active: {}", j), col_x, 72, 2, CYAN);
        if hud.cooldown > 0.0 {
            frame.draw_text(&format!("Cooldown: {:.1}s", hud.cooldown), col_x, 92, 2, ORANGE);
        }
    }

    // ── paused ────────────────────────────────────────────────────────────
    if hud.paused {
        let text = "PAUSED";
        frame.draw_text(text, w.saturating_sub(text_width(text, 6)) / 2, h / 2, 6, RED);
    }

    // ── legend ────────────────────────────────────────────────────────────
    frame.draw_text(
        "Q:Quit | R:Reset Chakra | P:Pause | 1-5:fingers Tab:hand",
        10, h.saturating_sub(20), 2, DIM,
    );
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use chakra_core::{FingerStates, Gesture};

    const BG: u32 = 0xFF000000;

    fn changed(frame: &Frame) -> usize {
        frame.pixels().iter().filter(|&&p| p != BG).count()
    }

    #[test]
    fn every_shape_draws_mid_animation() {
        for g in Gesture::ALL {
            let mut f = Frame::new(320, 240, BG);
            let e = ActiveEffect { action: g, started_at: 0.0, elapsed: 0.5 };
            draw_effect(&mut f, &e, 1.5);
            assert!(changed(&f) > 0, "{} drew nothing", g);
        }
    }

    #[test]
    fn finished_effect_is_invisible() {
        let mut f = Frame::new(320, 240, BG);
        let e = ActiveEffect { action: Gesture::Fist, started_at: 0.0, elapsed: 1.5 };
        draw_effect(&mut f, &e, 1.5);
        assert_eq!(changed(&f), 0);
    }

    #[test]
    fn hand_diagram_only_with_hand() {
        let mut f = Frame::new(320, 320, BG);
        draw_hand(&mut f, &Detection::default());
        assert_eq!(changed(&f), 0);
        draw_hand(&mut f, &Detection::from_fingers(Some(FingerStates::from_bits([0, 1, 0, 0, 0]))));
        assert!(changed(&f) > 0);
    }

    #[test]
    fn band_colors() {
        assert_eq!(band_color(Some(LevelBand::High)), GREEN);
        assert_eq!(band_color(Some(LevelBand::Medium)), YELLOW);
        assert_eq!(band_color(Some(LevelBand::Low)), RED);
    }

    #[test]
    fn hud_draws_on_small_frames() {
        let mut f = Frame::new(200, 150, BG);
        let hud = HudView {
            gesture: Some("Fist".into()),
            active_jutsu: Some("Fire Style: Fireball Jutsu".into()),
            cooldown: 1.2,
            paused: true,
            ..HudView::default()
        };
        draw_hud(&mut f, &hud);
        assert!(changed(&f) > 0);
    }
}
