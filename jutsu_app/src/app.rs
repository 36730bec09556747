//! Top-level application state and the frame loop.
//!
//! `AppState` owns the `JutsuEngine` plus the display-side state (pause flag,
//! FPS, last detection).  [`run_loop`] drives one tick per frame:
//!
//! ```text
//! read frame → sample clock → detect → engine tick → sound cue
//!            → draw effects + HUD → present → poll command
//! ```
//!
//! Every collaborator comes in as a trait object, so the same loop runs
//! against the window or headless with a scripted hand.

use std::path::PathBuf;
use std::sync::mpsc;

use tracing::{debug, error, info, warn};

use chakra_core::{
    ActivationEvent, Clock, FixedStepClock, JutsuEngine, MonotonicClock, Timestamp,
};

use crate::audio::SoundBoard;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::frame::Frame;
use crate::overlay::{self, HudView};
use crate::tracking::{
    Detection, FrameSource, HandScript, HandTracker, ScriptedHand, SimCamera, SimHandTracker,
};
use crate::visualizer::{HeadlessScreen, KeyCommand, Screen, Visualizer, WIN_H, WIN_W};

// ════════════════════════════════════════════════════════════════════════════
// FpsCounter
// ════════════════════════════════════════════════════════════════════════════

/// Instantaneous rate from the gap between consecutive ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpsCounter {
    previous: Option<Timestamp>,
    fps:      u32,
}

impl FpsCounter {
    pub fn tick(&mut self, now: Timestamp) -> u32 {
        if let Some(prev) = self.previous {
            let dt = now - prev;
            if dt > 0.0 {
                self.fps = (1.0 / dt).round() as u32;
            }
        }
        self.previous = Some(now);
        self.fps
    }

    pub fn fps(&self) -> u32 { self.fps }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    engine:    JutsuEngine,
    paused:    bool,
    fps:       FpsCounter,
    detection: Detection,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        Ok(AppState {
            engine:    JutsuEngine::new(&config.engine)?,
            paused:    false,
            fps:       FpsCounter::default(),
            detection: Detection::default(),
        })
    }

    /// Detection and the engine tick.  While paused nothing advances: no
    /// detection, no confirmation, no regeneration, no effect aging.
    pub fn tick(
        &mut self,
        frame: &mut Frame,
        tracker: &mut dyn HandTracker,
        now: Timestamp,
    ) -> Option<ActivationEvent> {
        self.fps.tick(now);
        if self.paused {
            return None;
        }
        self.detection = tracker.detect(frame, now);
        self.engine.tick(self.detection.label, now)
    }

    /// Effects (unless paused) and the HUD, on top of the annotated frame.
    pub fn draw(&self, frame: &mut Frame, now: Timestamp) {
        if !self.paused {
            let effects = self.engine.effects();
            for effect in effects.effects() {
                overlay::draw_effect(frame, effect, effects.duration());
            }
        }
        overlay::draw_hud(frame, &self.hud_view(now));
    }

    pub fn hud_view(&self, now: Timestamp) -> HudView {
        let pool = self.engine.pool();
        let confirmer = self.engine.confirmer();
        let last = self.engine.last_activation();
        HudView {
            fps:           self.fps.fps(),
            chakra_pct:    pool.percentage(),
            band:          Some(pool.level_band()),
            gesture:       confirmer.current().map(|g| g.name().to_string()),
            hold_progress: confirmer.hold_progress(now),
            active_jutsu:  last.map(|ev| ev.jutsu().name.to_string()),
            cooldown:      last.map_or(0.0, |ev| pool.cooldown_remaining(ev.action, now)),
            paused:        self.paused,
        }
    }

    pub fn handle_command(&mut self, cmd: KeyCommand) {
        match cmd {
            KeyCommand::ResetChakra => self.engine.reset_chakra(),
            KeyCommand::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "pause toggled");
            }
            KeyCommand::Quit => {}
        }
    }

    pub fn engine(&self) -> &JutsuEngine { &self.engine }
    pub fn is_paused(&self) -> bool { self.paused }
    pub fn detection(&self) -> Detection { self.detection }
}

// ════════════════════════════════════════════════════════════════════════════
// Loop
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames:      u64,
    pub activations: u64,
}

/// Run until the screen closes, `Quit` is pressed, or a frame can't be read.
pub fn run_loop(
    app: &mut AppState,
    source: &mut dyn FrameSource,
    tracker: &mut dyn HandTracker,
    screen: &mut dyn Screen,
    clock: &mut dyn Clock,
    sound: Option<&SoundBoard>,
) -> Result<RunSummary, AppError> {
    let mut summary = RunSummary::default();

    while screen.is_open() {
        let Some(mut frame) = source.read() else {
            error!(frames = summary.frames, "failed to read frame; stopping");
            break;
        };
        let now = clock.now();

        if let Some(event) = app.tick(&mut frame, tracker, now) {
            summary.activations += 1;
            if let Some(sound) = sound {
                sound.play(event.action);
            }
        }

        app.draw(&mut frame, now);
        screen.present(&frame)?;
        summary.frames += 1;

        match screen.poll_command() {
            Some(KeyCommand::Quit) => {
                info!("quit requested");
                break;
            }
            Some(cmd) => app.handle_command(cmd),
            None => {}
        }
    }

    Ok(summary)
}

// ════════════════════════════════════════════════════════════════════════════
// run — wire up collaborators from options
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config:   AppConfig,
    pub script:   Option<PathBuf>,
    pub headless: bool,
    /// Frame limit; headless runs default to ten seconds' worth.
    pub frames:   Option<u64>,
    pub fps:      u32,
    pub audio:    bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            config:   AppConfig::default(),
            script:   None,
            headless: false,
            frames:   None,
            fps:      60,
            audio:    true,
        }
    }
}

pub fn run(opts: RunOptions) -> Result<RunSummary, AppError> {
    let mut app = AppState::new(&opts.config)?;
    let (sim_tx, sim_rx) = mpsc::channel();

    let mut tracker: Box<dyn HandTracker> = match &opts.script {
        Some(path) => {
            let script = HandScript::load(path)?;
            info!(path = %path.display(), steps = script.steps.len(), "loaded hand script");
            Box::new(ScriptedHand::new(script))
        }
        None => Box::new(SimHandTracker::new(sim_rx)),
    };

    let frame_limit = if opts.headless {
        Some(opts.frames.unwrap_or(opts.fps as u64 * 10))
    } else {
        opts.frames
    };
    let mut camera = SimCamera::new(WIN_W, WIN_H).with_frame_limit(frame_limit);

    let sound = (opts.audio && opts.config.audio.enabled)
        .then(|| SoundBoard::spawn(&opts.config.audio));

    let summary = if opts.headless {
        if opts.script.is_none() {
            warn!("headless run without --script: no hand will be seen");
        }
        drop(sim_tx);
        let mut screen = HeadlessScreen::new();
        let mut clock = FixedStepClock::at_fps(opts.fps);
        run_loop(&mut app, &mut camera, tracker.as_mut(), &mut screen, &mut clock, sound.as_ref())?
    } else {
        let mut screen = Visualizer::new(sim_tx, opts.fps)?;
        let mut clock = MonotonicClock::new();
        run_loop(&mut app, &mut camera, tracker.as_mut(), &mut screen, &mut clock, sound.as_ref())?
    };

    debug!(?summary, "run finished");
    info!(
        frames = summary.frames,
        activations = summary.activations,
        chakra = app.engine().pool().percentage(),
        "session ended"
    );
    Ok(summary)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use chakra_core::Gesture;

    const FIST_FOR_TWO_SECONDS: &str = r#"
        [[step]]
        at = 0.0
        fingers = [0, 0, 0, 0, 0]

        [[step]]
        at = 2.0
    "#;

    fn scripted(text: &str) -> ScriptedHand {
        ScriptedHand::new(HandScript::from_toml_str(text).unwrap())
    }

    fn run_headless(frames: u64, screen: &mut HeadlessScreen, script: &str) -> (AppState, RunSummary) {
        let mut app = AppState::new(&AppConfig::default()).unwrap();
        let mut camera = SimCamera::new(64, 48).with_frame_limit(Some(frames));
        let mut hand = scripted(script);
        let mut clock = FixedStepClock::at_fps(10);
        let summary = run_loop(&mut app, &mut camera, &mut hand, screen, &mut clock, None).unwrap();
        (app, summary)
    }

    #[test]
    fn held_fist_activates_once() {
        let mut screen = HeadlessScreen::new();
        let (app, summary) = run_headless(30, &mut screen, FIST_FOR_TWO_SECONDS);
        assert_eq!(summary, RunSummary { frames: 30, activations: 1 });
        assert_eq!(screen.presented(), 30);
        let last = app.engine().last_activation().unwrap();
        assert_eq!(last.action, Gesture::Fist);
        assert!((last.activated_at - 0.5).abs() < 1e-6);
    }

    #[test]
    fn paused_app_does_not_activate() {
        let mut screen = HeadlessScreen::new().with_command(1, KeyCommand::TogglePause);
        let (app, summary) = run_headless(20, &mut screen, FIST_FOR_TWO_SECONDS);
        assert!(app.is_paused());
        assert_eq!(summary.activations, 0);
        assert_eq!(app.engine().pool().percentage(), 100.0);
        assert!(app.hud_view(2.0).paused);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut screen = HeadlessScreen::new().with_command(3, KeyCommand::Quit);
        let (_, summary) = run_headless(50, &mut screen, FIST_FOR_TWO_SECONDS);
        assert_eq!(summary.frames, 3);
    }

    #[test]
    fn reset_refills_after_activation() {
        let mut screen = HeadlessScreen::new().with_command(10, KeyCommand::ResetChakra);
        let (app, summary) = run_headless(12, &mut screen, FIST_FOR_TWO_SECONDS);
        assert_eq!(summary.activations, 1);
        assert_eq!(app.engine().pool().percentage(), 100.0);
        assert_eq!(app.hud_view(1.2).cooldown, 0.0);
    }

    #[test]
    fn hud_reports_hold_and_cooldown() {
        let mut app = AppState::new(&AppConfig::default()).unwrap();
        let mut hand = scripted(FIST_FOR_TWO_SECONDS);
        let mut frame = Frame::new(32, 32, 0);

        app.tick(&mut frame, &mut hand, 0.0);
        app.tick(&mut frame, &mut hand, 0.25);
        let hud = app.hud_view(0.25);
        assert_eq!(hud.gesture.as_deref(), Some("Fist"));
        assert!((hud.hold_progress - 0.5).abs() < 1e-9);
        assert_eq!(hud.active_jutsu, None);
        assert_eq!(hud.fps, 4);

        assert!(app.tick(&mut frame, &mut hand, 0.5).is_some());
        let hud = app.hud_view(1.0);
        assert_eq!(hud.active_jutsu.as_deref(), Some("Fire Style: Fireball Jutsu"));
        assert!((hud.cooldown - 1.5).abs() < 1e-9);
    }

    #[test]
    fn frame_failure_ends_run_cleanly() {
        let mut screen = HeadlessScreen::new();
        let (_, summary) = run_headless(0, &mut screen, FIST_FOR_TWO_SECONDS);
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn fps_counter_uses_tick_gap() {
        let mut fps = FpsCounter::default();
        assert_eq!(fps.tick(1.0), 0);
        assert_eq!(fps.tick(1.02), 50);
        assert_eq!(fps.tick(1.02), 50);
    }
}
