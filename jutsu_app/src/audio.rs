//! Sound cues for activations, played as short MIDI phrases.
//!
//! Cues run on their own thread so a phrase never stalls the frame loop.
//! Only some jutsu have a cue; asking for one that doesn't is a no-op, and
//! with no MIDI port available every cue is silently dropped.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chakra_core::Gesture;
use tracing::{debug, info, warn};

use crate::config::AudioConfig;

// ════════════════════════════════════════════════════════════════════════════
// Cues
// ════════════════════════════════════════════════════════════════════════════

/// One note of a cue: MIDI pitch and how long to hold it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CueNote {
    pub pitch: u8,
    pub ms:    u64,
}

const fn n(pitch: u8, ms: u64) -> CueNote { CueNote { pitch, ms } }

const FIREBALL:     &[CueNote] = &[n(48, 60), n(55, 60), n(60, 80), n(67, 220)];
const CHIDORI:      &[CueNote] = &[n(84, 40), n(86, 40), n(84, 40), n(89, 40), n(91, 160)];
const SHADOW_CLONE: &[CueNote] = &[n(60, 90), n(60, 90), n(60, 180)];

/// The phrase registered for `gesture`'s jutsu, if any.
pub fn cue_for(gesture: Gesture) -> Option<&'static [CueNote]> {
    match gesture {
        Gesture::Fist      => Some(FIREBALL),
        Gesture::PeaceSign => Some(CHIDORI),
        Gesture::OpenPalm  => Some(SHADOW_CLONE),
        _ => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null
// ════════════════════════════════════════════════════════════════════════════

trait MidiOut: Send {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self,  channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        let _ = self.conn.send(&[0xC0 | (channel & 0x0F), program & 0x7F]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        let _ = self.conn.send(&[0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note & 0x7F, 0]);
    }
}

struct NullOut;
impl MidiOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8)   {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8)  {}
    fn note_off(&mut self, _ch: u8, _n: u8)          {}
}

/// Open the first MIDI output port, preferring a soft synth.  Falls back to
/// `NullOut` when there is none.
fn open_midi_output() -> Box<dyn MidiOut> {
    let midi_out = match midir::MidiOutput::new("jutsu_sound_cues") {
        Ok(m)  => m,
        Err(e) => {
            warn!(error = %e, "MIDI init failed; sound cues disabled");
            return Box::new(NullOut);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        info!("no MIDI output ports; sound cues disabled");
        return Box::new(NullOut);
    }

    let port_idx = ports.iter().enumerate()
        .find(|(_, p)| {
            midi_out.port_name(p).map(|n| {
                let n = n.to_lowercase();
                n.contains("fluid") || n.contains("timidity") ||
                n.contains("microsoft") || n.contains("gm") ||
                n.contains("synth")
            }).unwrap_or(false)
        })
        .map(|(i, _)| i)
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out.port_name(port).unwrap_or_else(|_| "Unknown".to_string());
    info!(port = %name, "opening MIDI port for sound cues");

    match midi_out.connect(port, "jutsu-cues") {
        Ok(conn) => Box::new(MidirOut { conn }),
        Err(e) => {
            warn!(error = %e, "MIDI connect failed; sound cues disabled");
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SoundBoard — the cue thread
// ════════════════════════════════════════════════════════════════════════════

enum SoundCommand {
    Play(&'static [CueNote]),
    Quit,
}

/// Handle to the cue thread.  Dropping it stops the thread and releases the
/// MIDI port.
pub struct SoundBoard {
    tx:     Sender<SoundCommand>,
    handle: Option<JoinHandle<()>>,
}

impl SoundBoard {
    pub fn spawn(config: &AudioConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let cfg = config.clone();
        let handle = thread::spawn(move || cue_thread(cfg, rx));
        SoundBoard { tx, handle: Some(handle) }
    }

    /// Queue the cue for `gesture`; a gesture without one is ignored.
    pub fn play(&self, gesture: Gesture) {
        match cue_for(gesture) {
            Some(cue) => { let _ = self.tx.send(SoundCommand::Play(cue)); }
            None      => debug!(%gesture, "no sound cue registered"),
        }
    }
}

impl Drop for SoundBoard {
    fn drop(&mut self) {
        let _ = self.tx.send(SoundCommand::Quit);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn cue_thread(cfg: AudioConfig, rx: Receiver<SoundCommand>) {
    let mut midi = open_midi_output();
    midi.program_change(cfg.channel, cfg.program);

    for cmd in rx {
        match cmd {
            SoundCommand::Play(cue) => {
                for note in cue {
                    midi.note_on(cfg.channel, note.pitch, cfg.velocity);
                    thread::sleep(Duration::from_millis(note.ms));
                    midi.note_off(cfg.channel, note.pitch);
                }
            }
            SoundCommand::Quit => break,
        }
    }
}

/// Total length of a cue.
pub fn cue_duration(cue: &[CueNote]) -> Duration {
    Duration::from_millis(cue.iter().map(|n| n.ms).sum())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_cues() {
        assert!(cue_for(Gesture::Fist).is_some());
        assert!(cue_for(Gesture::PeaceSign).is_some());
        assert!(cue_for(Gesture::OpenPalm).is_some());
        assert!(cue_for(Gesture::Point).is_none());
    }

    #[test]
    fn cues_are_short_and_valid() {
        for g in Gesture::ALL {
            if let Some(cue) = cue_for(g) {
                assert!(cue_duration(cue) < Duration::from_millis(1000));
                assert!(cue.iter().all(|n| n.pitch < 128));
            }
        }
    }
}
