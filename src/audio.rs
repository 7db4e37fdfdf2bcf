//! Sound cue dispatch
//!
//! The simulation only names cues; a backend decides how (or whether) to play
//! them. A missing or muted backend never affects gameplay.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Wall, paddle, wrong answer, or a correct block that survived
    Bounce,
    /// Correct block broken
    Correct,
    /// Door reached
    Clear,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::Bounce => "bounce",
            Cue::Correct => "correct",
            Cue::Clear => "clear",
        }
    }
}

/// Something that can actually make noise
pub trait CueBackend {
    fn play(&mut self, cue: Cue, volume: f32);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl CueBackend for LogBackend {
    fn play(&mut self, cue: Cue, volume: f32) {
        log::debug!("cue {} (volume {volume:.2})", cue.name());
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn CueBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    /// No backend: every cue is dropped
    pub fn new() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn with_backend(backend: Box<dyn CueBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::new()
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue if a backend is available and not muted
    pub fn play(&mut self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Some(backend) = self.backend.as_mut() {
            backend.play(cue, vol);
        }
    }
}
