//! Headless host with an autopilot
//!
//! Plays the game without a window: follows the ball with a small lead and
//! presses the action button on every waiting screen. Used by the binary and
//! by soak tests.

use super::{Host, RawInput};
use crate::sim::{GameEvent, GamePhase, GameState};

/// Pixels the autopilot aims ahead of the ball along its heading
const LEAD: f32 = 20.0;

pub struct HeadlessHost {
    max_frames: u64,
    frames: u64,
    blocks_hit: u32,
    lives_lost: u32,
    stages_cleared: u32,
}

impl HeadlessHost {
    /// Quit at the result screen or after `max_frames`, whichever comes first
    pub fn new(max_frames: u64) -> Self {
        Self {
            max_frames,
            frames: 0,
            blocks_hit: 0,
            lives_lost: 0,
            stages_cleared: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn blocks_hit(&self) -> u32 {
        self.blocks_hit
    }

    pub fn lives_lost(&self) -> u32 {
        self.lives_lost
    }

    pub fn stages_cleared(&self) -> u32 {
        self.stages_cleared
    }

    /// Where to put the paddle this frame
    fn aim(state: &GameState) -> f32 {
        let ball = &state.ball;
        // Wobble a little so rallies don't settle into a loop
        let t = state.time_ticks as f32 * 0.01;
        let wobble = t.sin() * 30.0 + (t * 0.7).sin() * 15.0;
        let ahead = ball.pos + ball.vel.normalize_or_zero() * LEAD;
        ahead.x + wobble
    }
}

impl Host for HeadlessHost {
    fn poll(&mut self, state: &GameState) -> Option<RawInput> {
        if state.phase == GamePhase::Result {
            log::info!("Autopilot reached the result screen");
            return None;
        }
        if self.frames >= self.max_frames {
            log::warn!("Autopilot stopped at the {} frame cap", self.max_frames);
            return None;
        }

        let waiting = match state.phase {
            GamePhase::Title | GamePhase::StageStart | GamePhase::GameOver => true,
            GamePhase::Playing => !state.ball.launched,
            GamePhase::StageClear | GamePhase::Result => false,
        };

        Some(RawInput {
            pointer_x: Some(Self::aim(state)),
            action: waiting,
            ..Default::default()
        })
    }

    fn present(&mut self, _state: &GameState, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::BlockHit { .. } => self.blocks_hit += 1,
                GameEvent::LifeLost { .. } => self.lives_lost += 1,
                GameEvent::StageCleared { .. } => self.stages_cleared += 1,
                _ => {}
            }
        }
    }

    fn wait_frame(&mut self) {
        self.frames += 1;
    }
}
