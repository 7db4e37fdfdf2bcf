//! Platform abstraction layer
//!
//! The simulation never talks to devices directly. A `Host` supplies input,
//! shows the result and paces frames; `run` glues it to the fixed-step tick.

pub mod headless;
pub mod input;

pub use headless::HeadlessHost;
pub use input::{InputMapper, RawInput};

use crate::audio::AudioManager;
use crate::consts::SIM_DT;
use crate::sim::{GameEvent, GamePhase, GameState, tick};

/// Whatever drives the game: a window, a browser tab, a test script
pub trait Host {
    /// Device state for the next frame, or `None` to quit
    fn poll(&mut self, state: &GameState) -> Option<RawInput>;

    /// Show the state after a tick
    fn present(&mut self, state: &GameState, events: &[GameEvent]);

    /// Block until the next frame is due
    fn wait_frame(&mut self);
}

/// Run the frame loop until the host quits. Returns the number of frames run.
///
/// One tick per frame at the fixed timestep. Cues from the tick go to `audio`.
pub fn run<H: Host + ?Sized>(state: &mut GameState, host: &mut H, audio: &mut AudioManager) -> u64 {
    let mut mapper = InputMapper::new(&state.config);
    let mut frames = 0;

    while let Some(raw) = host.poll(state) {
        let input = mapper.sample(&raw, state.paddle.width, SIM_DT);
        let events = tick(state, &input, SIM_DT);

        // Stage set-up re-centres the paddle; drop any stale virtual target
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::PhaseChanged { to: GamePhase::StageStart, .. }))
        {
            mapper.sync_to(state.paddle.center_x());
        }

        for event in &events {
            if let GameEvent::Cue(cue) = event {
                audio.play(*cue);
            }
        }

        host.present(state, &events);
        host.wait_frame();
        frames += 1;
    }

    log::info!("Frame loop finished after {frames} frames");
    frames
}
