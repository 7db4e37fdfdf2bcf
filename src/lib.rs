//! Word Breaker - a breakout-style vocabulary quiz game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, word learning, stages)
//! - `platform`: Host-side collaborators (input mapping, frame loop, headless host)
//! - `audio`: Sound cue dispatch
//! - `config`: Data-driven game balance

pub mod audio;
pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

pub use config::GameConfig;
pub use error::LoadError;

/// Default game constants
///
/// Speeds are pixels per second at the fixed 60 Hz timestep.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_HZ: f32 = 60.0;
    pub const SIM_DT: f32 = 1.0 / SIM_HZ;

    /// Screen
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Paddle
    pub const PADDLE_WIDTH: f32 = 168.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Gap between paddle bottom and screen bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 20.0;
    /// Movement below this (pixels per tick) counts as standing still
    pub const PADDLE_DEAD_BAND: f32 = 0.1;
    /// Extra angle imparted by a moving paddle (degrees)
    pub const PADDLE_ANGLE_DEGREES: f32 = 30.0;
    /// Gamepad paddle speed
    pub const PADDLE_STICK_SPEED: f32 = 480.0;
    pub const STICK_DEAD_ZONE: f32 = 0.1;
    /// Pointer must move this far before it overrides gamepad control
    pub const POINTER_MOVE_THRESHOLD: f32 = 3.0;

    /// Ball
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED_X: f32 = 172.8;
    pub const BALL_SPEED_Y: f32 = 216.0;
    /// Horizontal speed at the paddle edge (before the 0.3 offset factor)
    pub const BALL_MAX_VX: f32 = 259.2;
    /// Added to ball speed on every paddle return
    pub const PADDLE_BOUNCE_BOOST: f32 = 60.0;
    /// Wall and block bounces keep this fraction of the reflected component
    pub const BOUNCE_DAMPING: f32 = 0.8;
    /// Directional launch angle range, measured from vertical (degrees)
    pub const LAUNCH_ANGLE_MIN_DEGREES: f32 = 15.0;
    pub const LAUNCH_ANGLE_MAX_DEGREES: f32 = 45.0;
    /// Ball rests this far above the paddle before launch
    pub const BALL_SPAWN_GAP: f32 = 5.0;

    /// Blocks
    pub const BLOCK_WIDTH: f32 = 300.0;
    pub const BLOCK_HEIGHT: f32 = 40.0;
    pub const BLOCK_COLUMNS: usize = 3;
    pub const BLOCK_SPACING_X: f32 = 30.0;
    pub const BLOCK_ROW_Y: f32 = 150.0;
    pub const BLOCK_CORRECT_HP: u8 = 2;

    /// Door
    pub const DOOR_WIDTH: f32 = 360.0;
    pub const DOOR_HEIGHT: f32 = 40.0;
    pub const DOOR_Y: f32 = 20.0;

    /// Scoring
    pub const SCORE_BLOCK_DESTROY: u32 = 100;
    pub const COMBO_THRESHOLD: u32 = 3;
    pub const COMBO_MULTIPLIER: f64 = 1.2;
    pub const PERFECT_BONUS_MULTIPLIER: f64 = 1.2;
    pub const INITIAL_LIVES: u32 = 10;

    /// Stages
    pub const STAGE_CLEAR_DELAY_SECS: f32 = 1.5;
    pub const TOTAL_STAGES: u32 = 10;
    pub const WORDS_PER_STAGE_MIN: usize = 3;
    pub const WORDS_PER_STAGE_MAX: usize = 5;
    pub const NEW_WORDS_PER_STAGE_MAX: usize = 5;
}

/// Scale `v` to length `|v| + boost`, keeping its direction.
///
/// A zero vector is returned unchanged.
#[inline]
pub fn boost_magnitude(v: glam::Vec2, boost: f32) -> glam::Vec2 {
    let speed = v.length();
    if speed > 0.0 {
        v * ((speed + boost) / speed)
    } else {
        v
    }
}
