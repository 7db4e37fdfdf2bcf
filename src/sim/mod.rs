//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (block batch order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod score;
pub mod state;
pub mod tick;
pub mod words;

pub use collision::{BlockHit, CollisionReport, HitOutcome, WallHit};
pub use rect::Rect;
pub use score::ScoreManager;
pub use state::{
    Axis, Ball, Block, BlockKind, Door, GamePhase, GameState, LaunchHint, MoveDirection, Paddle,
};
pub use tick::{GameEvent, TickInput, arrange_blocks, start_stage, tick};
pub use words::{StagePolicy, Word, WordManager, WordState, WordSummary};
