//! Game state and core simulation types
//!
//! Entities are plain state holders with their own mutation rules; the
//! controller in `tick` decides when each rule fires.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::score::ScoreManager;
use super::words::{Word, WordManager};
use crate::config::GameConfig;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first action
    Title,
    /// Question shown, ball resting on the paddle
    StageStart,
    /// Active gameplay
    Playing,
    /// Door reached, waiting out the clear delay
    StageClear,
    /// Out of lives, waiting for continue
    GameOver,
    /// All stages cleared
    Result,
}

/// Paddle movement since the previous update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveDirection {
    Left,
    #[default]
    Neutral,
    Right,
}

impl MoveDirection {
    /// -1, 0 or +1 along x
    pub fn sign(self) -> f32 {
        match self {
            MoveDirection::Left => -1.0,
            MoveDirection::Neutral => 0.0,
            MoveDirection::Right => 1.0,
        }
    }
}

/// Which side the ball should be served toward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchHint {
    Left,
    Center,
    Right,
}

impl From<MoveDirection> for LaunchHint {
    fn from(dir: MoveDirection) -> Self {
        match dir {
            MoveDirection::Left => LaunchHint::Left,
            MoveDirection::Neutral => LaunchHint::Center,
            MoveDirection::Right => LaunchHint::Right,
        }
    }
}

/// Velocity axis for reflections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// False while the ball rests on the paddle; velocity stays zero
    pub launched: bool,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            launched: false,
        }
    }

    /// Serve the ball. No-op once launched.
    ///
    /// A side hint serves at a random angle in the configured range from
    /// vertical toward that side; a centre hint serves at the base speeds with
    /// a random horizontal sign.
    pub fn launch<R: Rng + ?Sized>(&mut self, hint: LaunchHint, config: &GameConfig, rng: &mut R) {
        if self.launched {
            return;
        }

        self.vel = match hint {
            LaunchHint::Center => {
                let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                Vec2::new(config.ball_speed_x * sign, -config.ball_speed_y)
            }
            LaunchHint::Left | LaunchHint::Right => {
                let speed = Vec2::new(config.ball_speed_x, config.ball_speed_y).length();
                let angle = rng
                    .random_range(config.launch_angle_min_degrees..=config.launch_angle_max_degrees)
                    .to_radians();
                let sign = if hint == LaunchHint::Left { -1.0 } else { 1.0 };
                Vec2::new(sign * speed * angle.sin(), -speed * angle.cos())
            }
        };
        self.launched = true;
    }

    /// Explicit Euler step
    pub fn update(&mut self, dt: f32) {
        if !self.launched {
            return;
        }
        self.pos += self.vel * dt;
    }

    /// Flip one velocity component and damp it
    pub fn reflect_axis(&mut self, axis: Axis, damping: f32) {
        match axis {
            Axis::Horizontal => self.vel.x = -self.vel.x * damping,
            Axis::Vertical => self.vel.y = -self.vel.y * damping,
        }
    }

    /// Return the ball off the paddle
    ///
    /// Horizontal speed comes from where the ball struck (centre = straight up,
    /// edges = `max_vx * 0.3`) plus a fixed-angle kick when the paddle was
    /// moving. The ball always leaves upward, then its speed is raised by
    /// `boost` without changing direction.
    pub fn reflect_off_paddle(
        &mut self,
        paddle_x: f32,
        paddle_width: f32,
        paddle_dir: MoveDirection,
        max_vx: f32,
        angle_tan: f32,
        boost: f32,
    ) {
        let half_width = paddle_width / 2.0;
        let paddle_center = paddle_x + half_width;
        let offset = ((self.pos.x - paddle_center) / half_width).clamp(-1.0, 1.0);

        let base_vx = offset * max_vx * 0.3;
        let angle_vx = self.vel.y.abs() * angle_tan * paddle_dir.sign();
        self.vel.x = base_vx + angle_vx;
        self.vel.y = -self.vel.y.abs();

        self.vel = crate::boost_magnitude(self.vel, boost);
    }

    /// Ball has left through the bottom edge
    pub fn is_out_of_bounds(&self, screen_height: f32) -> bool {
        self.pos.y > screen_height + self.radius
    }

    /// Re-home the ball and wait for a new launch
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.launched = false;
    }

    /// Collision footprint
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    /// Fixed for the whole stage
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub prev_x: f32,
    /// Consumed by paddle reflection only
    pub direction: MoveDirection,
}

impl Paddle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            prev_x: x,
            direction: MoveDirection::Neutral,
        }
    }

    /// Centre the paddle on `target_x`, clamped to the screen
    pub fn update(&mut self, target_x: f32, screen_width: f32, dead_band: f32) {
        self.prev_x = self.x;
        self.x = (target_x - self.width / 2.0).clamp(0.0, (screen_width - self.width).max(0.0));

        let dx = self.x - self.prev_x;
        self.direction = if dx.abs() < dead_band {
            MoveDirection::Neutral
        } else if dx > 0.0 {
            MoveDirection::Right
        } else {
            MoveDirection::Left
        };
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Block behaviour by role in the question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// The right answer; breaks after `hp` hits
    Correct { hp: u8 },
    /// A wrong answer; solid but never damaged
    Incorrect,
    /// Scenery; no collision at all
    Decorative,
}

/// An answer block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub rect: Rect,
    pub kind: BlockKind,
    /// Question word this block answers (set on incorrect blocks too)
    pub word_id: Option<u32>,
    pub text: String,
    pub destroyed: bool,
}

impl Block {
    pub fn new(id: u32, rect: Rect, kind: BlockKind, word_id: Option<u32>, text: String) -> Self {
        Self {
            id,
            rect,
            kind,
            word_id,
            text,
            destroyed: false,
        }
    }

    /// Register a hit. Returns true iff this hit destroyed the block.
    ///
    /// Only correct blocks take damage; everything else is left untouched.
    pub fn hit(&mut self) -> bool {
        match &mut self.kind {
            BlockKind::Correct { hp } if !self.destroyed => {
                *hp = hp.saturating_sub(1);
                if *hp == 0 {
                    self.destroyed = true;
                }
                self.destroyed
            }
            _ => false,
        }
    }

    pub fn has_collision(&self) -> bool {
        self.kind != BlockKind::Decorative
    }

    pub fn is_correct(&self) -> bool {
        matches!(self.kind, BlockKind::Correct { .. })
    }

    pub fn is_incorrect(&self) -> bool {
        self.kind == BlockKind::Incorrect
    }

    /// Remaining hit points (non-correct blocks report 1)
    pub fn hp(&self) -> u8 {
        match self.kind {
            BlockKind::Correct { hp } => hp,
            _ => 1,
        }
    }

    /// Correct block one hit away from breaking
    pub fn is_last_hit(&self) -> bool {
        !self.destroyed && self.kind == BlockKind::Correct { hp: 1 }
    }

    /// Text to draw: once the door opens, wrong answers show the right one
    pub fn display_text<'a>(&'a self, door_unlocked: bool, correct_text: Option<&'a str>) -> &'a str {
        match correct_text {
            Some(correct) if door_unlocked && self.is_incorrect() => correct,
            _ => &self.text,
        }
    }

    /// Hard mode colours correct blocks like incorrect ones
    pub fn appears_incorrect(&self, hard_mode: bool) -> bool {
        self.is_incorrect() || (hard_mode && self.is_correct())
    }
}

/// The stage exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub rect: Rect,
    pub locked: bool,
}

impl Door {
    pub fn new(rect: Rect) -> Self {
        Self { rect, locked: true }
    }

    pub fn unlock(&mut self) {
        if self.locked {
            log::info!("Door unlocked");
        }
        self.locked = false;
    }

    pub fn reset(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_unlocked(&self) -> bool {
        !self.locked
    }
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    /// Current stage (1-based)
    pub stage: u32,
    /// Presentation only: correct blocks drawn as incorrect
    pub hard_mode: bool,
    pub ball: Ball,
    pub paddle: Paddle,
    pub door: Door,
    /// Current question's answer blocks
    pub blocks: Vec<Block>,
    /// Correct blocks in the batch that aren't destroyed yet
    pub remaining_correct_blocks: u32,
    /// Words drawn for this stage; index 0 is the question
    pub stage_words: Vec<Word>,
    pub current_question: Option<Word>,
    pub score: ScoreManager,
    pub words: WordManager,
    /// Ticks left in the stage clear delay
    pub clear_ticks: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a run at the title screen
    pub fn new(config: GameConfig, words: Vec<Word>, seed: u64) -> Self {
        let paddle_x = (config.screen_width - config.paddle_width) / 2.0;
        let paddle = Paddle::new(paddle_x, config.paddle_y(), config.paddle_width, config.paddle_height);
        let ball = Ball::new(Vec2::ZERO, config.ball_radius);
        let door = Door::new(Rect::new(
            config.door_x(),
            config.door_y,
            config.door_width,
            config.door_height,
        ));

        let mut state = Self {
            score: ScoreManager::new(&config),
            words: WordManager::new(words),
            config,
            seed,
            phase: GamePhase::Title,
            stage: 1,
            hard_mode: false,
            ball,
            paddle,
            door,
            blocks: Vec::new(),
            remaining_correct_blocks: 0,
            stage_words: Vec::new(),
            current_question: None,
            clear_ticks: 0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.reset_entities();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Fresh paddle, ball and door for a stage; blocks are cleared
    pub fn reset_entities(&mut self) {
        let config = &self.config;
        let paddle_x = (config.screen_width - config.paddle_width) / 2.0;
        self.paddle = Paddle::new(paddle_x, config.paddle_y(), config.paddle_width, config.paddle_height);
        self.ball = Ball::new(self.ball_spawn_point(), config.ball_radius);
        self.door.reset();
        self.blocks.clear();
        self.remaining_correct_blocks = 0;
    }

    /// Resting spot above the paddle centre
    pub fn ball_spawn_point(&self) -> Vec2 {
        Vec2::new(
            self.paddle.center_x(),
            self.paddle.y - self.config.ball_radius - self.config.ball_spawn_gap,
        )
    }

    /// Keep an unlaunched ball on the paddle
    pub fn attach_ball_to_paddle(&mut self) {
        if !self.ball.launched {
            self.ball.pos = self.ball_spawn_point();
        }
    }

    /// Correct answer text for the current question
    pub fn correct_text(&self) -> Option<&str> {
        self.current_question.as_ref().map(|w| w.ja.as_str())
    }
}
