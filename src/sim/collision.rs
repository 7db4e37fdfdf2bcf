//! Collision detection and response
//!
//! Everything is axis-aligned, so the interesting part is deciding which face
//! of a block the ball came through. The resolver runs once per tick in a
//! fixed order: walls, paddle, blocks (first hit only), door.

use super::rect::Rect;
use super::state::{Axis, Ball, Block, Door, Paddle};
use crate::config::GameConfig;

/// Result of the wall check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallHit {
    /// Left or right wall
    pub side: bool,
    pub top: bool,
    /// Ball left through the bottom; not a physical wall
    pub fell_out: bool,
}

impl WallHit {
    pub fn bounced(&self) -> bool {
        self.side || self.top
    }
}

/// What a block hit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Correct block broke
    Destroyed,
    /// Correct block took damage but survived
    Damaged,
    /// Wrong answer hit
    Incorrect,
}

/// A single block interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHit {
    /// Index into the block batch
    pub index: usize,
    pub block_id: u32,
    pub word_id: Option<u32>,
    pub outcome: HitOutcome,
}

/// Everything the resolver found this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub wall: WallHit,
    pub paddle: bool,
    pub block: Option<BlockHit>,
    /// Ball reached the unlocked door
    pub door: bool,
}

/// Bounce off the left, right and top edges, clamping the ball inside
pub fn ball_wall_collision(ball: &mut Ball, width: f32, height: f32, damping: f32) -> WallHit {
    let mut hit = WallHit::default();
    let r = ball.radius;

    if ball.pos.x - r <= 0.0 {
        ball.pos.x = r;
        ball.reflect_axis(Axis::Horizontal, damping);
        hit.side = true;
    } else if ball.pos.x + r >= width {
        ball.pos.x = width - r;
        ball.reflect_axis(Axis::Horizontal, damping);
        hit.side = true;
    }

    if ball.pos.y - r <= 0.0 {
        ball.pos.y = r;
        ball.reflect_axis(Axis::Vertical, damping);
        hit.top = true;
    }

    hit.fell_out = ball.is_out_of_bounds(height);
    hit
}

/// Return the ball off the paddle if it's coming down onto it
///
/// A ball already moving up is left alone, so a still-overlapping ball can't
/// be reflected twice.
pub fn ball_paddle_collision(ball: &mut Ball, paddle: &Paddle, config: &GameConfig) -> bool {
    if !ball.bounds().overlaps(&paddle.bounds()) || ball.vel.y <= 0.0 {
        return false;
    }

    ball.reflect_off_paddle(
        paddle.x,
        paddle.width,
        paddle.direction,
        config.ball_max_vx,
        config.paddle_angle_tan(),
        config.paddle_bounce_boost,
    );
    // Rest on the paddle surface
    ball.pos.y = paddle.y - ball.radius;
    true
}

/// Guess which face of `rect` the ball entered through
///
/// Steps the ball back one tick along its current velocity and picks the
/// block edge closest to that point. Ties go to the horizontal axis.
pub fn struck_axis(ball: &Ball, rect: &Rect, dt: f32) -> Axis {
    let prev = ball.pos - ball.vel * dt;

    let to_left = (prev.x - rect.left()).abs();
    let to_right = (prev.x - rect.right()).abs();
    let to_top = (prev.y - rect.top()).abs();
    let to_bottom = (prev.y - rect.bottom()).abs();

    let nearest_x = to_left.min(to_right);
    let nearest_y = to_top.min(to_bottom);
    if nearest_x <= nearest_y {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Whether a block can be hit right now
///
/// Once the door is open, wrong answers turn passable.
pub fn block_is_solid(block: &Block, door_unlocked: bool) -> bool {
    block.has_collision() && !block.destroyed && !(door_unlocked && block.is_incorrect())
}

/// Bounce the ball off one block. Returns true on contact.
///
/// The block itself is not damaged here.
pub fn ball_block_collision(
    ball: &mut Ball,
    block: &Block,
    door_unlocked: bool,
    damping: f32,
    dt: f32,
) -> bool {
    if !block_is_solid(block, door_unlocked) || !ball.bounds().overlaps(&block.rect) {
        return false;
    }

    let rect = &block.rect;
    let prev = ball.pos - ball.vel * dt;
    let center = rect.center();
    let axis = struck_axis(ball, rect, dt);

    ball.reflect_axis(axis, damping);

    // Push out one unit past the struck face
    match axis {
        Axis::Horizontal => {
            ball.pos.x = if prev.x < center.x {
                rect.left() - ball.radius - 1.0
            } else {
                rect.right() + ball.radius + 1.0
            };
        }
        Axis::Vertical => {
            ball.pos.y = if prev.y < center.y {
                rect.top() - ball.radius - 1.0
            } else {
                rect.bottom() + ball.radius + 1.0
            };
        }
    }

    log::debug!("Ball hit block {} ({:?} face)", block.id, axis);
    true
}

/// Test blocks in order and hit the first one touched
pub fn ball_blocks_collision(
    ball: &mut Ball,
    blocks: &mut [Block],
    door_unlocked: bool,
    damping: f32,
    dt: f32,
) -> Option<BlockHit> {
    let index = blocks
        .iter()
        .position(|block| ball_block_collision(ball, block, door_unlocked, damping, dt))?;

    let block = &mut blocks[index];
    let destroyed = block.hit();
    let outcome = if block.is_incorrect() {
        HitOutcome::Incorrect
    } else if destroyed {
        HitOutcome::Destroyed
    } else {
        HitOutcome::Damaged
    };

    Some(BlockHit {
        index,
        block_id: block.id,
        word_id: block.word_id,
        outcome,
    })
}

/// Ball touches the open door
pub fn ball_door_collision(ball: &Ball, door: &Door) -> bool {
    door.is_unlocked() && ball.bounds().overlaps(&door.rect)
}

/// Run every check for one tick in priority order
///
/// Nothing is resolved for a launched-but-fallen ball or an unlaunched one.
pub fn resolve(
    ball: &mut Ball,
    paddle: &Paddle,
    blocks: &mut [Block],
    door: &Door,
    config: &GameConfig,
    dt: f32,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    if !ball.launched {
        return report;
    }

    report.wall = ball_wall_collision(
        ball,
        config.screen_width,
        config.screen_height,
        config.bounce_damping,
    );
    if report.wall.fell_out {
        return report;
    }

    report.paddle = ball_paddle_collision(ball, paddle, config);
    report.block = ball_blocks_collision(
        ball,
        blocks,
        door.is_unlocked(),
        config.bounce_damping,
        dt,
    );
    report.door = ball_door_collision(ball, door);
    report
}
