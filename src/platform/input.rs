//! Input mapping
//!
//! Turns raw device state into the paddle target the simulation consumes.

use crate::config::GameConfig;
use crate::sim::TickInput;

/// Device state sampled once per frame
#[derive(Debug, Clone, Copy, Default)]
pub struct RawInput {
    /// Pointer x in screen pixels, if a pointer is over the play area
    pub pointer_x: Option<f32>,
    /// A gamepad is connected
    pub gamepad: bool,
    /// Left stick x axis, -1..1
    pub stick_x: f32,
    /// D-pad, -1, 0 or 1
    pub dpad_x: f32,
    pub action: bool,
    pub toggle_hard_mode: bool,
}

/// Keeps a virtual paddle target across frames
#[derive(Debug, Clone)]
pub struct InputMapper {
    screen_width: f32,
    stick_speed: f32,
    dead_zone: f32,
    pointer_threshold: f32,
    target_x: f32,
    last_pointer_x: Option<f32>,
}

impl InputMapper {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            screen_width: config.screen_width,
            stick_speed: config.paddle_stick_speed,
            dead_zone: config.stick_dead_zone,
            pointer_threshold: config.pointer_move_threshold,
            target_x: config.screen_width / 2.0,
            last_pointer_x: None,
        }
    }

    pub fn target_x(&self) -> f32 {
        self.target_x
    }

    /// Move the virtual target to where the paddle actually is
    pub fn sync_to(&mut self, paddle_center_x: f32) {
        self.target_x = paddle_center_x;
    }

    /// Map one frame of device state to a tick input
    ///
    /// With a gamepad: stick beyond the dead zone, then d-pad, then the pointer
    /// only if it actually moved. Without one the pointer is absolute.
    pub fn sample(&mut self, raw: &RawInput, paddle_width: f32, dt: f32) -> TickInput {
        let step = self.stick_speed * dt;

        if raw.gamepad {
            if raw.stick_x.abs() > self.dead_zone {
                self.target_x += raw.stick_x * step;
            } else if raw.dpad_x != 0.0 {
                self.target_x += raw.dpad_x * step;
            } else if let Some(px) = raw.pointer_x {
                let moved = self
                    .last_pointer_x
                    .is_none_or(|last| (px - last).abs() > self.pointer_threshold);
                if moved {
                    self.target_x = px;
                }
            }
        } else if let Some(px) = raw.pointer_x {
            self.target_x = px;
        }
        if raw.pointer_x.is_some() {
            self.last_pointer_x = raw.pointer_x;
        }

        let half = paddle_width / 2.0;
        self.target_x = self.target_x.clamp(half, (self.screen_width - half).max(half));

        TickInput {
            target_x: Some(self.target_x),
            action: raw.action,
            toggle_hard_mode: raw.toggle_hard_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn mapper() -> InputMapper {
        InputMapper::new(&GameConfig::default())
    }

    fn pad(stick_x: f32, dpad_x: f32, pointer_x: Option<f32>) -> RawInput {
        RawInput {
            gamepad: true,
            stick_x,
            dpad_x,
            pointer_x,
            ..Default::default()
        }
    }

    #[test]
    fn test_pointer_is_absolute_without_gamepad() {
        let mut m = mapper();
        let raw = RawInput {
            pointer_x: Some(300.0),
            action: true,
            ..Default::default()
        };
        let input = m.sample(&raw, 168.0, DT);
        assert_eq!(input.target_x, Some(300.0));
        assert!(input.action);
    }

    #[test]
    fn test_stick_moves_target() {
        let mut m = mapper();
        let input = m.sample(&pad(1.0, 0.0, None), 168.0, DT);
        assert!((input.target_x.unwrap() - 648.0).abs() < 1e-3);

        // Inside the dead zone: nothing
        let input = m.sample(&pad(0.05, 0.0, None), 168.0, DT);
        assert!((input.target_x.unwrap() - 648.0).abs() < 1e-3);
    }

    #[test]
    fn test_dpad_moves_target() {
        let mut m = mapper();
        let input = m.sample(&pad(0.0, -1.0, None), 168.0, DT);
        assert!((input.target_x.unwrap() - 632.0).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_needs_to_move_with_gamepad() {
        let mut m = mapper();
        m.sample(&pad(0.0, 0.0, Some(200.0)), 168.0, DT);
        assert_eq!(m.target_x(), 200.0);

        // Stick takes over, resting pointer doesn't pull it back
        m.sample(&pad(1.0, 0.0, Some(200.0)), 168.0, DT);
        m.sample(&pad(0.0, 0.0, Some(201.0)), 168.0, DT);
        assert!((m.target_x() - 208.0).abs() < 1e-3);

        m.sample(&pad(0.0, 0.0, Some(400.0)), 168.0, DT);
        assert_eq!(m.target_x(), 400.0);
    }

    #[test]
    fn test_sync_to_drops_accumulated_stick() {
        let mut m = mapper();
        for _ in 0..10 {
            m.sample(&pad(-1.0, 0.0, None), 168.0, DT);
        }
        assert!(m.target_x() < 600.0);

        m.sync_to(640.0);
        let input = m.sample(&pad(0.0, 0.0, None), 168.0, DT);
        assert_eq!(input.target_x, Some(640.0));
    }

    #[test]
    fn test_target_clamped() {
        let mut m = mapper();
        let raw = RawInput {
            pointer_x: Some(-100.0),
            ..Default::default()
        };
        assert_eq!(m.sample(&raw, 168.0, DT).target_x, Some(84.0));

        let raw = RawInput {
            pointer_x: Some(5000.0),
            ..Default::default()
        };
        assert_eq!(m.sample(&raw, 168.0, DT).target_x, Some(1196.0));
    }
}
