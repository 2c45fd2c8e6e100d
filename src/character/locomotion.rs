//! Horizontal movement and jump impulses.
//!
//! [`LocomotionDriver::drive`] is the only place that writes velocity or force
//! to the character body.  It runs after [`CharacterStateTracker::tick`] in the
//! same physics step so the grounded / coyote state it reads is current.

use super::state::{CharacterEvent, CharacterStateTracker, JumpKind};
use bevy::prelude::*;

/// How a jump is applied to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpMode {
    /// Vertical velocity is set to `jump_intensity / JUMP_VELOCITY_DIVISOR`.
    Velocity,
    /// `jump_intensity` is added as an upward force for one physics step.
    Force,
}

/// The physics body a controller moves.
///
/// Implemented over Rapier components by the Bevy adapter and by plain structs
/// in headless runs.
pub trait CharacterBody {
    /// Centre of the body in world space.
    fn position(&self) -> Vec2;
    fn linear_velocity(&self) -> Vec2;
    fn set_linear_velocity(&mut self, velocity: Vec2);
    /// Accumulate a force for the next physics step.
    fn add_force(&mut self, force: Vec2);
    /// Move to `position` and stop.
    fn teleport(&mut self, position: Vec2);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionSettings {
    pub movement_speed: f32,
    pub jump_intensity: f32,
    pub jump_velocity_divisor: f32,
    pub jump_mode: JumpMode,
    pub air_control: bool,
}

/// Per-tick input consumed by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocomotionInput {
    /// -1 left, 0 idle, 1 right.
    pub horizontal: i8,
    /// Already edge-triggered; the caller clears its request after handing it over.
    pub jump: bool,
}

#[derive(Debug, Clone)]
pub struct LocomotionDriver {
    settings: LocomotionSettings,
    horizontal_direction: i8,
    facing_right: bool,
}

impl LocomotionDriver {
    pub fn new(settings: LocomotionSettings) -> Self {
        Self {
            settings,
            horizontal_direction: 0,
            facing_right: true,
        }
    }

    #[inline]
    pub fn facing_right(&self) -> bool {
        self.facing_right
    }

    /// Apply one tick of input to `body`; returns the jump performed, if any.
    pub fn drive<B: CharacterBody + ?Sized>(
        &mut self,
        tracker: &mut CharacterStateTracker,
        body: &mut B,
        input: LocomotionInput,
        now: f64,
        events: &mut Vec<CharacterEvent>,
    ) -> Option<JumpKind> {
        let direction = input.horizontal.signum();
        if direction != self.horizontal_direction {
            self.horizontal_direction = direction;
            events.push(CharacterEvent::HorizontalMovementChanged(direction));
        }
        if direction != 0 {
            self.facing_right = direction > 0;
        }

        if self.settings.air_control || tracker.state().is_grounded {
            let velocity = body.linear_velocity();
            body.set_linear_velocity(Vec2::new(
                direction as f32 * self.settings.movement_speed,
                velocity.y,
            ));
        }

        if !input.jump {
            return None;
        }
        let kind = tracker.try_consume_jump(now)?;
        events.push(CharacterEvent::Jumped(kind));

        match self.settings.jump_mode {
            JumpMode::Velocity => {
                let velocity = body.linear_velocity();
                body.set_linear_velocity(Vec2::new(
                    velocity.x,
                    self.settings.jump_intensity / self.settings.jump_velocity_divisor,
                ));
            }
            JumpMode::Force => {
                body.add_force(Vec2::new(0.0, self.settings.jump_intensity));
            }
        }
        Some(kind)
    }
}

/// Plain-data body for headless simulation and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Force accumulated since the last [`PointBody::integrate`].
    pub force: Vec2,
}

impl PointBody {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Semi-implicit Euler step with unit mass; clears accumulated force.
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.velocity += (self.force + Vec2::new(0.0, -gravity)) * dt;
        self.position += self.velocity * dt;
        self.force = Vec2::ZERO;
    }
}

impl CharacterBody for PointBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn linear_velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.force = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: JumpMode) -> LocomotionSettings {
        LocomotionSettings {
            movement_speed: 5.0,
            jump_intensity: 400.0,
            jump_velocity_divisor: 50.0,
            jump_mode: mode,
            air_control: true,
        }
    }

    fn grounded() -> CharacterStateTracker {
        let mut tracker = CharacterStateTracker::new(0, 0.2, 0.0);
        tracker.tick(true, 0.0, 0.0, &mut Vec::new());
        tracker
    }

    #[test]
    fn horizontal_velocity_is_direction_times_speed() {
        let mut driver = LocomotionDriver::new(settings(JumpMode::Force));
        let mut tracker = grounded();
        let mut body = PointBody::default();
        body.velocity = Vec2::new(0.0, -3.0);
        let input = LocomotionInput {
            horizontal: -1,
            jump: false,
        };
        driver.drive(&mut tracker, &mut body, input, 0.0, &mut Vec::new());
        assert_eq!(body.velocity, Vec2::new(-5.0, -3.0));
        assert!(!driver.facing_right());
    }

    #[test]
    fn velocity_jump_sets_vertical_speed() {
        let mut driver = LocomotionDriver::new(settings(JumpMode::Velocity));
        let mut tracker = grounded();
        let mut body = PointBody::default();
        let input = LocomotionInput {
            horizontal: 1,
            jump: true,
        };
        let mut events = Vec::new();
        let kind = driver.drive(&mut tracker, &mut body, input, 0.0, &mut events);
        assert_eq!(kind, Some(JumpKind::Grounded));
        assert_eq!(body.velocity, Vec2::new(5.0, 8.0));
        assert_eq!(body.force, Vec2::ZERO);
        assert!(events.contains(&CharacterEvent::Jumped(JumpKind::Grounded)));
    }

    #[test]
    fn force_jump_adds_upward_force() {
        let mut driver = LocomotionDriver::new(settings(JumpMode::Force));
        let mut tracker = grounded();
        let mut body = PointBody::default();
        let input = LocomotionInput {
            horizontal: 0,
            jump: true,
        };
        driver.drive(&mut tracker, &mut body, input, 0.0, &mut Vec::new());
        assert_eq!(body.force, Vec2::new(0.0, 400.0));
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn airborne_jump_without_allowance_is_ignored() {
        let mut driver = LocomotionDriver::new(settings(JumpMode::Velocity));
        let mut tracker = CharacterStateTracker::new(0, 0.2, 0.0);
        let mut body = PointBody::default();
        let input = LocomotionInput {
            horizontal: 0,
            jump: true,
        };
        let mut events = Vec::new();
        assert_eq!(
            driver.drive(&mut tracker, &mut body, input, 0.0, &mut events),
            None
        );
        assert_eq!(body.velocity, Vec2::ZERO);
        assert!(events.is_empty());
    }

    #[test]
    fn direction_change_is_reported_once() {
        let mut driver = LocomotionDriver::new(settings(JumpMode::Force));
        let mut tracker = grounded();
        let mut body = PointBody::default();
        let mut events = Vec::new();
        for horizontal in [1, 1, 0, 0, -1] {
            let input = LocomotionInput {
                horizontal,
                jump: false,
            };
            driver.drive(&mut tracker, &mut body, input, 0.0, &mut events);
        }
        assert_eq!(
            events,
            vec![
                CharacterEvent::HorizontalMovementChanged(1),
                CharacterEvent::HorizontalMovementChanged(0),
                CharacterEvent::HorizontalMovementChanged(-1),
            ]
        );
    }

    #[test]
    fn without_air_control_airborne_velocity_is_kept() {
        let mut driver = LocomotionDriver::new(LocomotionSettings {
            air_control: false,
            ..settings(JumpMode::Force)
        });
        let mut tracker = CharacterStateTracker::new(0, 0.2, 0.0);
        let mut body = PointBody::default();
        body.velocity = Vec2::new(2.0, 1.0);
        let input = LocomotionInput {
            horizontal: -1,
            jump: false,
        };
        driver.drive(&mut tracker, &mut body, input, 0.0, &mut Vec::new());
        assert_eq!(body.velocity, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn point_body_integrates_force_once() {
        let mut body = PointBody::at(Vec2::ZERO);
        body.add_force(Vec2::new(0.0, 100.0));
        body.integrate(0.0, 0.1);
        assert!((body.velocity.y - 10.0).abs() < 1e-5);
        body.integrate(0.0, 0.1);
        assert!((body.velocity.y - 10.0).abs() < 1e-5);
    }
}
