//! Character module: state tracking, locomotion, and their Bevy systems.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | Grounded / airborne / falling transitions, coyote window, double-jump allowance |
//! | [`locomotion`] | Horizontal velocity and jump impulse; the `CharacterBody` seam |
//! | [`systems`] | `FixedUpdate` systems that run the two over Rapier bodies |
//!
//! `state` and `locomotion` do not touch the ECS; the same code runs under
//! [`crate::simulation::Simulation`] with injected collaborators.

pub mod locomotion;
pub mod state;
pub mod systems;

pub use locomotion::{
    CharacterBody, JumpMode, LocomotionDriver, LocomotionInput, LocomotionSettings, PointBody,
};
pub use state::{CharacterEvent, CharacterState, CharacterStateTracker, JumpKind};
pub use systems::{
    character_state_system, clear_jump_force_system, fell_through_world_system,
    locomotion_system, log_character_events_system, CharacterNotification, RapierBody,
};

use crate::config::ControllerConfig;
use crate::constants::JUMP_VELOCITY_DIVISOR;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

impl From<&ControllerConfig> for LocomotionSettings {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            movement_speed: config.movement_speed,
            jump_intensity: config.jump_intensity,
            jump_velocity_divisor: JUMP_VELOCITY_DIVISOR,
            jump_mode: config.jump_mode(),
            air_control: config.air_control,
        }
    }
}

/// Marker component for the controlled character entity.
#[derive(Component)]
pub struct Player;

/// Controller state carried by the character entity.
#[derive(Component, Debug, Clone)]
pub struct CharacterController {
    pub tracker: CharacterStateTracker,
    pub locomotion: LocomotionDriver,
    /// Distance from the body centre down to the feet point.
    pub half_height: f32,
    pub spawn_point: Vec2,
}

impl CharacterController {
    pub fn from_config(config: &ControllerConfig) -> Self {
        let spawn_point = config.spawn_position();
        let half_height = config.character_half_height;
        Self {
            tracker: CharacterStateTracker::new(
                config.max_double_jumps(),
                config.coyote_time,
                spawn_point.y - half_height,
            ),
            locomotion: LocomotionDriver::new(LocomotionSettings::from(config)),
            half_height,
            spawn_point,
        }
    }

    /// Feet reference point for a body centred at `position`.
    #[inline]
    pub fn feet(&self, position: Vec2) -> Vec2 {
        position - Vec2::new(0.0, self.half_height)
    }
}

/// Spawn the character at the configured spawn point.
///
/// The body is a rotation-locked box with unit mass and no friction, so it
/// slides along walls instead of sticking to them.  Gravity comes from the
/// Rapier context (see `setup_physics_config` in `main.rs`).
pub fn spawn_player(mut commands: Commands, config: Res<ControllerConfig>) {
    let spawn = config.spawn_position();
    commands.spawn((
        Player,
        CharacterController::from_config(&config),
        // Physics
        RigidBody::Dynamic,
        Collider::cuboid(config.character_half_width, config.character_half_height),
        ColliderMassProperties::Mass(config.character_mass),
        LockedAxes::ROTATION_LOCKED,
        Friction::coefficient(0.0),
        Velocity::zero(),
        ExternalForce::default(),
        Ccd::enabled(),
        // Transform / visibility
        Sprite::from_color(
            Color::srgb(0.52, 0.94, 1.0),
            Vec2::new(
                config.character_half_width * 2.0,
                config.character_half_height * 2.0,
            ),
        ),
        Transform::from_translation(spawn.extend(0.0)),
    ));

    info!("Player spawned at {spawn}");
}
