//! Fixed-step character systems.
//!
//! ## Pipeline (runs in order every `FixedUpdate` tick)
//!
//! 1. [`clear_jump_force_system`]: drop last tick's jump force.
//! 2. [`fell_through_world_system`]: move characters below the world floor
//!    back to spawn before anything probes them.
//! 3. [`character_state_system`]: feet probe → grounded/airborne/falling edges.
//! 4. [`locomotion_system`]: `DirectionalInput` → velocity / force.
//!
//! Rapier steps in the fixed schedule after these, so a force-mode jump acts
//! for exactly one physics step.

use super::locomotion::{CharacterBody, LocomotionInput};
use super::state::CharacterEvent;
use super::{CharacterController, Player};
use crate::config::ControllerConfig;
use crate::input::DirectionalInput;
use crate::level::{collect_ground, Ground, GroundProbe};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// A [`CharacterEvent`] tagged with the entity that produced it.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct CharacterNotification {
    pub entity: Entity,
    pub event: CharacterEvent,
}

/// [`CharacterBody`] over the Rapier components of one entity.
///
/// Holds `Mut` handles so the transform is only flagged as changed on a
/// teleport; Rapier treats a changed transform as a user-driven move.
pub struct RapierBody<'a> {
    pub transform: Mut<'a, Transform>,
    pub velocity: Mut<'a, Velocity>,
    pub force: Mut<'a, ExternalForce>,
}

impl CharacterBody for RapierBody<'_> {
    fn position(&self) -> Vec2 {
        self.transform.translation.truncate()
    }

    fn linear_velocity(&self) -> Vec2 {
        self.velocity.linvel
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.velocity.linvel = velocity;
    }

    fn add_force(&mut self, force: Vec2) {
        self.force.force += force;
    }

    fn teleport(&mut self, position: Vec2) {
        self.transform.translation.x = position.x;
        self.transform.translation.y = position.y;
        self.velocity.linvel = Vec2::ZERO;
        self.velocity.angvel = 0.0;
        self.force.force = Vec2::ZERO;
    }
}

fn publish(
    writer: &mut MessageWriter<CharacterNotification>,
    entity: Entity,
    events: &mut Vec<CharacterEvent>,
) {
    for event in events.drain(..) {
        writer.write(CharacterNotification { entity, event });
    }
}

/// Clear the character's `ExternalForce` at the start of every tick.
pub fn clear_jump_force_system(mut q: Query<&mut ExternalForce, With<Player>>) {
    for mut force in q.iter_mut() {
        if force.force != Vec2::ZERO || force.torque != 0.0 {
            force.force = Vec2::ZERO;
            force.torque = 0.0;
        }
    }
}

/// Probe for ground under each character's feet and advance its state tracker.
pub fn character_state_system(
    mut q_player: Query<(Entity, &Transform, &mut CharacterController), With<Player>>,
    q_ground: Query<(&Transform, &Ground)>,
    time: Res<Time>,
    config: Res<ControllerConfig>,
    mut writer: MessageWriter<CharacterNotification>,
) {
    let ground = collect_ground(&q_ground);
    let now = time.elapsed_secs_f64();
    let mut events = Vec::new();

    for (entity, transform, mut controller) in q_player.iter_mut() {
        let feet = controller.feet(transform.translation.truncate());
        let grounded =
            ground.overlaps_ground(feet, config.grounded_radius, config.ground_layer_mask);
        controller.tracker.tick(grounded, feet.y, now, &mut events);
        publish(&mut writer, entity, &mut events);
    }
}

/// Reset any character whose feet have dropped below the world floor.
///
/// Runs ahead of the ground check so the reset tick reports only `Respawned`.
#[allow(clippy::type_complexity)]
pub fn fell_through_world_system(
    mut q_player: Query<
        (
            Entity,
            &mut Transform,
            &mut Velocity,
            &mut ExternalForce,
            &mut CharacterController,
        ),
        With<Player>,
    >,
    config: Res<ControllerConfig>,
    mut writer: MessageWriter<CharacterNotification>,
) {
    for (entity, transform, velocity, force, mut controller) in q_player.iter_mut() {
        if controller.feet(transform.translation.truncate()).y >= -config.fell_through_world_depth {
            continue;
        }
        let spawn_point = controller.spawn_point;
        let mut body = RapierBody {
            transform,
            velocity,
            force,
        };
        body.teleport(spawn_point);
        let feet = controller.feet(spawn_point).y;
        controller.tracker.reset(feet);
        writer.write(CharacterNotification {
            entity,
            event: CharacterEvent::Respawned,
        });
        info!("Player fell through the world; respawned at {spawn_point}");
    }
}

/// Apply directional input to each character.
#[allow(clippy::type_complexity)]
pub fn locomotion_system(
    mut q_player: Query<
        (
            Entity,
            &mut Transform,
            &mut Velocity,
            &mut ExternalForce,
            &mut CharacterController,
        ),
        With<Player>,
    >,
    mut input: ResMut<DirectionalInput>,
    time: Res<Time>,
    mut writer: MessageWriter<CharacterNotification>,
) {
    let now = time.elapsed_secs_f64();
    let locomotion_input = LocomotionInput {
        horizontal: input.horizontal,
        jump: input.take_jump(),
    };
    let mut events = Vec::new();

    for (entity, transform, velocity, force, mut controller) in q_player.iter_mut() {
        let controller = &mut *controller;
        let mut body = RapierBody {
            transform,
            velocity,
            force,
        };
        controller.locomotion.drive(
            &mut controller.tracker,
            &mut body,
            locomotion_input,
            now,
            &mut events,
        );
        publish(&mut writer, entity, &mut events);
    }
}

/// Log character notifications at debug level.
pub fn log_character_events_system(mut reader: MessageReader<CharacterNotification>) {
    for notification in reader.read() {
        debug!("[character] {:?}: {:?}", notification.entity, notification.event);
    }
}
