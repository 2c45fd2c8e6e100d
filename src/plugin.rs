//! Bevy wiring for the controller.
//!
//! [`ControllerPlugin`] registers the message channels, resources and systems.
//! It does not spawn the level, the character or the camera, and it does not
//! add Rapier; the binary does that so tests can run it under
//! `MinimalPlugins`.

use crate::character::{
    character_state_system, clear_jump_force_system, fell_through_world_system,
    locomotion_system, log_character_events_system, CharacterNotification,
};
use crate::camera::camera_follow_system;
use crate::config::{load_controller_config, ControllerConfig};
use crate::input::{
    apply_directional_input_system, forward_joystick_system, joystick_knob_system,
    sample_input_system, setup_input_source, setup_joystick, virtual_joystick_system,
    DirectionalInput, InputNotification, JoystickNotification,
};
use crate::projectile::{
    despawn_old_projectiles_system, projectile_fire_system, setup_projectile_container,
};
use bevy::prelude::*;

pub struct ControllerPlugin {
    /// Read `assets/controller.toml` at startup.
    pub load_config_file: bool,
}

impl Default for ControllerPlugin {
    fn default() -> Self {
        Self {
            load_config_file: true,
        }
    }
}

impl Plugin for ControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControllerConfig>()
            .init_resource::<DirectionalInput>()
            .add_message::<InputNotification>()
            .add_message::<JoystickNotification>()
            .add_message::<CharacterNotification>();

        if self.load_config_file {
            app.add_systems(Startup, load_controller_config);
        }

        app.add_systems(
            Startup,
            (
                setup_input_source,
                setup_joystick,
                setup_projectile_container,
            )
                .after(load_controller_config),
        )
        .add_systems(
            Update,
            (
                sample_input_system,
                virtual_joystick_system,
                forward_joystick_system,
                apply_directional_input_system,
                projectile_fire_system,
                joystick_knob_system,
                camera_follow_system,
                despawn_old_projectiles_system,
                log_character_events_system,
            )
                .chain(),
        )
        // Rapier steps in FixedPostUpdate, after these.
        .add_systems(
            FixedUpdate,
            (
                clear_jump_force_system,
                fell_through_world_system,
                character_state_system,
                locomotion_system,
            )
                .chain(),
        );
    }
}
