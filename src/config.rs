//! Runtime controller configuration loaded from `assets/controller.toml`.
//!
//! [`ControllerConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_controller_config`] reads
//! `assets/controller.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<ControllerConfig>` to any system parameter list and read
//! values with `config.movement_speed`, `config.coyote_time`, etc.
//!
//! ## Tuning workflow
//!
//! 1. Edit `assets/controller.toml`.
//! 2. Restart the game; no recompilation required.
//!
//! A file that parses but fails [`ControllerConfig::validate`] is rejected as a
//! whole and the compiled defaults stay in place.

use crate::character::JumpMode;
use crate::constants::*;
use crate::error::{ControllerError, ControllerResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/controller.toml";

/// Runtime-tunable controller configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // ── Movement ─────────────────────────────────────────────────────────────
    pub movement_speed: f32,
    pub air_control: bool,

    // ── Jumping ──────────────────────────────────────────────────────────────
    pub jump_intensity: f32,
    pub jump_use_velocity: bool,
    pub coyote_time: f32,
    pub double_jump: bool,
    pub number_of_double_jumps: u32,

    // ── Ground probe ─────────────────────────────────────────────────────────
    pub grounded_radius: f32,
    pub ground_layer_mask: u32,

    // ── Character body ───────────────────────────────────────────────────────
    pub character_half_width: f32,
    pub character_half_height: f32,
    pub character_mass: f32,
    pub gravity: f32,
    pub fell_through_world_depth: f32,
    pub spawn_point: [f32; 2],

    // ── Virtual joystick ─────────────────────────────────────────────────────
    pub joystick_anchor: [f32; 2],
    pub joystick_sensitivity_threshold: f32,
    pub joystick_knob_radius: f32,
    pub joystick_activation_radius: f32,

    // ── Projectiles ──────────────────────────────────────────────────────────
    pub bullet_velocity: f32,
    pub projectile_lifetime: f32,
    pub projectile_radius: f32,

    // ── Input ────────────────────────────────────────────────────────────────
    pub debug_input_logging: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Movement
            movement_speed: MOVEMENT_SPEED,
            air_control: AIR_CONTROL,
            // Jumping
            jump_intensity: JUMP_INTENSITY,
            jump_use_velocity: JUMP_USE_VELOCITY,
            coyote_time: COYOTE_TIME,
            double_jump: DOUBLE_JUMP,
            number_of_double_jumps: NUMBER_OF_DOUBLE_JUMPS,
            // Ground probe
            grounded_radius: GROUNDED_RADIUS,
            ground_layer_mask: GROUND_LAYER_MASK,
            // Character body
            character_half_width: CHARACTER_HALF_WIDTH,
            character_half_height: CHARACTER_HALF_HEIGHT,
            character_mass: CHARACTER_MASS,
            gravity: GRAVITY,
            fell_through_world_depth: FELL_THROUGH_WORLD_DEPTH,
            spawn_point: [SPAWN_X, SPAWN_Y],
            // Virtual joystick
            joystick_anchor: [JOYSTICK_ANCHOR_X, JOYSTICK_ANCHOR_Y],
            joystick_sensitivity_threshold: JOYSTICK_SENSITIVITY_THRESHOLD,
            joystick_knob_radius: JOYSTICK_KNOB_RADIUS,
            joystick_activation_radius: JOYSTICK_ACTIVATION_RADIUS,
            // Projectiles
            bullet_velocity: BULLET_VELOCITY,
            projectile_lifetime: PROJECTILE_LIFETIME,
            projectile_radius: PROJECTILE_RADIUS,
            // Input
            debug_input_logging: DEBUG_INPUT_LOGGING,
        }
    }
}

impl ControllerConfig {
    /// Parse a TOML document; keys not present keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ControllerConfig>(contents)
    }

    /// Mid-air jumps granted on landing; zero when double jumping is disabled.
    #[inline]
    pub fn max_double_jumps(&self) -> u32 {
        if self.double_jump {
            self.number_of_double_jumps
        } else {
            0
        }
    }

    #[inline]
    pub fn jump_mode(&self) -> JumpMode {
        if self.jump_use_velocity {
            JumpMode::Velocity
        } else {
            JumpMode::Force
        }
    }

    #[inline]
    pub fn spawn_position(&self) -> Vec2 {
        Vec2::from(self.spawn_point)
    }

    #[inline]
    pub fn joystick_anchor_position(&self) -> Vec2 {
        Vec2::from(self.joystick_anchor)
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> ControllerResult<()> {
        if !(0.0..=COYOTE_TIME_MAX).contains(&self.coyote_time) {
            return Err(ControllerError::UnsafeConstant {
                name: "coyote_time",
                value: self.coyote_time,
                safe_range: "[0.0, 5.0]",
            });
        }
        positive("movement_speed", self.movement_speed)?;
        positive("grounded_radius", self.grounded_radius)?;
        positive("character_half_width", self.character_half_width)?;
        positive("character_half_height", self.character_half_height)?;
        positive("character_mass", self.character_mass)?;
        positive("joystick_sensitivity_threshold", self.joystick_sensitivity_threshold)?;
        positive("joystick_knob_radius", self.joystick_knob_radius)?;
        positive("joystick_activation_radius", self.joystick_activation_radius)?;
        positive("projectile_lifetime", self.projectile_lifetime)?;
        positive("projectile_radius", self.projectile_radius)?;
        if self.jump_intensity < 0.0 {
            return Err(ControllerError::UnsafeConstant {
                name: "jump_intensity",
                value: self.jump_intensity,
                safe_range: "[0.0, ∞)",
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> ControllerResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ControllerError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Startup system: attempt to load `assets/controller.toml` and overwrite the
/// `ControllerConfig` resource with the values present in the file.
///
/// Parse and validation errors are logged and the defaults kept.  A missing
/// file is not an error.
pub fn load_controller_config(mut config: ResMut<ControllerConfig>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match ControllerConfig::from_toml_str(&contents) {
            Ok(loaded) => match loaded.validate() {
                Ok(()) => {
                    *config = loaded;
                    info!("Loaded controller config from {CONFIG_PATH}");
                }
                Err(e) => warn!("Rejected {CONFIG_PATH}: {e}; using defaults"),
            },
            Err(e) => warn!("Failed to parse {CONFIG_PATH}: {e}; using defaults"),
        },
        Err(_) => {
            info!("No {CONFIG_PATH} found; using compiled defaults");
        }
    }
}
