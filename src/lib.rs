//! 2D platformer character controller
//!
//! A grounded/airborne state tracker with coyote time and double jumps,
//! keyboard and on-screen joystick input, camera follow and a projectile
//! spawner.  The core runs either as Bevy systems ([`plugin::ControllerPlugin`])
//! or headless through [`simulation::Simulation`].

pub mod camera;
pub mod character;
pub mod config;
pub mod constants;
pub mod error;
pub mod input;
pub mod level;
pub mod plugin;
pub mod projectile;
pub mod simulation;
