use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use ledgehop::camera::setup_camera;
use ledgehop::character::spawn_player;
use ledgehop::config::{load_controller_config, ControllerConfig};
use ledgehop::level::spawn_level;
use ledgehop::plugin::ControllerPlugin;

/// Configure Rapier gravity from the loaded controller config.
fn setup_physics_config(
    mut rapier: Query<&mut RapierConfiguration>,
    config: Res<ControllerConfig>,
) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.gravity);
    }
    info!("[SETUP] Gravity set to {}", config.gravity);
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Ledgehop".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.12)))
        // Insert ControllerConfig with compiled defaults; load_controller_config
        // overwrites it from assets/controller.toml (if present) in Startup.
        .insert_resource(ControllerConfig::default())
        // pixels_per_meter(1.0) keeps forces in world units.  The fixed
        // schedule lets a one-tick jump force act for exactly one step.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0).in_fixed_schedule())
        .add_plugins(ControllerPlugin::default())
        .add_systems(
            Startup,
            (
                setup_camera.after(load_controller_config),
                spawn_level.after(load_controller_config),
                spawn_player.after(load_controller_config),
                setup_physics_config.after(load_controller_config),
            ),
        )
        .run();
}
