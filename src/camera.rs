use crate::character::Player;
use bevy::prelude::*;

/// Camera position that centres `target` while keeping the camera's own depth.
#[inline]
pub fn follow_position(camera: Vec3, target: Vec3) -> Vec3 {
    Vec3::new(target.x, target.y, camera.z)
}

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("[SETUP] Camera spawned");
}

/// Keep the camera centred on the player every frame.
pub fn camera_follow_system(
    q_player: Query<&Transform, With<Player>>,
    mut q_camera: Query<&mut Transform, (With<Camera>, Without<Player>)>,
) {
    let Ok(player_transform) = q_player.single() else {
        return;
    };
    let Ok(mut cam) = q_camera.single_mut() else {
        return;
    };

    cam.translation = follow_position(cam.translation, player_transform.translation);
}
