//! Projectile firing and lifetime.
//!
//! A left-pointer press fires one round from the player's position.  The round
//! inherits the player's horizontal velocity plus a fixed muzzle velocity and
//! always travels flat (`vy = 0`).

use crate::character::Player;
use crate::config::ControllerConfig;
use crate::input::InputNotification;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Whatever instantiates projectiles.
pub trait ProjectileSink {
    fn spawn_projectile(&mut self, position: Vec2, velocity: Vec2);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawner {
    muzzle_velocity: f32,
}

impl ProjectileSpawner {
    pub fn new(muzzle_velocity: f32) -> Self {
        Self { muzzle_velocity }
    }

    #[inline]
    pub fn launch_velocity(&self, parent_velocity: Vec2) -> Vec2 {
        Vec2::new(parent_velocity.x + self.muzzle_velocity, 0.0)
    }

    pub fn fire<S: ProjectileSink + ?Sized>(&self, sink: &mut S, origin: Vec2, parent_velocity: Vec2) {
        sink.spawn_projectile(origin, self.launch_velocity(parent_velocity));
    }
}

/// Per-projectile state attached to each fired round.
#[derive(Component, Default)]
pub struct Projectile {
    /// Seconds since this projectile was spawned.
    pub age: f32,
}

/// Parent node all projectiles are spawned under.
#[derive(Component)]
pub struct ProjectileContainer;

/// Startup system: spawn the projectile container at the origin.
pub fn setup_projectile_container(mut commands: Commands) {
    commands.spawn((
        Name::new("Bullet_Container"),
        ProjectileContainer,
        Transform::default(),
        Visibility::default(),
    ));
}

/// Spawns rounds as Rapier kinematic sensors under the container.
struct CommandsSink<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    container: Entity,
    radius: f32,
}

impl ProjectileSink for CommandsSink<'_, '_, '_> {
    fn spawn_projectile(&mut self, position: Vec2, velocity: Vec2) {
        self.commands.spawn((
            Projectile::default(),
            ChildOf(self.container),
            Transform::from_translation(position.extend(1.0)),
            Sprite::from_color(Color::srgb(1.0, 0.85, 0.1), Vec2::splat(self.radius * 2.0)),
            RigidBody::KinematicVelocityBased,
            Velocity {
                linvel: velocity,
                angvel: 0.0,
            },
            Collider::ball(self.radius),
            Sensor,
        ));
    }
}

/// Fire one round per left-pointer press.
pub fn projectile_fire_system(
    mut commands: Commands,
    mut notifications: MessageReader<InputNotification>,
    q_player: Query<(&Transform, &Velocity), With<Player>>,
    q_container: Query<Entity, With<ProjectileContainer>>,
    config: Res<ControllerConfig>,
) {
    let presses = notifications
        .read()
        .filter(|n| matches!(n, InputNotification::PointerLeftPressed(_)))
        .count();
    if presses == 0 {
        return;
    }
    let Ok((transform, velocity)) = q_player.single() else {
        return;
    };
    let Ok(container) = q_container.single() else {
        warn!("Projectile container missing; shot dropped");
        return;
    };

    let spawner = ProjectileSpawner::new(config.bullet_velocity);
    let mut sink = CommandsSink {
        commands: &mut commands,
        container,
        radius: config.projectile_radius,
    };
    for _ in 0..presses {
        spawner.fire(
            &mut sink,
            transform.translation.truncate(),
            velocity.linvel,
        );
    }
}

/// Age projectiles each frame and despawn them when they expire.
pub fn despawn_old_projectiles_system(
    mut commands: Commands,
    mut q: Query<(Entity, &mut Projectile)>,
    time: Res<Time>,
    config: Res<ControllerConfig>,
) {
    let dt = time.delta_secs();
    for (entity, mut proj) in q.iter_mut() {
        proj.age += dt;
        if proj.age >= config.projectile_lifetime {
            commands.entity(entity).despawn();
        }
    }
}
