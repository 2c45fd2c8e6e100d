//! Static level geometry and the feet overlap query.
//!
//! Platforms are axis-aligned boxes carrying a [`Ground`] component.  The feet
//! probe is a circle-vs-box overlap against every platform whose layer bits
//! intersect the probe mask; Rapier only supplies the collision response.

use crate::config::ControllerConfig;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// "Is there ground under this circle?": the physics query the state tracker
/// consumes each tick.
pub trait GroundProbe {
    fn overlaps_ground(&self, center: Vec2, radius: f32, layer_mask: u32) -> bool;
}

/// A solid, axis-aligned platform.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ground {
    pub half_extents: Vec2,
    /// Layer bits; matched against the probe's mask.
    pub layers: u32,
}

/// World-space box used by the overlap test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundRect {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub layers: u32,
}

impl GroundRect {
    pub fn new(center: Vec2, half_extents: Vec2, layers: u32) -> Self {
        Self {
            center,
            half_extents,
            layers,
        }
    }

    /// Circle-vs-AABB: closest point on the box to the circle centre.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        let closest = center.clamp(min, max);
        closest.distance_squared(center) <= radius * radius
    }
}

impl GroundProbe for [GroundRect] {
    fn overlaps_ground(&self, center: Vec2, radius: f32, layer_mask: u32) -> bool {
        self.iter()
            .any(|rect| rect.layers & layer_mask != 0 && rect.overlaps_circle(center, radius))
    }
}

impl GroundProbe for Vec<GroundRect> {
    fn overlaps_ground(&self, center: Vec2, radius: f32, layer_mask: u32) -> bool {
        self.as_slice().overlaps_ground(center, radius, layer_mask)
    }
}

/// Snapshot every [`Ground`] entity as a [`GroundRect`].
///
/// Platforms are top-level entities, so the local transform is the world one.
pub fn collect_ground(q_ground: &Query<(&Transform, &Ground)>) -> Vec<GroundRect> {
    q_ground
        .iter()
        .map(|(transform, ground)| {
            GroundRect::new(
                transform.translation.truncate(),
                ground.half_extents,
                ground.layers,
            )
        })
        .collect()
}

/// Default level: (centre, half-extents) per platform.
const PLATFORMS: [([f32; 2], [f32; 2]); 6] = [
    ([0.0, -20.0], [600.0, 20.0]),
    ([-380.0, 90.0], [90.0, 10.0]),
    ([-120.0, 170.0], [80.0, 10.0]),
    ([150.0, 120.0], [100.0, 10.0]),
    ([420.0, 220.0], [70.0, 10.0]),
    ([900.0, -20.0], [160.0, 20.0]),
];

/// Spawn the default level's platforms as fixed Rapier bodies.
pub fn spawn_level(mut commands: Commands, config: Res<ControllerConfig>) {
    for ([x, y], [hx, hy]) in PLATFORMS {
        commands.spawn((
            Ground {
                half_extents: Vec2::new(hx, hy),
                layers: config.ground_layer_mask,
            },
            RigidBody::Fixed,
            Collider::cuboid(hx, hy),
            Friction::coefficient(0.0),
            Sprite::from_color(Color::srgb(0.30, 0.34, 0.42), Vec2::new(hx * 2.0, hy * 2.0)),
            Transform::from_xyz(x, y, 0.0),
        ));
    }
    info!("[SETUP] Level spawned ({} platforms)", PLATFORMS.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> GroundRect {
        GroundRect::new(Vec2::new(0.0, -10.0), Vec2::new(100.0, 10.0), 0b01)
    }

    #[test]
    fn circle_touching_top_edge_overlaps() {
        assert!(floor().overlaps_circle(Vec2::new(0.0, 3.0), 4.0));
        assert!(!floor().overlaps_circle(Vec2::new(0.0, 5.0), 4.0));
    }

    #[test]
    fn circle_near_corner_uses_true_distance() {
        // 3-4-5 triangle from the (100, 0) corner.
        assert!(floor().overlaps_circle(Vec2::new(103.0, 4.0), 5.0));
        assert!(!floor().overlaps_circle(Vec2::new(104.0, 4.0), 5.0));
    }

    #[test]
    fn layer_mask_filters_platforms() {
        let level = vec![floor()];
        assert!(level.overlaps_ground(Vec2::new(0.0, 1.0), 4.0, 0b01));
        assert!(!level.overlaps_ground(Vec2::new(0.0, 1.0), 4.0, 0b10));
    }

    #[test]
    fn empty_level_has_no_ground() {
        let level: Vec<GroundRect> = Vec::new();
        assert!(!level.overlaps_ground(Vec2::ZERO, 10.0, u32::MAX));
    }
}
