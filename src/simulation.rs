//! Engine-free controller loop.
//!
//! [`Simulation`] runs the same character, input, joystick, camera and
//! projectile logic the Bevy plugin runs, but every engine primitive is an
//! injected collaborator:
//!
//! | Collaborator | Replaces |
//! |--------------|----------|
//! | [`GroundProbe`] | circle overlap query at the feet |
//! | [`InputSampler`] | device polling |
//! | [`CharacterBody`] | the character's rigid body |
//! | [`ProjectileSink`] | projectile instantiation |
//!
//! The host calls [`Simulation::frame`] once per visual frame and
//! [`Simulation::tick`] once per fixed physics step.  Notifications are queued
//! and drained by the caller; within a tick they appear in the order
//! `Respawned`, `Landed`, `BecameAirborne`, `StartedFalling`, then locomotion
//! events.
//!
//! ```ignore
//! let mut sim = SimulationBuilder::new(ControllerConfig::default())
//!     .ground_probe(level)
//!     .input_sampler(script)
//!     .body(PointBody::at(Vec2::new(0.0, 40.0)))
//!     .projectile_sink(recorder)
//!     .build()?;
//! sim.frame(1.0 / 60.0);
//! sim.tick(1.0 / 50.0);
//! ```

use crate::camera::follow_position;
use crate::character::{
    CharacterBody, CharacterEvent, CharacterState, CharacterStateTracker, LocomotionDriver,
    LocomotionInput, LocomotionSettings,
};
use crate::config::ControllerConfig;
use crate::error::{ControllerError, ControllerResult};
use crate::input::{
    DirectionalInput, InputNotification, InputSource, JoystickNotification, RawInputSample,
    VirtualJoystick,
};
use crate::level::GroundProbe;
use crate::projectile::{ProjectileSink, ProjectileSpawner};
use bevy::prelude::*;

/// Supplies one [`RawInputSample`] per visual frame.
pub trait InputSampler {
    fn sample(&mut self) -> RawInputSample;
}

/// Collects the collaborators for a [`Simulation`]; every one is required.
#[derive(Default)]
pub struct SimulationBuilder {
    config: ControllerConfig,
    ground_probe: Option<Box<dyn GroundProbe>>,
    input_sampler: Option<Box<dyn InputSampler>>,
    body: Option<Box<dyn CharacterBody>>,
    projectile_sink: Option<Box<dyn ProjectileSink>>,
}

impl SimulationBuilder {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn ground_probe(mut self, probe: impl GroundProbe + 'static) -> Self {
        self.ground_probe = Some(Box::new(probe));
        self
    }

    pub fn input_sampler(mut self, sampler: impl InputSampler + 'static) -> Self {
        self.input_sampler = Some(Box::new(sampler));
        self
    }

    pub fn body(mut self, body: impl CharacterBody + 'static) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    pub fn projectile_sink(mut self, sink: impl ProjectileSink + 'static) -> Self {
        self.projectile_sink = Some(Box::new(sink));
        self
    }

    /// Validate the config and assemble the simulation.
    ///
    /// Fails on the first missing collaborator rather than at first use.
    pub fn build(self) -> ControllerResult<Simulation> {
        self.config.validate()?;
        let ground_probe = self.ground_probe.ok_or(ControllerError::MissingCollaborator {
            name: "ground_probe",
        })?;
        let input_sampler = self.input_sampler.ok_or(ControllerError::MissingCollaborator {
            name: "input_sampler",
        })?;
        let body = self.body.ok_or(ControllerError::MissingCollaborator { name: "body" })?;
        let projectile_sink = self
            .projectile_sink
            .ok_or(ControllerError::MissingCollaborator {
                name: "projectile_sink",
            })?;

        let config = self.config;
        let spawn_point = config.spawn_position();
        let feet_height = body.position().y - config.character_half_height;
        Ok(Simulation {
            tracker: CharacterStateTracker::new(
                config.max_double_jumps(),
                config.coyote_time,
                feet_height,
            ),
            locomotion: LocomotionDriver::new(LocomotionSettings::from(&config)),
            input_source: InputSource::new(config.debug_input_logging),
            joystick: VirtualJoystick::from_config(&config),
            projectiles: ProjectileSpawner::new(config.bullet_velocity),
            directional: DirectionalInput::default(),
            camera: spawn_point.extend(0.0),
            clock: 0.0,
            visual_time: 0.0,
            spawn_point,
            config,
            ground_probe,
            input_sampler,
            body,
            projectile_sink,
            character_events: Vec::new(),
            input_events: Vec::new(),
        })
    }
}

pub struct Simulation {
    config: ControllerConfig,
    tracker: CharacterStateTracker,
    locomotion: LocomotionDriver,
    input_source: InputSource,
    joystick: VirtualJoystick,
    projectiles: ProjectileSpawner,
    directional: DirectionalInput,
    camera: Vec3,
    /// Fixed clock, advanced by `tick`.
    clock: f64,
    /// Visual clock, advanced by `frame`.
    visual_time: f32,
    spawn_point: Vec2,
    ground_probe: Box<dyn GroundProbe>,
    input_sampler: Box<dyn InputSampler>,
    body: Box<dyn CharacterBody>,
    projectile_sink: Box<dyn ProjectileSink>,
    character_events: Vec<CharacterEvent>,
    input_events: Vec<InputNotification>,
}

impl Simulation {
    /// One visual frame: sample input, run the joystick, fold directions,
    /// fire projectiles, and move the camera.
    pub fn frame(&mut self, delta: f32) {
        self.visual_time += delta;

        let raw = self.input_sampler.sample();
        let mut notifications = Vec::new();
        self.input_source.sample(&raw, &mut notifications);

        let mut joystick_out: Vec<JoystickNotification> = Vec::new();
        for notification in &notifications {
            self.joystick.handle(notification, &mut joystick_out);
        }
        self.joystick.update(&mut joystick_out);
        notifications.extend(joystick_out.into_iter().map(InputNotification::from));

        for notification in &notifications {
            self.directional.apply(notification);
            if matches!(notification, InputNotification::PointerLeftPressed(_)) {
                self.projectiles.fire(
                    self.projectile_sink.as_mut(),
                    self.body.position(),
                    self.body.linear_velocity(),
                );
            }
        }
        self.input_events.extend(notifications);

        self.camera = follow_position(self.camera, self.body.position().extend(0.0));
    }

    /// One fixed physics step: world-floor reset → probe → state edges →
    /// coyote → locomotion.
    ///
    /// The host integrates the body after this returns.
    pub fn tick(&mut self, fixed_delta: f32) {
        self.clock += f64::from(fixed_delta);
        let now = self.clock;
        let half_height = Vec2::new(0.0, self.config.character_half_height);

        if (self.body.position() - half_height).y < -self.config.fell_through_world_depth {
            self.body.teleport(self.spawn_point);
            self.tracker.reset((self.spawn_point - half_height).y);
            self.character_events.push(CharacterEvent::Respawned);
        }

        let feet = self.body.position() - half_height;
        let grounded = self.ground_probe.overlaps_ground(
            feet,
            self.config.grounded_radius,
            self.config.ground_layer_mask,
        );
        self.tracker
            .tick(grounded, feet.y, now, &mut self.character_events);

        let input = LocomotionInput {
            horizontal: self.directional.horizontal,
            jump: self.directional.take_jump(),
        };
        self.locomotion.drive(
            &mut self.tracker,
            self.body.as_mut(),
            input,
            now,
            &mut self.character_events,
        );
    }

    /// Take all character notifications queued since the last drain.
    pub fn drain_character_events(&mut self) -> Vec<CharacterEvent> {
        std::mem::take(&mut self.character_events)
    }

    /// Take all input notifications (device and joystick) queued since the
    /// last drain.
    pub fn drain_input_notifications(&mut self) -> Vec<InputNotification> {
        std::mem::take(&mut self.input_events)
    }

    #[inline]
    pub fn state(&self) -> &CharacterState {
        self.tracker.state()
    }

    #[inline]
    pub fn directional(&self) -> &DirectionalInput {
        &self.directional
    }

    #[inline]
    pub fn joystick(&self) -> &VirtualJoystick {
        &self.joystick
    }

    #[inline]
    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    #[inline]
    pub fn facing_right(&self) -> bool {
        self.locomotion.facing_right()
    }

    /// Seconds of fixed time simulated so far.
    #[inline]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Seconds of visual time elapsed so far.
    #[inline]
    pub fn visual_time(&self) -> f32 {
        self.visual_time
    }
}
