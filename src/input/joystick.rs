//! On-screen virtual joystick.
//!
//! A drag begins when the pointer is pressed near the anchor.  While dragging,
//! the offset from the anchor is compared against four thresholds
//! (right ≥ t, left ≤ −t, up ≥ 2t, down ≤ −t).  A direction turns on when the
//! offset crosses its threshold outward and turns off only when it crosses the
//! same threshold back inward.
//!
//! The joystick publishes [`JoystickNotification`]s on its own channel;
//! [`forward_joystick_system`] re-publishes them as [`InputNotification`]s so
//! locomotion sees one stream regardless of the device.

use super::notify::InputNotification;
use crate::config::ControllerConfig;
use bevy::prelude::*;

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickNotification {
    HorizontalLeftPressed,
    HorizontalLeftUnpressed,
    HorizontalRightPressed,
    HorizontalRightUnpressed,
    VerticalUpPressed,
    VerticalUpUnpressed,
    VerticalDownPressed,
    VerticalDownUnpressed,
}

impl From<JoystickNotification> for InputNotification {
    fn from(value: JoystickNotification) -> Self {
        match value {
            JoystickNotification::HorizontalLeftPressed => Self::HorizontalLeftPressed,
            JoystickNotification::HorizontalLeftUnpressed => Self::HorizontalLeftUnpressed,
            JoystickNotification::HorizontalRightPressed => Self::HorizontalRightPressed,
            JoystickNotification::HorizontalRightUnpressed => Self::HorizontalRightUnpressed,
            JoystickNotification::VerticalUpPressed => Self::VerticalUpPressed,
            JoystickNotification::VerticalUpUnpressed => Self::VerticalUpUnpressed,
            JoystickNotification::VerticalDownPressed => Self::VerticalDownPressed,
            JoystickNotification::VerticalDownUnpressed => Self::VerticalDownUnpressed,
        }
    }
}

/// State of an in-progress drag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JoystickDrag {
    pub offset: Vec2,
    /// Active direction per axis, each -1, 0 or 1.
    pub direction: IVec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VirtualJoystick {
    anchor: Vec2,
    threshold: f32,
    knob_radius: f32,
    activation_radius: f32,
    pointer: Vec2,
    drag: Option<JoystickDrag>,
}

impl VirtualJoystick {
    pub fn new(anchor: Vec2, threshold: f32, knob_radius: f32, activation_radius: f32) -> Self {
        Self {
            anchor,
            threshold,
            knob_radius,
            activation_radius,
            pointer: anchor,
            drag: None,
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(
            config.joystick_anchor_position(),
            config.joystick_sensitivity_threshold,
            config.joystick_knob_radius,
            config.joystick_activation_radius,
        )
    }

    #[inline]
    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    #[inline]
    pub fn drag(&self) -> Option<&JoystickDrag> {
        self.drag.as_ref()
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Where the knob is drawn: the anchor plus the clamped drag offset.
    pub fn knob_position(&self) -> Vec2 {
        match &self.drag {
            Some(drag) => self.anchor + drag.offset.clamp_length_max(self.knob_radius),
            None => self.anchor,
        }
    }

    pub fn pointer_moved(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Begin a drag if `pointer` is within the activation radius.
    pub fn press(&mut self, pointer: Vec2) -> bool {
        self.pointer = pointer;
        if (pointer - self.anchor).length() < self.activation_radius {
            if self.drag.is_none() {
                self.drag = Some(JoystickDrag::default());
            }
            true
        } else {
            false
        }
    }

    /// End the drag, releasing every active direction exactly once.
    pub fn release(&mut self, out: &mut Vec<JoystickNotification>) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        match drag.direction.x {
            1 => out.push(JoystickNotification::HorizontalRightUnpressed),
            -1 => out.push(JoystickNotification::HorizontalLeftUnpressed),
            _ => {}
        }
        match drag.direction.y {
            1 => out.push(JoystickNotification::VerticalUpUnpressed),
            -1 => out.push(JoystickNotification::VerticalDownUnpressed),
            _ => {}
        }
    }

    /// Re-evaluate thresholds against the current pointer.
    pub fn update(&mut self, out: &mut Vec<JoystickNotification>) {
        let t = self.threshold;
        let offset = self.pointer - self.anchor;
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        drag.offset = offset;
        let dir = &mut drag.direction;

        if offset.x >= t && dir.x != 1 {
            dir.x = 1;
            out.push(JoystickNotification::HorizontalRightPressed);
        } else if offset.x < t && dir.x == 1 {
            dir.x = 0;
            out.push(JoystickNotification::HorizontalRightUnpressed);
        }

        if offset.x <= -t && dir.x != -1 {
            dir.x = -1;
            out.push(JoystickNotification::HorizontalLeftPressed);
        } else if offset.x > -t && dir.x == -1 {
            dir.x = 0;
            out.push(JoystickNotification::HorizontalLeftUnpressed);
        }

        // Up needs twice the deflection so a sideways drag doesn't jump.
        if offset.y >= 2.0 * t && dir.y != 1 {
            dir.y = 1;
            out.push(JoystickNotification::VerticalUpPressed);
        } else if offset.y < 2.0 * t && dir.y == 1 {
            dir.y = 0;
            out.push(JoystickNotification::VerticalUpUnpressed);
        }

        if offset.y <= -t && dir.y != -1 {
            dir.y = -1;
            out.push(JoystickNotification::VerticalDownPressed);
        } else if offset.y > -t && dir.y == -1 {
            dir.y = 0;
            out.push(JoystickNotification::VerticalDownUnpressed);
        }
    }

    /// Feed one input notification, collecting any joystick output.
    pub fn handle(&mut self, notification: &InputNotification, out: &mut Vec<JoystickNotification>) {
        match *notification {
            InputNotification::PointerMoved(p) => self.pointer_moved(p),
            InputNotification::PointerLeftPressed(p) => {
                self.press(p);
            }
            InputNotification::PointerLeftUnpressed(_) => self.release(out),
            _ => {}
        }
    }
}

// ── Bevy glue ─────────────────────────────────────────────────────────────────

#[derive(Resource, Debug)]
pub struct JoystickState(pub VirtualJoystick);

/// Marker for the joystick pad UI node.
#[derive(Component)]
pub struct JoystickPad;

/// Marker for the joystick knob UI node.
#[derive(Component)]
pub struct JoystickKnob;

const KNOB_SIZE: f32 = 30.0;

/// Startup system: build the joystick from config and spawn its UI nodes.
pub fn setup_joystick(mut commands: Commands, config: Res<ControllerConfig>) {
    let joystick = VirtualJoystick::from_config(&config);
    let anchor = joystick.anchor();
    let pad = config.joystick_knob_radius * 2.0 + KNOB_SIZE;

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(anchor.x - pad * 0.5),
            bottom: Val::Px(anchor.y - pad * 0.5),
            width: Val::Px(pad),
            height: Val::Px(pad),
            ..default()
        },
        BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.12)),
        JoystickPad,
    ));
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(anchor.x - KNOB_SIZE * 0.5),
            bottom: Val::Px(anchor.y - KNOB_SIZE * 0.5),
            width: Val::Px(KNOB_SIZE),
            height: Val::Px(KNOB_SIZE),
            ..default()
        },
        BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.45)),
        JoystickKnob,
    ));

    commands.insert_resource(JoystickState(joystick));
}

/// Drive the joystick from pointer notifications and publish its directions.
pub fn virtual_joystick_system(
    mut notifications: MessageReader<InputNotification>,
    mut joystick: ResMut<JoystickState>,
    mut writer: MessageWriter<JoystickNotification>,
) {
    let mut out = Vec::new();
    for notification in notifications.read() {
        joystick.0.handle(notification, &mut out);
    }
    joystick.0.update(&mut out);
    for notification in out {
        writer.write(notification);
    }
}

/// Re-publish joystick directions on the shared input channel.
pub fn forward_joystick_system(
    mut joystick: MessageReader<JoystickNotification>,
    mut writer: MessageWriter<InputNotification>,
) {
    for notification in joystick.read() {
        writer.write(InputNotification::from(*notification));
    }
}

/// Move the knob node to follow the drag.
pub fn joystick_knob_system(
    joystick: Res<JoystickState>,
    mut q_knob: Query<&mut Node, With<JoystickKnob>>,
) {
    if !joystick.is_changed() {
        return;
    }
    let knob = joystick.0.knob_position();
    for mut node in q_knob.iter_mut() {
        node.left = Val::Px(knob.x - KNOB_SIZE * 0.5);
        node.bottom = Val::Px(knob.y - KNOB_SIZE * 0.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joystick() -> VirtualJoystick {
        VirtualJoystick::new(Vec2::new(100.0, 100.0), 10.0, 45.0, 60.0)
    }

    fn drag_to(js: &mut VirtualJoystick, offset: Vec2) -> Vec<JoystickNotification> {
        let mut out = Vec::new();
        js.pointer_moved(js.anchor() + offset);
        js.update(&mut out);
        out
    }

    #[test]
    fn crossing_threshold_presses_right_once() {
        let mut js = joystick();
        assert!(js.press(js.anchor()));
        assert!(drag_to(&mut js, Vec2::ZERO).is_empty());
        assert_eq!(
            drag_to(&mut js, Vec2::new(15.0, 0.0)),
            vec![JoystickNotification::HorizontalRightPressed]
        );
        assert!(drag_to(&mut js, Vec2::new(20.0, 0.0)).is_empty());
    }

    #[test]
    fn retreating_above_threshold_keeps_right_pressed() {
        let mut js = joystick();
        js.press(js.anchor());
        drag_to(&mut js, Vec2::new(15.0, 0.0));
        assert!(drag_to(&mut js, Vec2::new(10.5, 0.0)).is_empty());
        assert!(drag_to(&mut js, Vec2::new(10.0, 0.0)).is_empty());
        assert_eq!(
            drag_to(&mut js, Vec2::new(9.0, 0.0)),
            vec![JoystickNotification::HorizontalRightUnpressed]
        );
    }

    #[test]
    fn up_needs_double_threshold() {
        let mut js = joystick();
        js.press(js.anchor());
        assert_eq!(
            drag_to(&mut js, Vec2::new(12.0, 5.0)),
            vec![JoystickNotification::HorizontalRightPressed]
        );
        assert_eq!(
            drag_to(&mut js, Vec2::new(12.0, 25.0)),
            vec![JoystickNotification::VerticalUpPressed]
        );
        let drag = js.drag().unwrap();
        assert_eq!(drag.direction, IVec2::new(1, 1));
    }

    #[test]
    fn fresh_drag_to_12_25_activates_right_and_up() {
        let mut js = joystick();
        js.press(js.anchor());
        assert_eq!(
            drag_to(&mut js, Vec2::new(12.0, 25.0)),
            vec![
                JoystickNotification::HorizontalRightPressed,
                JoystickNotification::VerticalUpPressed,
            ]
        );
    }

    #[test]
    fn swinging_right_to_left_releases_then_presses() {
        let mut js = joystick();
        js.press(js.anchor());
        drag_to(&mut js, Vec2::new(15.0, 0.0));
        assert_eq!(
            drag_to(&mut js, Vec2::new(-15.0, 0.0)),
            vec![
                JoystickNotification::HorizontalRightUnpressed,
                JoystickNotification::HorizontalLeftPressed,
            ]
        );
    }

    #[test]
    fn release_unpresses_all_active_directions_once() {
        let mut js = joystick();
        js.press(js.anchor());
        drag_to(&mut js, Vec2::new(-15.0, -15.0));
        let mut out = Vec::new();
        js.release(&mut out);
        assert_eq!(
            out,
            vec![
                JoystickNotification::HorizontalLeftUnpressed,
                JoystickNotification::VerticalDownUnpressed,
            ]
        );
        assert!(!js.is_dragging());
        assert_eq!(js.knob_position(), js.anchor());

        out.clear();
        js.release(&mut out);
        js.update(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn press_outside_activation_radius_is_ignored() {
        let mut js = joystick();
        assert!(!js.press(js.anchor() + Vec2::new(70.0, 0.0)));
        assert!(drag_to(&mut js, Vec2::new(15.0, 0.0)).is_empty());
    }

    #[test]
    fn knob_is_clamped_to_radius() {
        let mut js = joystick();
        js.press(js.anchor());
        drag_to(&mut js, Vec2::new(90.0, 0.0));
        assert!((js.knob_position() - Vec2::new(145.0, 100.0)).length() < 1e-4);
    }

    #[test]
    fn handle_routes_pointer_notifications() {
        let mut js = joystick();
        let mut out = Vec::new();
        js.handle(&InputNotification::PointerLeftPressed(js.anchor()), &mut out);
        js.handle(
            &InputNotification::PointerMoved(js.anchor() + Vec2::new(0.0, -12.0)),
            &mut out,
        );
        js.update(&mut out);
        assert_eq!(out, vec![JoystickNotification::VerticalDownPressed]);
        js.handle(&InputNotification::PointerLeftUnpressed(Vec2::ZERO), &mut out);
        assert_eq!(out.last(), Some(&JoystickNotification::VerticalDownUnpressed));
    }
}
