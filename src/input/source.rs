//! Raw device sampling → edge-triggered [`InputNotification`]s.
//!
//! Each axis keeps a busy latch: once an axis press has been reported no
//! further press is reported until the matching release, however long the
//! axis stays deflected.

use super::notify::InputNotification;
use crate::config::ControllerConfig;
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// One axis as seen in a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisSample {
    /// Any key bound to the axis is down.
    pub held: bool,
    /// Any key bound to the axis was released this frame.
    pub released: bool,
    /// Raw value in [-1, 1].
    pub value: f32,
}

/// Device state polled once per visual frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInputSample {
    pub cancel_pressed: bool,
    pub cancel_released: bool,
    pub horizontal: AxisSample,
    pub vertical: AxisSample,
    pub jump_pressed: bool,
    pub jump_released: bool,
    /// `None` when the cursor is outside the window.
    pub pointer: Option<Vec2>,
    pub mouse_left_pressed: bool,
    pub mouse_left_released: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisEdge {
    NegativePressed,
    PositivePressed,
    NegativeUnpressed,
    PositiveUnpressed,
}

#[derive(Debug, Clone, Copy, Default)]
struct AxisLatch {
    direction: i8,
    busy: bool,
}

impl AxisLatch {
    fn update(&mut self, sample: AxisSample, edges: &mut Vec<AxisEdge>) {
        if sample.held && !self.busy {
            if sample.value < 0.0 {
                self.busy = true;
                self.direction = -1;
                edges.push(AxisEdge::NegativePressed);
            } else if sample.value > 0.0 {
                self.busy = true;
                self.direction = 1;
                edges.push(AxisEdge::PositivePressed);
            }
        }

        if sample.released {
            if sample.value >= 0.0 && self.direction < 0 {
                self.busy = false;
                self.direction = 0;
                edges.push(AxisEdge::NegativeUnpressed);
            } else if sample.value <= 0.0 && self.direction > 0 {
                self.busy = false;
                self.direction = 0;
                edges.push(AxisEdge::PositiveUnpressed);
            }
        }
    }
}

/// Turns [`RawInputSample`]s into notifications.
#[derive(Debug, Clone, Default)]
pub struct InputSource {
    horizontal: AxisLatch,
    vertical: AxisLatch,
    pointer: Vec2,
    debug_logging: bool,
}

impl InputSource {
    pub fn new(debug_logging: bool) -> Self {
        Self {
            debug_logging,
            ..Default::default()
        }
    }

    /// Emit this frame's notifications, in the order cancel, horizontal,
    /// vertical, jump, pointer.
    pub fn sample(&mut self, raw: &RawInputSample, out: &mut Vec<InputNotification>) {
        let start = out.len();

        if raw.cancel_pressed {
            out.push(InputNotification::CancelPressed);
        }
        if raw.cancel_released {
            out.push(InputNotification::CancelUnpressed);
        }

        let mut edges = Vec::new();
        self.horizontal.update(raw.horizontal, &mut edges);
        out.extend(edges.drain(..).map(|edge| match edge {
            AxisEdge::NegativePressed => InputNotification::HorizontalLeftPressed,
            AxisEdge::PositivePressed => InputNotification::HorizontalRightPressed,
            AxisEdge::NegativeUnpressed => InputNotification::HorizontalLeftUnpressed,
            AxisEdge::PositiveUnpressed => InputNotification::HorizontalRightUnpressed,
        }));

        self.vertical.update(raw.vertical, &mut edges);
        out.extend(edges.drain(..).map(|edge| match edge {
            AxisEdge::NegativePressed => InputNotification::VerticalDownPressed,
            AxisEdge::PositivePressed => InputNotification::VerticalUpPressed,
            AxisEdge::NegativeUnpressed => InputNotification::VerticalDownUnpressed,
            AxisEdge::PositiveUnpressed => InputNotification::VerticalUpUnpressed,
        }));

        if raw.jump_pressed {
            out.push(InputNotification::JumpPressed);
        }
        if raw.jump_released {
            out.push(InputNotification::JumpUnpressed);
        }

        if let Some(pointer) = raw.pointer {
            self.pointer = pointer;
        }
        out.push(InputNotification::PointerMoved(self.pointer));
        if raw.mouse_left_pressed {
            out.push(InputNotification::PointerLeftPressed(self.pointer));
        }
        if raw.mouse_left_released {
            out.push(InputNotification::PointerLeftUnpressed(self.pointer));
        }

        if self.debug_logging {
            for notification in &out[start..] {
                if !matches!(notification, InputNotification::PointerMoved(_)) {
                    info!("[input] {:?}", notification);
                }
            }
        }
    }
}

/// Bevy-side holder for the device [`InputSource`].
#[derive(Resource, Debug, Default)]
pub struct InputSourceState(pub InputSource);

fn axis(keys: &ButtonInput<KeyCode>, negative: [KeyCode; 2], positive: [KeyCode; 2]) -> AxisSample {
    let neg = keys.any_pressed(negative);
    let pos = keys.any_pressed(positive);
    AxisSample {
        held: neg || pos,
        released: keys.any_just_released(negative) || keys.any_just_released(positive),
        value: (pos as i8 - neg as i8) as f32,
    }
}

/// Build a [`RawInputSample`] from Bevy's input resources.
///
/// - **Escape** → cancel
/// - **A / ←**, **D / →** → horizontal axis
/// - **S / ↓**, **W / ↑** → vertical axis
/// - **Space** → jump
/// - **Left mouse** or the **first touch** → pointer press
///
/// A touch in progress takes over the pointer position from the cursor.
pub fn raw_sample_from_devices(
    keys: &ButtonInput<KeyCode>,
    mouse: &ButtonInput<MouseButton>,
    touches: &Touches,
    window: Option<&Window>,
) -> RawInputSample {
    // Window coordinates are top-left origin; flip to bottom-left.
    let flip = |p: Vec2| window.map_or(p, |w| Vec2::new(p.x, w.height() - p.y));
    let held_touches = touches.iter().count();
    // Lowest id is the finger that has been down longest.
    let touch_pointer = touches
        .iter()
        .min_by_key(|t| t.id())
        .or_else(|| touches.iter_just_released().min_by_key(|t| t.id()))
        .map(|t| t.position());

    RawInputSample {
        cancel_pressed: keys.just_pressed(KeyCode::Escape),
        cancel_released: keys.just_released(KeyCode::Escape),
        horizontal: axis(
            keys,
            [KeyCode::KeyA, KeyCode::ArrowLeft],
            [KeyCode::KeyD, KeyCode::ArrowRight],
        ),
        vertical: axis(
            keys,
            [KeyCode::KeyS, KeyCode::ArrowDown],
            [KeyCode::KeyW, KeyCode::ArrowUp],
        ),
        jump_pressed: keys.just_pressed(KeyCode::Space),
        jump_released: keys.just_released(KeyCode::Space),
        pointer: touch_pointer
            .or_else(|| window.and_then(Window::cursor_position))
            .map(flip),
        // Only the first finger down drives the pointer; later fingers are ignored.
        mouse_left_pressed: mouse.just_pressed(MouseButton::Left)
            || (touches.any_just_pressed() && held_touches == 1),
        mouse_left_released: mouse.just_released(MouseButton::Left)
            || (touches.any_just_released() && held_touches == 0),
    }
}

/// Startup system: create the input source with the configured logging flag.
pub fn setup_input_source(mut commands: Commands, config: Res<ControllerConfig>) {
    commands.insert_resource(InputSourceState(InputSource::new(
        config.debug_input_logging,
    )));
}

/// Poll devices and publish this frame's notifications.
pub fn sample_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut source: ResMut<InputSourceState>,
    mut writer: MessageWriter<InputNotification>,
) {
    let raw = raw_sample_from_devices(&keys, &mouse, &touches, windows.single().ok());
    let mut out = Vec::new();
    source.0.sample(&raw, &mut out);
    for notification in out {
        writer.write(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(value: f32) -> AxisSample {
        AxisSample {
            held: true,
            released: false,
            value,
        }
    }

    fn released(value: f32) -> AxisSample {
        AxisSample {
            held: value != 0.0,
            released: true,
            value,
        }
    }

    fn run(source: &mut InputSource, horizontal: AxisSample) -> Vec<InputNotification> {
        let raw = RawInputSample {
            horizontal,
            ..Default::default()
        };
        let mut out = Vec::new();
        source.sample(&raw, &mut out);
        out.retain(|n| !matches!(n, InputNotification::PointerMoved(_)));
        out
    }

    #[test]
    fn held_axis_reports_press_once() {
        let mut source = InputSource::default();
        assert_eq!(
            run(&mut source, held(1.0)),
            vec![InputNotification::HorizontalRightPressed]
        );
        for _ in 0..5 {
            assert!(run(&mut source, held(1.0)).is_empty());
        }
        assert_eq!(
            run(&mut source, released(0.0)),
            vec![InputNotification::HorizontalRightUnpressed]
        );
    }

    #[test]
    fn releasing_other_key_keeps_held_direction() {
        let mut source = InputSource::default();
        run(&mut source, held(-1.0));
        // Right key tapped and released while left stays down.
        assert!(run(&mut source, released(-1.0)).is_empty());
        assert_eq!(
            run(&mut source, released(0.0)),
            vec![InputNotification::HorizontalLeftUnpressed]
        );
    }

    #[test]
    fn switching_direction_releases_then_presses() {
        let mut source = InputSource::default();
        run(&mut source, held(1.0));
        // Right released while left is held: axis now negative.
        assert_eq!(
            run(&mut source, released(-1.0)),
            vec![InputNotification::HorizontalRightUnpressed]
        );
        assert_eq!(
            run(&mut source, held(-1.0)),
            vec![InputNotification::HorizontalLeftPressed]
        );
    }

    #[test]
    fn balanced_axis_does_not_latch() {
        let mut source = InputSource::default();
        assert!(run(&mut source, held(0.0)).is_empty());
        assert_eq!(
            run(&mut source, held(1.0)),
            vec![InputNotification::HorizontalRightPressed]
        );
    }

    #[test]
    fn pointer_is_reported_every_frame_and_remembered() {
        let mut source = InputSource::default();
        let mut out = Vec::new();
        source.sample(
            &RawInputSample {
                pointer: Some(Vec2::new(5.0, 6.0)),
                mouse_left_pressed: true,
                ..Default::default()
            },
            &mut out,
        );
        source.sample(&RawInputSample::default(), &mut out);
        assert_eq!(
            out,
            vec![
                InputNotification::PointerMoved(Vec2::new(5.0, 6.0)),
                InputNotification::PointerLeftPressed(Vec2::new(5.0, 6.0)),
                InputNotification::PointerMoved(Vec2::new(5.0, 6.0)),
            ]
        );
    }

    #[test]
    fn notifications_follow_fixed_order() {
        let mut source = InputSource::default();
        let mut out = Vec::new();
        source.sample(
            &RawInputSample {
                cancel_pressed: true,
                horizontal: held(1.0),
                vertical: held(1.0),
                jump_pressed: true,
                ..Default::default()
            },
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                InputNotification::CancelPressed,
                InputNotification::HorizontalRightPressed,
                InputNotification::VerticalUpPressed,
                InputNotification::JumpPressed,
                InputNotification::PointerMoved(Vec2::ZERO),
            ]
        );
    }

    // ── Touch ─────────────────────────────────────────────────────────────

    use bevy::input::touch::{TouchInput, TouchPhase};
    use bevy::input::InputPlugin;

    fn touch_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, InputPlugin));
        app
    }

    fn touch(app: &mut App, id: u64, phase: TouchPhase, position: Vec2) {
        app.world_mut()
            .resource_mut::<Messages<TouchInput>>()
            .write(TouchInput {
                phase,
                position,
                window: Entity::PLACEHOLDER,
                force: None,
                id,
            });
        app.update();
    }

    fn touch_sample(app: &App) -> RawInputSample {
        // Default window is 1280x720.
        let window = Window::default();
        raw_sample_from_devices(
            &ButtonInput::default(),
            &ButtonInput::default(),
            app.world().resource::<Touches>(),
            Some(&window),
        )
    }

    #[test]
    fn first_touch_drives_pointer_press_drag_and_release() {
        let mut app = touch_app();

        touch(&mut app, 0, TouchPhase::Started, Vec2::new(130.0, 700.0));
        let raw = touch_sample(&app);
        assert!(raw.mouse_left_pressed);
        assert!(!raw.mouse_left_released);
        assert_eq!(raw.pointer, Some(Vec2::new(130.0, 20.0)));

        touch(&mut app, 0, TouchPhase::Moved, Vec2::new(150.0, 690.0));
        let raw = touch_sample(&app);
        assert!(!raw.mouse_left_pressed);
        assert_eq!(raw.pointer, Some(Vec2::new(150.0, 30.0)));

        touch(&mut app, 0, TouchPhase::Ended, Vec2::new(150.0, 690.0));
        let raw = touch_sample(&app);
        assert!(raw.mouse_left_released);
        assert_eq!(raw.pointer, Some(Vec2::new(150.0, 30.0)));
    }

    #[test]
    fn second_finger_does_not_press_or_release() {
        let mut app = touch_app();
        touch(&mut app, 0, TouchPhase::Started, Vec2::new(100.0, 600.0));

        touch(&mut app, 1, TouchPhase::Started, Vec2::new(900.0, 300.0));
        let raw = touch_sample(&app);
        assert!(!raw.mouse_left_pressed);
        assert_eq!(raw.pointer, Some(Vec2::new(100.0, 120.0)));

        touch(&mut app, 1, TouchPhase::Ended, Vec2::new(900.0, 300.0));
        assert!(!touch_sample(&app).mouse_left_released);
    }

    #[test]
    fn no_touch_and_no_window_leaves_pointer_unknown() {
        let app = touch_app();
        let raw = raw_sample_from_devices(
            &ButtonInput::default(),
            &ButtonInput::default(),
            app.world().resource::<Touches>(),
            None,
        );
        assert_eq!(raw.pointer, None);
        assert!(!raw.mouse_left_pressed);
    }
}
