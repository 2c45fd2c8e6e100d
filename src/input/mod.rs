//! Input module: device sampling, virtual joystick, and the directional state
//! locomotion consumes.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`notify`] | `InputNotification` channel and `DirectionalInput` resource |
//! | [`source`] | Keyboard/mouse → edge-triggered notifications with per-axis busy latches |
//! | [`joystick`] | On-screen joystick with threshold hysteresis, plus its UI nodes |
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`sample_input_system`]: keyboard/mouse → `InputNotification`.
//! 2. [`virtual_joystick_system`]: pointer notifications → `JoystickNotification`.
//! 3. [`forward_joystick_system`]: `JoystickNotification` → `InputNotification`.
//! 4. [`apply_directional_input_system`]: fold everything into `DirectionalInput`.

pub mod joystick;
pub mod notify;
pub mod source;

pub use joystick::{
    forward_joystick_system, joystick_knob_system, setup_joystick, virtual_joystick_system,
    JoystickDrag, JoystickNotification, JoystickState, VirtualJoystick,
};
pub use notify::{apply_directional_input_system, DirectionalInput, InputNotification};
pub use source::{
    raw_sample_from_devices, sample_input_system, setup_input_source, AxisSample, InputSource,
    InputSourceState, RawInputSample,
};
