//! The shared input notification channel and the directional state folded
//! from it.
//!
//! Keyboard/mouse sampling ([`super::source`]) and the virtual joystick
//! ([`super::joystick`]) both end up as [`InputNotification`]s.  Locomotion
//! never looks at raw devices, only at [`DirectionalInput`].

use bevy::prelude::*;

/// Edge-triggered input notifications plus the per-frame pointer position.
///
/// Pointer positions are screen pixels with the origin at the bottom-left.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum InputNotification {
    CancelPressed,
    CancelUnpressed,
    HorizontalLeftPressed,
    HorizontalLeftUnpressed,
    HorizontalRightPressed,
    HorizontalRightUnpressed,
    VerticalUpPressed,
    VerticalUpUnpressed,
    VerticalDownPressed,
    VerticalDownUnpressed,
    JumpPressed,
    JumpUnpressed,
    /// Sent every frame.
    PointerMoved(Vec2),
    PointerLeftPressed(Vec2),
    PointerLeftUnpressed(Vec2),
}

/// Directions held and whether a jump is pending.
///
/// Jump requests latch until [`DirectionalInput::take_jump`] hands them to one
/// physics tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionalInput {
    pub horizontal: i8,
    pub vertical: i8,
    pub jump_requested: bool,
}

impl DirectionalInput {
    pub fn apply(&mut self, notification: &InputNotification) {
        match notification {
            InputNotification::HorizontalLeftPressed => self.horizontal = -1,
            InputNotification::HorizontalRightPressed => self.horizontal = 1,
            InputNotification::HorizontalLeftUnpressed => {
                if self.horizontal < 0 {
                    self.horizontal = 0;
                }
            }
            InputNotification::HorizontalRightUnpressed => {
                if self.horizontal > 0 {
                    self.horizontal = 0;
                }
            }
            InputNotification::VerticalUpPressed => {
                self.vertical = 1;
                self.jump_requested = true;
            }
            InputNotification::VerticalDownPressed => self.vertical = -1,
            InputNotification::VerticalUpUnpressed => {
                if self.vertical > 0 {
                    self.vertical = 0;
                }
            }
            InputNotification::VerticalDownUnpressed => {
                if self.vertical < 0 {
                    self.vertical = 0;
                }
            }
            InputNotification::JumpPressed => self.jump_requested = true,
            _ => {}
        }
    }

    /// Return the pending jump request and clear it.
    #[inline]
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }
}

/// Fold this frame's notifications into [`DirectionalInput`].
pub fn apply_directional_input_system(
    mut notifications: MessageReader<InputNotification>,
    mut directional: ResMut<DirectionalInput>,
) {
    for notification in notifications.read() {
        directional.apply(notification);
    }
}
