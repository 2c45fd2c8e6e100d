//! Grounded / airborne / falling tracking and the coyote-time window.
//!
//! [`CharacterStateTracker::tick`] runs once per physics step, before
//! locomotion reads the result.  Edge notifications are pushed in a fixed
//! order: `Landed`, `BecameAirborne`, `StartedFalling`.
//!
//! Times are `f64` seconds on the fixed clock so the coyote deadline keeps
//! sub-millisecond resolution in long sessions.

/// Kind of jump granted by [`CharacterStateTracker::try_consume_jump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Probe reported ground contact this tick.
    Grounded,
    /// Airborne, but still inside the coyote window.
    Coyote,
    /// Mid-air jump paid for with one `double_jumps_remaining`.
    DoubleJump,
}

/// Edge-triggered character notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterEvent {
    Landed,
    BecameAirborne,
    StartedFalling,
    Jumped(JumpKind),
    /// Horizontal input direction changed to -1, 0 or 1.
    HorizontalMovementChanged(i8),
    /// Character dropped below the world floor and was moved back to spawn.
    Respawned,
}

/// Kinematic state mutated once per fixed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterState {
    pub is_grounded: bool,
    /// Only ever `true` while `is_grounded` is `false`.
    pub is_falling: bool,
    pub double_jumps_remaining: u32,
    pub coyote_active: bool,
    /// Clock time (s) at which the coyote window closes.
    pub coyote_deadline: f64,
    /// Feet height recorded on the previous tick.
    pub previous_feet_height: f32,
}

#[derive(Debug, Clone)]
pub struct CharacterStateTracker {
    state: CharacterState,
    max_double_jumps: u32,
    coyote_time: f32,
    /// Left the ground without rising and has not dropped yet.
    ///
    /// The feet circle can lose a ledge a few ticks before the collider does;
    /// the first drop after that still counts as walking off.
    awaiting_drop: bool,
}

impl CharacterStateTracker {
    /// Start airborne-but-not-falling at `feet_height` with a full double-jump
    /// allowance; the first grounded probe fires `Landed`.
    pub fn new(max_double_jumps: u32, coyote_time: f32, feet_height: f32) -> Self {
        Self {
            state: CharacterState {
                is_grounded: false,
                is_falling: false,
                double_jumps_remaining: max_double_jumps,
                coyote_active: false,
                coyote_deadline: 0.0,
                previous_feet_height: feet_height,
            },
            max_double_jumps,
            coyote_time,
            awaiting_drop: false,
        }
    }

    #[inline]
    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    /// Advance one physics tick.
    ///
    /// `probe_grounded` is this tick's ground overlap result, `feet_height`
    /// the current feet y, `now` the fixed clock in seconds.
    pub fn tick(
        &mut self,
        probe_grounded: bool,
        feet_height: f32,
        now: f64,
        events: &mut Vec<CharacterEvent>,
    ) {
        let previously_grounded = self.state.is_grounded;
        self.state.is_grounded = probe_grounded;

        let landed = probe_grounded && !previously_grounded;
        let became_airborne = !probe_grounded && previously_grounded;

        if landed {
            self.state.double_jumps_remaining = self.max_double_jumps;
            self.state.is_falling = false;
            self.state.coyote_active = false;
            self.awaiting_drop = false;
            events.push(CharacterEvent::Landed);
        }

        if became_airborne {
            events.push(CharacterEvent::BecameAirborne);
            // Feet rising on the take-off tick means a jump; that never opens
            // a coyote window.
            self.awaiting_drop = feet_height <= self.state.previous_feet_height;
        }

        if self.awaiting_drop && !probe_grounded && feet_height < self.state.previous_feet_height {
            self.awaiting_drop = false;
            self.state.is_falling = true;
            self.state.coyote_active = true;
            self.state.coyote_deadline = now + f64::from(self.coyote_time);
            events.push(CharacterEvent::StartedFalling);
        }

        self.state.previous_feet_height = feet_height;

        if self.state.coyote_active && now >= self.state.coyote_deadline {
            self.state.coyote_active = false;
        }
        // No mid-air jump once the ledge grace has run out.
        if !self.state.coyote_active && self.state.is_falling {
            self.state.double_jumps_remaining = 0;
        }
    }

    /// Whether a ground (or coyote) jump would be honoured at `now`.
    #[inline]
    pub fn in_jump_window(&self, now: f64) -> bool {
        self.state.is_grounded || (self.state.coyote_active && now < self.state.coyote_deadline)
    }

    /// Whether any jump, including a double jump, would be honoured at `now`.
    #[inline]
    pub fn can_jump(&self, now: f64) -> bool {
        self.in_jump_window(now) || self.state.double_jumps_remaining > 0
    }

    /// Spend a jump if one is available.
    ///
    /// Any successful jump clears the falling flag and closes the coyote gate.
    pub fn try_consume_jump(&mut self, now: f64) -> Option<JumpKind> {
        let kind = if self.state.is_grounded {
            JumpKind::Grounded
        } else if self.state.coyote_active && now < self.state.coyote_deadline {
            JumpKind::Coyote
        } else if self.state.double_jumps_remaining > 0 {
            self.state.double_jumps_remaining -= 1;
            JumpKind::DoubleJump
        } else {
            return None;
        };

        self.state.is_falling = false;
        self.state.coyote_active = false;
        self.awaiting_drop = false;
        Some(kind)
    }

    /// Forget all transient state, e.g. after teleporting to spawn.
    pub fn reset(&mut self, feet_height: f32) {
        *self = Self::new(self.max_double_jumps, self.coyote_time, feet_height);
    }
}
