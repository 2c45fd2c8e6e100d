//! Centralised controller and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::ControllerConfig::default`] mirrors every value below.
//!
//! ## Units
//!
//! Rapier runs at one world unit per pixel (`pixels_per_meter(1.0)`), so all
//! distances are pixels and all speeds are pixels per second.

// ── Movement ──────────────────────────────────────────────────────────────────

/// Horizontal speed (u/s) while a direction is held.
pub const MOVEMENT_SPEED: f32 = 260.0;

/// Whether horizontal input keeps steering the character while airborne.
///
/// When `false`, horizontal velocity is frozen at whatever it was on take-off.
pub const AIR_CONTROL: bool = true;

// ── Jumping ───────────────────────────────────────────────────────────────────

/// Jump strength.
///
/// In [`JUMP_USE_VELOCITY`] mode the vertical velocity is set to
/// `JUMP_INTENSITY / JUMP_VELOCITY_DIVISOR`.  In force mode the value is added
/// as an upward force for exactly one physics step.
pub const JUMP_INTENSITY: f32 = 32_000.0;

/// Divisor applied to [`JUMP_INTENSITY`] in velocity mode.
pub const JUMP_VELOCITY_DIVISOR: f32 = 50.0;

/// Set the vertical velocity directly instead of adding an upward force.
pub const JUMP_USE_VELOCITY: bool = false;

/// Grace period (s) after walking off a ledge during which a jump still counts
/// as grounded.
pub const COYOTE_TIME: f32 = 0.2;

/// Upper bound accepted for [`COYOTE_TIME`] by config validation.
pub const COYOTE_TIME_MAX: f32 = 5.0;

/// Whether mid-air jumps are allowed at all.
pub const DOUBLE_JUMP: bool = false;

/// Mid-air jumps granted on each landing when [`DOUBLE_JUMP`] is enabled.
pub const NUMBER_OF_DOUBLE_JUMPS: u32 = 1;

// ── Ground probe ──────────────────────────────────────────────────────────────

/// Radius of the overlap circle tested at the feet point.
pub const GROUNDED_RADIUS: f32 = 4.0;

/// Layer bits considered "ground" by the feet probe.
pub const GROUND_LAYER_MASK: u32 = 0b0001;

// ── Character body ────────────────────────────────────────────────────────────

/// Half-width of the character's box collider.
pub const CHARACTER_HALF_WIDTH: f32 = 12.0;

/// Half-height of the character's box collider.
///
/// The feet point sits at `translation.y - CHARACTER_HALF_HEIGHT`.
pub const CHARACTER_HALF_HEIGHT: f32 = 20.0;

/// Mass assigned to the character collider.
///
/// Keeping this at 1.0 makes a one-step jump force of `JUMP_INTENSITY` read as
/// a velocity change of `JUMP_INTENSITY * fixed_dt`.
pub const CHARACTER_MASS: f32 = 1.0;

/// World gravity magnitude (u/s²), applied along −Y.
pub const GRAVITY: f32 = 1400.0;

/// Depth below the origin at which a falling character is reset to spawn.
pub const FELL_THROUGH_WORLD_DEPTH: f32 = 200.0;

/// Where the character spawns and respawns.
pub const SPAWN_X: f32 = 0.0;
pub const SPAWN_Y: f32 = 120.0;

// ── Virtual joystick ──────────────────────────────────────────────────────────

/// Screen-space anchor of the joystick pad, measured from the bottom-left.
pub const JOYSTICK_ANCHOR_X: f32 = 120.0;
pub const JOYSTICK_ANCHOR_Y: f32 = 120.0;

/// Offset (px) a drag must reach before a horizontal or downward direction
/// activates.  Upward uses twice this value.
pub const JOYSTICK_SENSITIVITY_THRESHOLD: f32 = 10.0;

/// Maximum distance the knob is drawn from the anchor.
pub const JOYSTICK_KNOB_RADIUS: f32 = 45.0;

/// A press must land within this distance of the anchor to begin a drag.
pub const JOYSTICK_ACTIVATION_RADIUS: f32 = 60.0;

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Muzzle velocity added to the firer's horizontal velocity.
pub const BULLET_VELOCITY: f32 = 600.0;

/// Seconds before a projectile despawns.
pub const PROJECTILE_LIFETIME: f32 = 2.0;

/// Collider radius of a projectile.
pub const PROJECTILE_RADIUS: f32 = 3.0;

// ── Input ─────────────────────────────────────────────────────────────────────

/// Log every emitted input notification at `info` level.
pub const DEBUG_INPUT_LOGGING: bool = false;
