//! Built-in automation parameter keys.
//!
//! Every animatable parameter the timeline model ships with is declared here
//! as a `Lazy` static; the first dereference registers it in the global
//! registry, so constructing any model type works without ceremony. Hosts
//! that deserialize timelines call [`register_builtin_keys`] at bootstrap
//! first, because a serialized `ParameterKey` only resolves once its
//! parameter is registered.

use fl_automation::{OwnerKind, ParameterKey};
use once_cell::sync::Lazy;
use tracing::info;

/// Option names of the clip `blend_mode` parameter, in index order.
pub const BLEND_MODE_OPTIONS: [&str; 4] = ["normal", "add", "multiply", "screen"];

/// Master opacity of the whole timeline, `[0, 1]`, default 1.
pub static TIMELINE_OPACITY: Lazy<ParameterKey> = Lazy::new(|| {
    ParameterKey::register_float(OwnerKind::Timeline, "timeline", "opacity", 1.0, 0.0, 1.0)
});

/// Track opacity, `[0, 1]`, default 1.
pub static TRACK_OPACITY: Lazy<ParameterKey> = Lazy::new(|| {
    ParameterKey::register_float(OwnerKind::Track, "track", "opacity", 1.0, 0.0, 1.0)
});

/// Track visibility toggle, default visible.
pub static TRACK_VISIBLE: Lazy<ParameterKey> =
    Lazy::new(|| ParameterKey::register_bool(OwnerKind::Track, "track", "visible", true));

/// Clip opacity, `[0, 1]`, default 1.
pub static CLIP_OPACITY: Lazy<ParameterKey> = Lazy::new(|| {
    ParameterKey::register_float(OwnerKind::Clip, "clip", "opacity", 1.0, 0.0, 1.0)
});

/// Clip blend mode over [`BLEND_MODE_OPTIONS`], default `normal`.
pub static CLIP_BLEND_MODE: Lazy<ParameterKey> = Lazy::new(|| {
    ParameterKey::register_enum(OwnerKind::Clip, "clip", "blend_mode", 0, &BLEND_MODE_OPTIONS)
});

/// Motion effect position in pixels, per-axis `[-10000, 10000]`, default origin.
pub static MOTION_POSITION: Lazy<ParameterKey> = Lazy::new(|| {
    ParameterKey::register_vec2(
        OwnerKind::Effect,
        "motion",
        "position",
        [0.0, 0.0],
        [-10_000.0, -10_000.0],
        [10_000.0, 10_000.0],
    )
});

/// Motion effect scale factor, per-axis `[0, 100]`, default 1x.
pub static MOTION_SCALE: Lazy<ParameterKey> = Lazy::new(|| {
    ParameterKey::register_vec2(
        OwnerKind::Effect,
        "motion",
        "scale",
        [1.0, 1.0],
        [0.0, 0.0],
        [100.0, 100.0],
    )
});

/// Motion effect rotation in degrees, `[-360, 360]`, default 0.
pub static MOTION_ROTATION: Lazy<ParameterKey> = Lazy::new(|| {
    ParameterKey::register_float(OwnerKind::Effect, "motion", "rotation", 0.0, -360.0, 360.0)
});

/// Force registration of the whole built-in parameter table.
///
/// Idempotent; each parameter registers exactly once per process no matter
/// how often this runs or which static is dereferenced first.
pub fn register_builtin_keys() {
    let keys = [
        *TIMELINE_OPACITY,
        *TRACK_OPACITY,
        *TRACK_VISIBLE,
        *CLIP_OPACITY,
        *CLIP_BLEND_MODE,
        *MOTION_POSITION,
        *MOTION_SCALE,
        *MOTION_ROTATION,
    ];
    info!(count = keys.len(), "Registered built-in automation parameters");
}
