//! Keyframes and value interpolation.
//!
//! A keyframe anchors a parameter's value at an exact frame. Between two
//! keyframes, numeric kinds interpolate linearly (optionally warped by a
//! per-keyframe curve bend) and discrete kinds step. Resolution at an exact
//! keyframe frame returns the stored value directly, so there is no float
//! drift at anchors.

use fl_common::{AutomationValue, ParameterType};
use serde::{Deserialize, Serialize};

/// A `(frame, value)` anchor within an automation sequence.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Frame this keyframe anchors.
    pub frame: i64,
    /// Value at that frame.
    pub value: AutomationValue,
    /// Interpolation bend toward the next keyframe. 0.0 is a straight lerp;
    /// a non-zero bend in `[-1, 1]` warps the blend with a power curve, with
    /// smaller magnitudes bending harder. Discrete kinds ignore it.
    #[serde(default)]
    pub curve_bend: f32,
}

impl Keyframe {
    /// Create a keyframe with straight-line interpolation.
    pub fn new(frame: i64, value: AutomationValue) -> Self {
        Self {
            frame,
            value,
            curve_bend: 0.0,
        }
    }

    /// Create a keyframe with an interpolation bend toward the next keyframe.
    pub fn with_curve(frame: i64, value: AutomationValue, curve_bend: f32) -> Self {
        Self {
            frame,
            value,
            curve_bend,
        }
    }
}

/// Blend factor for `frame` between bracketing keyframes `a` and `b`.
///
/// Returns 0.0 at `a.frame` and 1.0 at `b.frame`, exactly. `a`'s
/// `curve_bend` warps the factor when non-zero. `b` must not precede `a`.
pub fn interpolation_blend(frame: i64, a: &Keyframe, b: &Keyframe) -> f64 {
    let range = b.frame - a.frame;
    debug_assert!(range >= 0, "bracketing keyframes out of order");
    if range <= 0 {
        return 1.0;
    }
    let blend = (frame - a.frame) as f64 / range as f64;
    let bend = f64::from(a.curve_bend);
    if bend != 0.0 {
        blend.powf(1.0 / bend.abs())
    } else {
        blend
    }
}

/// Interpolate between bracketing keyframes `a` and `b` at `frame`.
///
/// Numeric and vector kinds lerp per component and clamp into the declared
/// range; discrete kinds (bool, enum) step, holding `a`'s value for every
/// frame before `b.frame`.
pub fn interpolate(
    frame: i64,
    a: &Keyframe,
    b: &Keyframe,
    param_type: &ParameterType,
) -> AutomationValue {
    if param_type.is_discrete() {
        return a.value;
    }
    let t = interpolation_blend(frame, a, b);
    let raw = match (a.value, b.value) {
        (AutomationValue::Int(x), AutomationValue::Int(y)) => {
            AutomationValue::Int(x + ((y - x) as f64 * t).round() as i64)
        }
        (AutomationValue::Float(x), AutomationValue::Float(y)) => {
            AutomationValue::Float(x + (y - x) * t as f32)
        }
        (AutomationValue::Vec2(x), AutomationValue::Vec2(y)) => AutomationValue::Vec2([
            x[0] + (y[0] - x[0]) * t as f32,
            x[1] + (y[1] - x[1]) * t as f32,
        ]),
        // Kinds never mix within one sequence; hold the left value if they do.
        (left, _) => left,
    };
    param_type.clamp(raw)
}
