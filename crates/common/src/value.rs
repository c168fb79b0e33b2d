//! Typed automation values and their declared parameter types.
//!
//! Every animatable parameter declares a [`ParameterType`] up front (value
//! kind plus range constraints for numeric kinds); keyframes and overrides
//! carry [`AutomationValue`]s of that kind. Resolution clamps resolved values
//! into the declared range so downstream consumers never see out-of-range
//! data.

use serde::{Deserialize, Serialize};

/// A concrete value carried by a keyframe, an override slot, or a resolve
/// result.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AutomationValue {
    /// Boolean toggle (step-interpolated).
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Scalar float.
    Float(f32),
    /// 2D vector (position, scale, anchor...).
    Vec2([f32; 2]),
    /// Index into a declared option list (step-interpolated).
    Enum(u32),
}

impl AutomationValue {
    /// Extract a bool, or `None` if the value is another kind.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an integer, or `None` if the value is another kind.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract a float, or `None` if the value is another kind.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract a 2D vector, or `None` if the value is another kind.
    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        match self {
            Self::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an enum option index, or `None` if the value is another kind.
    pub fn as_enum_index(&self) -> Option<u32> {
        match self {
            Self::Enum(v) => Some(*v),
            _ => None,
        }
    }

    /// Short kind name for diagnostics ("bool", "int", ...).
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Vec2(_) => "vec2",
            Self::Enum(_) => "enum",
        }
    }
}

/// The declared type of an animatable parameter, with range constraints for
/// numeric kinds and the option list for enums.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParameterType {
    /// Boolean toggle.
    Bool,
    /// Integer within `[min, max]`.
    Int {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// Float within `[min, max]`.
    Float {
        /// Inclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },
    /// 2D vector with per-component bounds.
    Vec2 {
        /// Inclusive per-component lower bounds.
        min: [f32; 2],
        /// Inclusive per-component upper bounds.
        max: [f32; 2],
    },
    /// One of a fixed set of named options.
    Enum {
        /// Display names; a value is an index into this list.
        options: Vec<String>,
    },
}

impl ParameterType {
    /// Whether `value` is of this declared kind.
    pub fn matches(&self, value: &AutomationValue) -> bool {
        matches!(
            (self, value),
            (Self::Bool, AutomationValue::Bool(_))
                | (Self::Int { .. }, AutomationValue::Int(_))
                | (Self::Float { .. }, AutomationValue::Float(_))
                | (Self::Vec2 { .. }, AutomationValue::Vec2(_))
                | (Self::Enum { .. }, AutomationValue::Enum(_))
        )
    }

    /// Clamp `value` into this type's declared range.
    ///
    /// Bools pass through; enum indices clamp to the option count. A value of
    /// a different kind is returned unchanged (kind checks happen before
    /// values are stored, not here).
    pub fn clamp(&self, value: AutomationValue) -> AutomationValue {
        match (self, value) {
            (Self::Int { min, max }, AutomationValue::Int(v)) => {
                AutomationValue::Int(v.clamp(*min, *max))
            }
            (Self::Float { min, max }, AutomationValue::Float(v)) => {
                AutomationValue::Float(v.clamp(*min, *max))
            }
            (Self::Vec2 { min, max }, AutomationValue::Vec2(v)) => AutomationValue::Vec2([
                v[0].clamp(min[0], max[0]),
                v[1].clamp(min[1], max[1]),
            ]),
            (Self::Enum { options }, AutomationValue::Enum(idx)) => {
                let last = options.len().saturating_sub(1) as u32;
                AutomationValue::Enum(idx.min(last))
            }
            (_, other) => other,
        }
    }

    /// Whether this kind is step-interpolated (no blending between keyframes).
    pub fn is_discrete(&self) -> bool {
        matches!(self, Self::Bool | Self::Enum { .. })
    }

    /// Short kind name for diagnostics ("bool", "int", ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int { .. } => "int",
            Self::Float { .. } => "float",
            Self::Vec2 { .. } => "vec2",
            Self::Enum { .. } => "enum",
        }
    }
}
