//! `fl-automation` — Parameter registry and keyframe automation for Framelane.
//!
//! This crate implements the automation layer every timeline entity hangs its
//! animatable parameters on:
//!
//! - **Keys**: [`ParameterKey`], copyable handles into the global parameter
//!   registry where every animatable parameter is declared once
//! - **Keyframes**: [`Keyframe`] and the interpolation that blends between
//!   bracketing pairs, with per-keyframe curve bend
//! - **Sequences**: [`AutomationSequence`], the sorted keyframe list plus
//!   override slot for one parameter on one owner
//! - **Data**: [`AutomationData`], the per-owner key → sequence map with
//!   dirty tracking and the no-mutation-during-refresh guard
//!
//! # Usage
//!
//! ```rust
//! use fl_automation::{AutomationData, OwnerKind, ParameterKey};
//! use fl_common::AutomationValue;
//!
//! let opacity =
//!     ParameterKey::register_float(OwnerKind::Clip, "doc_clip", "opacity", 1.0, 0.0, 1.0);
//!
//! let mut data = AutomationData::new(OwnerKind::Clip);
//! data.assign(opacity);
//! data.set_keyframe(opacity, 0, AutomationValue::Float(0.0)).unwrap();
//! data.set_keyframe(opacity, 30, AutomationValue::Float(1.0)).unwrap();
//!
//! let sequence = data.sequence(opacity).unwrap();
//! assert_eq!(sequence.resolve(15), AutomationValue::Float(0.5));
//! ```

pub mod data;
pub mod error;
pub mod key;
pub mod keyframe;
pub mod sequence;

// Re-export primary API
pub use data::AutomationData;
pub use error::AutomationError;
pub use key::{OwnerKind, ParameterKey, FULL_ID_SEPARATOR};
pub use keyframe::{interpolate, interpolation_blend, Keyframe};
pub use sequence::AutomationSequence;
