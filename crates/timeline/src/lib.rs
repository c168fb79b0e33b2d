//! `fl-timeline` — Timeline model, refresh engine, and clip editing for Framelane.
//!
//! This crate assembles the automation layer into a frame-indexed
//! composition:
//!
//! - **Model**: [`Timeline`] → [`Track`] → [`Clip`] → [`Effect`], each owning
//!   automation data for its built-in parameters ([`keys`])
//! - **Refresh**: [`refresh_timeline`] / [`refresh_track`], the per-frame
//!   pass that resolves every in-use sequence into backing fields with
//!   change suppression
//! - **Editing**: [`slice_clip`] and the [`range_removal`] plan/apply pair
//!   for cutting clips against a frame or span
//! - **Hand-off**: [`RenderSnapshot`], the plain-data copy the render
//!   consumer reads instead of the live model
//!
//! # Usage
//!
//! ```rust
//! use fl_common::{AutomationValue, FrameInterval, FrameRate};
//! use fl_timeline::{keys, refresh_timeline, Automatable, Clip, RenderSnapshot, Timeline, Track};
//!
//! let mut timeline = Timeline::new("main", FrameRate::FPS_30);
//! let track = timeline.add_track(Track::new("video"));
//! let clip = track.add_clip(Clip::new("intro", FrameInterval::new(0, 120)));
//! clip.automation_mut()
//!     .set_keyframe(*keys::CLIP_OPACITY, 0, AutomationValue::Float(0.0))
//!     .unwrap();
//! clip.automation_mut()
//!     .set_keyframe(*keys::CLIP_OPACITY, 60, AutomationValue::Float(1.0))
//!     .unwrap();
//!
//! let outcome = refresh_timeline(&mut timeline, 30);
//! assert_eq!(outcome.changes.len(), 1);
//!
//! let snapshot = RenderSnapshot::capture(&timeline, 30);
//! assert_eq!(snapshot.tracks[0].clips[0].opacity, 0.5);
//! ```

pub mod editing;
pub mod engine;
pub mod error;
pub mod keys;
pub mod snapshot;
pub mod types;

// Re-export primary API
pub use editing::{
    apply_range_removal, range_removal, slice_clip, ClipCut, CutAction, RangeRemoval,
    RemovalSummary,
};
pub use engine::{refresh_timeline, refresh_track, ParameterChange, RefreshContext, RefreshOutcome};
pub use error::TimelineError;
pub use keys::register_builtin_keys;
pub use snapshot::{ClipSnapshot, EffectSnapshot, RenderSnapshot, TrackSnapshot};
pub use types::{Automatable, BlendMode, Clip, Effect, Timeline, Track};
