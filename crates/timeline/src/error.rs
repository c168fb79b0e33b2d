//! Error types for timeline editing operations.

use thiserror::Error;

/// Errors from operations that address clips by index.
#[derive(Error, Debug)]
pub enum TimelineError {
    /// An operation addressed a clip index the track does not have.
    #[error("Clip index {index} out of range for track with {len} clips")]
    ClipIndexOutOfRange {
        /// Index the caller passed.
        index: usize,
        /// Number of clips on the track.
        len: usize,
    },

    /// An operation addressed a track index the timeline does not have.
    #[error("Track index {index} out of range for timeline with {len} tracks")]
    TrackIndexOutOfRange {
        /// Index the caller passed.
        index: usize,
        /// Number of tracks on the timeline.
        len: usize,
    },
}
