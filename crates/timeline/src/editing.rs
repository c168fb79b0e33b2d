//! Clip slicing and range-removal geometry.
//!
//! Two editing operations over one track's clips:
//!
//! - [`slice_clip`] cuts a clip in two at a single frame.
//! - [`range_removal`] classifies every clip against a cut span and returns
//!   a [`RangeRemoval`] plan without mutating anything; a UI can preview the
//!   plan, then commit it with [`apply_range_removal`] as a separate step.
//!
//! Both operations deep-clone automation data when they produce a new clip,
//! and cloned keyframe lists keep their frame numbers verbatim (a split does
//! not shift the tail's keyframes). `media_offset` is maintained on every
//! cut so the kept part of a clip keeps showing the same source frames.

use fl_common::FrameInterval;
use tracing::{debug, trace, warn};

use crate::error::TimelineError;
use crate::types::Track;

/// Cut a clip in two at `frame`.
///
/// A cut at or outside either clip boundary is a documented no-op returning
/// `Ok(None)` (no new clip is produced). Otherwise the original keeps
/// `[begin, frame)` and a deep clone covering `[frame, end)` is inserted
/// immediately after it; the clone's `media_offset` is advanced by the length
/// of the kept head so it continues showing the same media. Returns the
/// clone's index.
///
/// Cloned keyframes are NOT re-based to the clone's new begin; both halves
/// keep the full keyframe list verbatim.
pub fn slice_clip(
    track: &mut Track,
    clip_index: usize,
    frame: i64,
) -> Result<Option<usize>, TimelineError> {
    let len = track.clips().len();
    let Some(clip) = track.clip_mut(clip_index) else {
        return Err(TimelineError::ClipIndexOutOfRange {
            index: clip_index,
            len,
        });
    };

    let span = clip.interval();
    if frame <= span.begin() || frame >= span.end() {
        debug!(clip = %clip.name(), frame, %span, "Slice at clip boundary is a no-op");
        return Ok(None);
    }

    let offset = clip.media_offset();
    let mut tail = clip.clone();
    clip.set_interval(span.with_end(frame));
    tail.set_interval(FrameInterval::from_index(frame, span.end()));
    tail.set_media_offset(offset + (frame - span.begin()));

    let tail_index = clip_index + 1;
    track.insert_clip(tail_index, tail);
    debug!(track = %track.name(), clip_index, frame, "Sliced clip");
    Ok(Some(tail_index))
}

/// How one clip is cut by a removal span.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CutAction {
    /// The span covers the whole clip.
    RemoveEntirely,
    /// The span covers the clip's head; `keep` is the surviving right part.
    TrimLeft {
        /// Interval the clip shrinks to.
        keep: FrameInterval,
    },
    /// The span covers the clip's tail; `keep` is the surviving left part.
    TrimRight {
        /// Interval the clip shrinks to.
        keep: FrameInterval,
    },
    /// The span is strictly interior; the clip splits around it.
    Split {
        /// Interval the original shrinks to.
        left: FrameInterval,
        /// Interval of the new tail clone.
        right: FrameInterval,
    },
}

/// One planned cut, addressing a clip by its index at planning time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClipCut {
    /// Index of the clip on the track when the plan was made.
    pub clip_index: usize,
    /// What happens to that clip.
    pub action: CutAction,
}

/// A removal plan: every clip the span touches, in ascending index order.
///
/// Unaffected clips are simply absent. Produced by [`range_removal`],
/// consumed by [`apply_range_removal`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RangeRemoval {
    /// Planned cuts in ascending clip-index order.
    pub cuts: Vec<ClipCut>,
}

impl RangeRemoval {
    /// Whether the span touched no clips (applying would do nothing).
    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }
}

/// Classify every clip on `track` against the cut span.
///
/// Pure query: the track is not mutated, so a UI can preview the destructive
/// edit before committing it. A zero-length span yields an empty plan.
/// Half-open semantics throughout; a span that merely touches a clip
/// boundary leaves that clip out of the plan.
pub fn range_removal(track: &Track, span: FrameInterval) -> RangeRemoval {
    let mut plan = RangeRemoval::default();
    if span.is_empty() {
        return plan;
    }

    for (clip_index, clip) in track.clips().iter().enumerate() {
        let ci = clip.interval();
        if !span.intersects(ci) {
            continue;
        }
        let action = if span.begin() <= ci.begin() && span.end() >= ci.end() {
            CutAction::RemoveEntirely
        } else if span.begin() <= ci.begin() {
            CutAction::TrimLeft {
                keep: FrameInterval::from_index(span.end(), ci.end()),
            }
        } else if span.end() >= ci.end() {
            CutAction::TrimRight {
                keep: FrameInterval::from_index(ci.begin(), span.begin()),
            }
        } else {
            CutAction::Split {
                left: FrameInterval::from_index(ci.begin(), span.begin()),
                right: FrameInterval::from_index(span.end(), ci.end()),
            }
        };
        plan.cuts.push(ClipCut { clip_index, action });
    }

    trace!(%span, cuts = plan.cuts.len(), "Planned range removal");
    plan
}

/// Tally of what [`apply_range_removal`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    /// Clips removed entirely.
    pub removed: usize,
    /// Clips trimmed on one side.
    pub trimmed: usize,
    /// Clips split around an interior span.
    pub split: usize,
}

/// Commit a removal plan to the track.
///
/// Cuts are processed in descending clip-index order so the indices recorded
/// at planning time stay valid while clips are removed and inserted. Split
/// tails are deep clones with verbatim keyframes and an advanced
/// `media_offset`, exactly like [`slice_clip`] tails. A plan made against a
/// track that changed since planning may address missing clips; those cuts
/// are skipped with a warning.
pub fn apply_range_removal(track: &mut Track, plan: RangeRemoval) -> RemovalSummary {
    let mut summary = RemovalSummary::default();

    for cut in plan.cuts.into_iter().rev() {
        if cut.clip_index >= track.clips().len() {
            warn!(clip_index = cut.clip_index, "Removal cut addresses a missing clip; skipped");
            continue;
        }
        match cut.action {
            CutAction::RemoveEntirely => {
                if track.remove_clip(cut.clip_index).is_some() {
                    summary.removed += 1;
                }
            }
            CutAction::TrimLeft { keep } | CutAction::TrimRight { keep } => {
                if let Some(clip) = track.clip_mut(cut.clip_index) {
                    let delta = keep.begin() - clip.interval().begin();
                    if delta != 0 {
                        let offset = clip.media_offset();
                        clip.set_media_offset(offset + delta);
                    }
                    clip.set_interval(keep);
                    summary.trimmed += 1;
                }
            }
            CutAction::Split { left, right } => {
                if let Some(clip) = track.clip_mut(cut.clip_index) {
                    let base_begin = clip.interval().begin();
                    let offset = clip.media_offset();
                    let mut tail = clip.clone();
                    clip.set_interval(left);
                    tail.set_interval(right);
                    tail.set_media_offset(offset + (right.begin() - base_begin));
                    track.insert_clip(cut.clip_index + 1, tail);
                    summary.split += 1;
                }
            }
        }
    }

    debug!(
        track = %track.name(),
        removed = summary.removed,
        trimmed = summary.trimmed,
        split = summary.split,
        "Applied range removal"
    );
    summary
}
