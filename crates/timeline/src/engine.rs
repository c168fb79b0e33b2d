//! Per-frame automation refresh.
//!
//! [`refresh_timeline`] walks timeline → tracks → clips → effects at a
//! playhead frame, resolves every in-use sequence, and writes the results
//! into the owners' backing fields. Each owner is bracketed with
//! `begin_refresh`/`end_refresh` for the duration of its resolve window, so
//! a sequence mutation triggered from inside the pass is rejected instead of
//! invalidating values mid-pass. Only values that actually changed are
//! recorded (change suppression); consumers use the returned
//! [`RefreshOutcome`] to decide whether a re-render is needed.
//!
//! The walk resolves parents before children: the timeline's own parameters
//! first, then per track its parameters, then each clip under the playhead
//! at the clip-relative frame, then that clip's effects. A lower level can
//! therefore rely on the level above it being fresh. Clips whose interval
//! does not contain the frame are skipped entirely, which keeps a pass
//! proportional to the sequences actually in use.

use fl_automation::{OwnerKind, ParameterKey};
use fl_common::AutomationValue;
use tracing::trace;

use crate::types::{Automatable, Timeline, Track};

/// One suppressed-notification change applied during a refresh pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParameterChange {
    /// Level of the owner whose backing field changed.
    pub owner: OwnerKind,
    /// Parameter that changed.
    pub key: ParameterKey,
    /// Frame the sequence was resolved at (clip-relative below track level).
    pub frame: i64,
}

/// The token threaded through a refresh pass.
///
/// Resolve helpers take `&mut RefreshContext`; mutation APIs do not, so "may
/// run during refresh" is visible in a function's signature instead of being
/// a hidden flag.
#[derive(Debug)]
pub struct RefreshContext {
    frame: i64,
    changes: Vec<ParameterChange>,
    visited: usize,
}

impl RefreshContext {
    /// Start a context for one pass at `frame`.
    pub fn new(frame: i64) -> Self {
        Self {
            frame,
            changes: Vec::new(),
            visited: 0,
        }
    }

    /// The timeline-level frame this pass resolves at.
    pub fn frame(&self) -> i64 {
        self.frame
    }

    /// Changes recorded so far, in application order.
    pub fn changes(&self) -> &[ParameterChange] {
        &self.changes
    }

    fn record(&mut self, owner: OwnerKind, key: ParameterKey, frame: i64) {
        self.changes.push(ParameterChange { owner, key, frame });
    }

    fn into_outcome(self) -> RefreshOutcome {
        RefreshOutcome {
            changes: self.changes,
            visited_sequences: self.visited,
        }
    }
}

/// What one refresh pass did.
#[derive(Debug)]
pub struct RefreshOutcome {
    /// Every actual backing-field change, in application order (parents
    /// before children).
    pub changes: Vec<ParameterChange>,
    /// How many in-use sequences were resolved, changed or not.
    pub visited_sequences: usize,
}

/// Refresh the whole timeline at `frame`.
///
/// Resolves the timeline's own in-use sequences, then every track in
/// declared order via the per-track walk. Dirty flags of every visited owner
/// are cleared; skipped clips keep theirs until a pass visits them.
pub fn refresh_timeline(timeline: &mut Timeline, frame: i64) -> RefreshOutcome {
    let mut ctx = RefreshContext::new(frame);
    refresh_level(timeline, frame, &mut ctx);
    for track in timeline.tracks_mut() {
        refresh_track_level(track, frame, &mut ctx);
    }
    trace!(
        frame,
        changes = ctx.changes.len(),
        visited = ctx.visited,
        "Refreshed timeline"
    );
    ctx.into_outcome()
}

/// Refresh a single track (and its clips and effects) at `frame`.
///
/// Same walk as the track step of [`refresh_timeline`], for callers that
/// know only one track changed.
pub fn refresh_track(track: &mut Track, frame: i64) -> RefreshOutcome {
    let mut ctx = RefreshContext::new(frame);
    refresh_track_level(track, frame, &mut ctx);
    ctx.into_outcome()
}

fn refresh_track_level(track: &mut Track, frame: i64, ctx: &mut RefreshContext) {
    refresh_level(track, frame, ctx);
    for clip in track.clips_mut() {
        let interval = clip.interval();
        if !interval.contains_frame(frame) {
            continue;
        }
        let relative = frame - interval.begin();
        refresh_level(clip, relative, ctx);
        for effect in clip.effects_mut() {
            refresh_level(effect, relative, ctx);
        }
    }
}

/// Resolve and apply one owner's in-use sequences at `frame`.
fn refresh_level<A: Automatable>(owner: &mut A, frame: i64, ctx: &mut RefreshContext) {
    owner.automation_mut().begin_refresh();
    // Resolved values are collected first; applying writes to the owner, and
    // the sequences must not be borrowed across that.
    let resolved: Vec<(ParameterKey, AutomationValue)> = owner
        .automation()
        .in_use_sequences()
        .map(|seq| (seq.key(), seq.resolve(frame)))
        .collect();
    for (key, value) in resolved {
        ctx.visited += 1;
        if owner.apply_resolved(key, &value) {
            trace!(key = %key, frame, "Applied automation value");
            ctx.record(owner.owner_kind(), key, frame);
        }
    }
    owner.automation_mut().end_refresh();
    owner.automation_mut().clear_dirty();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use crate::types::{Clip, Effect};
    use fl_common::{FrameInterval, FrameRate};

    /// Clip with an opacity ramp 0 → 1 over local frames [0, 30].
    fn ramp_clip(name: &str, begin: i64, duration: i64) -> Clip {
        let mut clip = Clip::new(name, FrameInterval::new(begin, duration));
        clip.automation_mut()
            .set_keyframe(*keys::CLIP_OPACITY, 0, AutomationValue::Float(0.0))
            .unwrap();
        clip.automation_mut()
            .set_keyframe(*keys::CLIP_OPACITY, 30, AutomationValue::Float(1.0))
            .unwrap();
        clip
    }

    fn full_fixture() -> Timeline {
        let mut timeline = Timeline::new("t", FrameRate::FPS_30);
        timeline
            .automation_mut()
            .set_keyframe(*keys::TIMELINE_OPACITY, 0, AutomationValue::Float(0.0))
            .unwrap();
        timeline
            .automation_mut()
            .set_keyframe(*keys::TIMELINE_OPACITY, 30, AutomationValue::Float(1.0))
            .unwrap();

        let track = timeline.add_track(Track::new("v1"));
        track
            .automation_mut()
            .set_keyframe(*keys::TRACK_OPACITY, 0, AutomationValue::Float(0.0))
            .unwrap();
        track
            .automation_mut()
            .set_keyframe(*keys::TRACK_OPACITY, 30, AutomationValue::Float(1.0))
            .unwrap();

        let clip = track.add_clip(ramp_clip("c", 0, 120));
        let effect = clip.add_effect(Effect::new("motion"));
        effect
            .automation_mut()
            .set_keyframe(*keys::MOTION_ROTATION, 0, AutomationValue::Float(0.0))
            .unwrap();
        effect
            .automation_mut()
            .set_keyframe(*keys::MOTION_ROTATION, 30, AutomationValue::Float(90.0))
            .unwrap();
        timeline
    }

    #[test]
    fn refresh_applies_resolved_values() {
        let mut timeline = full_fixture();
        refresh_timeline(&mut timeline, 15);

        assert_eq!(timeline.opacity(), 0.5);
        let track = timeline.track(0).unwrap();
        assert_eq!(track.opacity(), 0.5);
        let clip = track.clip(0).unwrap();
        assert_eq!(clip.opacity(), 0.5);
        assert_eq!(clip.effects()[0].rotation(), 45.0);
    }

    #[test]
    fn parents_change_before_children() {
        let mut timeline = full_fixture();
        let outcome = refresh_timeline(&mut timeline, 15);

        let owners: Vec<OwnerKind> = outcome.changes.iter().map(|c| c.owner).collect();
        assert_eq!(
            owners,
            vec![
                OwnerKind::Timeline,
                OwnerKind::Track,
                OwnerKind::Clip,
                OwnerKind::Effect
            ]
        );
    }

    #[test]
    fn second_refresh_at_same_frame_is_suppressed() {
        let mut timeline = full_fixture();
        let first = refresh_timeline(&mut timeline, 15);
        assert_eq!(first.changes.len(), 4);
        assert_eq!(first.visited_sequences, 4);

        let second = refresh_timeline(&mut timeline, 15);
        assert!(second.changes.is_empty());
        // The sequences were still resolved; only notification is suppressed.
        assert_eq!(second.visited_sequences, 4);
    }

    #[test]
    fn refresh_clears_dirty_on_visited_owners() {
        let mut timeline = full_fixture();
        assert!(timeline.automation().is_dirty());
        refresh_timeline(&mut timeline, 15);
        assert!(!timeline.automation().is_dirty());
        assert!(!timeline.track(0).unwrap().automation().is_dirty());
        assert!(!timeline.track(0).unwrap().clip(0).unwrap().automation().is_dirty());
    }

    #[test]
    fn off_playhead_clips_are_skipped() {
        let mut timeline = Timeline::new("t", FrameRate::FPS_30);
        timeline.add_track(Track::new("v1")).add_clip(ramp_clip("far", 100, 50));

        let outcome = refresh_timeline(&mut timeline, 10);
        assert_eq!(outcome.visited_sequences, 0);
        assert!(outcome.changes.is_empty());

        let clip = timeline.track(0).unwrap().clip(0).unwrap();
        // Untouched: field keeps its constructor value, dirty flag survives.
        assert_eq!(clip.opacity(), 1.0);
        assert!(clip.automation().is_dirty());
    }

    #[test]
    fn clips_resolve_at_clip_relative_frames() {
        let mut timeline = Timeline::new("t", FrameRate::FPS_30);
        timeline.add_track(Track::new("v1")).add_clip(ramp_clip("c", 100, 60));

        let outcome = refresh_timeline(&mut timeline, 115);
        let clip = timeline.track(0).unwrap().clip(0).unwrap();
        // Timeline frame 115 is local frame 15, the middle of the ramp.
        assert_eq!(clip.opacity(), 0.5);
        assert_eq!(outcome.changes[0].frame, 15);
    }

    #[test]
    fn idle_sequences_are_not_visited() {
        let mut timeline = Timeline::new("t", FrameRate::FPS_30);
        let track = timeline.add_track(Track::new("v1"));
        let clip = track.add_clip(Clip::new("static", FrameInterval::new(0, 100)));
        clip.automation_mut()
            .set_override_value(*keys::CLIP_OPACITY, AutomationValue::Float(0.3))
            .unwrap();
        clip.automation_mut()
            .set_override_enabled(*keys::CLIP_OPACITY, true)
            .unwrap();

        let outcome = refresh_timeline(&mut timeline, 50);
        // Only the overridden clip opacity is in use; blend_mode, track and
        // timeline parameters are idle.
        assert_eq!(outcome.visited_sequences, 1);
        assert_eq!(timeline.track(0).unwrap().clip(0).unwrap().opacity(), 0.3);
    }

    #[test]
    fn refresh_track_standalone() {
        let mut track = Track::new("v1");
        track.add_clip(ramp_clip("c", 0, 60));
        let outcome = refresh_track(&mut track, 15);
        assert_eq!(track.clip(0).unwrap().opacity(), 0.5);
        assert_eq!(outcome.changes.len(), 1);
        assert!(!track.automation().is_refreshing());
    }

    #[test]
    fn override_wins_during_refresh() {
        let mut timeline = Timeline::new("t", FrameRate::FPS_30);
        let track = timeline.add_track(Track::new("v1"));
        let clip = track.add_clip(ramp_clip("c", 0, 60));
        clip.automation_mut()
            .set_override_value(*keys::CLIP_OPACITY, AutomationValue::Float(0.9))
            .unwrap();
        clip.automation_mut()
            .set_override_enabled(*keys::CLIP_OPACITY, true)
            .unwrap();

        refresh_timeline(&mut timeline, 15);
        assert_eq!(timeline.track(0).unwrap().clip(0).unwrap().opacity(), 0.9);
    }
}
