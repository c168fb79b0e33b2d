//! End-to-end tests for the edit → refresh → snapshot flow.
//!
//! These tests drive the public API the way an editor host would: register
//! the built-in parameters, build a timeline, keyframe parameters, slice and
//! range-remove clips, run per-frame refresh passes, and hand the resulting
//! snapshots to the render side. Unit tests cover each module in isolation;
//! this file covers the seams between them.

use fl_automation::{OwnerKind, ParameterKey};
use fl_common::{AutomationValue, FrameInterval, FrameRate};
use fl_timeline::{
    apply_range_removal, keys, range_removal, refresh_timeline, register_builtin_keys, slice_clip,
    Automatable, BlendMode, Clip, CutAction, Effect, RenderSnapshot, Timeline, Track,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Add a linear float ramp `0 → 1` over local frames `[0, ramp_end]`.
fn add_opacity_ramp<A: Automatable>(owner: &mut A, key: ParameterKey, ramp_end: i64) {
    owner
        .automation_mut()
        .set_keyframe(key, 0, AutomationValue::Float(0.0))
        .unwrap();
    owner
        .automation_mut()
        .set_keyframe(key, ramp_end, AutomationValue::Float(1.0))
        .unwrap();
}

/// Timeline with one track holding a fading clip `[0, 120)` (opacity and
/// rotation ramps over the first 60 local frames) and an overridden clip
/// `[120, 240)` at constant opacity 0.8.
fn make_editor_timeline() -> Timeline {
    let mut timeline = Timeline::new("main", FrameRate::FPS_30);
    let track = timeline.add_track(Track::new("video"));

    let intro = track.add_clip(Clip::new("intro", FrameInterval::new(0, 120)));
    add_opacity_ramp(intro, *keys::CLIP_OPACITY, 60);
    let effect = intro.add_effect(Effect::new("motion"));
    effect
        .automation_mut()
        .set_keyframe(*keys::MOTION_ROTATION, 0, AutomationValue::Float(0.0))
        .unwrap();
    effect
        .automation_mut()
        .set_keyframe(*keys::MOTION_ROTATION, 60, AutomationValue::Float(90.0))
        .unwrap();

    let outro = track.add_clip(Clip::new("outro", FrameInterval::new(120, 120)));
    outro
        .automation_mut()
        .set_override_value(*keys::CLIP_OPACITY, AutomationValue::Float(0.8))
        .unwrap();
    outro
        .automation_mut()
        .set_override_enabled(*keys::CLIP_OPACITY, true)
        .unwrap();

    timeline
}

// ---------------------------------------------------------------------------
// Full flow
// ---------------------------------------------------------------------------

#[test]
fn edit_refresh_snapshot_flow() {
    register_builtin_keys();
    let mut timeline = make_editor_timeline();
    assert_eq!(timeline.largest_frame_in_use(), 240);

    // Scrub to the middle of the intro's ramps.
    refresh_timeline(&mut timeline, 30);
    let snapshot = RenderSnapshot::capture(&timeline, 30);
    assert_eq!(snapshot.frame, 30);
    let clips = &snapshot.tracks[0].clips;
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].name, "intro");
    assert!((clips[0].opacity - 0.5).abs() < 1e-6);
    assert!((clips[0].effects[0].rotation - 45.0).abs() < 1e-6);
    assert_eq!(clips[0].media_frame, 30);

    // Jump into the outro.
    let outcome = refresh_timeline(&mut timeline, 150);
    assert!(outcome
        .changes
        .iter()
        .any(|c| c.owner == OwnerKind::Clip && c.key == *keys::CLIP_OPACITY));
    let snapshot = RenderSnapshot::capture(&timeline, 150);
    let clips = &snapshot.tracks[0].clips;
    assert_eq!(clips[0].name, "outro");
    assert!((clips[0].opacity - 0.8).abs() < 1e-6);
    assert_eq!(clips[0].media_frame, 30);
}

#[test]
fn refresh_resolves_parents_before_children_per_track() {
    let mut timeline = Timeline::new("main", FrameRate::FPS_30);
    add_opacity_ramp(&mut timeline, *keys::TIMELINE_OPACITY, 30);

    // Track A carries opacity ramps all the way down plus a rotating effect.
    let track_a = timeline.add_track(Track::new("a"));
    add_opacity_ramp(track_a, *keys::TRACK_OPACITY, 30);
    let clip_a = track_a.add_clip(Clip::new("ca", FrameInterval::new(0, 120)));
    add_opacity_ramp(clip_a, *keys::CLIP_OPACITY, 30);
    let effect_a = clip_a.add_effect(Effect::new("motion"));
    effect_a
        .automation_mut()
        .set_keyframe(*keys::MOTION_ROTATION, 0, AutomationValue::Float(90.0))
        .unwrap();

    // Track B animates different parameters so its changes are telling.
    let track_b = timeline.add_track(Track::new("b"));
    track_b
        .automation_mut()
        .set_keyframe(*keys::TRACK_VISIBLE, 0, AutomationValue::Bool(false))
        .unwrap();
    let clip_b = track_b.add_clip(Clip::new("cb", FrameInterval::new(0, 120)));
    clip_b
        .automation_mut()
        .set_keyframe(*keys::CLIP_BLEND_MODE, 0, AutomationValue::Enum(1))
        .unwrap();

    let outcome = refresh_timeline(&mut timeline, 15);
    let got: Vec<(OwnerKind, ParameterKey)> =
        outcome.changes.iter().map(|c| (c.owner, c.key)).collect();
    assert_eq!(
        got,
        vec![
            (OwnerKind::Timeline, *keys::TIMELINE_OPACITY),
            (OwnerKind::Track, *keys::TRACK_OPACITY),
            (OwnerKind::Clip, *keys::CLIP_OPACITY),
            (OwnerKind::Effect, *keys::MOTION_ROTATION),
            (OwnerKind::Track, *keys::TRACK_VISIBLE),
            (OwnerKind::Clip, *keys::CLIP_BLEND_MODE),
        ]
    );
    assert_eq!(timeline.track(1).unwrap().clip(0).unwrap().blend_mode(), BlendMode::Add);
    assert!(!timeline.track(1).unwrap().is_visible());
}

#[test]
fn change_suppression_across_passes() {
    let mut timeline = make_editor_timeline();

    let first = refresh_timeline(&mut timeline, 30);
    assert!(!first.changes.is_empty());

    // Same frame again: everything resolves to the same values.
    let second = refresh_timeline(&mut timeline, 30);
    assert!(second.changes.is_empty());
    assert_eq!(second.visited_sequences, first.visited_sequences);

    // One frame later the ramps move, the override does not.
    let third = refresh_timeline(&mut timeline, 31);
    assert!(!third.changes.is_empty());
    assert!(third
        .changes
        .iter()
        .all(|c| c.key != *keys::CLIP_BLEND_MODE));
}

// ---------------------------------------------------------------------------
// Editing operations feeding back into refresh
// ---------------------------------------------------------------------------

#[test]
fn slice_keeps_media_continuous_but_not_keyframes() {
    let mut timeline = Timeline::new("main", FrameRate::FPS_30);
    let track = timeline.add_track(Track::new("video"));
    let clip = track.add_clip(Clip::new("c", FrameInterval::new(0, 100)));
    add_opacity_ramp(clip, *keys::CLIP_OPACITY, 80);

    // Before the cut, frame 50 resolves at local frame 50.
    refresh_timeline(&mut timeline, 50);
    let before = timeline.track(0).unwrap().clip(0).unwrap().opacity();
    assert!((before - 0.625).abs() < 1e-6);

    let tail_index = slice_clip(timeline.track_mut(0).unwrap(), 0, 40).unwrap();
    assert_eq!(tail_index, Some(1));

    // Media stays continuous across the cut: the last head frame and the
    // first tail frame show consecutive source frames.
    refresh_timeline(&mut timeline, 39);
    let snapshot = RenderSnapshot::capture(&timeline, 39);
    assert_eq!(snapshot.tracks[0].clips[0].media_frame, 39);
    refresh_timeline(&mut timeline, 40);
    let snapshot = RenderSnapshot::capture(&timeline, 40);
    assert_eq!(snapshot.tracks[0].clips[0].name, "c");
    assert_eq!(snapshot.tracks[0].clips[0].media_frame, 40);

    // The tail's keyframes were not re-based to its new begin, so frame 50
    // now resolves at local frame 10 instead of 50. Documented behavior of
    // the deep-clone split, pinned here on purpose.
    refresh_timeline(&mut timeline, 50);
    let after = timeline.track(0).unwrap().clip(1).unwrap().opacity();
    assert!((after - 0.125).abs() < 1e-6);
}

#[test]
fn range_removal_previews_then_commits() {
    let mut timeline = Timeline::new("main", FrameRate::FPS_30);
    let track = timeline.add_track(Track::new("video"));
    track.add_clip(Clip::new("a", FrameInterval::new(0, 30)));
    track.add_clip(Clip::new("b", FrameInterval::new(40, 30)));
    track.add_clip(Clip::new("c", FrameInterval::new(80, 40)));

    let span = FrameInterval::from_index(20, 90);
    let plan = range_removal(timeline.track(0).unwrap(), span);
    assert_eq!(plan.cuts.len(), 3);
    assert_eq!(plan.cuts[1].action, CutAction::RemoveEntirely);
    // Preview leaves the track alone.
    assert_eq!(timeline.track(0).unwrap().clips().len(), 3);

    let summary = apply_range_removal(timeline.track_mut(0).unwrap(), plan);
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.trimmed, 2);

    refresh_timeline(&mut timeline, 95);
    let snapshot = RenderSnapshot::capture(&timeline, 95);
    let clips = &snapshot.tracks[0].clips;
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].name, "c");
    assert_eq!(clips[0].interval, FrameInterval::from_index(90, 120));
    // "c" lost its first 10 frames, so the media advanced by 10.
    assert_eq!(clips[0].media_frame, 15);
}

#[test]
fn detached_clip_moves_between_tracks() {
    let mut timeline = Timeline::new("main", FrameRate::FPS_30);
    let source = timeline.add_track(Track::new("source"));
    let clip = source.add_clip(Clip::new("mover", FrameInterval::new(0, 60)));
    add_opacity_ramp(clip, *keys::CLIP_OPACITY, 30);
    timeline.add_track(Track::new("target"));

    // Detach: the clip owns its automation while off any track.
    let detached = timeline.track_mut(0).unwrap().remove_clip(0).unwrap();
    assert!(detached.automation().sequence(*keys::CLIP_OPACITY).unwrap().is_in_use());
    timeline.track_mut(1).unwrap().add_clip(detached);

    refresh_timeline(&mut timeline, 15);
    assert!(timeline.track(0).unwrap().clips().is_empty());
    let moved = timeline.track(1).unwrap().clip(0).unwrap();
    assert!((moved.opacity() - 0.5).abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn serde_roundtrip_preserves_automation() {
    // Hosts must register parameters before deserializing; serialized keys
    // resolve through the registry.
    register_builtin_keys();

    let timeline = make_editor_timeline();
    let json = serde_json::to_string(&timeline).unwrap();
    let mut back: Timeline = serde_json::from_str(&json).unwrap();

    assert_eq!(back.name(), timeline.name());
    let orig_clip = timeline.track(0).unwrap().clip(0).unwrap();
    let back_clip = back.track(0).unwrap().clip(0).unwrap();
    assert_eq!(back_clip.interval(), orig_clip.interval());
    assert_eq!(
        back_clip.automation().sequence(*keys::CLIP_OPACITY),
        orig_clip.automation().sequence(*keys::CLIP_OPACITY)
    );

    // The reloaded timeline refreshes to the same values.
    refresh_timeline(&mut back, 30);
    let snapshot = RenderSnapshot::capture(&back, 30);
    assert!((snapshot.tracks[0].clips[0].opacity - 0.5).abs() < 1e-6);
}
