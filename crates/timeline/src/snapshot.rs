//! Render hand-off snapshot.
//!
//! The render/playback consumer never reads the live model: after a refresh
//! pass the editing thread captures a [`RenderSnapshot`], a plain-data copy
//! of every resolved backing field, and hands that over. The snapshot owns
//! all of its data (`Send + 'static`), so the consumer can hold it across
//! frames while the model keeps changing.

use serde::{Deserialize, Serialize};
use tracing::trace;

use fl_common::FrameInterval;

use crate::types::{BlendMode, Clip, Effect, Timeline, Track};

/// Resolved state of one effect.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EffectSnapshot {
    /// Effect name.
    pub name: String,
    /// Whether the effect participates in rendering.
    pub enabled: bool,
    /// Resolved position in pixels.
    pub position: [f32; 2],
    /// Resolved per-axis scale factor.
    pub scale: [f32; 2],
    /// Resolved rotation in degrees.
    pub rotation: f32,
}

/// Resolved state of one clip under the playhead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClipSnapshot {
    /// Clip name.
    pub name: String,
    /// Timeline span the clip occupies.
    pub interval: FrameInterval,
    /// Source media frame to show at the captured playhead frame.
    pub media_frame: i64,
    /// Resolved opacity.
    pub opacity: f32,
    /// Resolved blend mode.
    pub blend_mode: BlendMode,
    /// Resolved effects in application order.
    pub effects: Vec<EffectSnapshot>,
}

/// Resolved state of one track.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackSnapshot {
    /// Track name.
    pub name: String,
    /// Resolved opacity.
    pub opacity: f32,
    /// Resolved visibility; invisible tracks are captured with the flag
    /// cleared so the consumer decides how to fade/skip them.
    pub visible: bool,
    /// Clips under the playhead, in track order.
    pub clips: Vec<ClipSnapshot>,
}

/// Everything the render consumer needs for one frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Playhead frame the snapshot was captured at.
    pub frame: i64,
    /// Resolved timeline master opacity.
    pub opacity: f32,
    /// Tracks in bottom-to-top order.
    pub tracks: Vec<TrackSnapshot>,
}

impl RenderSnapshot {
    /// Copy the resolved state of `timeline` at `frame`.
    ///
    /// Reads backing fields only; call it right after a refresh pass at the
    /// same frame, or the values will be stale. Clips whose interval does
    /// not contain `frame` are left out.
    pub fn capture(timeline: &Timeline, frame: i64) -> RenderSnapshot {
        let tracks = timeline
            .tracks()
            .iter()
            .map(|track| capture_track(track, frame))
            .collect();
        let snapshot = RenderSnapshot {
            frame,
            opacity: timeline.opacity(),
            tracks,
        };
        trace!(frame, tracks = snapshot.tracks.len(), "Captured render snapshot");
        snapshot
    }
}

fn capture_track(track: &Track, frame: i64) -> TrackSnapshot {
    TrackSnapshot {
        name: track.name().to_string(),
        opacity: track.opacity(),
        visible: track.is_visible(),
        clips: track
            .clips()
            .iter()
            .filter(|clip| clip.interval().contains_frame(frame))
            .map(|clip| capture_clip(clip, frame))
            .collect(),
    }
}

fn capture_clip(clip: &Clip, frame: i64) -> ClipSnapshot {
    ClipSnapshot {
        name: clip.name().to_string(),
        interval: clip.interval(),
        media_frame: clip.media_frame_at(frame),
        opacity: clip.opacity(),
        blend_mode: clip.blend_mode(),
        effects: clip.effects().iter().map(capture_effect).collect(),
    }
}

fn capture_effect(effect: &Effect) -> EffectSnapshot {
    EffectSnapshot {
        name: effect.name().to_string(),
        enabled: effect.is_enabled(),
        position: effect.position(),
        scale: effect.scale(),
        rotation: effect.rotation(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::refresh_timeline;
    use crate::keys;
    use crate::types::Automatable;
    use fl_common::{AutomationValue, FrameRate};

    fn make_timeline() -> Timeline {
        let mut timeline = Timeline::new("t", FrameRate::FPS_30);
        let track = timeline.add_track(Track::new("v1"));
        let clip = track.add_clip(Clip::new("near", FrameInterval::new(0, 60)));
        clip.set_media_offset(100);
        clip.automation_mut()
            .set_keyframe(*keys::CLIP_OPACITY, 0, AutomationValue::Float(0.0))
            .unwrap();
        clip.automation_mut()
            .set_keyframe(*keys::CLIP_OPACITY, 30, AutomationValue::Float(1.0))
            .unwrap();
        let effect = clip.add_effect(Effect::new("motion"));
        effect
            .automation_mut()
            .set_keyframe(*keys::MOTION_ROTATION, 0, AutomationValue::Float(0.0))
            .unwrap();
        effect
            .automation_mut()
            .set_keyframe(*keys::MOTION_ROTATION, 30, AutomationValue::Float(90.0))
            .unwrap();
        track.add_clip(Clip::new("far", FrameInterval::new(200, 50)));
        timeline
    }

    #[test]
    fn capture_copies_resolved_values() {
        let mut timeline = make_timeline();
        refresh_timeline(&mut timeline, 15);
        let snapshot = RenderSnapshot::capture(&timeline, 15);

        assert_eq!(snapshot.frame, 15);
        assert_eq!(snapshot.opacity, 1.0);
        let track = &snapshot.tracks[0];
        assert!(track.visible);

        let clip = &track.clips[0];
        assert_eq!(clip.name, "near");
        assert_eq!(clip.opacity, 0.5);
        assert_eq!(clip.media_frame, 115);
        assert_eq!(clip.effects[0].rotation, 45.0);
    }

    #[test]
    fn capture_skips_clips_off_the_playhead() {
        let mut timeline = make_timeline();
        refresh_timeline(&mut timeline, 15);
        let snapshot = RenderSnapshot::capture(&timeline, 15);

        let names: Vec<&str> = snapshot.tracks[0]
            .clips
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["near"]);
    }

    #[test]
    fn capture_keeps_invisible_tracks_with_flag_cleared() {
        let mut timeline = make_timeline();
        timeline
            .track_mut(0)
            .unwrap()
            .automation_mut()
            .set_override_value(*keys::TRACK_VISIBLE, AutomationValue::Bool(false))
            .unwrap();
        timeline
            .track_mut(0)
            .unwrap()
            .automation_mut()
            .set_override_enabled(*keys::TRACK_VISIBLE, true)
            .unwrap();
        refresh_timeline(&mut timeline, 15);

        let snapshot = RenderSnapshot::capture(&timeline, 15);
        assert_eq!(snapshot.tracks.len(), 1);
        assert!(!snapshot.tracks[0].visible);
    }

    #[test]
    fn snapshot_is_send_and_owned() {
        fn assert_send<T: Send + 'static>() {}
        assert_send::<RenderSnapshot>();
    }
}
