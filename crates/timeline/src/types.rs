//! Timeline model: [`Timeline`], [`Track`], [`Clip`], [`Effect`].
//!
//! Every entity owns an [`AutomationData`] declaring its built-in parameters
//! plus plain backing fields holding the last resolved values. The refresh
//! engine reads sequences and writes backing fields through the closed
//! [`Automatable`] capability; render consumers read the backing fields (via
//! [`RenderSnapshot`](crate::snapshot::RenderSnapshot)) and never touch
//! sequences.
//!
//! Fields are private; all structural mutation (add/insert/remove, interval
//! and offset changes) goes through logged methods so edits leave a trace.

use fl_automation::{AutomationData, OwnerKind, ParameterKey};
use fl_common::{AutomationValue, FrameInterval, FrameRate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::keys;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Timeline {}
    impl Sealed for super::Track {}
    impl Sealed for super::Clip {}
    impl Sealed for super::Effect {}
}

/// Capability the refresh engine drives automatable entities through.
///
/// Closed over the four owner types ([`Timeline`], [`Track`], [`Clip`],
/// [`Effect`]); the engine never names a concrete type.
pub trait Automatable: sealed::Sealed {
    /// Owner kind the entity's parameters are declared for.
    fn owner_kind(&self) -> OwnerKind;

    /// The entity's automation data.
    fn automation(&self) -> &AutomationData;

    /// Mutable automation data, for keyframe and override edits.
    fn automation_mut(&mut self) -> &mut AutomationData;

    /// Write a resolved value into the entity's backing field.
    ///
    /// Returns whether the stored value actually changed; the engine keys
    /// change suppression off this. A key the entity does not back, or a
    /// value of the wrong kind, changes nothing and returns `false`.
    fn apply_resolved(&mut self, key: ParameterKey, value: &AutomationValue) -> bool;
}

/// How a clip composites over what is below it.
///
/// Mirrors the option list of the `clip::blend_mode` enum parameter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    /// Straight alpha over.
    #[default]
    Normal,
    /// Additive.
    Add,
    /// Multiplicative.
    Multiply,
    /// Inverse-multiplicative.
    Screen,
}

impl BlendMode {
    /// Blend mode for an enum parameter index; out-of-table indices fall
    /// back to `Normal`.
    pub fn from_index(index: u32) -> BlendMode {
        match index {
            1 => BlendMode::Add,
            2 => BlendMode::Multiply,
            3 => BlendMode::Screen,
            _ => BlendMode::Normal,
        }
    }

    /// Index of this mode in the enum parameter's option list.
    pub fn index(self) -> u32 {
        match self {
            BlendMode::Normal => 0,
            BlendMode::Add => 1,
            BlendMode::Multiply => 2,
            BlendMode::Screen => 3,
        }
    }
}

impl std::fmt::Display for BlendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(keys::BLEND_MODE_OPTIONS[self.index() as usize])
    }
}

/// A motion/transform effect attached to a clip.
///
/// Backs the three `motion` parameters: position, scale, rotation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Effect {
    name: String,
    enabled: bool,
    automation: AutomationData,
    position: [f32; 2],
    scale: [f32; 2],
    rotation: f32,
}

impl Effect {
    /// Create an enabled effect with identity transform values.
    pub fn new(name: impl Into<String>) -> Self {
        let mut automation = AutomationData::new(OwnerKind::Effect);
        automation.assign(*keys::MOTION_POSITION);
        automation.assign(*keys::MOTION_SCALE);
        automation.assign(*keys::MOTION_ROTATION);
        Self {
            name: name.into(),
            enabled: true,
            automation,
            position: [0.0, 0.0],
            scale: [1.0, 1.0],
            rotation: 0.0,
        }
    }

    /// Effect name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the effect participates in rendering.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the effect.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            debug!(effect = %self.name, enabled, "Toggled effect");
        }
    }

    /// Last resolved position in pixels.
    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    /// Last resolved per-axis scale factor.
    pub fn scale(&self) -> [f32; 2] {
        self.scale
    }

    /// Last resolved rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

impl Automatable for Effect {
    fn owner_kind(&self) -> OwnerKind {
        OwnerKind::Effect
    }

    fn automation(&self) -> &AutomationData {
        &self.automation
    }

    fn automation_mut(&mut self) -> &mut AutomationData {
        &mut self.automation
    }

    fn apply_resolved(&mut self, key: ParameterKey, value: &AutomationValue) -> bool {
        if key == *keys::MOTION_POSITION {
            match value.as_vec2() {
                Some(v) if self.position != v => {
                    self.position = v;
                    true
                }
                _ => false,
            }
        } else if key == *keys::MOTION_SCALE {
            match value.as_vec2() {
                Some(v) if self.scale != v => {
                    self.scale = v;
                    true
                }
                _ => false,
            }
        } else if key == *keys::MOTION_ROTATION {
            match value.as_float() {
                Some(v) if self.rotation != v => {
                    self.rotation = v;
                    true
                }
                _ => false,
            }
        } else {
            false
        }
    }
}

/// A media clip placed on a track.
///
/// `interval` is the clip's half-open span in timeline frames;
/// `media_offset` is how many frames into the source media the clip's first
/// timeline frame shows. Slicing and range removal maintain the offset so the
/// kept part of a trimmed clip keeps showing the same media.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Clip {
    name: String,
    interval: FrameInterval,
    media_offset: i64,
    automation: AutomationData,
    opacity: f32,
    blend_mode: BlendMode,
    effects: Vec<Effect>,
}

impl Clip {
    /// Create a clip spanning `interval`, showing media from offset 0.
    pub fn new(name: impl Into<String>, interval: FrameInterval) -> Self {
        let mut automation = AutomationData::new(OwnerKind::Clip);
        automation.assign(*keys::CLIP_OPACITY);
        automation.assign(*keys::CLIP_BLEND_MODE);
        Self {
            name: name.into(),
            interval,
            media_offset: 0,
            automation,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            effects: Vec::new(),
        }
    }

    /// Clip name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Half-open timeline span the clip occupies.
    pub fn interval(&self) -> FrameInterval {
        self.interval
    }

    /// Move/resize the clip on the timeline.
    pub fn set_interval(&mut self, interval: FrameInterval) {
        self.interval = interval;
        debug!(clip = %self.name, %interval, "Set clip interval");
    }

    /// Frames into the source media at the clip's first timeline frame.
    pub fn media_offset(&self) -> i64 {
        self.media_offset
    }

    /// Set the media offset (kept in step with the interval by slicing).
    pub fn set_media_offset(&mut self, media_offset: i64) {
        self.media_offset = media_offset;
        debug!(clip = %self.name, media_offset, "Set clip media offset");
    }

    /// Source media frame shown at timeline frame `frame`.
    pub fn media_frame_at(&self, frame: i64) -> i64 {
        self.media_offset + (frame - self.interval.begin())
    }

    /// Last resolved opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Last resolved blend mode.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Effects in application order.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Mutable access to the effects.
    pub fn effects_mut(&mut self) -> &mut [Effect] {
        &mut self.effects
    }

    /// Append an effect and return a reference to it.
    pub fn add_effect(&mut self, effect: Effect) -> &mut Effect {
        debug!(clip = %self.name, effect = %effect.name(), "Added effect");
        self.effects.push(effect);
        self.effects.last_mut().expect("just pushed")
    }

    /// Remove the effect at `index`. Returns the removed effect, or `None`
    /// if out of range.
    pub fn remove_effect(&mut self, index: usize) -> Option<Effect> {
        if index < self.effects.len() {
            let effect = self.effects.remove(index);
            debug!(clip = %self.name, effect = %effect.name(), "Removed effect");
            Some(effect)
        } else {
            None
        }
    }
}

impl Automatable for Clip {
    fn owner_kind(&self) -> OwnerKind {
        OwnerKind::Clip
    }

    fn automation(&self) -> &AutomationData {
        &self.automation
    }

    fn automation_mut(&mut self) -> &mut AutomationData {
        &mut self.automation
    }

    fn apply_resolved(&mut self, key: ParameterKey, value: &AutomationValue) -> bool {
        if key == *keys::CLIP_OPACITY {
            match value.as_float() {
                Some(v) if self.opacity != v => {
                    self.opacity = v;
                    true
                }
                _ => false,
            }
        } else if key == *keys::CLIP_BLEND_MODE {
            match value.as_enum_index().map(BlendMode::from_index) {
                Some(mode) if self.blend_mode != mode => {
                    self.blend_mode = mode;
                    true
                }
                _ => false,
            }
        } else {
            false
        }
    }
}

/// An ordered lane of non-managed clips.
///
/// Tracks do not police clip overlap; editing operations address clips by
/// index and the range-removal planner handles whatever layout it finds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Track {
    name: String,
    clips: Vec<Clip>,
    automation: AutomationData,
    opacity: f32,
    visible: bool,
}

impl Track {
    /// Create an empty, visible track.
    pub fn new(name: impl Into<String>) -> Self {
        let mut automation = AutomationData::new(OwnerKind::Track);
        automation.assign(*keys::TRACK_OPACITY);
        automation.assign(*keys::TRACK_VISIBLE);
        Self {
            name: name.into(),
            clips: Vec::new(),
            automation,
            opacity: 1.0,
            visible: true,
        }
    }

    /// Track name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last resolved opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Last resolved visibility.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Clips in index order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Mutable access to the clips.
    pub fn clips_mut(&mut self) -> &mut [Clip] {
        &mut self.clips
    }

    /// The clip at `index`, or `None` if out of range.
    pub fn clip(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    /// Mutable clip at `index`, or `None` if out of range.
    pub fn clip_mut(&mut self, index: usize) -> Option<&mut Clip> {
        self.clips.get_mut(index)
    }

    /// First clip whose interval contains `frame`.
    pub fn clip_at_frame(&self, frame: i64) -> Option<&Clip> {
        self.clips.iter().find(|c| c.interval.contains_frame(frame))
    }

    /// Append a clip and return a reference to it.
    pub fn add_clip(&mut self, clip: Clip) -> &mut Clip {
        debug!(track = %self.name, clip = %clip.name(), "Added clip");
        self.clips.push(clip);
        self.clips.last_mut().expect("just pushed")
    }

    /// Insert a clip at `index`, shifting later clips right.
    ///
    /// Panics if `index > self.clips().len()`.
    pub fn insert_clip(&mut self, index: usize, clip: Clip) {
        debug!(track = %self.name, clip = %clip.name(), index, "Inserted clip");
        self.clips.insert(index, clip);
    }

    /// Remove the clip at `index`, detaching it from the track.
    ///
    /// Returns the removed clip (the caller owns it and may re-insert it
    /// elsewhere), or `None` if out of range.
    pub fn remove_clip(&mut self, index: usize) -> Option<Clip> {
        if index < self.clips.len() {
            let clip = self.clips.remove(index);
            debug!(track = %self.name, clip = %clip.name(), index, "Removed clip");
            Some(clip)
        } else {
            None
        }
    }
}

impl Automatable for Track {
    fn owner_kind(&self) -> OwnerKind {
        OwnerKind::Track
    }

    fn automation(&self) -> &AutomationData {
        &self.automation
    }

    fn automation_mut(&mut self) -> &mut AutomationData {
        &mut self.automation
    }

    fn apply_resolved(&mut self, key: ParameterKey, value: &AutomationValue) -> bool {
        if key == *keys::TRACK_OPACITY {
            match value.as_float() {
                Some(v) if self.opacity != v => {
                    self.opacity = v;
                    true
                }
                _ => false,
            }
        } else if key == *keys::TRACK_VISIBLE {
            match value.as_bool() {
                Some(v) if self.visible != v => {
                    self.visible = v;
                    true
                }
                _ => false,
            }
        } else {
            false
        }
    }
}

/// The whole frame-indexed composition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Timeline {
    name: String,
    rate: FrameRate,
    tracks: Vec<Track>,
    automation: AutomationData,
    opacity: f32,
}

impl Timeline {
    /// Create an empty timeline at the given frame rate.
    pub fn new(name: impl Into<String>, rate: FrameRate) -> Self {
        let mut automation = AutomationData::new(OwnerKind::Timeline);
        automation.assign(*keys::TIMELINE_OPACITY);
        Self {
            name: name.into(),
            rate,
            tracks: Vec::new(),
            automation,
            opacity: 1.0,
        }
    }

    /// Timeline name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Frame rate, for presentation-time conversion only.
    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// Last resolved master opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Tracks in bottom-to-top order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Mutable access to the tracks.
    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    /// The track at `index`, or `None` if out of range.
    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Mutable track at `index`, or `None` if out of range.
    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// Append a track and return a reference to it.
    pub fn add_track(&mut self, track: Track) -> &mut Track {
        debug!(timeline = %self.name, track = %track.name(), "Added track");
        self.tracks.push(track);
        self.tracks.last_mut().expect("just pushed")
    }

    /// Remove the track at `index`. Returns the removed track, or `None` if
    /// out of range.
    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            let track = self.tracks.remove(index);
            debug!(timeline = %self.name, track = %track.name(), "Removed track");
            Some(track)
        } else {
            None
        }
    }

    /// Find a track by name.
    pub fn find_track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Find a track by name (mutable).
    pub fn find_track_mut(&mut self, name: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.name == name)
    }

    /// One past the last frame any clip occupies, across all tracks.
    ///
    /// Zero for an empty timeline. Useful as the playback/export extent.
    pub fn largest_frame_in_use(&self) -> i64 {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .map(|c| c.interval.end())
            .max()
            .unwrap_or(0)
    }
}

impl Automatable for Timeline {
    fn owner_kind(&self) -> OwnerKind {
        OwnerKind::Timeline
    }

    fn automation(&self) -> &AutomationData {
        &self.automation
    }

    fn automation_mut(&mut self) -> &mut AutomationData {
        &mut self.automation
    }

    fn apply_resolved(&mut self, key: ParameterKey, value: &AutomationValue) -> bool {
        if key == *keys::TIMELINE_OPACITY {
            match value.as_float() {
                Some(v) if self.opacity != v => {
                    self.opacity = v;
                    true
                }
                _ => false,
            }
        } else {
            false
        }
    }
}
