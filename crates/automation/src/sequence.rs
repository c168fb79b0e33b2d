//! Ordered keyframe sequences with an override slot.
//!
//! An `AutomationSequence` holds every keyframe for one parameter on one
//! owner, sorted by frame with at most one keyframe per frame, plus a single
//! frame-independent override value. Resolution walks override → keyframes →
//! declared default, and only sequences that are "in use" (any keyframes, or
//! override enabled) are visited by the refresh engine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use fl_common::AutomationValue;

use crate::error::AutomationError;
use crate::key::ParameterKey;
use crate::keyframe::{interpolate, Keyframe};

/// The keyframe set (+ override) for one parameter on one owner.
///
/// Keyframes are kept in ascending frame order and unique by frame; inserting
/// at an occupied frame overwrites the value in place. The override slot is
/// always present but only consulted while `override_enabled` is set, and
/// toggling it never touches the keyframe list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSequence")]
pub struct AutomationSequence {
    key: ParameterKey,
    keyframes: Vec<Keyframe>,
    override_keyframe: Keyframe,
    override_enabled: bool,
}

/// Unvalidated mirror of [`AutomationSequence`] used to re-establish the
/// sorted-unique keyframe invariant when deserializing.
#[derive(Deserialize)]
struct RawSequence {
    key: ParameterKey,
    keyframes: Vec<Keyframe>,
    override_keyframe: Keyframe,
    override_enabled: bool,
}

impl From<RawSequence> for AutomationSequence {
    fn from(raw: RawSequence) -> Self {
        let mut sorted = raw.keyframes;
        sorted.sort_by_key(|k| k.frame);
        // Stable sort keeps input order within a frame, so the last
        // occurrence wins, matching insert-overwrite semantics.
        let mut keyframes: Vec<Keyframe> = Vec::with_capacity(sorted.len());
        for kf in sorted {
            match keyframes.last_mut() {
                Some(last) if last.frame == kf.frame => *last = kf,
                _ => keyframes.push(kf),
            }
        }
        Self {
            key: raw.key,
            keyframes,
            override_keyframe: raw.override_keyframe,
            override_enabled: raw.override_enabled,
        }
    }
}

impl AutomationSequence {
    /// Create an empty sequence for `key`.
    ///
    /// The override slot starts at the key's declared default, disabled.
    pub fn new(key: ParameterKey) -> Self {
        Self {
            key,
            keyframes: Vec::new(),
            override_keyframe: Keyframe::new(0, key.default_value()),
            override_enabled: false,
        }
    }

    /// The parameter this sequence animates.
    pub fn key(&self) -> ParameterKey {
        self.key
    }

    /// All keyframes in ascending frame order.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// The keyframe at exactly `frame`, if one exists.
    pub fn keyframe_at(&self, frame: i64) -> Option<&Keyframe> {
        self.keyframes
            .binary_search_by_key(&frame, |k| k.frame)
            .ok()
            .map(|i| &self.keyframes[i])
    }

    /// Whether the sequence has any keyframes.
    pub fn has_keyframes(&self) -> bool {
        !self.keyframes.is_empty()
    }

    /// Number of keyframes.
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Current override value (consulted only while the override is enabled).
    pub fn override_value(&self) -> AutomationValue {
        self.override_keyframe.value
    }

    /// Whether resolution currently ignores the keyframe list.
    pub fn is_override_enabled(&self) -> bool {
        self.override_enabled
    }

    /// Whether the refresh engine should visit this sequence.
    ///
    /// A sequence is in use when it has at least one keyframe or its override
    /// is enabled; everything else resolves to the static default and is
    /// skipped, which keeps per-frame refresh proportional to the sequences
    /// actually animated.
    pub fn is_in_use(&self) -> bool {
        self.has_keyframes() || self.override_enabled
    }

    /// Resolve the parameter's value at `frame`.
    ///
    /// Override first (clamped to the declared range), then the keyframe
    /// list: frames before the first keyframe hold its value, frames at or
    /// after the last hold that value, an exact frame hit returns the stored
    /// value with no interpolation drift, and anything between a bracketing
    /// pair interpolates per the parameter's type. An empty, non-overridden
    /// sequence resolves to the key's declared default.
    pub fn resolve(&self, frame: i64) -> AutomationValue {
        let param_type = self.key.param_type();
        if self.override_enabled {
            return param_type.clamp(self.override_keyframe.value);
        }
        let Some((a, b)) = self.bracketing(frame) else {
            return self.key.default_value();
        };
        match b {
            None => self.keyframes[a].value,
            Some(b) => interpolate(frame, &self.keyframes[a], &self.keyframes[b], &param_type),
        }
    }

    /// Find the keyframe indices bracketing `frame`.
    ///
    /// `(i, None)` means use index `i`'s value directly (exact hit, or hold
    /// before-first / at-or-after-last); `(a, Some(b))` means interpolate
    /// between them. `None` only when the list is empty.
    fn bracketing(&self, frame: i64) -> Option<(usize, Option<usize>)> {
        if self.keyframes.is_empty() {
            return None;
        }
        match self.keyframes.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => Some((i, None)),
            Err(0) => Some((0, None)),
            Err(i) if i == self.keyframes.len() => Some((i - 1, None)),
            Err(i) => Some((i - 1, Some(i))),
        }
    }

    /// Insert or overwrite the keyframe at `frame`, returning its index.
    ///
    /// The value must match the key's declared type and is clamped into its
    /// range. Inserting at an occupied frame overwrites the stored value in
    /// place, keeping that keyframe's curve bend.
    pub fn set_keyframe(
        &mut self,
        frame: i64,
        value: AutomationValue,
    ) -> Result<usize, AutomationError> {
        let value = self.check_value(value)?;
        match self.keyframes.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => {
                self.keyframes[i].value = value;
                debug!(key = %self.key, frame, "Updated keyframe value");
                Ok(i)
            }
            Err(i) => {
                self.keyframes.insert(i, Keyframe::new(frame, value));
                debug!(key = %self.key, frame, "Inserted keyframe");
                Ok(i)
            }
        }
    }

    /// Set the curve bend of the keyframe at exactly `frame`.
    ///
    /// Returns whether a keyframe existed there; absent is a no-op.
    pub fn set_curve_bend(&mut self, frame: i64, curve_bend: f32) -> bool {
        match self.keyframes.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => {
                self.keyframes[i].curve_bend = curve_bend;
                debug!(key = %self.key, frame, curve_bend, "Set keyframe curve bend");
                true
            }
            Err(_) => false,
        }
    }

    /// Remove the keyframe at exactly `frame`, returning it.
    ///
    /// Absent is a no-op returning `None`.
    pub fn remove_keyframe(&mut self, frame: i64) -> Option<Keyframe> {
        match self.keyframes.binary_search_by_key(&frame, |k| k.frame) {
            Ok(i) => {
                let removed = self.keyframes.remove(i);
                debug!(key = %self.key, frame, "Removed keyframe");
                Some(removed)
            }
            Err(_) => None,
        }
    }

    /// Remove every keyframe, returning how many were removed.
    pub fn clear_keyframes(&mut self) -> usize {
        let count = self.keyframes.len();
        if count > 0 {
            self.keyframes.clear();
            debug!(key = %self.key, count, "Cleared keyframes");
        }
        count
    }

    /// Set the override slot's value.
    ///
    /// The value must match the key's declared type and is clamped into its
    /// range. The keyframe list is untouched.
    pub fn set_override_value(&mut self, value: AutomationValue) -> Result<(), AutomationError> {
        let value = self.check_value(value)?;
        self.override_keyframe.value = value;
        debug!(key = %self.key, "Set override value");
        Ok(())
    }

    /// Enable or disable the override, returning whether the flag changed.
    ///
    /// Existing keyframes are never deleted by toggling; they are simply
    /// ignored while the override is active.
    pub fn set_override_enabled(&mut self, enabled: bool) -> bool {
        if self.override_enabled == enabled {
            return false;
        }
        self.override_enabled = enabled;
        debug!(key = %self.key, enabled, "Toggled override");
        true
    }

    fn check_value(&self, value: AutomationValue) -> Result<AutomationValue, AutomationError> {
        let param_type = self.key.param_type();
        if !param_type.matches(&value) {
            return Err(AutomationError::TypeMismatch {
                key: self.key.full_id(),
                expected: param_type.name(),
                got: value.kind_name(),
            });
        }
        Ok(param_type.clamp(value))
    }
}
