//! Per-owner automation data: the key → sequence map.
//!
//! Every automatable timeline entity (timeline, track, clip, effect) owns one
//! `AutomationData`. The owner declares its parameter keys once at
//! construction; each key gets exactly one sequence for the owner's lifetime.
//! All keyframe and override mutation flows through the wrapper methods here,
//! which enforce the no-mutation-during-refresh guard and maintain the dirty
//! flag and version counter that downstream consumers poll.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use fl_common::AutomationValue;

use crate::error::AutomationError;
use crate::key::{OwnerKind, ParameterKey};
use crate::keyframe::Keyframe;
use crate::sequence::AutomationSequence;

/// The automation sequences owned by one timeline entity.
///
/// Sequences are keyed by [`ParameterKey`] and iterate in registration order,
/// which keeps refresh and serialization deterministic. `Clone` deep-copies
/// every keyframe list with frame numbers preserved verbatim: a clip split
/// does not shift the clone's keyframes (documented behavior, pinned by
/// tests, not assumed correct).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AutomationData {
    owner_kind: OwnerKind,
    sequences: BTreeMap<ParameterKey, AutomationSequence>,
    dirty: bool,
    version: u64,
    /// Set while a refresh pass is resolving this owner's sequences; any
    /// mutation attempted in that window is rejected. Transient, never
    /// serialized.
    #[serde(skip)]
    refreshing: bool,
}

impl AutomationData {
    /// Create empty automation data for an owner of the given kind.
    pub fn new(owner_kind: OwnerKind) -> Self {
        Self {
            owner_kind,
            sequences: BTreeMap::new(),
            dirty: false,
            version: 0,
            refreshing: false,
        }
    }

    /// The owner kind every assigned key must be declared for.
    pub fn owner_kind(&self) -> OwnerKind {
        self.owner_kind
    }

    /// Declare a parameter on this owner, panicking on owner-kind mismatch.
    ///
    /// Called from owner constructors with keys known to match; a mismatch is
    /// a schema error, not a runtime condition.
    pub fn assign(&mut self, key: ParameterKey) {
        if let Err(err) = self.try_assign(key) {
            panic!("parameter assignment failed: {err}");
        }
    }

    /// Fallible counterpart of [`assign`](Self::assign).
    ///
    /// Creates the key's sequence on first assignment; assigning an
    /// already-assigned key is a no-op. The sequence lives as long as the
    /// owner and is never re-created.
    pub fn try_assign(&mut self, key: ParameterKey) -> Result<(), AutomationError> {
        let declared = key.owner_kind();
        if declared != self.owner_kind {
            return Err(AutomationError::OwnerMismatch {
                key: key.full_id(),
                declared,
                actual: self.owner_kind,
            });
        }
        self.sequences
            .entry(key)
            .or_insert_with(|| AutomationSequence::new(key));
        Ok(())
    }

    /// The sequence for `key`, if the owner declared it.
    pub fn sequence(&self, key: ParameterKey) -> Option<&AutomationSequence> {
        self.sequences.get(&key)
    }

    /// Whether the owner declared `key`.
    pub fn is_assigned(&self, key: ParameterKey) -> bool {
        self.sequences.contains_key(&key)
    }

    /// Number of declared parameters.
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// All sequences in key registration order.
    pub fn sequences(&self) -> impl Iterator<Item = &AutomationSequence> {
        self.sequences.values()
    }

    /// Only the sequences the refresh engine must visit, in key order.
    pub fn in_use_sequences(&self) -> impl Iterator<Item = &AutomationSequence> {
        self.sequences.values().filter(|s| s.is_in_use())
    }

    /// Whether any sequence is in use (the owner needs per-frame refresh).
    pub fn has_in_use_sequences(&self) -> bool {
        self.sequences.values().any(AutomationSequence::is_in_use)
    }

    // --- Mutation wrappers -------------------------------------------------
    //
    // Each wrapper checks the refresh guard, routes to the sequence, then on
    // an actual change marks the owner dirty and bumps the version.

    /// Insert or overwrite a keyframe, returning its index in the sequence.
    pub fn set_keyframe(
        &mut self,
        key: ParameterKey,
        frame: i64,
        value: AutomationValue,
    ) -> Result<usize, AutomationError> {
        self.ensure_mutable(key)?;
        let index = self.sequence_entry(key)?.set_keyframe(frame, value)?;
        self.mark_changed();
        Ok(index)
    }

    /// Set the curve bend of an existing keyframe.
    ///
    /// Returns whether a keyframe existed at `frame`; absent is a no-op.
    pub fn set_curve_bend(
        &mut self,
        key: ParameterKey,
        frame: i64,
        curve_bend: f32,
    ) -> Result<bool, AutomationError> {
        self.ensure_mutable(key)?;
        let changed = self.sequence_entry(key)?.set_curve_bend(frame, curve_bend);
        if changed {
            self.mark_changed();
        }
        Ok(changed)
    }

    /// Remove the keyframe at exactly `frame`; absent is a no-op (`Ok(None)`).
    pub fn remove_keyframe(
        &mut self,
        key: ParameterKey,
        frame: i64,
    ) -> Result<Option<Keyframe>, AutomationError> {
        self.ensure_mutable(key)?;
        let removed = self.sequence_entry(key)?.remove_keyframe(frame);
        if removed.is_some() {
            self.mark_changed();
        }
        Ok(removed)
    }

    /// Remove every keyframe of `key`, returning how many were removed.
    pub fn clear_keyframes(&mut self, key: ParameterKey) -> Result<usize, AutomationError> {
        self.ensure_mutable(key)?;
        let count = self.sequence_entry(key)?.clear_keyframes();
        if count > 0 {
            self.mark_changed();
        }
        Ok(count)
    }

    /// Set the override value of `key`'s sequence.
    pub fn set_override_value(
        &mut self,
        key: ParameterKey,
        value: AutomationValue,
    ) -> Result<(), AutomationError> {
        self.ensure_mutable(key)?;
        self.sequence_entry(key)?.set_override_value(value)?;
        self.mark_changed();
        Ok(())
    }

    /// Enable or disable the override of `key`'s sequence.
    ///
    /// Toggling never touches the keyframe list; setting the current state
    /// again is a no-op that leaves the dirty flag and version untouched.
    pub fn set_override_enabled(
        &mut self,
        key: ParameterKey,
        enabled: bool,
    ) -> Result<(), AutomationError> {
        self.ensure_mutable(key)?;
        if self.sequence_entry(key)?.set_override_enabled(enabled) {
            self.mark_changed();
        }
        Ok(())
    }

    // --- Refresh bookkeeping -----------------------------------------------

    /// Mark the start of a refresh pass over this owner.
    ///
    /// While set, every mutation wrapper rejects. Passes never nest on one
    /// owner.
    pub fn begin_refresh(&mut self) {
        debug_assert!(!self.refreshing, "refresh passes must not nest");
        self.refreshing = true;
    }

    /// Mark the end of a refresh pass. Must pair with [`begin_refresh`](Self::begin_refresh).
    pub fn end_refresh(&mut self) {
        debug_assert!(self.refreshing, "end_refresh without begin_refresh");
        self.refreshing = false;
    }

    /// Whether a refresh pass is currently resolving this owner.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Whether any mutation happened since the last refresh cleared the flag.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after a refresh has consumed the changes.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Monotonic mutation counter; bumps on every actual change.
    ///
    /// Consumers that cache derived state compare versions instead of
    /// subscribing to callbacks.
    pub fn version(&self) -> u64 {
        self.version
    }

    fn sequence_entry(
        &mut self,
        key: ParameterKey,
    ) -> Result<&mut AutomationSequence, AutomationError> {
        self.sequences
            .get_mut(&key)
            .ok_or_else(|| AutomationError::NotDeclared { key: key.full_id() })
    }

    fn ensure_mutable(&self, key: ParameterKey) -> Result<(), AutomationError> {
        if self.refreshing {
            debug_assert!(
                false,
                "attempted to mutate '{}' during an active refresh pass",
                key.full_id()
            );
            return Err(AutomationError::RefreshInProgress {
                key: key.full_id(),
            });
        }
        Ok(())
    }

    fn mark_changed(&mut self) {
        self.version += 1;
        if !self.dirty {
            self.dirty = true;
            debug!(owner = %self.owner_kind, version = self.version, "Automation data marked dirty");
        }
    }
}
