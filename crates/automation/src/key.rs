//! Global parameter-key registry.
//!
//! Every animatable parameter is declared exactly once, at process startup,
//! in a global registry keyed by `(owner type name, parameter name)`. A
//! [`ParameterKey`] is a cheap copyable handle into that registry: the only
//! ways to obtain one are to register or to look up, so resolving through a
//! key that was never registered cannot be expressed in safe code. The
//! registry is append-only and never shrinks; keys live for the whole
//! process.

use std::collections::HashMap;
use std::fmt;

use fl_common::{AutomationValue, ParameterType};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use crate::error::AutomationError;

/// Separator between the owner and parameter parts of a full id.
pub const FULL_ID_SEPARATOR: &str = "::";

/// The kind of timeline object a parameter is declared on.
///
/// A closed set: the refresh engine walks exactly these four owner levels,
/// in this order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    /// The timeline itself (master parameters).
    Timeline,
    /// A track within the timeline.
    Track,
    /// A clip on a track.
    Clip,
    /// An effect attached to a clip.
    Effect,
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeline => "timeline",
            Self::Track => "track",
            Self::Clip => "clip",
            Self::Effect => "effect",
        };
        f.write_str(name)
    }
}

/// Everything the registry records about one parameter.
#[derive(Clone, Debug)]
struct ParameterInfo {
    owner_kind: OwnerKind,
    owner: String,
    name: String,
    param_type: ParameterType,
    default: AutomationValue,
}

#[derive(Default)]
struct Registry {
    entries: Vec<ParameterInfo>,
    index_by_id: HashMap<String, u32>,
}

static REGISTRY: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(Registry::default()));

fn full_id_of(owner: &str, name: &str) -> String {
    format!("{owner}{FULL_ID_SEPARATOR}{name}")
}

/// A copyable handle to one registered automation parameter.
///
/// Keys order by registration index, which gives automation data a stable,
/// deterministic iteration order. Serialized as the `owner::name` full id
/// and resolved back through the registry on deserialization.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterKey(u32);

impl ParameterKey {
    /// Register a parameter, panicking if the `(owner, name)` pair is taken.
    ///
    /// Registration happens once at startup; a duplicate means two subsystems
    /// claimed the same parameter id, which is unrecoverable.
    pub fn register(
        owner_kind: OwnerKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        param_type: ParameterType,
        default: AutomationValue,
    ) -> ParameterKey {
        match Self::try_register(owner_kind, owner, name, param_type, default) {
            Ok(key) => key,
            Err(err) => panic!("parameter registration failed: {err}"),
        }
    }

    /// Fallible counterpart of [`register`](Self::register).
    ///
    /// The default value must match the declared type; it is clamped into the
    /// declared range before being stored.
    pub fn try_register(
        owner_kind: OwnerKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        param_type: ParameterType,
        default: AutomationValue,
    ) -> Result<ParameterKey, AutomationError> {
        let owner = owner.into();
        let name = name.into();
        let full_id = full_id_of(&owner, &name);

        if !param_type.matches(&default) {
            return Err(AutomationError::TypeMismatch {
                key: full_id,
                expected: param_type.name(),
                got: default.kind_name(),
            });
        }
        let default = param_type.clamp(default);

        let mut registry = REGISTRY.write();
        if registry.index_by_id.contains_key(&full_id) {
            return Err(AutomationError::AlreadyRegistered { full_id });
        }
        let index = registry.entries.len() as u32;
        registry.index_by_id.insert(full_id, index);
        registry.entries.push(ParameterInfo {
            owner_kind,
            owner: owner.clone(),
            name: name.clone(),
            param_type,
            default,
        });
        drop(registry);

        info!(owner = %owner, name = %name, kind = %owner_kind, "Registered automation parameter");
        Ok(ParameterKey(index))
    }

    /// Register a float parameter with an inclusive `[min, max]` range.
    pub fn register_float(
        owner_kind: OwnerKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        default: f32,
        min: f32,
        max: f32,
    ) -> ParameterKey {
        assert!(min <= max, "float parameter range is inverted");
        Self::register(
            owner_kind,
            owner,
            name,
            ParameterType::Float { min, max },
            AutomationValue::Float(default),
        )
    }

    /// Register an integer parameter with an inclusive `[min, max]` range.
    pub fn register_int(
        owner_kind: OwnerKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        default: i64,
        min: i64,
        max: i64,
    ) -> ParameterKey {
        assert!(min <= max, "int parameter range is inverted");
        Self::register(
            owner_kind,
            owner,
            name,
            ParameterType::Int { min, max },
            AutomationValue::Int(default),
        )
    }

    /// Register a boolean parameter.
    pub fn register_bool(
        owner_kind: OwnerKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        default: bool,
    ) -> ParameterKey {
        Self::register(
            owner_kind,
            owner,
            name,
            ParameterType::Bool,
            AutomationValue::Bool(default),
        )
    }

    /// Register a 2D vector parameter with inclusive per-component bounds.
    pub fn register_vec2(
        owner_kind: OwnerKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        default: [f32; 2],
        min: [f32; 2],
        max: [f32; 2],
    ) -> ParameterKey {
        assert!(
            min[0] <= max[0] && min[1] <= max[1],
            "vec2 parameter range is inverted"
        );
        Self::register(
            owner_kind,
            owner,
            name,
            ParameterType::Vec2 { min, max },
            AutomationValue::Vec2(default),
        )
    }

    /// Register an enum parameter over a fixed, non-empty option list.
    pub fn register_enum(
        owner_kind: OwnerKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        default: u32,
        options: &[&str],
    ) -> ParameterKey {
        assert!(!options.is_empty(), "enum parameter needs at least one option");
        let options = options.iter().map(|s| (*s).to_string()).collect();
        Self::register(
            owner_kind,
            owner,
            name,
            ParameterType::Enum { options },
            AutomationValue::Enum(default),
        )
    }

    /// Look up a registered key by owner type name and parameter name.
    pub fn lookup(owner: &str, name: &str) -> Option<ParameterKey> {
        Self::from_full_id(&full_id_of(owner, name))
    }

    /// Look up a registered key from its `owner::name` full id.
    pub fn from_full_id(full_id: &str) -> Option<ParameterKey> {
        REGISTRY
            .read()
            .index_by_id
            .get(full_id)
            .copied()
            .map(ParameterKey)
    }

    /// Number of parameters registered so far in this process.
    pub fn registered_count() -> usize {
        REGISTRY.read().entries.len()
    }

    fn with_info<R>(&self, f: impl FnOnce(&ParameterInfo) -> R) -> R {
        let registry = REGISTRY.read();
        match registry.entries.get(self.0 as usize) {
            Some(info) => f(info),
            // An index outside the registry can only come from a forged or
            // stale handle; fail fast instead of resolving garbage.
            None => panic!("automation parameter index {} is not registered", self.0),
        }
    }

    /// The owner kind this parameter is declared for.
    pub fn owner_kind(&self) -> OwnerKind {
        self.with_info(|info| info.owner_kind)
    }

    /// Owner type name (the first half of the full id).
    pub fn owner(&self) -> String {
        self.with_info(|info| info.owner.clone())
    }

    /// Parameter name (the second half of the full id).
    pub fn name(&self) -> String {
        self.with_info(|info| info.name.clone())
    }

    /// The `owner::name` identifier used in logs and serialized data.
    pub fn full_id(&self) -> String {
        self.with_info(|info| full_id_of(&info.owner, &info.name))
    }

    /// Declared value type with its range constraints.
    pub fn param_type(&self) -> ParameterType {
        self.with_info(|info| info.param_type.clone())
    }

    /// Declared default value, resolved when a sequence has no keyframes.
    pub fn default_value(&self) -> AutomationValue {
        self.with_info(|info| info.default)
    }
}

impl fmt::Debug for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = REGISTRY.read();
        match registry.entries.get(self.0 as usize) {
            Some(info) => write!(
                f,
                "ParameterKey({}{FULL_ID_SEPARATOR}{})",
                info.owner, info.name
            ),
            None => write!(f, "ParameterKey(#{})", self.0),
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = REGISTRY.read();
        match registry.entries.get(self.0 as usize) {
            Some(info) => write!(f, "{}{FULL_ID_SEPARATOR}{}", info.owner, info.name),
            None => write!(f, "#{}", self.0),
        }
    }
}

impl Serialize for ParameterKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.full_id())
    }
}

impl<'de> Deserialize<'de> for ParameterKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let full_id = String::deserialize(deserializer)?;
        ParameterKey::from_full_id(&full_id)
            .ok_or_else(|| D::Error::custom(format!("unknown automation parameter `{full_id}`")))
    }
}
