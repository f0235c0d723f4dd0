//! Per-type binary formatter resolution
//!
//! A [`FormatterRegistry`] maps a value type to the codec that serializes it,
//! trying an ordered candidate chain and memoizing the winner per `TypeId`.
//! Resolution happens on every cache read and write, so the registry keeps
//! lookups at a single map probe after the first use of a type.

use crate::error::{CacheError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::marker::PhantomData;
use tracing::debug;

/// A candidate serialization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatterKind {
    /// Compact native encoding for `chrono::DateTime<Utc>` values
    TemporalNative,
    /// Contractless MessagePack with named fields, accepts any serde type
    Contractless,
}

/// Fixed priority order: the date/time codec is asked first so timestamps
/// get the compact native shape instead of the generic structural one.
const DEFAULT_CHAIN: &[FormatterKind] = &[FormatterKind::TemporalNative, FormatterKind::Contractless];

impl FormatterKind {
    fn supports<T: Any>(self) -> bool {
        match self {
            FormatterKind::TemporalNative => TypeId::of::<T>() == TypeId::of::<DateTime<Utc>>(),
            FormatterKind::Contractless => true,
        }
    }
}

/// Type-to-formatter registry
///
/// An explicit object rather than process-global state: construct one at
/// startup and hand it to every cache layer that should share bindings.
/// Bindings are append-only and live for the registry's lifetime — the map is
/// bounded by the number of distinct cached types.
pub struct FormatterRegistry {
    candidates: Vec<FormatterKind>,
    bindings: RwLock<HashMap<TypeId, Option<FormatterKind>>>,
}

impl FormatterRegistry {
    /// Create a registry with the default candidate chain
    pub fn new() -> Self {
        Self::with_candidates(DEFAULT_CHAIN.to_vec())
    }

    /// Create a registry with a custom candidate chain, tried in order
    pub fn with_candidates(candidates: Vec<FormatterKind>) -> Self {
        Self {
            candidates,
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the formatter bound to `T`
    ///
    /// First resolution walks the candidate chain and memoizes the outcome,
    /// including "no candidate supports `T`" — an unsupported binding fails
    /// at encode/decode time, not here. Concurrent first resolutions of the
    /// same type may race; the chain is a pure function of `T`, so every
    /// racer arrives at the same binding.
    pub fn resolve<T: Any>(&self) -> Formatter<T> {
        let type_id = TypeId::of::<T>();

        if let Some(binding) = self.bindings.read().get(&type_id) {
            return Formatter::bound(*binding);
        }

        let binding = *self.bindings.write().entry(type_id).or_insert_with(|| {
            let chosen = self
                .candidates
                .iter()
                .copied()
                .find(|candidate| candidate.supports::<T>());
            debug!("bound formatter for {}: {:?}", type_name::<T>(), chosen);
            chosen
        });

        Formatter::bound(binding)
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A formatter bound to a single value type
///
/// Cheap to copy; carries only the selected codec. Obtained from
/// [`FormatterRegistry::resolve`].
pub struct Formatter<T> {
    codec: Option<FormatterKind>,
    _type: PhantomData<fn() -> T>,
}

impl<T> Clone for Formatter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Formatter<T> {}

fn unsupported<T>() -> CacheError {
    CacheError::SerializationUnsupported {
        type_name: type_name::<T>(),
    }
}

impl<T: Any> Formatter<T> {
    fn bound(codec: Option<FormatterKind>) -> Self {
        Self {
            codec,
            _type: PhantomData,
        }
    }

    /// The codec this formatter was bound to, `None` if nothing supports `T`
    pub fn kind(&self) -> Option<FormatterKind> {
        self.codec
    }
}

impl<T: Serialize + Any> Formatter<T> {
    /// Encode a value to its binary payload
    pub fn encode(&self, value: &T) -> Result<Vec<u8>> {
        match self.codec {
            Some(FormatterKind::TemporalNative) => {
                let any: &dyn Any = value;
                let instant = any
                    .downcast_ref::<DateTime<Utc>>()
                    .ok_or_else(unsupported::<T>)?;
                Ok(rmp_serde::to_vec(&(
                    instant.timestamp(),
                    instant.timestamp_subsec_nanos(),
                ))?)
            }
            Some(FormatterKind::Contractless) => Ok(rmp_serde::to_vec_named(value)?),
            None => Err(unsupported::<T>()),
        }
    }
}

impl<T: DeserializeOwned + Any> Formatter<T> {
    /// Decode a binary payload produced by [`encode`](Formatter::encode)
    ///
    /// The payload carries no runtime type tag; decoding with a type other
    /// than the one used on write fails with `DeserializationFailed` at best
    /// and is undefined where the shapes happen to coincide.
    pub fn decode(&self, bytes: &[u8]) -> Result<T> {
        match self.codec {
            Some(FormatterKind::TemporalNative) => {
                let (secs, nanos): (i64, u32) = rmp_serde::from_slice(bytes)
                    .map_err(|e| CacheError::DeserializationFailed(e.to_string()))?;
                let instant = DateTime::<Utc>::from_timestamp(secs, nanos).ok_or_else(|| {
                    CacheError::DeserializationFailed("timestamp out of range".to_string())
                })?;
                let boxed: Box<dyn Any> = Box::new(instant);
                boxed.downcast::<T>().map(|v| *v).map_err(|_| unsupported::<T>())
            }
            Some(FormatterKind::Contractless) => rmp_serde::from_slice(bytes)
                .map_err(|e| CacheError::DeserializationFailed(e.to_string())),
            None => Err(unsupported::<T>()),
        }
    }
}
