//=========================================================================
// Resource Cache
//=========================================================================
//
// Typed, keyed cache for loaded assets (meshes, textures, shaders...).
//
// Entries are keyed by value type and name, so a mesh and a texture can
// share a file stem. The engine owns one cache, lends it to each game
// instance for the duration of a run and clears it when the run ends, so
// nothing loaded by one scene leaks into the next.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::rc::Rc;

use log::debug;
use thiserror::Error;

//=== ResourceError =======================================================

/// Resource loading failures.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The loader returned an error.
    #[error("failed to load resource `{key}`")]
    Load {
        key: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

//=== ResourceCache =======================================================

/// Process-wide asset cache, cleared between runs.
#[derive(Default)]
pub struct ResourceCache {
    entries: HashMap<(TypeId, String), Rc<dyn Any>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached `T` under `key`, loading it on first use.
    ///
    /// A failed load caches nothing.
    pub fn load_with<T, F>(&mut self, key: &str, loader: F) -> Result<Rc<T>, ResourceError>
    where
        T: Any,
        F: FnOnce() -> anyhow::Result<T>,
    {
        if let Some(hit) = self.get::<T>(key) {
            return Ok(hit);
        }

        let value = loader().map_err(|err| ResourceError::Load {
            key: key.to_string(),
            source: err.into(),
        })?;
        debug!(target: "resources", "Loaded `{}`", key);

        let value = Rc::new(value);
        let erased: Rc<dyn Any> = value.clone();
        self.entries.insert((TypeId::of::<T>(), key.to_string()), erased);
        Ok(value)
    }

    /// Cached `T` under `key`, if loaded.
    pub fn get<T: Any>(&self, key: &str) -> Option<Rc<T>> {
        self.entries
            .get(&(TypeId::of::<T>(), key.to_string()))
            .and_then(|entry| Rc::clone(entry).downcast::<T>().ok())
    }

    /// Whether a `T` is cached under `key`.
    pub fn contains<T: Any>(&self, key: &str) -> bool {
        self.entries.contains_key(&(TypeId::of::<T>(), key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Handles still held elsewhere stay valid.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            debug!(target: "resources", "Clearing {} cached resources", self.entries.len());
        }
        self.entries.clear();
    }
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
