//! Tagged in-memory cache for store list results.
//!
//! Reads go through [`QueryCache::get_or_load`]; mutation paths call
//! [`QueryCache::invalidate`] after a confirmed write. Each tag carries a
//! generation counter so a load that started before an invalidation cannot
//! repopulate the slot with data older than the write.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Translations,
    HomepageEnabled,
    HomepageAll,
    Packages,
}

impl CacheTag {
    pub const ALL: [CacheTag; 4] = [
        CacheTag::Translations,
        CacheTag::HomepageEnabled,
        CacheTag::HomepageAll,
        CacheTag::Packages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheTag::Translations => "translations",
            CacheTag::HomepageEnabled => "homepage:enabled",
            CacheTag::HomepageAll => "homepage:all",
            CacheTag::Packages => "packages",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Default)]
struct Slot {
    generation: u64,
    value: Option<Arc<dyn Any + Send + Sync>>,
}

#[derive(Default)]
pub struct QueryCache {
    slots: RwLock<HashMap<CacheTag, Slot>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `tag`, or run `loader` and cache its result.
    ///
    /// Loader errors are returned as-is and leave the slot empty. A value of
    /// a different type cached under the same tag is treated as a miss.
    pub async fn get_or_load<T, E, F, Fut>(&self, tag: CacheTag, loader: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let generation = {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            match slots.get(&tag) {
                Some(slot) => {
                    if let Some(hit) = slot.value.clone().and_then(|v| v.downcast::<T>().ok()) {
                        debug!("Cache hit for {}", tag);
                        return Ok(hit);
                    }
                    slot.generation
                }
                None => 0,
            }
        };

        debug!("Cache miss for {}, loading", tag);
        let value = Arc::new(loader().await?);

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(tag).or_default();
        if slot.generation == generation {
            slot.value = Some(value.clone() as Arc<dyn Any + Send + Sync>);
        } else {
            debug!("Discarding stale load for {} (invalidated mid-flight)", tag);
        }

        Ok(value)
    }

    /// Drop the cached value for `tag`; the next read reloads.
    pub fn invalidate(&self, tag: CacheTag) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(tag).or_default();
        slot.generation += 1;
        slot.value = None;
        debug!("Invalidated cache tag {}", tag);
    }

    pub fn invalidate_all(&self) {
        for tag in CacheTag::ALL {
            self.invalidate(tag);
        }
    }

    pub fn is_cached(&self, tag: CacheTag) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tag)
            .is_some_and(|slot| slot.value.is_some())
    }
}
