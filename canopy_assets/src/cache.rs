// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use core::time::Duration;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use canopy_scene::DecodedImage;
use futures::task::{Spawn, SpawnExt};
use hashbrown::HashMap;

use crate::{AssetError, Decode, Fetch};

/// Tuning for [`AssetCache`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetCacheConfig {
    /// How long a failed URL is left alone before a request retries it.
    pub retry_cooldown: Duration,
}

impl Default for AssetCacheConfig {
    fn default() -> Self {
        Self {
            retry_cooldown: Duration::from_secs(5),
        }
    }
}

impl AssetCacheConfig {
    /// Set [`AssetCacheConfig::retry_cooldown`].
    #[must_use]
    pub fn with_retry_cooldown(mut self, retry_cooldown: Duration) -> Self {
        self.retry_cooldown = retry_cooldown;
        self
    }
}

/// Where a URL stands in the cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    /// Never requested.
    Absent,
    /// A load is in flight.
    Loading,
    /// Decoded and available.
    Ready,
    /// The last load failed at `at`.
    Failed {
        /// When the failure was recorded.
        at: Instant,
    },
}

#[derive(Clone, Debug)]
enum Slot {
    Loading,
    Ready(Arc<DecodedImage>),
    Failed { at: Instant },
}

type Slots = Arc<Mutex<HashMap<String, Slot>>>;

fn lock(slots: &Mutex<HashMap<String, Slot>>) -> MutexGuard<'_, HashMap<String, Slot>> {
    // Slots are only ever replaced whole, so a poisoned map is still consistent.
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deduplicating, non-blocking image cache keyed by URL.
pub struct AssetCache {
    slots: Slots,
    fetcher: Arc<dyn Fetch>,
    decoder: Arc<dyn Decode>,
    spawner: Box<dyn Spawn>,
    config: AssetCacheConfig,
    fetches: AtomicUsize,
}

impl fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetCache")
            .field("entries", &self.len())
            .field("config", &self.config)
            .field("fetches", &self.fetch_count())
            .finish_non_exhaustive()
    }
}

impl AssetCache {
    /// Create an empty cache.
    ///
    /// Loads run as tasks on `spawner`. They only touch the cache's own
    /// slot map, so any executor works.
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        decoder: Arc<dyn Decode>,
        spawner: Box<dyn Spawn>,
        config: AssetCacheConfig,
    ) -> Self {
        Self {
            slots: Slots::default(),
            fetcher,
            decoder,
            spawner,
            config,
            fetches: AtomicUsize::new(0),
        }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &AssetCacheConfig {
        &self.config
    }

    /// Return the decoded image for `url` if it is ready, starting a load if needed.
    pub fn try_load(&self, url: &str) -> Option<Arc<DecodedImage>> {
        self.try_load_at(url, Instant::now())
    }

    /// [`AssetCache::try_load`] with an explicit clock reading for the cooldown check.
    pub fn try_load_at(&self, url: &str, now: Instant) -> Option<Arc<DecodedImage>> {
        {
            let mut slots = lock(&self.slots);
            match slots.get(url) {
                Some(Slot::Ready(image)) => return Some(image.clone()),
                Some(Slot::Loading) => return None,
                Some(Slot::Failed { at })
                    if now.saturating_duration_since(*at) < self.config.retry_cooldown =>
                {
                    return None;
                }
                Some(Slot::Failed { .. }) | None => {}
            }
            slots.insert(url.to_owned(), Slot::Loading);
        }

        self.fetches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(url, "starting asset load");

        let slots = self.slots.clone();
        let fetcher = self.fetcher.clone();
        let decoder = self.decoder.clone();
        let owned_url = url.to_owned();
        let task = async move {
            let result = match fetcher.fetch(&owned_url).await {
                Ok(bytes) => decoder.decode(&bytes).map_err(AssetError::from),
                Err(err) => Err(err.into()),
            };
            settle(&slots, owned_url, result);
        };
        if let Err(err) = self.spawner.spawn(task) {
            settle(&self.slots, url.to_owned(), Err(err.into()));
        }
        None
    }

    /// Where `url` currently stands. Never starts a load.
    pub fn status(&self, url: &str) -> AssetStatus {
        match lock(&self.slots).get(url) {
            None => AssetStatus::Absent,
            Some(Slot::Loading) => AssetStatus::Loading,
            Some(Slot::Ready(_)) => AssetStatus::Ready,
            Some(Slot::Failed { at }) => AssetStatus::Failed { at: *at },
        }
    }

    /// Number of URLs the cache knows about, in any state.
    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    /// Returns `true` if no URL was ever requested.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many loads were started, retries included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

fn settle(
    slots: &Mutex<HashMap<String, Slot>>,
    url: String,
    result: Result<DecodedImage, AssetError>,
) {
    let slot = match result {
        Ok(image) => {
            tracing::debug!(url = %url, width = image.width, height = image.height, "asset ready");
            Slot::Ready(Arc::new(image))
        }
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "asset load failed");
            Slot::Failed { at: Instant::now() }
        }
    };
    lock(slots).insert(url, slot);
}
