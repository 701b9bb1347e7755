// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Assets: load bitmap assets without blocking the frame loop.
//!
//! [`AssetCache::try_load`] never waits. The first call for a URL starts a
//! background fetch and decode on a caller-supplied [`Spawn`] and returns
//! `None`; later calls return `None` until the load finishes, then the same
//! [`Arc<DecodedImage>`](canopy_scene::DecodedImage) every time.
//!
//! - Concurrent requests for one URL share a single fetch.
//! - A failed load is logged with `tracing::warn!` and retried by the first
//!   request after [`AssetCacheConfig::retry_cooldown`].
//! - Entries are never evicted and in-flight loads are never cancelled.
//!
//! Fetching and decoding sit behind the [`Fetch`] and [`Decode`] traits. With
//! the default features, [`HttpFetcher`] (via `ureq`) and [`ImageDecoder`]
//! (via `image`) are provided.
//!
//! ```
//! use std::sync::Arc;
//! use canopy_assets::{AssetCache, AssetCacheConfig, AssetStatus, DecodeError, FetchError};
//! use canopy_scene::DecodedImage;
//! use futures::FutureExt;
//! use futures::executor::LocalPool;
//!
//! let mut pool = LocalPool::new();
//! let cache = AssetCache::new(
//!     Arc::new(|_: &str| async { Ok::<_, FetchError>(vec![0_u8; 4]) }.boxed()),
//!     Arc::new(|bytes: &[u8]| Ok::<_, DecodeError>(DecodedImage::new(1, 1, bytes.to_vec()))),
//!     Box::new(pool.spawner()),
//!     AssetCacheConfig::default(),
//! );
//!
//! assert!(cache.try_load("pixel.png").is_none());
//! assert_eq!(cache.status("pixel.png"), AssetStatus::Loading);
//! pool.run_until_stalled();
//! assert!(cache.try_load("pixel.png").is_some());
//! ```

mod cache;
#[cfg(feature = "decode")]
mod decode;
#[cfg(feature = "http")]
mod http;

pub use cache::{AssetCache, AssetCacheConfig, AssetStatus};
#[cfg(feature = "decode")]
pub use decode::ImageDecoder;
#[cfg(feature = "http")]
pub use http::HttpFetcher;

pub use futures::task::Spawn;

use canopy_scene::DecodedImage;
use futures::future::BoxFuture;

/// Retrieves the raw bytes behind a URL.
pub trait Fetch: Send + Sync {
    /// Start fetching `url`. The returned future must not borrow `self`.
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>> + Send + Sync,
{
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Vec<u8>, FetchError>> {
        self(url)
    }
}

/// Turns fetched bytes into straight-alpha RGBA8 pixels.
pub trait Decode: Send + Sync {
    /// Decode one encoded image.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;
}

impl<F> Decode for F
where
    F: Fn(&[u8]) -> Result<DecodedImage, DecodeError> + Send + Sync,
{
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        self(bytes)
    }
}

/// Failure to retrieve an asset's bytes.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be completed.
    #[error("request for `{url}` failed: {message}")]
    Request {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The server answered with a non-success status.
    #[error("`{url}` answered with HTTP status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The fetch was dropped before producing a result.
    #[error("fetch of `{url}` was abandoned")]
    Abandoned {
        /// Requested URL.
        url: String,
    },
}

/// Failure to decode fetched bytes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The bytes are not an image in a supported format.
    #[error("unsupported or corrupt image data: {0}")]
    Format(String),
    /// The image decoded to zero pixels.
    #[error("image has no pixels ({width}x{height})")]
    Empty {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },
}

/// Why an asset ended up in the failed state.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Fetching failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Decoding failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The spawner refused the load task.
    #[error("could not spawn the load task: {0}")]
    Spawn(#[from] futures::task::SpawnError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_url() {
        let err = AssetError::from(FetchError::Status {
            url: "a.png".into(),
            status: 404,
        });
        assert_eq!(err.to_string(), "`a.png` answered with HTTP status 404");

        let err = AssetError::from(DecodeError::Empty {
            width: 0,
            height: 3,
        });
        assert_eq!(err.to_string(), "image has no pixels (0x3)");
    }

    #[test]
    fn closures_implement_the_traits() {
        let decode = |bytes: &[u8]| Ok::<_, DecodeError>(DecodedImage::new(1, 1, bytes.to_vec()));
        let image = Decode::decode(&decode, &[1, 2, 3, 4]).expect("closure decodes");
        assert_eq!(&*image.pixels, &[1, 2, 3, 4]);
    }
}
