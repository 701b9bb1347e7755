// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use canopy_precise_hit::HitParams;

/// Tuning for an [`Engine`](crate::Engine).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// How long to pause ticking after a failed frame.
    pub error_backoff: Duration,
    /// Number of frames averaged into each [`FpsInfo::fps`](crate::FpsInfo::fps) sample.
    pub fps_window: u32,
    /// Hit test tuning used by every dispatch pass.
    pub hit: HitParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            error_backoff: Duration::from_secs(1),
            fps_window: 60,
            hit: HitParams::default(),
        }
    }
}

impl EngineConfig {
    /// Set [`EngineConfig::error_backoff`].
    #[must_use]
    pub fn with_error_backoff(mut self, error_backoff: Duration) -> Self {
        self.error_backoff = error_backoff;
        self
    }

    /// Set [`EngineConfig::fps_window`]. Zero is treated as one.
    #[must_use]
    pub fn with_fps_window(mut self, fps_window: u32) -> Self {
        self.fps_window = fps_window.max(1);
        self
    }

    /// Set [`EngineConfig::hit`].
    #[must_use]
    pub fn with_hit_params(mut self, hit: HitParams) -> Self {
        self.hit = hit;
        self
    }
}
