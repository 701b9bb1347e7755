// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Instant;

/// Frame rate as measured over the last completed window.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FpsInfo {
    /// Frames per second over the last completed window, `0.0` until one completes.
    pub fps: f64,
    /// Frames counted in the current window.
    pub frame_count: u32,
    /// Ticks that reached the render step since the engine started.
    pub total_frames: u64,
}

#[derive(Clone, Debug)]
pub(crate) struct FpsCounter {
    window: u32,
    started: Option<Instant>,
    info: FpsInfo,
}

impl FpsCounter {
    pub(crate) fn new(window: u32) -> Self {
        Self {
            window: window.max(1),
            started: None,
            info: FpsInfo::default(),
        }
    }

    pub(crate) fn record(&mut self, now: Instant) {
        self.info.total_frames += 1;
        let Some(started) = self.started else {
            self.started = Some(now);
            return;
        };
        self.info.frame_count += 1;
        if self.info.frame_count >= self.window {
            let elapsed = now.saturating_duration_since(started).as_secs_f64();
            if elapsed > 0.0 {
                self.info.fps = f64::from(self.info.frame_count) / elapsed;
            }
            self.info.frame_count = 0;
            self.started = Some(now);
        }
    }

    pub(crate) fn info(&self) -> FpsInfo {
        self.info
    }
}
