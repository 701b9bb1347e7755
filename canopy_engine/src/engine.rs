// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::time::Instant;

use canopy_arena::ResourceArena;
use canopy_assets::AssetCache;
use canopy_imaging::ImagingBackend;
use canopy_responder::{DispatchReport, EventKind, PointerInput, dispatcher};
use canopy_scene::SceneNode;

use crate::draw::{DrawContext, draw_tree};
use crate::fps::FpsCounter;
use crate::{Application, EngineConfig, FpsInfo, ImageRegistry, TickError};

/// What a call to [`Engine::tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// A frame was rendered, drawn and flushed.
    Rendered,
    /// The engine was stopped; nothing happened.
    Stopped,
    /// A previous frame failed; nothing happens until `resume_at`.
    BackingOff {
        /// First instant at which a tick will render again.
        resume_at: Instant,
    },
}

/// Drives an [`Application`] against an [`ImagingBackend`], one tick per
/// host refresh.
///
/// Within a tick the order is fixed: release the previous frame's resources,
/// render, draw, flush, then store the rendered tree for event dispatch.
/// Resources drawn in one tick therefore stay alive through that tick's
/// flush and are destroyed at the start of the next.
pub struct Engine<A, B: ImagingBackend> {
    app: A,
    backend: B,
    arena: ResourceArena,
    images: ImageRegistry,
    assets: Option<AssetCache>,
    config: EngineConfig,
    fps: FpsCounter,
    last_tree: Option<SceneNode>,
    resume_at: Option<Instant>,
    stopped: bool,
}

impl<A, B: ImagingBackend> fmt::Debug for Engine<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("arena", &self.arena)
            .field("images", &self.images.len())
            .field("assets", &self.assets)
            .field("config", &self.config)
            .field("fps", &self.fps.info())
            .field("has_tree", &self.last_tree.is_some())
            .field("resume_at", &self.resume_at)
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}

impl<A: Application, B: ImagingBackend> Engine<A, B> {
    /// Create a running engine with the default configuration and no asset cache.
    pub fn new(app: A, backend: B) -> Self {
        Self::with_config(app, backend, EngineConfig::default())
    }

    /// Create a running engine with `config`.
    pub fn with_config(app: A, backend: B, config: EngineConfig) -> Self {
        Self {
            app,
            backend,
            arena: ResourceArena::new(),
            images: ImageRegistry::new(),
            assets: None,
            fps: FpsCounter::new(config.fps_window),
            config,
            last_tree: None,
            resume_at: None,
            stopped: false,
        }
    }

    /// Resolve URL image sources through `assets`.
    ///
    /// Without a cache, URL images are never drawn.
    #[must_use]
    pub fn with_assets(mut self, assets: AssetCache) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Run one frame.
    ///
    /// On a render or flush failure the frame is abandoned, the error is
    /// logged and returned, and ticks report [`TickStatus::BackingOff`] until
    /// [`EngineConfig::error_backoff`] has passed. The previously stored tree
    /// keeps serving events meanwhile.
    pub fn tick(&mut self, now: Instant) -> Result<TickStatus, TickError> {
        if self.stopped {
            return Ok(TickStatus::Stopped);
        }
        if let Some(resume_at) = self.resume_at {
            if now < resume_at {
                return Ok(TickStatus::BackingOff { resume_at });
            }
            self.resume_at = None;
        }

        self.fps.record(now);
        let released = self.arena.release_all(&mut self.backend);
        let swept = self.images.sweep(&mut self.backend);
        tracing::trace!(released, swept, "released previous frame");

        match self.frame(now) {
            Ok(tree) => {
                self.last_tree = Some(tree);
                Ok(TickStatus::Rendered)
            }
            Err(err) => {
                let resume_at = now + self.config.error_backoff;
                tracing::error!(
                    error = %err,
                    backoff = ?self.config.error_backoff,
                    "frame abandoned"
                );
                self.resume_at = Some(resume_at);
                Err(err)
            }
        }
    }

    fn frame(&mut self, now: Instant) -> Result<SceneNode, TickError> {
        let tree = self.app.render()?.normalize();
        let stats = {
            let mut cx = DrawContext::new(
                self.arena.frame(&mut self.backend),
                &mut self.images,
                self.assets.as_ref(),
                now,
            );
            draw_tree(&tree, &mut cx)
        };
        self.backend.flush()?;
        tracing::debug!(
            paths = stats.paths,
            images = stats.images,
            glyph_runs = stats.glyph_runs,
            skipped_images = stats.skipped_images,
            "frame drawn"
        );
        Ok(tree)
    }

    /// Stop ticking for good. Later ticks report [`TickStatus::Stopped`].
    pub fn stop(&mut self) {
        if !self.stopped {
            tracing::debug!("engine stopped");
        }
        self.stopped = true;
    }

    /// Returns `true` once [`Engine::stop`] was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Run `kind`'s dispatch pass against the last rendered tree.
    ///
    /// Before the first successful tick there is no tree and nothing is called.
    pub fn dispatch(&self, kind: EventKind, input: PointerInput) -> DispatchReport {
        match &self.last_tree {
            Some(tree) => dispatcher::dispatch(tree, kind, &input, &self.config.hit),
            None => DispatchReport::default(),
        }
    }

    /// Route a click.
    pub fn click(&self, input: PointerInput) -> DispatchReport {
        self.dispatch(EventKind::Click, input)
    }

    /// Route a button press.
    pub fn mouse_down(&self, input: PointerInput) -> DispatchReport {
        self.dispatch(EventKind::MouseDown, input)
    }

    /// Route a button release.
    pub fn mouse_up(&self, input: PointerInput) -> DispatchReport {
        self.dispatch(EventKind::MouseUp, input)
    }

    /// Route pointer motion.
    pub fn mouse_move(&self, input: PointerInput) -> DispatchReport {
        self.dispatch(EventKind::MouseMove, input)
    }

    /// The tree stored by the last successful tick.
    pub fn last_tree(&self) -> Option<&SceneNode> {
        self.last_tree.as_ref()
    }

    /// Frame rate counters.
    pub fn fps(&self) -> FpsInfo {
        self.fps.info()
    }

    /// The configuration this engine runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The application.
    pub fn app(&self) -> &A {
        &self.app
    }

    /// The application, mutably.
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The asset cache, if one was attached.
    pub fn assets(&self) -> Option<&AssetCache> {
        self.assets.as_ref()
    }

    /// Destroy every resource the engine still owns and hand back the backend.
    pub fn into_backend(mut self) -> B {
        self.arena.release_all(&mut self.backend);
        self.images.release_all(&mut self.backend);
        self.backend
    }
}
