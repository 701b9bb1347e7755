// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Engine: the frame lifecycle that ties the Canopy crates together.
//!
//! Each host refresh calls [`Engine::tick`], which
//!
//! 1. releases the paths and paints allocated by the previous frame,
//! 2. asks the [`Application`] for a fresh [`SceneNode`](canopy_scene::SceneNode),
//! 3. walks it with [`draw_tree`], issuing backend operations,
//! 4. flushes the backend,
//! 5. stores the tree so pointer input can be routed against it.
//!
//! A failed render or flush abandons the frame, logs it with `tracing`, and
//! pauses ticking for [`EngineConfig::error_backoff`]. Pointer input goes
//! through [`Engine::click`], [`Engine::mouse_down`], [`Engine::mouse_up`]
//! and [`Engine::mouse_move`].
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Instant;
//! use canopy_engine::{Engine, TickStatus};
//! use canopy_imaging_ref::RefBackend;
//! use canopy_responder::PointerInput;
//! use canopy_scene::{Rect, SceneNode, Vector, shapes};
//! use peniko::Color;
//!
//! let clicks = Rc::new(Cell::new(0_u32));
//! let counter = clicks.clone();
//! let app = move || -> SceneNode {
//!     let counter = counter.clone();
//!     shapes::rect(
//!         Rect::xywh(0.0, 0.0, 40.0, 20.0),
//!         shapes::RectStyle { fill: Some(Color::WHITE), ..Default::default() },
//!     )
//!     .on_click(move |_| counter.set(counter.get() + 1))
//!     .into()
//! };
//!
//! let mut engine = Engine::new(app, RefBackend::new());
//! assert_eq!(engine.tick(Instant::now()), Ok(TickStatus::Rendered));
//! engine.click(PointerInput::at(Vector::new(10.0, 10.0)));
//! assert_eq!(clicks.get(), 1);
//! ```

mod app;
mod config;
pub mod draw;
mod engine;
mod fps;
mod registry;

pub use app::{Application, RenderError, TickError};
pub use config::EngineConfig;
pub use draw::{DrawContext, DrawStats, draw_tree};
pub use engine::{Engine, TickStatus};
pub use fps::FpsInfo;
pub use registry::ImageRegistry;
