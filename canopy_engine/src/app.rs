// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_imaging::FlushError;
use canopy_scene::SceneNode;

/// Produces the scene for a frame from the application's current state.
///
/// Any `FnMut() -> SceneNode` closure is an application that never fails.
pub trait Application {
    /// Render the whole scene.
    fn render(&mut self) -> Result<SceneNode, RenderError>;
}

impl<F> Application for F
where
    F: FnMut() -> SceneNode,
{
    fn render(&mut self) -> Result<SceneNode, RenderError> {
        Ok(self())
    }
}

/// An application could not produce a scene.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("render failed: {message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    /// Create an error with a human readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message passed to [`RenderError::new`].
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why a tick was abandoned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    /// The application failed to render.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// The backend failed to present the frame.
    #[error(transparent)]
    Flush(#[from] FlushError),
}
