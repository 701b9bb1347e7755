// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Scene: the immutable scene tree an application produces each frame.
//!
//! An application renders its whole state into a [`SceneNode`] every frame.
//! The tree is a tagged sum of five alternatives:
//!
//! - [`SceneNode::Empty`]: nothing. Useful for conditional composition.
//! - [`SceneNode::Many`]: ordered children, painted back to front.
//! - [`SceneNode::Draw`]: a [`DrawNode`] leaf with draw calls and pointer handlers.
//! - [`SceneNode::Translate`]: shifts the local origin of its subtree.
//! - [`SceneNode::Clip`]: clips its subtree by a path.
//!
//! Trees are never mutated in place. Hit testing, drawing and queries such as
//! [`SceneNode::bounding_box`] and [`SceneNode::position_of`] all run on the
//! [`visit::walk`] traversal.
//!
//! ## Example
//!
//! ```
//! use canopy_scene::{Rect, SceneNode, Vector, shapes, translate};
//! use peniko::Color;
//!
//! let button = shapes::rect(
//!     Rect::xywh(10.0, 10.0, 100.0, 50.0),
//!     shapes::RectStyle { fill: Some(Color::WHITE), ..Default::default() },
//! )
//! .with_id("button")
//! .on_click(|event| println!("clicked at {}", event.local));
//!
//! let tree = SceneNode::Many(vec![translate(100.0, 0.0, button)]).normalize();
//! assert_eq!(tree.position_of("button"), Some(Vector::new(100.0, 0.0)));
//! ```

mod bounds;
mod draw;
mod fit;
mod geometry;
mod node;
pub mod shapes;
pub mod visit;

pub use draw::{
    DecodedImage, DrawCall, DrawCommand, ImageDrawCommand, ImageSource, PathDrawCommand,
    TextAlign, TextBaseline, TextDrawCommand, UnknownVariant,
};
pub use fit::ImageFit;
pub use geometry::{Rect, Vector};
pub use node::{
    ClipNode, DrawNode, MouseButton, MouseButtons, MouseEvent, MouseHandler, SceneNode,
    TranslateNode, clip, translate,
};
pub use visit::VisitContext;
