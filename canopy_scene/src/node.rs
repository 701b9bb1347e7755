// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene tree: [`SceneNode`] and its leaf and composition nodes.

use core::fmt;
use std::rc::Rc;

use canopy_imaging::ClipOp;
use kurbo::BezPath;

use crate::{DrawCall, Vector};

bitflags::bitflags! {
    /// Set of mouse buttons held down.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        /// Primary button.
        const LEFT   = 0b0000_0001;
        /// Wheel button.
        const MIDDLE = 0b0000_0010;
        /// Secondary button.
        const RIGHT  = 0b0000_0100;
    }
}

/// A single mouse button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Wheel button.
    Middle,
    /// Secondary button.
    Right,
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::Right => Self::RIGHT,
        }
    }
}

/// Pointer event delivered to a leaf's handler.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MouseEvent {
    /// Pointer position in global (root) coordinates.
    pub global: Vector,
    /// Pointer position in the receiving leaf's local coordinates.
    pub local: Vector,
    /// The button that changed state, if any.
    pub button: Option<MouseButton>,
    /// Buttons held while the event was produced.
    pub pressed: MouseButtons,
}

/// A pointer handler attached to a [`DrawNode`].
pub type MouseHandler = Rc<dyn Fn(&MouseEvent)>;

/// Leaf node: the only node with visual content and interactivity.
#[derive(Clone, Default)]
pub struct DrawNode {
    /// Draw calls in paint order.
    pub draw_calls: Vec<DrawCall>,
    /// Optional stable identifier, used by [`SceneNode::position_of`].
    pub id: Option<String>,
    /// Called when a click lands inside this leaf.
    pub on_click: Option<MouseHandler>,
    /// Called when a click lands anywhere else.
    pub on_click_out: Option<MouseHandler>,
    /// Called when a button is pressed inside this leaf.
    pub on_mouse_down: Option<MouseHandler>,
    /// Called when a button is released inside this leaf.
    pub on_mouse_up: Option<MouseHandler>,
    /// Called when the pointer moves inside this leaf.
    pub on_mouse_in: Option<MouseHandler>,
    /// Called when the pointer moves anywhere else.
    pub on_mouse_out: Option<MouseHandler>,
}

impl DrawNode {
    /// Create a leaf with the given draw calls and no handlers.
    pub fn new(draw_calls: impl IntoIterator<Item = DrawCall>) -> Self {
        Self {
            draw_calls: draw_calls.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the click handler.
    pub fn on_click(mut self, f: impl Fn(&MouseEvent) + 'static) -> Self {
        self.on_click = Some(Rc::new(f));
        self
    }

    /// Set the click-outside handler.
    pub fn on_click_out(mut self, f: impl Fn(&MouseEvent) + 'static) -> Self {
        self.on_click_out = Some(Rc::new(f));
        self
    }

    /// Set the button-press handler.
    pub fn on_mouse_down(mut self, f: impl Fn(&MouseEvent) + 'static) -> Self {
        self.on_mouse_down = Some(Rc::new(f));
        self
    }

    /// Set the button-release handler.
    pub fn on_mouse_up(mut self, f: impl Fn(&MouseEvent) + 'static) -> Self {
        self.on_mouse_up = Some(Rc::new(f));
        self
    }

    /// Set the pointer-inside handler.
    pub fn on_mouse_in(mut self, f: impl Fn(&MouseEvent) + 'static) -> Self {
        self.on_mouse_in = Some(Rc::new(f));
        self
    }

    /// Set the pointer-outside handler.
    pub fn on_mouse_out(mut self, f: impl Fn(&MouseEvent) + 'static) -> Self {
        self.on_mouse_out = Some(Rc::new(f));
        self
    }

    /// Returns `true` if any handler is attached.
    pub fn has_handlers(&self) -> bool {
        [
            &self.on_click,
            &self.on_click_out,
            &self.on_mouse_down,
            &self.on_mouse_up,
            &self.on_mouse_in,
            &self.on_mouse_out,
        ]
        .iter()
        .any(|h| h.is_some())
    }
}

impl fmt::Debug for DrawNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handlers = Vec::new();
        for (name, handler) in [
            ("on_click", &self.on_click),
            ("on_click_out", &self.on_click_out),
            ("on_mouse_down", &self.on_mouse_down),
            ("on_mouse_up", &self.on_mouse_up),
            ("on_mouse_in", &self.on_mouse_in),
            ("on_mouse_out", &self.on_mouse_out),
        ] {
            if handler.is_some() {
                handlers.push(name);
            }
        }
        f.debug_struct("DrawNode")
            .field("draw_calls", &self.draw_calls)
            .field("id", &self.id)
            .field("handlers", &handlers)
            .finish()
    }
}

/// Shift the local origin of `child` by `(dx, dy)`.
#[derive(Clone, Debug)]
pub struct TranslateNode {
    /// Horizontal offset.
    pub dx: f64,
    /// Vertical offset.
    pub dy: f64,
    /// Translated subtree.
    pub child: Box<SceneNode>,
}

/// Clip `child` by `path`.
///
/// Drawing is clipped by the backend. For hit testing, every leaf below a
/// clip is excluded from the inside list, whatever the pointer position.
#[derive(Clone, Debug)]
pub struct ClipNode {
    /// Clip geometry in the clip node's local coordinates.
    pub path: BezPath,
    /// How the path combines with the enclosing clip.
    pub clip_op: ClipOp,
    /// Clipped subtree.
    pub child: Box<SceneNode>,
}

/// A persistent, immutable scene tree.
///
/// A new tree is produced every frame from the full application state.
/// Trees are cheap to clone: handlers are reference counted.
#[derive(Clone, Debug, Default)]
pub enum SceneNode {
    /// Renders nothing and never matches a hit test.
    #[default]
    Empty,
    /// Ordered children; later ones draw on top and are visited later.
    Many(Vec<Self>),
    /// Leaf with draw calls and handlers.
    Draw(DrawNode),
    /// Translated subtree.
    Translate(TranslateNode),
    /// Clipped subtree.
    Clip(ClipNode),
}

impl SceneNode {
    /// Flatten nested [`SceneNode::Many`], drop [`SceneNode::Empty`], and
    /// collapse sequences of zero or one element.
    ///
    /// Translate and clip nodes whose child normalizes to `Empty` become
    /// `Empty` as well. Traversal does not require a normalized tree; this
    /// is run once per frame so traversals see a compact tree.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Many(children) => {
                let mut flat = Vec::with_capacity(children.len());
                for child in children {
                    match child.normalize() {
                        Self::Empty => {}
                        Self::Many(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                if flat.len() <= 1 {
                    flat.pop().unwrap_or_default()
                } else {
                    Self::Many(flat)
                }
            }
            Self::Translate(TranslateNode { dx, dy, child }) => match child.normalize() {
                Self::Empty => Self::Empty,
                child => Self::Translate(TranslateNode {
                    dx,
                    dy,
                    child: Box::new(child),
                }),
            },
            Self::Clip(ClipNode {
                path,
                clip_op,
                child,
            }) => match child.normalize() {
                Self::Empty => Self::Empty,
                child => Self::Clip(ClipNode {
                    path,
                    clip_op,
                    child: Box::new(child),
                }),
            },
            leaf => leaf,
        }
    }

    /// Returns `true` for [`SceneNode::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Wrap `child` in a [`TranslateNode`].
pub fn translate(dx: f64, dy: f64, child: impl Into<SceneNode>) -> SceneNode {
    SceneNode::Translate(TranslateNode {
        dx,
        dy,
        child: Box::new(child.into()),
    })
}

/// Wrap `child` in a [`ClipNode`].
pub fn clip(path: BezPath, clip_op: ClipOp, child: impl Into<SceneNode>) -> SceneNode {
    SceneNode::Clip(ClipNode {
        path,
        clip_op,
        child: Box::new(child.into()),
    })
}

impl From<DrawNode> for SceneNode {
    fn from(node: DrawNode) -> Self {
        Self::Draw(node)
    }
}

impl From<Vec<Self>> for SceneNode {
    fn from(children: Vec<Self>) -> Self {
        Self::Many(children)
    }
}

impl From<Option<Self>> for SceneNode {
    fn from(node: Option<Self>) -> Self {
        node.unwrap_or_default()
    }
}

impl FromIterator<Self> for SceneNode {
    fn from_iter<I: IntoIterator<Item = Self>>(iter: I) -> Self {
        Self::Many(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> SceneNode {
        DrawNode::new([]).with_id(id).into()
    }

    fn ids(node: &SceneNode) -> Vec<String> {
        match node {
            SceneNode::Draw(d) => d.id.iter().cloned().collect(),
            SceneNode::Many(children) => children.iter().flat_map(ids).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn normalize_flattens_and_drops_empty() {
        let tree = SceneNode::Many(vec![
            leaf("a"),
            SceneNode::Empty,
            SceneNode::Many(vec![leaf("b"), SceneNode::Many(vec![leaf("c")])]),
        ])
        .normalize();

        let SceneNode::Many(children) = &tree else {
            panic!("expected a sequence, got {tree:?}");
        };
        assert_eq!(children.len(), 3);
        assert_eq!(ids(&tree), ["a", "b", "c"]);
    }

    #[test]
    fn normalize_collapses_singletons_and_empties() {
        assert!(SceneNode::Many(vec![]).normalize().is_empty());
        assert!(SceneNode::Many(vec![SceneNode::Empty]).normalize().is_empty());
        assert!(matches!(
            SceneNode::Many(vec![leaf("a")]).normalize(),
            SceneNode::Draw(_)
        ));
        assert!(translate(1.0, 2.0, SceneNode::Empty).normalize().is_empty());
    }

    #[test]
    fn option_composition() {
        let shown = true;
        let tree: SceneNode = vec![
            leaf("a"),
            SceneNode::from(shown.then(|| leaf("b"))),
            SceneNode::from(None),
        ]
        .into_iter()
        .collect();
        assert_eq!(ids(&tree.normalize()), ["a", "b"]);
    }

    #[test]
    fn debug_lists_attached_handlers() {
        let node = DrawNode::new([]).on_click(|_| {}).on_mouse_out(|_| {});
        let text = format!("{node:?}");
        assert!(text.contains("\"on_click\""));
        assert!(text.contains("\"on_mouse_out\""));
        assert!(!text.contains("\"on_mouse_down\""));
        assert!(node.has_handlers());
        assert!(!DrawNode::default().has_handlers());
    }

    #[test]
    fn button_flags() {
        let pressed =
            MouseButtons::from(MouseButton::Left) | MouseButtons::from(MouseButton::Right);
        assert!(pressed.contains(MouseButtons::RIGHT));
        assert!(!pressed.contains(MouseButtons::MIDDLE));
    }
}
