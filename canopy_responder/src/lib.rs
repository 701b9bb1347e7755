// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Responder: route pointer input to scene leaf handlers.
//!
//! Every pass classifies the scene once with
//! [`canopy_precise_hit::classify`] and then calls one handler on the leaves
//! under the pointer and, for some passes, another handler on every other
//! leaf:
//!
//! | [`EventKind`] | inner leaves | outer leaves |
//! |---|---|---|
//! | `Click` | `on_click` | `on_click_out` |
//! | `MouseDown` | `on_mouse_down` | |
//! | `MouseUp` | `on_mouse_up` | |
//! | `MouseMove` | `on_mouse_in` | `on_mouse_out` |
//!
//! Passes keep no state between calls. Telling "entered" from "stayed inside"
//! is up to the caller.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use canopy_precise_hit::HitParams;
//! use canopy_responder::{PointerInput, dispatcher};
//! use canopy_scene::{Rect, SceneNode, Vector, shapes};
//! use peniko::Color;
//!
//! let clicks = Rc::new(Cell::new(0));
//! let counter = clicks.clone();
//! let tree: SceneNode = shapes::rect(
//!     Rect::xywh(0.0, 0.0, 10.0, 10.0),
//!     shapes::RectStyle { fill: Some(Color::WHITE), ..Default::default() },
//! )
//! .on_click(move |_| counter.set(counter.get() + 1))
//! .into();
//!
//! let input = PointerInput::at(Vector::new(5.0, 5.0));
//! let report = dispatcher::dispatch_click(&tree, &input, &HitParams::default());
//! assert_eq!(report.inner_called, 1);
//! assert_eq!(clicks.get(), 1);
//! ```

pub mod dispatcher;

use canopy_scene::{DrawNode, MouseButton, MouseButtons, MouseHandler, Vector};

/// The kinds of pointer input the responder routes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A completed click.
    Click,
    /// A button press.
    MouseDown,
    /// A button release.
    MouseUp,
    /// Pointer motion.
    MouseMove,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 4] = [Self::Click, Self::MouseDown, Self::MouseUp, Self::MouseMove];

    /// The handler called on inner leaves, and the one called on outer leaves if any.
    pub const fn handlers(self) -> (Handler, Option<Handler>) {
        match self {
            Self::Click => (Handler::Click, Some(Handler::ClickOut)),
            Self::MouseDown => (Handler::MouseDown, None),
            Self::MouseUp => (Handler::MouseUp, None),
            Self::MouseMove => (Handler::MouseIn, Some(Handler::MouseOut)),
        }
    }
}

/// The handler slots of a [`DrawNode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Handler {
    /// [`DrawNode::on_click`].
    Click,
    /// [`DrawNode::on_click_out`].
    ClickOut,
    /// [`DrawNode::on_mouse_down`].
    MouseDown,
    /// [`DrawNode::on_mouse_up`].
    MouseUp,
    /// [`DrawNode::on_mouse_in`].
    MouseIn,
    /// [`DrawNode::on_mouse_out`].
    MouseOut,
}

impl Handler {
    /// The handler in this slot of `node`, if one is attached.
    pub fn get(self, node: &DrawNode) -> Option<&MouseHandler> {
        match self {
            Self::Click => node.on_click.as_ref(),
            Self::ClickOut => node.on_click_out.as_ref(),
            Self::MouseDown => node.on_mouse_down.as_ref(),
            Self::MouseUp => node.on_mouse_up.as_ref(),
            Self::MouseIn => node.on_mouse_in.as_ref(),
            Self::MouseOut => node.on_mouse_out.as_ref(),
        }
    }
}

/// Pointer input as delivered by the host, in global coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Pointer position.
    pub position: Vector,
    /// The button that changed state, if any.
    pub button: Option<MouseButton>,
    /// Buttons currently held.
    pub pressed: MouseButtons,
}

impl PointerInput {
    /// Input at `position` with no buttons involved.
    pub fn at(position: Vector) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set the button that changed state.
    #[must_use]
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Set the held buttons.
    #[must_use]
    pub fn with_pressed(mut self, pressed: MouseButtons) -> Self {
        self.pressed = pressed;
        self
    }
}

/// How many handlers a pass invoked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers called on leaves under the pointer.
    pub inner_called: usize,
    /// Handlers called on the other leaves.
    pub outer_called: usize,
}

impl DispatchReport {
    /// Total handlers called.
    pub fn total(&self) -> usize {
        self.inner_called + self.outer_called
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_an_inner_handler() {
        let inner: Vec<_> = EventKind::ALL.iter().map(|k| k.handlers().0).collect();
        assert_eq!(
            inner,
            [
                Handler::Click,
                Handler::MouseDown,
                Handler::MouseUp,
                Handler::MouseIn
            ]
        );
    }

    #[test]
    fn only_click_and_move_have_outer_handlers() {
        assert_eq!(EventKind::Click.handlers().1, Some(Handler::ClickOut));
        assert_eq!(EventKind::MouseMove.handlers().1, Some(Handler::MouseOut));
        assert_eq!(EventKind::MouseDown.handlers().1, None);
        assert_eq!(EventKind::MouseUp.handlers().1, None);
    }

    #[test]
    fn handler_slots_map_to_fields() {
        let node = DrawNode::new([]).on_mouse_up(|_| {});
        assert!(Handler::MouseUp.get(&node).is_some());
        assert!(Handler::MouseDown.get(&node).is_none());
    }
}
