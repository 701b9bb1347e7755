// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: one classification, then handler calls in paint order.
//!
//! - Classification finishes before the first handler runs.
//! - Inner handlers run first, in paint order; outer handlers follow, also in
//!   paint order.
//! - Each handler receives a [`MouseEvent`] whose `local` point is the
//!   pointer in the receiving leaf's coordinates.

use canopy_precise_hit::{HitParams, classify};
use canopy_scene::{MouseEvent, MouseHandler, SceneNode};
use smallvec::SmallVec;

use crate::{DispatchReport, EventKind, PointerInput};

type Calls = SmallVec<[(MouseHandler, MouseEvent); 8]>;

/// Run the pass for `kind` against `tree`.
///
/// Leaves without the relevant handler are skipped silently.
pub fn dispatch(
    tree: &SceneNode,
    kind: EventKind,
    input: &PointerInput,
    params: &HitParams,
) -> DispatchReport {
    let (inner_handler, outer_handler) = kind.handlers();
    let classification = classify(tree, input.position, params);

    let event = |local| MouseEvent {
        global: input.position,
        local,
        button: input.button,
        pressed: input.pressed,
    };

    let inner: Calls = classification
        .inner
        .iter()
        .filter_map(|hit| {
            inner_handler
                .get(hit.node)
                .map(|h| (h.clone(), event(hit.local)))
        })
        .collect();
    let outer: Calls = outer_handler
        .map(|slot| {
            classification
                .outer
                .iter()
                .filter_map(|hit| slot.get(hit.node).map(|h| (h.clone(), event(hit.local))))
                .collect()
        })
        .unwrap_or_default();

    for (handler, event) in inner.iter().chain(outer.iter()) {
        handler(event);
    }
    DispatchReport {
        inner_called: inner.len(),
        outer_called: outer.len(),
    }
}

/// `on_click` on leaves under the pointer, `on_click_out` on the rest.
pub fn dispatch_click(
    tree: &SceneNode,
    input: &PointerInput,
    params: &HitParams,
) -> DispatchReport {
    dispatch(tree, EventKind::Click, input, params)
}

/// `on_mouse_down` on leaves under the pointer.
pub fn dispatch_mouse_down(
    tree: &SceneNode,
    input: &PointerInput,
    params: &HitParams,
) -> DispatchReport {
    dispatch(tree, EventKind::MouseDown, input, params)
}

/// `on_mouse_up` on leaves under the pointer.
pub fn dispatch_mouse_up(
    tree: &SceneNode,
    input: &PointerInput,
    params: &HitParams,
) -> DispatchReport {
    dispatch(tree, EventKind::MouseUp, input, params)
}

/// `on_mouse_in` on leaves under the pointer, `on_mouse_out` on the rest.
///
/// Hosts typically call this on every pointer move; each call walks the whole
/// tree once.
pub fn dispatch_mouse_move(
    tree: &SceneNode,
    input: &PointerInput,
    params: &HitParams,
) -> DispatchReport {
    dispatch(tree, EventKind::MouseMove, input, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_scene::{DrawNode, Rect, Vector, shapes, translate};
    use core::cell::RefCell;
    use peniko::Color;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn square(id: &'static str, x: f64, log: &Log) -> SceneNode {
        let style = shapes::RectStyle {
            fill: Some(Color::WHITE),
            ..shapes::RectStyle::default()
        };
        let mut node = shapes::rect(Rect::xywh(x, 0.0, 10.0, 10.0), style).with_id(id);
        for (name, slot) in [
            ("click", &mut node.on_click),
            ("click_out", &mut node.on_click_out),
            ("down", &mut node.on_mouse_down),
            ("up", &mut node.on_mouse_up),
            ("in", &mut node.on_mouse_in),
            ("out", &mut node.on_mouse_out),
        ] {
            let log = log.clone();
            *slot = Some(Rc::new(move |e: &MouseEvent| {
                log.borrow_mut().push(format!("{id}.{name}@{}", e.local));
            }));
        }
        node.into()
    }

    fn scene(log: &Log) -> SceneNode {
        SceneNode::Many(vec![square("a", 0.0, log), square("b", 20.0, log)])
    }

    fn run(kind: EventKind, at: Vector) -> (DispatchReport, Vec<String>) {
        let log = Log::default();
        let tree = scene(&log);
        let report = dispatch(&tree, kind, &PointerInput::at(at), &HitParams::default());
        let entries = log.borrow().clone();
        (report, entries)
    }

    #[test]
    fn click_calls_inner_then_outer() {
        let (report, log) = run(EventKind::Click, Vector::new(25.0, 5.0));
        assert_eq!(log, ["b.click@(5, 5)", "a.click_out@(25, 5)"]);
        assert_eq!(
            report,
            DispatchReport {
                inner_called: 1,
                outer_called: 1
            }
        );
    }

    #[test]
    fn down_and_up_ignore_outer() {
        let (report, log) = run(EventKind::MouseDown, Vector::new(5.0, 5.0));
        assert_eq!(log, ["a.down@(5, 5)"]);
        assert_eq!(report.total(), 1);

        let (_, log) = run(EventKind::MouseUp, Vector::new(100.0, 100.0));
        assert!(log.is_empty());
    }

    #[test]
    fn move_calls_in_and_out() {
        let (_, log) = run(EventKind::MouseMove, Vector::new(5.0, 5.0));
        assert_eq!(log, ["a.in@(5, 5)", "b.out@(5, 5)"]);
    }

    #[test]
    fn local_point_is_per_leaf() {
        let log = Log::default();
        let tree = translate(100.0, 50.0, square("a", 0.0, &log));
        dispatch_click(
            &tree,
            &PointerInput::at(Vector::new(105.0, 55.0)),
            &HitParams::default(),
        );
        assert_eq!(*log.borrow(), ["a.click@(5, 5)"]);
    }

    #[test]
    fn event_carries_buttons() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let tree: SceneNode = shapes::rect(
            Rect::xywh(0.0, 0.0, 10.0, 10.0),
            shapes::RectStyle {
                fill: Some(Color::BLACK),
                ..shapes::RectStyle::default()
            },
        )
        .on_mouse_down(move |e| *sink.borrow_mut() = Some(*e))
        .into();

        let input = PointerInput::at(Vector::new(1.0, 2.0))
            .with_button(canopy_scene::MouseButton::Right)
            .with_pressed(canopy_scene::MouseButtons::RIGHT);
        dispatch_mouse_down(&tree, &input, &HitParams::default());

        let event = seen.borrow().expect("handler should run");
        assert_eq!(event.global, Vector::new(1.0, 2.0));
        assert_eq!(event.button, Some(canopy_scene::MouseButton::Right));
        assert!(event.pressed.contains(canopy_scene::MouseButtons::RIGHT));
    }

    #[test]
    fn leaves_without_handlers_are_skipped() {
        let tree = SceneNode::from(DrawNode::new([]));
        let report = dispatch_mouse_move(
            &tree,
            &PointerInput::at(Vector::ZERO),
            &HitParams::default(),
        );
        assert_eq!(report.total(), 0);
    }
}
