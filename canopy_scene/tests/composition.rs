// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Building scenes the way an application does and querying them.

use canopy_scene::shapes::{self, BorderPosition, RectStroke, RectStyle};
use canopy_scene::{DrawNode, Rect, SceneNode, Vector, translate};
use peniko::Color;

fn button(id: &str, border_position: BorderPosition) -> DrawNode {
    shapes::rect(
        Rect::xywh(10.0, 10.0, 100.0, 50.0),
        RectStyle {
            stroke: Some(RectStroke {
                color: Color::BLACK,
                width: 2.0,
                border_position,
            }),
            fill: Some(Color::WHITE),
            round: None,
        },
    )
    .with_id(id)
}

fn toolbar(show_help: bool) -> SceneNode {
    SceneNode::Many(vec![
        button("save", BorderPosition::Outside).into(),
        translate(120.0, 0.0, button("load", BorderPosition::Outside)),
        SceneNode::from(
            show_help.then(|| translate(240.0, 0.0, button("help", BorderPosition::Outside))),
        ),
    ])
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn hidden_children_vanish_from_queries() {
    let shown = toolbar(true).normalize();
    let hidden = toolbar(false).normalize();

    assert_eq!(shown.leaves().len(), 3);
    assert_eq!(hidden.leaves().len(), 2);
    assert_eq!(shown.position_of("help"), Some(Vector::new(240.0, 0.0)));
    assert_eq!(hidden.position_of("help"), None);
    assert_eq!(hidden.position_of("load"), Some(Vector::new(120.0, 0.0)));
}

#[test]
fn outside_border_grows_the_box_by_half_the_width() {
    let bounds = SceneNode::from(button("b", BorderPosition::Outside))
        .bounding_box()
        .expect("a painted leaf has bounds");
    assert!(close(bounds.left(), 9.0), "{bounds:?}");
    assert!(close(bounds.top(), 9.0), "{bounds:?}");
    assert!(close(bounds.right(), 111.0), "{bounds:?}");
    assert!(close(bounds.bottom(), 61.0), "{bounds:?}");
}

#[test]
fn inside_border_stays_within_the_rect() {
    let bounds = SceneNode::from(button("b", BorderPosition::Inside))
        .bounding_box()
        .expect("a painted leaf has bounds");
    // The path is inset by the full width, so the stroke's outer edge is inset by half of it.
    assert!(close(bounds.left(), 11.0), "{bounds:?}");
    assert!(close(bounds.right(), 109.0), "{bounds:?}");
}

#[test]
fn toolbar_box_spans_every_button() {
    let bounds = toolbar(true).bounding_box().expect("toolbar has bounds");
    assert!(close(bounds.left(), 9.0), "{bounds:?}");
    assert!(close(bounds.right(), 240.0 + 111.0), "{bounds:?}");
    assert!(close(bounds.height(), 52.0), "{bounds:?}");
}
