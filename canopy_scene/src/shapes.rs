// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf builders for common shapes.

use canopy_imaging::{FontDesc, PaintDesc, StrokeStyle};
use kurbo::{RoundedRect, Shape};
use peniko::Color;

use crate::{
    DrawCall, DrawCommand, DrawNode, PathDrawCommand, Rect, TextAlign, TextBaseline,
    TextDrawCommand,
};

const TOLERANCE: f64 = 0.1;

/// Where a rectangle's border sits relative to its nominal edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BorderPosition {
    /// The border path is the nominal rectangle.
    #[default]
    Outside,
    /// The border path is inset by the full stroke width.
    Inside,
    /// The border path is inset by half the stroke width.
    Middle,
}

/// Border of a rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectStroke {
    /// Border color.
    pub color: Color,
    /// Border width.
    pub width: f64,
    /// Border placement.
    pub border_position: BorderPosition,
}

/// Styling of a rectangle. Every part is optional.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RectStyle {
    /// Border, painted under the fill.
    pub stroke: Option<RectStroke>,
    /// Fill color.
    pub fill: Option<Color>,
    /// Corner radius.
    pub round: Option<f64>,
}

/// Build a rectangle leaf.
///
/// The border is drawn first and the fill second, both over the same path.
/// Attach handlers to the returned leaf as needed.
pub fn rect(rect: Rect, style: RectStyle) -> DrawNode {
    let (x, y, width, height) = (rect.x(), rect.y(), rect.width(), rect.height());
    let path_rect = match style.stroke {
        None
        | Some(RectStroke {
            border_position: BorderPosition::Outside,
            ..
        }) => kurbo::Rect::new(x, y, x + width, y + height),
        Some(RectStroke {
            border_position: BorderPosition::Inside,
            width: w,
            ..
        }) => kurbo::Rect::new(x + w, y + w, x + width - w, y + height - w),
        Some(RectStroke {
            border_position: BorderPosition::Middle,
            width: w,
            ..
        }) => kurbo::Rect::new(
            x + w / 2.0,
            y + w / 2.0,
            x + width - w / 2.0,
            y + height - w / 2.0,
        ),
    };
    let path = match style.round {
        Some(radius) => RoundedRect::from_rect(path_rect, radius).to_path(TOLERANCE),
        None => path_rect.to_path(TOLERANCE),
    };

    let mut commands = Vec::with_capacity(2);
    if let Some(stroke) = style.stroke {
        commands.push(DrawCommand::Path(PathDrawCommand::new(
            path.clone(),
            PaintDesc::stroke(stroke.color, StrokeStyle::new(stroke.width)),
        )));
    }
    if let Some(fill) = style.fill {
        commands.push(DrawCommand::Path(PathDrawCommand::new(
            path,
            PaintDesc::fill(fill),
        )));
    }
    DrawNode::new([DrawCall::new(commands)])
}

/// Text styling for [`text`].
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family and size.
    pub font: FontDesc,
    /// Glyph color.
    pub color: Color,
    /// Horizontal placement.
    pub align: TextAlign,
    /// Vertical placement.
    pub baseline: TextBaseline,
}

/// Build a single-run text leaf anchored at `(x, y)`.
pub fn text(content: impl Into<String>, x: f64, y: f64, style: TextStyle) -> DrawNode {
    DrawNode::new([DrawCall::from(DrawCommand::Text(TextDrawCommand {
        text: content.into(),
        font: style.font,
        x,
        y,
        paint: PaintDesc::fill(style.color),
        align: style.align,
        baseline: style.baseline,
    }))])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_bounds(node: &DrawNode) -> Vec<kurbo::Rect> {
        node.draw_calls[0]
            .commands
            .iter()
            .map(|command| match command {
                DrawCommand::Path(p) => p.path.bounding_box(),
                other => panic!("unexpected command {other:?}"),
            })
            .collect()
    }

    fn stroked(border_position: BorderPosition) -> RectStyle {
        RectStyle {
            stroke: Some(RectStroke {
                color: Color::BLACK,
                width: 2.0,
                border_position,
            }),
            fill: Some(Color::WHITE),
            round: None,
        }
    }

    #[test]
    fn border_position_moves_the_path() {
        let r = Rect::xywh(10.0, 10.0, 100.0, 50.0);

        let outside = rect(r, stroked(BorderPosition::Outside));
        assert_eq!(path_bounds(&outside)[0], kurbo::Rect::new(10.0, 10.0, 110.0, 60.0));

        let inside = rect(r, stroked(BorderPosition::Inside));
        assert_eq!(path_bounds(&inside)[0], kurbo::Rect::new(12.0, 12.0, 108.0, 58.0));

        let middle = rect(r, stroked(BorderPosition::Middle));
        assert_eq!(path_bounds(&middle)[0], kurbo::Rect::new(11.0, 11.0, 109.0, 59.0));
    }

    #[test]
    fn stroke_is_painted_before_fill() {
        let node = rect(Rect::xywh(0.0, 0.0, 4.0, 4.0), stroked(BorderPosition::Outside));
        let commands = &node.draw_calls[0].commands;
        assert_eq!(commands.len(), 2);
        let DrawCommand::Path(first) = &commands[0] else {
            panic!("expected a path");
        };
        assert!(first.paint.stroke_style().is_some());
    }

    #[test]
    fn unstyled_rect_has_no_commands() {
        let node = rect(Rect::xywh(0.0, 0.0, 4.0, 4.0), RectStyle::default());
        assert!(node.draw_calls[0].commands.is_empty());
    }

    #[test]
    fn text_leaf_carries_one_command() {
        let node = text(
            "hi",
            3.0,
            4.0,
            TextStyle {
                font: FontDesc::new("sans-serif", 12.0),
                color: Color::BLACK,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            },
        );
        let DrawCommand::Text(t) = &node.draw_calls[0].commands[0] else {
            panic!("expected text");
        };
        assert_eq!((t.x, t.y, t.align), (3.0, 4.0, TextAlign::Center));
    }
}
