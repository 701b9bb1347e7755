// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global-space bounding boxes of scene trees.

use canopy_imaging::ClipOp;
use kurbo::{BezPath, PathEl, Shape};

use crate::visit::{VisitContext, Visitor, walk};
use crate::{ClipNode, DrawCommand, DrawNode, Rect, SceneNode, Vector};

impl DrawNode {
    /// Local-space bounds of everything this leaf paints.
    ///
    /// Text is not measured here and does not contribute.
    pub fn local_bounds(&self) -> Option<Rect> {
        self.draw_calls
            .iter()
            .flat_map(|call| &call.commands)
            .filter_map(|command| match command {
                DrawCommand::Path(path) => path.bounds(),
                DrawCommand::Image(image) => Some(image.rect),
                DrawCommand::Text(_) => None,
            })
            .reduce(|acc, r| acc.union(&r))
    }
}

/// A clip in global space, reduced to what bounds can reason about.
enum ClipArea {
    /// Bounds of an intersecting clip path.
    Intersect(Rect),
    /// The hole of a difference clip, kept only when it is exactly a rectangle.
    Difference(Option<Rect>),
}

/// The rectangle `path` traces, if it is a single closed axis-aligned rectangle.
fn axis_aligned_rect(path: &BezPath) -> Option<Rect> {
    let mut els = path.elements().iter();
    let Some(PathEl::MoveTo(start)) = els.next() else {
        return None;
    };
    let mut corners = vec![*start];
    let mut closed = false;
    for el in els {
        match el {
            PathEl::LineTo(p) if !closed => corners.push(*p),
            PathEl::ClosePath if !closed => closed = true,
            _ => return None,
        }
    }
    if corners.len() == 5 && corners[4] == corners[0] {
        corners.pop();
    }
    if corners.len() != 4 {
        return None;
    }
    let axis_aligned = (0..4).all(|i| {
        let (a, b) = (corners[i], corners[(i + 1) % 4]);
        (a.x == b.x) != (a.y == b.y)
    });
    axis_aligned.then(|| Rect::from(path.bounding_box()))
}

#[derive(Default)]
struct Bounds {
    clips: Vec<ClipArea>,
    total: Option<Rect>,
}

impl<'a> Visitor<'a> for Bounds {
    fn leaf(&mut self, node: &'a DrawNode, cx: &VisitContext) {
        let Some(local) = node.local_bounds() else {
            return;
        };
        let mut global = Some(local.translate(cx.offset.x, cx.offset.y));
        for clip in &self.clips {
            global = global.and_then(|r| match clip {
                ClipArea::Intersect(area) => r.intersection(area),
                // Only a leaf hidden entirely by a rectangular hole is dropped;
                // any other hole keeps the conservative box.
                ClipArea::Difference(Some(hole)) => {
                    let inside = hole.contains(Vector::new(r.left(), r.top()))
                        && hole.contains(Vector::new(r.right(), r.bottom()));
                    (!inside).then_some(r)
                }
                ClipArea::Difference(None) => Some(r),
            });
        }
        if let Some(r) = global {
            self.total = Some(self.total.map_or(r, |total| total.union(&r)));
        }
    }

    fn enter_clip(&mut self, node: &'a ClipNode, cx: &VisitContext) {
        let (dx, dy) = (cx.offset.x, cx.offset.y);
        self.clips.push(match node.clip_op {
            ClipOp::Intersect => {
                ClipArea::Intersect(Rect::from(node.path.bounding_box()).translate(dx, dy))
            }
            ClipOp::Difference => ClipArea::Difference(
                axis_aligned_rect(&node.path).map(|hole| hole.translate(dx, dy)),
            ),
        });
    }

    fn exit_clip(&mut self, _: &'a ClipNode, _: &VisitContext) {
        self.clips.pop();
    }
}

impl SceneNode {
    /// The smallest global-space rectangle containing everything the tree
    /// paints, or `None` if it paints nothing measurable.
    ///
    /// Intersecting clips narrow the box to the clip path's bounds. A
    /// rectangular difference clip removes leaves it hides completely; other
    /// difference clips leave the box unchanged.
    pub fn bounding_box(&self) -> Option<Rect> {
        let mut bounds = Bounds::default();
        walk(self, &mut bounds);
        bounds.total
    }
}
