// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Split a scene's leaves by whether they lie under a point.

use canopy_scene::visit::{VisitContext, Visitor, walk};
use canopy_scene::{DrawNode, SceneNode, Vector};

use crate::{HitParams, PreciseHitTest};

/// A leaf paired with the query point in the leaf's local coordinates.
#[derive(Copy, Clone, Debug)]
pub struct Hit<'a> {
    /// The classified leaf.
    pub node: &'a DrawNode,
    /// The query point with every ancestor translation undone.
    pub local: Vector,
}

/// The result of [`classify`].
///
/// Both lists are in paint order, so the last element of `inner` is the
/// topmost leaf under the point.
#[derive(Clone, Debug, Default)]
pub struct Classification<'a> {
    /// Leaves whose geometry contains the point.
    pub inner: Vec<Hit<'a>>,
    /// Every other classified leaf.
    pub outer: Vec<Hit<'a>>,
}

impl<'a> Classification<'a> {
    /// The topmost leaf under the point.
    pub fn topmost(&self) -> Option<&Hit<'a>> {
        self.inner.last()
    }

    /// Returns `true` if a leaf with this id is under the point.
    pub fn is_inner(&self, id: &str) -> bool {
        self.inner
            .iter()
            .any(|hit| hit.node.id.as_deref() == Some(id))
    }

    /// Returns `true` if a leaf with this id was classified as not under the point.
    pub fn is_outer(&self, id: &str) -> bool {
        self.outer
            .iter()
            .any(|hit| hit.node.id.as_deref() == Some(id))
    }
}

struct Classifier<'a, 'p> {
    point: Vector,
    params: &'p HitParams,
    out: Classification<'a>,
}

impl<'a> Visitor<'a> for Classifier<'a, '_> {
    fn leaf(&mut self, node: &'a DrawNode, cx: &VisitContext) {
        let hit = Hit {
            node,
            local: cx.to_local(self.point),
        };
        let has_geometry = !node.draw_calls.is_empty();
        if cx.clipped {
            // Clipped leaves never reach `inner`; containers without geometry are skipped.
            if has_geometry {
                self.out.outer.push(hit);
            }
        } else if has_geometry
            && node
                .hit_test_local(hit.local.into(), self.params)
                .is_some()
        {
            self.out.inner.push(hit);
        } else {
            self.out.outer.push(hit);
        }
    }
}

/// Classify every leaf of `tree` against `point`, given in global coordinates.
///
/// A leaf goes to [`Classification::inner`] when one of its draw commands
/// contains the point in the leaf's local space, and to
/// [`Classification::outer`] otherwise. Leaves below a clip node always go to
/// `outer`, whatever the geometry, except leaves with no draw calls, which
/// are skipped.
pub fn classify<'a>(tree: &'a SceneNode, point: Vector, params: &HitParams) -> Classification<'a> {
    let mut classifier = Classifier {
        point,
        params,
        out: Classification::default(),
    };
    walk(tree, &mut classifier);
    classifier.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_imaging::{ClipOp, PaintDesc};
    use canopy_scene::{DrawCall, DrawCommand, PathDrawCommand, clip, translate};
    use kurbo::{Circle, Shape};
    use peniko::Color;

    fn disc(id: &str, cx: f64, cy: f64, r: f64) -> SceneNode {
        let path = Circle::new((cx, cy), r).to_path(0.001);
        DrawNode::new([DrawCall::from(DrawCommand::Path(PathDrawCommand::new(
            path,
            PaintDesc::fill(Color::BLACK),
        )))])
        .with_id(id)
        .into()
    }

    #[test]
    fn local_point_undoes_translation() {
        let tree = translate(100.0, 20.0, disc("a", 0.0, 0.0, 5.0));
        let result = classify(&tree, Vector::new(101.0, 21.0), &HitParams::default());
        assert_eq!(result.inner.len(), 1);
        assert_eq!(result.inner[0].local, Vector::new(1.0, 1.0));
    }

    #[test]
    fn overlapping_leaves_are_all_inner_in_paint_order() {
        let tree = SceneNode::Many(vec![
            disc("below", 0.0, 0.0, 5.0),
            disc("above", 1.0, 0.0, 5.0),
        ]);
        let result = classify(&tree, Vector::new(0.5, 0.0), &HitParams::default());
        let ids: Vec<_> = result
            .inner
            .iter()
            .filter_map(|hit| hit.node.id.as_deref())
            .collect();
        assert_eq!(ids, ["below", "above"]);
        assert_eq!(result.topmost().and_then(|h| h.node.id.as_deref()), Some("above"));
    }

    #[test]
    fn clipped_leaf_is_outer_even_when_hit() {
        let clip_path = kurbo::Rect::new(-100.0, -100.0, 100.0, 100.0).to_path(0.1);
        let tree = clip(clip_path, ClipOp::Intersect, disc("a", 0.0, 0.0, 5.0));
        let result = classify(&tree, Vector::ZERO, &HitParams::default());
        assert!(result.inner.is_empty());
        assert!(result.is_outer("a"));
    }

    #[test]
    fn leaves_without_draw_calls() {
        let bare = || SceneNode::from(DrawNode::new([]).with_id("bare"));
        let params = HitParams::default();

        let bare_tree = bare();
        let unclipped = classify(&bare_tree, Vector::ZERO, &params);
        assert!(unclipped.is_outer("bare"));

        let clip_path = kurbo::Rect::new(-1.0, -1.0, 1.0, 1.0).to_path(0.1);
        let clipped_tree = clip(clip_path, ClipOp::Intersect, bare());
        let clipped = classify(&clipped_tree, Vector::ZERO, &params);
        assert!(clipped.inner.is_empty());
        assert!(clipped.outer.is_empty());
    }

    #[test]
    fn empty_tree_classifies_nothing() {
        let result = classify(&SceneNode::Empty, Vector::ZERO, &HitParams::default());
        assert!(result.inner.is_empty() && result.outer.is_empty());
    }
}
