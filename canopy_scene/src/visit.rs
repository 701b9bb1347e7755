// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first traversal shared by drawing, hit testing and queries.
//!
//! [`walk`] visits leaves in pre-order, which is also paint order. The
//! traversal context is passed down by value, so leaving a translate or clip
//! node restores the enclosing context exactly, with no undo step.

use crate::{ClipNode, DrawNode, SceneNode, TranslateNode, Vector};

/// Traversal state at a node.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VisitContext {
    /// Sum of ancestor translations: the node's local origin in global space.
    pub offset: Vector,
    /// Whether any ancestor is a clip node.
    pub clipped: bool,
    /// Number of translate and clip ancestors.
    pub depth: usize,
}

impl VisitContext {
    /// Express a global point in this context's local space.
    pub fn to_local(&self, global: Vector) -> Vector {
        global - self.offset
    }

    /// Express a local point in global space.
    pub fn to_global(&self, local: Vector) -> Vector {
        local + self.offset
    }

    fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            offset: self.offset.translate(dx, dy),
            depth: self.depth + 1,
            ..self
        }
    }

    fn inside_clip(self) -> Self {
        Self {
            clipped: true,
            depth: self.depth + 1,
            ..self
        }
    }
}

/// Callbacks for [`walk`].
///
/// Composition callbacks receive the context the composition node itself was
/// reached with, not the context of its child.
pub trait Visitor<'a> {
    /// Called for each leaf, in paint order.
    fn leaf(&mut self, node: &'a DrawNode, cx: &VisitContext);

    /// Called before descending into a translate node.
    fn enter_translate(&mut self, node: &'a TranslateNode, cx: &VisitContext) {
        let _ = (node, cx);
    }

    /// Called after leaving a translate node.
    fn exit_translate(&mut self, node: &'a TranslateNode, cx: &VisitContext) {
        let _ = (node, cx);
    }

    /// Called before descending into a clip node.
    fn enter_clip(&mut self, node: &'a ClipNode, cx: &VisitContext) {
        let _ = (node, cx);
    }

    /// Called after leaving a clip node.
    fn exit_clip(&mut self, node: &'a ClipNode, cx: &VisitContext) {
        let _ = (node, cx);
    }
}

/// Walk `root` depth-first, starting from the identity context.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(root: &'a SceneNode, visitor: &mut V) {
    walk_from(root, VisitContext::default(), visitor);
}

/// Walk `node` depth-first, starting from `cx`.
pub fn walk_from<'a, V: Visitor<'a> + ?Sized>(
    node: &'a SceneNode,
    cx: VisitContext,
    visitor: &mut V,
) {
    match node {
        SceneNode::Empty => {}
        SceneNode::Many(children) => {
            for child in children {
                walk_from(child, cx, visitor);
            }
        }
        SceneNode::Draw(leaf) => visitor.leaf(leaf, &cx),
        SceneNode::Translate(translate) => {
            visitor.enter_translate(translate, &cx);
            walk_from(
                &translate.child,
                cx.translated(translate.dx, translate.dy),
                visitor,
            );
            visitor.exit_translate(translate, &cx);
        }
        SceneNode::Clip(clip) => {
            visitor.enter_clip(clip, &cx);
            walk_from(&clip.child, cx.inside_clip(), visitor);
            visitor.exit_clip(clip, &cx);
        }
    }
}

struct Leaves<'a>(Vec<(&'a DrawNode, VisitContext)>);

impl<'a> Visitor<'a> for Leaves<'a> {
    fn leaf(&mut self, node: &'a DrawNode, cx: &VisitContext) {
        self.0.push((node, *cx));
    }
}

impl SceneNode {
    /// Every leaf with its traversal context, in paint order.
    pub fn leaves(&self) -> Vec<(&DrawNode, VisitContext)> {
        let mut leaves = Leaves(Vec::new());
        walk(self, &mut leaves);
        leaves.0
    }

    /// Global origin of the first leaf whose id is `id`.
    pub fn position_of(&self, id: &str) -> Option<Vector> {
        self.leaves()
            .into_iter()
            .find(|(node, _)| node.id.as_deref() == Some(id))
            .map(|(_, cx)| cx.offset)
    }
}
