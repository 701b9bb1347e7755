// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Precise Hit: geometry-level hit testing for scene leaves.
//!
//! Two layers:
//!
//! - [`PreciseHitTest`]: "does this shape, in its local space, contain this
//!   point?" Implemented for scene draw commands and for whole [`DrawNode`]
//!   leaves.
//! - [`classify`]: walk a scene tree and split every leaf into the ones under
//!   a pointer ([`Classification::inner`]) and the rest
//!   ([`Classification::outer`]). Event dispatch is built on this.
//!
//! Containment rules per draw command:
//!
//! - Paths hit if the filled geometry contains the point under the command's
//!   fill rule. Stroking paints also hit inside the stroke outline built from
//!   the paint's width, caps, joins and miter limit. A degenerate stroke is a
//!   miss, never an error.
//! - Images hit inside their axis-aligned placement rectangle. There is no
//!   per-pixel alpha test.
//! - Text never hits.

mod classify;
mod stroke;

pub use classify::{Classification, Hit, classify};
pub use stroke::stroke_contains;

use canopy_imaging::fill_contains;
use canopy_scene::{DrawCommand, DrawNode, ImageDrawCommand, PathDrawCommand, TextDrawCommand};
use kurbo::Point;

/// Tuning for precise hit tests.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitParams {
    /// Extra distance, in local units, accepted on each side of a stroke.
    pub stroke_tolerance: f64,
    /// Curve flattening tolerance used when expanding strokes.
    pub tolerance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            stroke_tolerance: 0.0,
            tolerance: 0.1,
        }
    }
}

impl HitParams {
    /// Set [`HitParams::stroke_tolerance`].
    #[must_use]
    pub fn with_stroke_tolerance(mut self, stroke_tolerance: f64) -> Self {
        self.stroke_tolerance = stroke_tolerance;
        self
    }

    /// Set [`HitParams::tolerance`].
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// What part of a shape was hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitKind {
    /// The filled interior.
    Fill,
    /// The stroke outline.
    Stroke,
    /// An axis-aligned bounding rectangle.
    Bounds,
}

/// Result of a successful hit test.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitScore {
    /// Distance from the shape, `0.0` for interior hits.
    pub distance: f64,
    /// What was hit.
    pub kind: HitKind,
}

impl HitScore {
    const fn inside(kind: HitKind) -> Self {
        Self {
            distance: 0.0,
            kind,
        }
    }
}

/// Precise, local-space hit testing.
pub trait PreciseHitTest {
    /// Test `pt`, given in this shape's local coordinates.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;
}

impl PreciseHitTest for PathDrawCommand {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        if fill_contains(&self.path, self.fill_rule, pt) {
            return Some(HitScore::inside(HitKind::Fill));
        }
        let style = self.paint.stroke_style()?;
        stroke_contains(&self.path, style, pt, params).then_some(HitScore::inside(HitKind::Stroke))
    }
}

impl PreciseHitTest for ImageDrawCommand {
    fn hit_test_local(&self, pt: Point, _params: &HitParams) -> Option<HitScore> {
        self.rect
            .contains(pt.into())
            .then_some(HitScore::inside(HitKind::Bounds))
    }
}

impl PreciseHitTest for TextDrawCommand {
    fn hit_test_local(&self, _pt: Point, _params: &HitParams) -> Option<HitScore> {
        None
    }
}

impl PreciseHitTest for DrawCommand {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        match self {
            Self::Path(path) => path.hit_test_local(pt, params),
            Self::Image(image) => image.hit_test_local(pt, params),
            Self::Text(text) => text.hit_test_local(pt, params),
        }
    }
}

impl PreciseHitTest for DrawNode {
    /// The first command, in paint order, that contains the point.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        self.draw_calls
            .iter()
            .flat_map(|call| &call.commands)
            .find_map(|command| command.hit_test_local(pt, params))
    }
}
