// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke containment for scene paths.
//!
//! [`stroke_contains`] expands the stroke into an outline honoring width,
//! caps, joins and miter limit, then tests containment.

use canopy_imaging::{FillRule, StrokeStyle, fill_contains, stroke_outline};
use kurbo::{BezPath, Point};

use crate::HitParams;

/// Returns `true` if `pt` lies inside the outline of `path` stroked with `style`.
///
/// The stroke is widened by twice [`HitParams::stroke_tolerance`] so the
/// tolerance applies on both sides. Degenerate strokes never contain anything.
pub fn stroke_contains(path: &BezPath, style: &StrokeStyle, pt: Point, params: &HitParams) -> bool {
    let mut widened;
    let style = if params.stroke_tolerance > 0.0 {
        widened = style.clone();
        widened.width += 2.0 * params.stroke_tolerance;
        &widened
    } else {
        style
    };
    stroke_outline(path, style, params.tolerance)
        .is_some_and(|outline| fill_contains(&outline, FillRule::NonZero, pt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Cap, Line, Shape};

    #[test]
    fn caps_extend_the_outline() {
        let path = Line::new((0.0, 0.0), (10.0, 0.0)).to_path(0.1);
        let params = HitParams::default();
        let past_end = Point::new(11.0, 0.0);

        let butt = StrokeStyle::new(4.0).with_caps(Cap::Butt);
        let square = StrokeStyle::new(4.0).with_caps(Cap::Square);
        assert!(!stroke_contains(&path, &butt, past_end, &params));
        assert!(stroke_contains(&path, &square, past_end, &params));
    }

    #[test]
    fn tolerance_widens_the_stroke() {
        let path = Line::new((0.0, 0.0), (10.0, 0.0)).to_path(0.1);
        let style = StrokeStyle::new(2.0);
        let pt = Point::new(5.0, 1.5);

        assert!(!stroke_contains(&path, &style, pt, &HitParams::default()));
        let loose = HitParams::default().with_stroke_tolerance(1.0);
        assert!(stroke_contains(&path, &style, pt, &loose));
    }

    #[test]
    fn degenerate_stroke_is_a_miss() {
        let path = Line::new((0.0, 0.0), (10.0, 0.0)).to_path(0.1);
        let params = HitParams::default();
        assert!(!stroke_contains(&path, &StrokeStyle::new(0.0), Point::new(5.0, 0.0), &params));
        assert!(!stroke_contains(
            &path,
            &StrokeStyle::new(f64::NAN),
            Point::new(5.0, 0.0),
            &params
        ));
    }
}
