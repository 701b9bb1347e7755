// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Imaging: backend-agnostic imaging IR and backend traits.
//!
//! This crate defines the narrow interface the scene engine uses to talk to an
//! immediate-mode 2D drawing library. It sits between the scene graph (which
//! is rebuilt every frame) and a concrete renderer (Skia, Vello, a web canvas,
//! or the recording backend in `canopy_imaging_ref`).
//!
//! # Core concepts
//!
//! - **Resources**: small, opaque handles ([`PathId`], [`PaintId`],
//!   [`ImageId`]) whose lifetimes are managed via [`ResourceBackend`].
//!   Nothing in this crate frees a resource on its own; per-frame resources
//!   are normally routed through `canopy_arena`.
//! - **Imaging operations**: [`StateOp`] (mutate state) and [`DrawOp`]
//!   (produce pixels), combined into [`ImagingOp`] for logging.
//! - **Backends**: [`ImagingBackend`] accepts imaging ops, measures text, and
//!   presents the frame with [`ImagingBackend::flush`].
//! - **Path geometry**: [`PathDesc::contains`] and [`PathDesc::stroke`] give
//!   the fill and stroke-outline containment tests used for hit testing.
//!
//! # Example
//!
//! ```ignore
//! # use canopy_imaging::*;
//! # use peniko::{Brush, Color};
//! # struct MyBackend { /* implements ResourceBackend + ImagingBackend */ }
//! let mut backend = MyBackend { /* ... */ };
//!
//! let paint = backend.create_paint(PaintDesc::fill(Brush::Solid(Color::WHITE)));
//! let path = backend.create_path(PathDesc::new(kurbo::Rect::new(0., 0., 10., 10.).to_path(0.1)));
//!
//! backend.draw(DrawOp::Path { path, paint });
//! backend.flush()?;
//! ```

#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt;
use kurbo::{BezPath, Point, Shape, StrokeOpts};
use peniko::Brush;
pub use peniko::{Fill as FillRule, ImageAlphaType, ImageFormat};

/// Identifier for a path resource.
///
/// This is a small, opaque handle that is stable for the lifetime of the
/// resource.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathId(pub u32);

/// Identifier for an image resource.
///
/// Images are typically created once and reused across frames until
/// explicitly destroyed.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Identifier for a paint resource.
///
/// This is a small, opaque handle that is stable for the lifetime of the
/// resource. Paints may be shared by many draw operations.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PaintId(pub u32);

/// Affine transform type used by the imaging IR.
pub type Affine = kurbo::Affine;

/// Stroke style carried by stroking paints.
///
/// This is a re-export of [`kurbo::Stroke`], which captures width, joins,
/// caps, miter limit, and dashes.
pub type StrokeStyle = kurbo::Stroke;

/// How a clip path combines with the current clip region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClipOp {
    /// Keep only what is inside the path.
    #[default]
    Intersect,
    /// Keep only what is outside the path.
    Difference,
}

/// State operations that mutate the current imaging state.
#[derive(Clone, Debug, PartialEq)]
pub enum StateOp {
    /// Set the current transform matrix.
    SetTransform(Affine),
    /// Push a clip scope.
    ///
    /// Clips must be well-nested: every `PushClip` must eventually be matched
    /// by a [`StateOp::PopClip`].
    PushClip {
        /// Path resource describing the clip region in local coordinates.
        path: PathId,
        /// How the path combines with the enclosing clip.
        op: ClipOp,
    },
    /// Pop the most recently pushed clip.
    PopClip,
}

/// Draw operations that produce pixels given the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill or stroke a path, depending on the paint's [`PaintStyle`].
    Path {
        /// Path resource to draw.
        path: PathId,
        /// Paint resource used for the draw.
        paint: PaintId,
    },
    /// Draw an image mapped to a destination rect from a source rect.
    ///
    /// - `src` is in image pixel coordinates.
    /// - `dst` is in local coordinates (subject to the current transform).
    ImageRect {
        /// Image resource to draw.
        image: ImageId,
        /// Source rectangle in image pixel coordinates.
        src: kurbo::Rect,
        /// Destination rectangle in local coordinates.
        dst: kurbo::Rect,
        /// Optional paint (alpha, filters) applied to the blit.
        paint: Option<PaintId>,
    },
    /// Draw a run of text with its baseline origin at `(x, y)`.
    GlyphRun {
        /// Text and font to shape.
        run: TextRun,
        /// Baseline origin X in local coordinates.
        x: f64,
        /// Baseline origin Y in local coordinates.
        y: f64,
        /// Paint used for the glyphs.
        paint: PaintId,
    },
}

/// Unified imaging operation used by backend logs.
#[derive(Clone, Debug, PartialEq)]
pub enum ImagingOp {
    /// State-changing operation.
    State(StateOp),
    /// Drawing operation.
    Draw(DrawOp),
}

/// Description of a path resource.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDesc {
    /// Path geometry in local coordinates.
    pub path: BezPath,
    /// Fill rule used for filling, clipping, and containment tests.
    pub fill_rule: FillRule,
}

impl PathDesc {
    /// Create a path description with the default [`FillRule::NonZero`] rule.
    pub fn new(path: BezPath) -> Self {
        Self {
            path,
            fill_rule: FillRule::NonZero,
        }
    }

    /// Set the fill rule.
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// Returns `true` if the filled geometry contains `pt` under this path's
    /// fill rule.
    pub fn contains(&self, pt: Point) -> bool {
        fill_contains(&self.path, self.fill_rule, pt)
    }

    /// Compute the filled outline of this path stroked with `style`.
    ///
    /// Returns `None` for degenerate input: a non-finite or non-positive
    /// width, or an outline with no segments.
    pub fn stroke(&self, style: &StrokeStyle, tolerance: f64) -> Option<BezPath> {
        stroke_outline(&self.path, style, tolerance)
    }
}

/// Returns `true` if `path`, filled with `fill_rule`, contains `pt`.
pub fn fill_contains(path: &BezPath, fill_rule: FillRule, pt: Point) -> bool {
    let winding = path.winding(pt);
    match fill_rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => winding % 2 != 0,
    }
}

/// Compute the filled outline of `path` stroked with `style`.
///
/// This is a backend-agnostic helper that turns stroke parameters (width,
/// caps, joins, miter limit, dashes) into a concrete outline suitable for
/// containment tests. Degenerate strokes yield `None`.
pub fn stroke_outline(path: &BezPath, style: &StrokeStyle, tolerance: f64) -> Option<BezPath> {
    if !style.width.is_finite() || style.width <= 0.0 || path.elements().is_empty() {
        return None;
    }
    let outline = kurbo::stroke(path.iter(), style, &StrokeOpts::default(), tolerance);
    if outline.elements().is_empty() {
        None
    } else {
        Some(outline)
    }
}

/// Whether a paint fills or strokes geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintStyle {
    /// Fill the interior of the geometry.
    Fill,
    /// Stroke the outline of the geometry with the given style.
    Stroke(StrokeStyle),
}

/// Description of a paint resource.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintDesc {
    /// Brush used when rendering (solid color, gradient, image, etc.).
    ///
    /// This is a [`peniko::Brush`], so backends can directly map it onto their
    /// native paint representation.
    pub brush: Brush,
    /// Fill or stroke.
    pub style: PaintStyle,
    /// Whether edges are anti-aliased.
    pub anti_alias: bool,
}

impl PaintDesc {
    /// An anti-aliased fill paint.
    pub fn fill(brush: impl Into<Brush>) -> Self {
        Self {
            brush: brush.into(),
            style: PaintStyle::Fill,
            anti_alias: true,
        }
    }

    /// An anti-aliased stroke paint.
    pub fn stroke(brush: impl Into<Brush>, style: StrokeStyle) -> Self {
        Self {
            brush: brush.into(),
            style: PaintStyle::Stroke(style),
            anti_alias: true,
        }
    }

    /// Returns the stroke style if this paint strokes.
    pub fn stroke_style(&self) -> Option<&StrokeStyle> {
        match &self.style {
            PaintStyle::Fill => None,
            PaintStyle::Stroke(style) => Some(style),
        }
    }
}

/// Description of an image resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageDesc {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel format of the image buffer.
    pub format: ImageFormat,
    /// Alpha encoding of the pixels (straight vs premultiplied).
    pub alpha_type: ImageAlphaType,
}

/// Font selection for a text run.
#[derive(Clone, Debug, PartialEq)]
pub struct FontDesc {
    /// Family name, resolved by the backend.
    pub family: String,
    /// Size in local units.
    pub size: f64,
}

impl FontDesc {
    /// Create a font description.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// A run of text in a single font.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// The text to shape and draw.
    pub text: String,
    /// Font used for every glyph in the run.
    pub font: FontDesc,
}

/// Measurements of a shaped [`TextRun`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the run.
    pub width: f64,
    /// Distance from the baseline to the top of the line box (positive).
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the line box (positive).
    pub descent: f64,
}

/// Error reported by [`ImagingBackend::flush`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlushError {
    message: String,
}

impl FlushError {
    /// Create a flush error with a backend-specific message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The backend-specific message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FlushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to flush surface: {}", self.message)
    }
}

impl core::error::Error for FlushError {}

/// Resource lifetime interface.
///
/// Backends implement this to manage their own resource storage.
///
/// Implementations are free to choose how resources are allocated and stored,
/// but they must ensure that IDs remain valid and refer to the same logical
/// resource until the corresponding `destroy_*` function is called.
/// Destroying an already destroyed resource must be harmless.
pub trait ResourceBackend {
    /// Create a path resource.
    fn create_path(&mut self, desc: PathDesc) -> PathId;
    /// Destroy a previously created path.
    fn destroy_path(&mut self, id: PathId);

    /// Create an image resource from raw pixels.
    ///
    /// The `pixels` slice is expected to contain tightly packed, row-major
    /// image data in the format named by `desc`.
    fn create_image(&mut self, desc: ImageDesc, pixels: &[u8]) -> ImageId;
    /// Destroy a previously created image.
    fn destroy_image(&mut self, id: ImageId);

    /// Create a paint resource.
    fn create_paint(&mut self, desc: PaintDesc) -> PaintId;
    /// Destroy a previously created paint.
    fn destroy_paint(&mut self, id: PaintId);
}

/// Minimal imaging backend trait.
///
/// This is the whole surface the frame lifecycle needs from a renderer:
/// state and draw entry points, text measurement, and presentation.
pub trait ImagingBackend: ResourceBackend {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);

    /// Measure a text run in the backend's font system.
    fn measure_text(&mut self, run: &TextRun) -> TextMetrics;

    /// Present everything drawn since the previous flush.
    fn flush(&mut self) -> Result<(), FlushError>;

    /// Set the current transform.
    ///
    /// This is equivalent to `self.state(StateOp::SetTransform(transform))`.
    #[inline]
    fn set_transform(&mut self, transform: Affine) {
        self.state(StateOp::SetTransform(transform));
    }

    /// Push a clip scope.
    ///
    /// The clip scope ends when you call [`ImagingBackend::pop_clip`].
    #[inline]
    fn push_clip(&mut self, path: PathId, op: ClipOp) {
        self.state(StateOp::PushClip { path, op });
    }

    /// Pop the most recently pushed clip.
    #[inline]
    fn pop_clip(&mut self) {
        self.state(StateOp::PopClip);
    }
}

/// Convenience helpers for `ImagingBackend` implementations and callers.
///
/// This is separate from [`ImagingBackend`] so that methods can accept closures and return values
/// without complicating trait object usage (`&mut dyn ImagingBackend`).
pub trait ImagingBackendExt: ImagingBackend {
    /// Run `f` inside a clip scope, popping it afterwards.
    ///
    /// Note: if `f` panics, the clip will not be popped.
    #[inline]
    fn with_clip<R>(&mut self, path: PathId, op: ClipOp, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push_clip(path, op);
        let out = f(self);
        self.pop_clip();
        out
    }
}

impl<B: ImagingBackend + ?Sized> ImagingBackendExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::{Circle, Line, Rect};
    use peniko::Color;

    /// Trivial in-memory backend that records operations for testing.
    #[derive(Default)]
    struct RecordingBackend {
        next_path: u32,
        next_paint: u32,
        next_image: u32,
        ops: Vec<ImagingOp>,
        flushes: u32,
    }

    impl ResourceBackend for RecordingBackend {
        fn create_path(&mut self, _desc: PathDesc) -> PathId {
            let id = self.next_path;
            self.next_path += 1;
            PathId(id)
        }

        fn destroy_path(&mut self, _id: PathId) {}

        fn create_image(&mut self, _desc: ImageDesc, _pixels: &[u8]) -> ImageId {
            let id = self.next_image;
            self.next_image += 1;
            ImageId(id)
        }

        fn destroy_image(&mut self, _id: ImageId) {}

        fn create_paint(&mut self, _desc: PaintDesc) -> PaintId {
            let id = self.next_paint;
            self.next_paint += 1;
            PaintId(id)
        }

        fn destroy_paint(&mut self, _id: PaintId) {}
    }

    impl ImagingBackend for RecordingBackend {
        fn state(&mut self, op: StateOp) {
            self.ops.push(ImagingOp::State(op));
        }

        fn draw(&mut self, op: DrawOp) {
            self.ops.push(ImagingOp::Draw(op));
        }

        fn measure_text(&mut self, _run: &TextRun) -> TextMetrics {
            TextMetrics::default()
        }

        fn flush(&mut self) -> Result<(), FlushError> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn record_basic_ops() {
        let mut backend = RecordingBackend::default();

        let paint = backend.create_paint(PaintDesc::fill(Color::WHITE));
        let path = backend.create_path(PathDesc::new(Rect::new(0., 0., 1., 1.).to_path(0.1)));

        backend.draw(DrawOp::Path { path, paint });
        backend.flush().unwrap();

        assert_eq!(backend.ops.len(), 1);
        assert_eq!(backend.flushes, 1);
    }

    #[test]
    fn with_clip_is_well_nested() {
        let mut backend = RecordingBackend::default();
        let path = backend.create_path(PathDesc::new(Rect::new(0., 0., 1., 1.).to_path(0.1)));
        let paint = backend.create_paint(PaintDesc::fill(Color::WHITE));

        backend.with_clip(path, ClipOp::Difference, |b| {
            b.draw(DrawOp::Path { path, paint });
        });

        assert_eq!(
            backend.ops,
            [
                ImagingOp::State(StateOp::PushClip {
                    path,
                    op: ClipOp::Difference
                }),
                ImagingOp::Draw(DrawOp::Path { path, paint }),
                ImagingOp::State(StateOp::PopClip),
            ]
        );
    }

    #[test]
    fn fill_rule_changes_containment_of_overlapping_subpaths() {
        // Two concentric squares wound the same way: the inner region has winding 2.
        let mut path = Rect::new(0., 0., 10., 10.).to_path(0.1);
        path.extend(Rect::new(2., 2., 8., 8.).path_elements(0.1));

        let non_zero = PathDesc::new(path.clone());
        let even_odd = PathDesc::new(path).with_fill_rule(FillRule::EvenOdd);

        let center = Point::new(5., 5.);
        let ring = Point::new(1., 5.);
        assert!(non_zero.contains(center));
        assert!(!even_odd.contains(center));
        assert!(non_zero.contains(ring));
        assert!(even_odd.contains(ring));
    }

    #[test]
    fn stroke_outline_covers_the_centerline() {
        let mut path = BezPath::new();
        path.move_to((0., 0.));
        path.line_to((10., 0.));
        let desc = PathDesc::new(path);

        let outline = desc.stroke(&StrokeStyle::new(2.0), 0.1).unwrap();
        assert!(fill_contains(&outline, FillRule::NonZero, Point::new(5., 0.5)));
        assert!(!fill_contains(&outline, FillRule::NonZero, Point::new(5., 3.0)));
    }

    #[test]
    fn degenerate_strokes_yield_none() {
        let desc = PathDesc::new(Circle::new((0., 0.), 5.).to_path(0.1));
        assert!(desc.stroke(&StrokeStyle::new(0.0), 0.1).is_none());
        assert!(desc.stroke(&StrokeStyle::new(f64::NAN), 0.1).is_none());
        assert!(PathDesc::new(BezPath::new())
            .stroke(&StrokeStyle::new(1.0), 0.1)
            .is_none());
        let line = Line::new((0., 0.), (10., 0.));
        assert!(PathDesc::new(line.to_path(0.1))
            .stroke(&StrokeStyle::new(f64::INFINITY), 0.1)
            .is_none());
    }

    #[test]
    fn paint_stroke_style_accessor() {
        let fill = PaintDesc::fill(Color::BLACK);
        let stroke = PaintDesc::stroke(Color::BLACK, StrokeStyle::new(3.0));
        assert!(fill.stroke_style().is_none());
        assert_eq!(stroke.stroke_style().map(|s| s.width), Some(3.0));
    }
}
