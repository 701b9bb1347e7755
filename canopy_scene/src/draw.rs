// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw calls and the primitive commands they carry.

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use canopy_imaging::{FillRule, FontDesc, PaintDesc, PathDesc};
use kurbo::{BezPath, Shape};

use crate::Rect;
use crate::fit::ImageFit;

/// An ordered group of primitive drawing operations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawCall {
    /// Commands in paint order.
    pub commands: Vec<DrawCommand>,
}

impl DrawCall {
    /// Create a draw call from its commands.
    pub fn new(commands: impl IntoIterator<Item = DrawCommand>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }
}

impl From<DrawCommand> for DrawCall {
    fn from(command: DrawCommand) -> Self {
        Self {
            commands: Vec::from([command]),
        }
    }
}

/// A primitive drawing operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Fill or stroke a path.
    Path(PathDrawCommand),
    /// Blit an image into a rectangle.
    Image(ImageDrawCommand),
    /// Draw a run of text.
    Text(TextDrawCommand),
}

impl From<PathDrawCommand> for DrawCommand {
    fn from(command: PathDrawCommand) -> Self {
        Self::Path(command)
    }
}

impl From<ImageDrawCommand> for DrawCommand {
    fn from(command: ImageDrawCommand) -> Self {
        Self::Image(command)
    }
}

impl From<TextDrawCommand> for DrawCommand {
    fn from(command: TextDrawCommand) -> Self {
        Self::Text(command)
    }
}

/// Fill or stroke `path` with `paint`.
///
/// Whether the path is filled or stroked is decided by the paint's style.
#[derive(Clone, Debug, PartialEq)]
pub struct PathDrawCommand {
    /// Geometry in the leaf's local coordinates.
    pub path: BezPath,
    /// Fill rule for filling and containment.
    pub fill_rule: FillRule,
    /// Paint applied to the path.
    pub paint: PaintDesc,
}

impl PathDrawCommand {
    /// Create a path command using the non-zero fill rule.
    pub fn new(path: BezPath, paint: PaintDesc) -> Self {
        Self {
            path,
            fill_rule: FillRule::NonZero,
            paint,
        }
    }

    /// Set the fill rule.
    pub fn with_fill_rule(mut self, fill_rule: FillRule) -> Self {
        self.fill_rule = fill_rule;
        self
    }

    /// A backend path descriptor for this command's geometry.
    pub fn path_desc(&self) -> PathDesc {
        PathDesc::new(self.path.clone()).with_fill_rule(self.fill_rule)
    }

    /// Local-space bounds of what this command paints.
    ///
    /// Stroking paints include the stroke outline.
    pub fn bounds(&self) -> Option<Rect> {
        if self.path.elements().is_empty() {
            return None;
        }
        let fill = self.path.bounding_box();
        let bounds = match self.paint.stroke_style() {
            Some(style) => canopy_imaging::stroke_outline(&self.path, style, 0.1)
                .map_or(fill, |outline| outline.bounding_box().union(fill)),
            None => fill,
        };
        Some(Rect::from(bounds))
    }
}

/// Decoded straight-alpha RGBA8 pixels.
///
/// Cloning is cheap: pixel storage is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub pixels: Arc<[u8]>,
}

impl DecodedImage {
    /// Wrap already-decoded RGBA8 pixels.
    pub fn new(width: u32, height: u32, pixels: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// Returns `true` if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels", &format_args!("[{} bytes]", self.pixels.len()))
            .finish()
    }
}

/// Where an image command gets its pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// Loaded asynchronously through the asset cache.
    Url(String),
    /// Already decoded.
    Image(Arc<DecodedImage>),
}

/// Blit an image into `rect`, positioned by `fit`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageDrawCommand {
    /// Placement rectangle in local coordinates. This is also the hit area.
    pub rect: Rect,
    /// Pixel source.
    pub source: ImageSource,
    /// How the image maps into `rect`.
    pub fit: ImageFit,
    /// Optional paint for the blit.
    pub paint: Option<PaintDesc>,
}

/// Draw `text` anchored at `(x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDrawCommand {
    /// The text.
    pub text: String,
    /// Font family and size.
    pub font: FontDesc,
    /// Anchor X in local coordinates.
    pub x: f64,
    /// Anchor Y in local coordinates.
    pub y: f64,
    /// Glyph paint.
    pub paint: PaintDesc,
    /// Horizontal placement relative to the anchor.
    pub align: TextAlign,
    /// Vertical placement relative to the anchor.
    pub baseline: TextBaseline,
}

/// Error for a name that matches no variant of a closed enum.
///
/// An unknown name is a broken caller, not a runtime condition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{name}`")]
pub struct UnknownVariant {
    /// The enum being parsed.
    pub kind: &'static str,
    /// The rejected name.
    pub name: String,
}

/// Horizontal text placement relative to the anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAlign {
    /// Text starts at the anchor.
    #[default]
    Left,
    /// Text is centered on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

impl FromStr for TextAlign {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(UnknownVariant {
                kind: "text align",
                name: s.into(),
            }),
        }
    }
}

/// Vertical text placement relative to the anchor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextBaseline {
    /// The anchor is the top of the line box.
    #[default]
    Top,
    /// The anchor is the vertical middle of the line box.
    Middle,
    /// The anchor is the bottom of the line box.
    Bottom,
}

impl FromStr for TextBaseline {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err(UnknownVariant {
                kind: "text baseline",
                name: s.into(),
            }),
        }
    }
}
