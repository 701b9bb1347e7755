// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The draw walk: turn a scene tree into backend operations.
//!
//! - Translate nodes set the backend transform to the accumulated offset on
//!   entry and restore the enclosing offset on exit.
//! - Clip nodes push a clip built from an arena path and pop it on exit.
//! - Paths and paints for the frame come from the
//!   [`ResourceArena`](canopy_arena::ResourceArena) and die at the next release.
//! - Images come from an [`ImageRegistry`] and survive across frames. URL
//!   sources go through the [`AssetCache`]; a miss skips the command for this
//!   frame.

use std::sync::Arc;
use std::time::Instant;

use canopy_arena::FrameResources;
use canopy_assets::AssetCache;
use canopy_imaging::{DrawOp, ImagingBackend, TextMetrics, TextRun};
use canopy_scene::visit::{VisitContext, Visitor, walk};
use canopy_scene::{
    ClipNode, DecodedImage, DrawCommand, DrawNode, ImageDrawCommand, ImageSource,
    PathDrawCommand, SceneNode, TextAlign, TextBaseline, TextDrawCommand, TranslateNode, Vector,
};
use kurbo::Affine;

use crate::ImageRegistry;

/// Counts of what a draw walk issued.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// `DrawOp::Path` operations.
    pub paths: usize,
    /// `DrawOp::ImageRect` operations.
    pub images: usize,
    /// `DrawOp::GlyphRun` operations.
    pub glyph_runs: usize,
    /// Image commands skipped because the pixels were not ready or had no area.
    pub skipped_images: usize,
}

/// Everything a draw walk needs besides the tree.
pub struct DrawContext<'a, B: ImagingBackend + ?Sized> {
    resources: FrameResources<'a, B>,
    images: &'a mut ImageRegistry,
    assets: Option<&'a AssetCache>,
    now: Instant,
    stats: DrawStats,
}

impl<B: ImagingBackend + ?Sized> core::fmt::Debug for DrawContext<'_, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DrawContext")
            .field("resources", &self.resources)
            .field("images", &self.images.len())
            .field("assets", &self.assets.is_some())
            .field("now", &self.now)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, B: ImagingBackend + ?Sized> DrawContext<'a, B> {
    /// Bundle the frame's allocation scope, the long-lived image registry and
    /// an optional asset cache. `now` drives the cache's retry cooldown.
    pub fn new(
        resources: FrameResources<'a, B>,
        images: &'a mut ImageRegistry,
        assets: Option<&'a AssetCache>,
        now: Instant,
    ) -> Self {
        Self {
            resources,
            images,
            assets,
            now,
            stats: DrawStats::default(),
        }
    }

    /// What has been issued so far.
    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    fn set_offset(&mut self, offset: Vector) {
        self.resources
            .backend()
            .set_transform(Affine::translate((offset.x, offset.y)));
    }

    fn path(&mut self, cmd: &PathDrawCommand) {
        let path = self.resources.path(cmd.path_desc()).id();
        let paint = self.resources.paint(cmd.paint.clone()).id();
        self.resources.backend().draw(DrawOp::Path { path, paint });
        self.stats.paths += 1;
    }

    fn resolve(&self, source: &ImageSource) -> Option<Arc<DecodedImage>> {
        match source {
            ImageSource::Image(image) => Some(image.clone()),
            ImageSource::Url(url) => self.assets?.try_load_at(url, self.now),
        }
    }

    fn image(&mut self, cmd: &ImageDrawCommand) {
        let Some(image) = self.resolve(&cmd.source) else {
            self.stats.skipped_images += 1;
            return;
        };
        if cmd.rect.is_empty() || image.is_empty() {
            self.stats.skipped_images += 1;
            return;
        }
        let (src, dst) = cmd
            .fit
            .rects(f64::from(image.width), f64::from(image.height), cmd.rect);
        if src.is_empty() || dst.is_empty() {
            self.stats.skipped_images += 1;
            return;
        }

        let id = self.images.register(self.resources.backend(), &image);
        let paint = cmd.paint.clone().map(|p| self.resources.paint(p).id());
        self.resources.backend().draw(DrawOp::ImageRect {
            image: id,
            src: src.to_kurbo(),
            dst: dst.to_kurbo(),
            paint,
        });
        self.stats.images += 1;
    }

    fn text(&mut self, cmd: &TextDrawCommand) {
        let run = TextRun {
            text: cmd.text.clone(),
            font: cmd.font.clone(),
        };
        let metrics = self.resources.backend().measure_text(&run);
        let (x, y) = text_origin(cmd, &metrics);
        let paint = self.resources.paint(cmd.paint.clone()).id();
        self.resources
            .backend()
            .draw(DrawOp::GlyphRun { run, x, y, paint });
        self.stats.glyph_runs += 1;
    }
}

impl<'t, B: ImagingBackend + ?Sized> Visitor<'t> for DrawContext<'_, B> {
    fn leaf(&mut self, node: &'t DrawNode, _cx: &VisitContext) {
        for command in node.draw_calls.iter().flat_map(|call| &call.commands) {
            match command {
                DrawCommand::Path(cmd) => self.path(cmd),
                DrawCommand::Image(cmd) => self.image(cmd),
                DrawCommand::Text(cmd) => self.text(cmd),
            }
        }
    }

    fn enter_translate(&mut self, node: &'t TranslateNode, cx: &VisitContext) {
        self.set_offset(cx.offset.translate(node.dx, node.dy));
    }

    fn exit_translate(&mut self, _node: &'t TranslateNode, cx: &VisitContext) {
        self.set_offset(cx.offset);
    }

    fn enter_clip(&mut self, node: &'t ClipNode, _cx: &VisitContext) {
        let path = self
            .resources
            .path(canopy_imaging::PathDesc::new(node.path.clone()))
            .id();
        self.resources.backend().push_clip(path, node.clip_op);
    }

    fn exit_clip(&mut self, _node: &'t ClipNode, _cx: &VisitContext) {
        self.resources.backend().pop_clip();
    }
}

/// Where the glyph run of `cmd` starts, given its measured `metrics`.
///
/// The anchor `(x, y)` is moved left by the full or half advance for right
/// and centered text, and down to the baseline according to
/// [`TextDrawCommand::baseline`].
pub fn text_origin(cmd: &TextDrawCommand, metrics: &TextMetrics) -> (f64, f64) {
    let dx = match cmd.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => -metrics.width / 2.0,
        TextAlign::Right => -metrics.width,
    };
    let dy = match cmd.baseline {
        TextBaseline::Top => metrics.ascent,
        TextBaseline::Middle => (metrics.ascent - metrics.descent) / 2.0,
        TextBaseline::Bottom => -metrics.descent,
    };
    (cmd.x + dx, cmd.y + dy)
}

/// Issue backend operations for every leaf of `tree`, in paint order.
pub fn draw_tree<B: ImagingBackend + ?Sized>(
    tree: &SceneNode,
    cx: &mut DrawContext<'_, B>,
) -> DrawStats {
    walk(tree, cx);
    cx.stats
}
