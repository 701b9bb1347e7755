// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image fit modes and the source/destination rectangle math behind them.

use crate::Rect;

/// How an image is placed into its destination rectangle.
///
/// The names follow CSS `object-fit`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageFit {
    /// Stretch the whole image over the whole rectangle.
    #[default]
    Fill,
    /// Scale uniformly so the whole image fits, centered.
    Contain,
    /// Scale uniformly so the rectangle is covered, cropping the image.
    Cover,
    /// Like [`ImageFit::Contain`] if that shrinks the image, else [`ImageFit::None`].
    ScaleDown,
    /// Draw at natural size, centered, cropped to the rectangle.
    None,
}

impl ImageFit {
    /// Compute `(src, dst)` for drawing an `image_width` x `image_height`
    /// image into `rect`.
    ///
    /// `src` is in image pixel space; `dst` is in the same space as `rect`.
    /// Callers skip drawing when either size is zero.
    pub fn rects(self, image_width: f64, image_height: f64, rect: Rect) -> (Rect, Rect) {
        let whole = Rect::xywh(0.0, 0.0, image_width, image_height);
        match self {
            Self::Fill => (whole, rect),
            Self::Contain => (whole, contain_dst(image_width, image_height, rect)),
            Self::Cover => (cover_src(image_width, image_height, rect), rect),
            Self::None => natural_rects(image_width, image_height, rect),
            Self::ScaleDown => {
                let contain = Self::Contain.rects(image_width, image_height, rect);
                let natural = natural_rects(image_width, image_height, rect);
                if contain.1.width() < natural.1.width()
                    || contain.1.height() < natural.1.height()
                {
                    contain
                } else {
                    natural
                }
            }
        }
    }
}

fn contain_dst(image_width: f64, image_height: f64, rect: Rect) -> Rect {
    let image_ratio = image_width / image_height;
    let rect_ratio = rect.width() / rect.height();
    if image_ratio == rect_ratio {
        return rect;
    }
    if image_ratio > rect_ratio {
        let k = rect.width() / image_width;
        let dy = (rect.height() - k * image_height) / 2.0;
        Rect::xywh(rect.x(), rect.y() + dy, rect.width(), k * image_height)
    } else {
        let k = rect.height() / image_height;
        let dx = (rect.width() - k * image_width) / 2.0;
        Rect::xywh(rect.x() + dx, rect.y(), k * image_width, rect.height())
    }
}

fn cover_src(image_width: f64, image_height: f64, rect: Rect) -> Rect {
    let image_ratio = image_width / image_height;
    let rect_ratio = rect.width() / rect.height();
    if image_ratio == rect_ratio {
        return Rect::xywh(0.0, 0.0, image_width, image_height);
    }
    if image_ratio > rect_ratio {
        let k = rect.height() / image_height;
        let dx = (k * image_width - rect.width()) / (2.0 * k);
        Rect::xywh(dx, 0.0, image_width - 2.0 * dx, image_height)
    } else {
        let k = rect.width() / image_width;
        let dy = (k * image_height - rect.height()) / (2.0 * k);
        Rect::xywh(0.0, dy, image_width, image_height - 2.0 * dy)
    }
}

fn natural_rects(image_width: f64, image_height: f64, rect: Rect) -> (Rect, Rect) {
    // Per axis: a smaller image is drawn whole; a larger one is cropped around its center.
    let (src_x, src_width) = if image_width <= rect.width() {
        (0.0, image_width)
    } else {
        ((image_width - rect.width()) / 2.0, rect.width())
    };
    let (src_y, src_height) = if image_height <= rect.height() {
        (0.0, image_height)
    } else {
        ((image_height - rect.height()) / 2.0, rect.height())
    };
    let center = rect.center();
    (
        Rect::xywh(src_x, src_y, src_width, src_height),
        Rect::xywh(
            center.x - src_width / 2.0,
            center.y - src_height / 2.0,
            src_width,
            src_height,
        ),
    )
}
