// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value-type geometry: [`Vector`] and the two-shaped [`Rect`].

use core::fmt;
use core::ops::{Add, Neg, Sub};

/// An immutable `(x, y)` pair used for points and offsets.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vector {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a vector.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns a new vector shifted by `(dx, dy)`.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Z component of the 3D cross product.
    pub fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns `true` if both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.translate(rhs.x, rhs.y)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.translate(-rhs.x, -rhs.y)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<kurbo::Point> for Vector {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Vector> for kurbo::Point {
    fn from(v: Vector) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<kurbo::Vec2> for Vector {
    fn from(v: kurbo::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector> for kurbo::Vec2 {
    fn from(v: Vector) -> Self {
        Self::new(v.x, v.y)
    }
}

/// An axis-aligned rectangle in one of two interchangeable shapes.
///
/// Accessors work on either shape. Comparisons with `==` are structural, so
/// an `Xywh` and an `Ltrb` describing the same area are not equal; compare
/// [`Rect::to_ltrb`] results when that matters.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rect {
    /// Corner plus size.
    Xywh {
        /// Left edge.
        x: f64,
        /// Top edge.
        y: f64,
        /// Horizontal extent.
        width: f64,
        /// Vertical extent.
        height: f64,
    },
    /// Four edges.
    Ltrb {
        /// Left edge.
        left: f64,
        /// Top edge.
        top: f64,
        /// Right edge.
        right: f64,
        /// Bottom edge.
        bottom: f64,
    },
}

impl Rect {
    /// Corner-plus-size constructor.
    pub const fn xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Xywh {
            x,
            y,
            width,
            height,
        }
    }

    /// Four-edge constructor.
    pub const fn ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::Ltrb {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Left edge (same as [`Rect::left`]).
    pub fn x(&self) -> f64 {
        self.left()
    }

    /// Top edge (same as [`Rect::top`]).
    pub fn y(&self) -> f64 {
        self.top()
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        match *self {
            Self::Xywh { width, .. } => width,
            Self::Ltrb { left, right, .. } => right - left,
        }
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        match *self {
            Self::Xywh { height, .. } => height,
            Self::Ltrb { top, bottom, .. } => bottom - top,
        }
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        match *self {
            Self::Xywh { x, .. } => x,
            Self::Ltrb { left, .. } => left,
        }
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        match *self {
            Self::Xywh { y, .. } => y,
            Self::Ltrb { top, .. } => top,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        match *self {
            Self::Xywh { x, width, .. } => x + width,
            Self::Ltrb { right, .. } => right,
        }
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        match *self {
            Self::Xywh { y, height, .. } => y + height,
            Self::Ltrb { bottom, .. } => bottom,
        }
    }

    /// Center point.
    pub fn center(&self) -> Vector {
        Vector::new(
            self.left() + self.width() / 2.0,
            self.top() + self.height() / 2.0,
        )
    }

    /// Returns `true` if either extent is zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// The same area as `Xywh`.
    #[must_use]
    pub fn to_xywh(&self) -> Self {
        Self::xywh(self.x(), self.y(), self.width(), self.height())
    }

    /// The same area as `Ltrb`.
    #[must_use]
    pub fn to_ltrb(&self) -> Self {
        Self::ltrb(self.left(), self.top(), self.right(), self.bottom())
    }

    /// Convert to a [`kurbo::Rect`] with ordered edges.
    pub fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.left(), self.top(), self.right(), self.bottom()).abs()
    }

    /// Returns `true` if `point` lies inside or on the edge of this rectangle.
    pub fn contains(&self, point: Vector) -> bool {
        let r = self.to_kurbo();
        r.x0 <= point.x && point.x <= r.x1 && r.y0 <= point.y && point.y <= r.y1
    }

    /// The smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::from(self.to_kurbo().union(other.to_kurbo()))
    }

    /// The overlap of both, or `None` if they do not overlap.
    ///
    /// Rectangles that only share an edge overlap in a zero-area rectangle.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let (a, b) = (self.to_kurbo(), other.to_kurbo());
        let left = a.x0.max(b.x0);
        let top = a.y0.max(b.y0);
        let right = a.x1.min(b.x1);
        let bottom = a.y1.min(b.y1);
        (left <= right && top <= bottom).then(|| Self::ltrb(left, top, right, bottom))
    }

    /// Returns the rectangle shifted by `(dx, dy)`, keeping its shape.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        match *self {
            Self::Xywh {
                x,
                y,
                width,
                height,
            } => Self::xywh(x + dx, y + dy, width, height),
            Self::Ltrb {
                left,
                top,
                right,
                bottom,
            } => Self::ltrb(left + dx, top + dy, right + dx, bottom + dy),
        }
    }
}

impl From<kurbo::Rect> for Rect {
    fn from(r: kurbo::Rect) -> Self {
        Self::ltrb(r.x0, r.y0, r.x1, r.y1)
    }
}
