// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: boxes, scalars, cell coordinates and spans.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D, stored as origin and size.
///
/// Zero-size boxes (points and segments) are valid. Negative or non-finite
/// extents are rejected by the index with [`Error::InvalidRegion`](crate::Error::InvalidRegion).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Aabb<T> {
    /// Left edge.
    pub x: T,
    /// Top edge.
    pub y: T,
    /// Width.
    pub w: T,
    /// Height.
    pub h: T,
}

impl<T> Aabb<T> {
    /// Create a new box from origin and size.
    pub const fn new(x: T, y: T, w: T, h: T) -> Self {
        Self { x, y, w, h }
    }
}

impl<T: Copy> Aabb<T> {
    /// The box as an `(x, y, w, h)` tuple.
    pub const fn to_tuple(self) -> (T, T, T, T) {
        (self.x, self.y, self.w, self.h)
    }
}

impl<T> From<(T, T, T, T)> for Aabb<T> {
    fn from((x, y, w, h): (T, T, T, T)) -> Self {
        Self::new(x, y, w, h)
    }
}

impl<T: Scalar> Aabb<T> {
    /// Right edge (`x + w`).
    pub fn max_x(&self) -> T {
        T::add(self.x, self.w)
    }

    /// Bottom edge (`y + h`).
    pub fn max_y(&self) -> T {
        T::add(self.y, self.h)
    }

    /// True if all components are finite and both extents are non-negative.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.w.is_finite()
            && self.h.is_finite()
            && le(T::zero(), self.w)
            && le(T::zero(), self.h)
    }

    /// Whether the closed box contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.x, x) && le(self.y, y) && le(x, self.max_x()) && le(y, self.max_y())
    }

    /// Whether two closed boxes overlap (touching edges count).
    ///
    /// The index only returns cell-level candidates; this is the narrow-phase
    /// test callers typically run on them.
    pub fn intersects(&self, other: &Self) -> bool {
        le(self.x, other.max_x())
            && le(other.x, self.max_x())
            && le(self.y, other.max_y())
            && le(other.y, self.max_y())
    }
}

/// Numeric scalar abstraction for box coordinates.
///
/// Provides the handful of operations the grid needs: saturating arithmetic,
/// a finiteness check and floor division into integer cell indices.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// One unit (used for the inclusive far edge of a span).
    fn one() -> Self;

    /// Add two scalar values. Integer impls saturate.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b. Integer impls saturate.
    fn sub(a: Self, b: Self) -> Self;

    /// False for NaN and infinities. Always true for integers.
    fn is_finite(self) -> bool;

    /// `floor(v / cell_size)` as a cell index, saturated to the `i32` range.
    ///
    /// Must be true floor division so negative coordinates map to the cell
    /// below zero rather than truncating toward it.
    fn cell_index(v: Self, cell_size: Self) -> i32;
}

macro_rules! impl_float_scalar {
    ($t:ty) => {
        impl Scalar for $t {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }

            #[inline]
            fn add(a: Self, b: Self) -> Self {
                a + b
            }

            #[inline]
            fn sub(a: Self, b: Self) -> Self {
                a - b
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            #[inline]
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Float to i32 casts saturate; out-of-range cells clamp to the grid edge."
            )]
            fn cell_index(v: Self, cell_size: Self) -> i32 {
                debug_assert!(cell_size > 0.0, "cell size must be positive");
                (v / cell_size).floor() as i32
            }
        }
    };
}

macro_rules! impl_int_scalar {
    ($t:ty, $narrow:path) => {
        impl Scalar for $t {
            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn one() -> Self {
                1
            }

            #[inline]
            fn add(a: Self, b: Self) -> Self {
                a.saturating_add(b)
            }

            #[inline]
            fn sub(a: Self, b: Self) -> Self {
                a.saturating_sub(b)
            }

            #[inline]
            fn is_finite(self) -> bool {
                true
            }

            #[inline]
            fn cell_index(v: Self, cell_size: Self) -> i32 {
                debug_assert!(cell_size > 0, "cell size must be positive");
                $narrow(v.div_euclid(cell_size))
            }
        }
    };
}

impl_float_scalar!(f32);
impl_float_scalar!(f64);
impl_int_scalar!(i32, core::convert::identity);
impl_int_scalar!(i64, saturate_i64);

fn saturate_i64(q: i64) -> i32 {
    i32::try_from(q).unwrap_or(if q < 0 { i32::MIN } else { i32::MAX })
}

/// Integer coordinate of a grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Column.
    pub cx: i32,
    /// Row.
    pub cy: i32,
}

impl CellCoord {
    /// Create a cell coordinate.
    pub const fn new(cx: i32, cy: i32) -> Self {
        Self { cx, cy }
    }

    /// Pack both signed components into one 64-bit key (column high, row low).
    #[inline]
    pub const fn pack(self) -> u64 {
        ((self.cx as u32 as u64) << 32) | (self.cy as u32 as u64)
    }

    /// Inverse of [`CellCoord::pack`].
    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Each half of the key holds exactly one 32-bit component."
    )]
    pub const fn unpack(key: u64) -> Self {
        Self {
            cx: (key >> 32) as u32 as i32,
            cy: key as u32 as i32,
        }
    }
}

/// Inclusive rectangular range of cells covered by a box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellSpan {
    /// First column.
    pub x0: i32,
    /// First row.
    pub y0: i32,
    /// Last column (inclusive).
    pub x1: i32,
    /// Last row (inclusive).
    pub y1: i32,
}

impl CellSpan {
    /// Span of cells covered by `bbox` for a grid of `cell_size`.
    ///
    /// The far edge is `floor((x + w - 1) / cell_size)`, so a box ending exactly
    /// on a cell boundary does not claim the next cell. A zero width or height
    /// collapses that axis to the starting column or row, and so does any
    /// extent shorter than one unit.
    pub fn of<T: Scalar>(bbox: &Aabb<T>, cell_size: T) -> Self {
        let x0 = T::cell_index(bbox.x, cell_size);
        let y0 = T::cell_index(bbox.y, cell_size);
        let x1 = far_index(bbox.x, bbox.w, cell_size).max(x0);
        let y1 = far_index(bbox.y, bbox.h, cell_size).max(y0);
        Self { x0, y0, x1, y1 }
    }

    /// Span holding exactly one cell.
    pub const fn single(coord: CellCoord) -> Self {
        Self {
            x0: coord.cx,
            y0: coord.cy,
            x1: coord.cx,
            y1: coord.cy,
        }
    }

    /// Number of columns.
    pub const fn columns(&self) -> u64 {
        (self.x1 as i64 - self.x0 as i64).unsigned_abs() + 1
    }

    /// Number of rows.
    pub const fn rows(&self) -> u64 {
        (self.y1 as i64 - self.y0 as i64).unsigned_abs() + 1
    }

    /// Number of cells in the span, saturating at `u64::MAX`.
    pub const fn cell_count(&self) -> u64 {
        self.columns().saturating_mul(self.rows())
    }

    /// Whether the coordinate lies inside the span.
    pub const fn contains(&self, coord: CellCoord) -> bool {
        self.x0 <= coord.cx && coord.cx <= self.x1 && self.y0 <= coord.cy && coord.cy <= self.y1
    }

    /// Iterate the covered coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + use<> {
        let Self { x0, y0, x1, y1 } = *self;
        (y0..=y1).flat_map(move |cy| (x0..=x1).map(move |cx| CellCoord::new(cx, cy)))
    }
}

fn far_index<T: Scalar>(origin: T, extent: T, cell_size: T) -> i32 {
    if extent == T::zero() {
        return T::cell_index(origin, cell_size);
    }
    T::cell_index(T::sub(T::add(origin, extent), T::one()), cell_size)
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_of_box_inside_one_cell() {
        let span = CellSpan::of(&Aabb::new(10.0, 10.0, 8.0, 8.0), 32.0);
        assert_eq!(span, CellSpan::single(CellCoord::new(0, 0)));
        assert_eq!(span.cell_count(), 1);
    }

    #[test]
    fn span_crossing_boundary_covers_four_cells() {
        let span = CellSpan::of(&Aabb::new(30.0, 30.0, 10.0, 10.0), 32.0);
        assert_eq!(
            span,
            CellSpan {
                x0: 0,
                y0: 0,
                x1: 1,
                y1: 1
            }
        );
        let cells: Vec<_> = span.iter().collect();
        assert_eq!(
            cells,
            [
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1)
            ]
        );
    }

    #[test]
    fn box_ending_on_boundary_stays_in_cell() {
        // 0..32 ends exactly on the boundary: only column 0.
        let span = CellSpan::of(&Aabb::new(0_i64, 0, 32, 32), 32);
        assert_eq!(span.cell_count(), 1);
        let span = CellSpan::of(&Aabb::new(0_i64, 0, 33, 32), 32);
        assert_eq!(span.columns(), 2);
        assert_eq!(span.rows(), 1);
    }

    #[test]
    fn zero_size_box_on_boundary_uses_starting_cell() {
        let span = CellSpan::of(&Aabb::new(32.0, 64.0, 0.0, 0.0), 32.0);
        assert_eq!(span, CellSpan::single(CellCoord::new(1, 2)));
        let span = CellSpan::of(&Aabb::new(32_i32, 0, 0, 10), 32);
        assert_eq!(span, CellSpan::single(CellCoord::new(1, 0)));
    }

    #[test]
    fn sub_unit_extent_collapses_to_start() {
        let span = CellSpan::of(&Aabb::new(32.0_f32, 0.0, 0.5, 0.5), 32.0);
        assert_eq!(span, CellSpan::single(CellCoord::new(1, 0)));
    }

    #[test]
    fn negative_coordinates_floor_toward_negative_infinity() {
        assert_eq!(f64::cell_index(-0.5, 32.0), -1);
        assert_eq!(f64::cell_index(-32.0, 32.0), -1);
        assert_eq!(f64::cell_index(-32.5, 32.0), -2);
        assert_eq!(i64::cell_index(-1, 32), -1);
        assert_eq!(i32::cell_index(-33, 32), -2);

        let span = CellSpan::of(&Aabb::new(-10.0, -40.0, 20.0, 8.0), 32.0);
        assert_eq!(
            span,
            CellSpan {
                x0: -1,
                y0: -2,
                x1: 0,
                y1: -2
            }
        );
    }

    #[test]
    fn integer_indices_saturate() {
        assert_eq!(i64::cell_index(i64::MAX, 1), i32::MAX);
        assert_eq!(i64::cell_index(i64::MIN, 1), i32::MIN);
        assert_eq!(i32::cell_index(i32::MAX, 1), i32::MAX);
        assert_eq!(i32::cell_index(i32::MIN, 2), i32::MIN / 2);
        assert_eq!(f64::cell_index(1e300, 1.0), i32::MAX);
    }

    #[test]
    fn pack_round_trips_signed_components() {
        for coord in [
            CellCoord::new(0, 0),
            CellCoord::new(-1, 7),
            CellCoord::new(i32::MIN, i32::MAX),
        ] {
            assert_eq!(CellCoord::unpack(coord.pack()), coord);
        }
        assert_ne!(CellCoord::new(1, 0).pack(), CellCoord::new(0, 1).pack());
    }

    #[test]
    fn span_count_saturates() {
        let span = CellSpan {
            x0: i32::MIN,
            y0: i32::MIN,
            x1: i32::MAX,
            y1: i32::MAX,
        };
        assert_eq!(span.columns(), 1 << 32);
        assert_eq!(span.cell_count(), u64::MAX);
    }

    #[test]
    fn validity_rejects_negative_and_non_finite() {
        assert!(Aabb::new(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Aabb::new(0.0, 0.0, -1.0, 0.0).is_valid());
        assert!(!Aabb::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
        assert!(!Aabb::new(0.0, 0.0, f64::INFINITY, 1.0).is_valid());
        assert!(!Aabb::new(0_i64, 0, 0, -3).is_valid());
    }

    #[test]
    fn intersects_counts_touching_edges() {
        let a = Aabb::new(0, 0, 10, 10);
        assert!(a.intersects(&Aabb::new(10, 10, 5, 5)));
        assert!(!a.intersects(&Aabb::new(11, 0, 5, 5)));
        assert!(a.contains_point(10, 0));
    }
}
