// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial Hash: a sparse fixed-grid broad phase for dynamic 2D boxes.
//!
//! The plane is cut into square cells of a size chosen at construction. Each
//! registered object is listed in every cell its box overlaps, and a range
//! query visits only the cells under the query rectangle.
//!
//! - Add, update and remove axis-aligned boxes keyed by your own object ids.
//! - Query a rectangle or a point; objects spanning several cells are reported once.
//! - Moving an object inside the cells it already occupies costs a single store.
//! - Cell entries and query result sets are pooled, so steady-state frames do not allocate.
//!
//! Storage is sparse: only non-empty cells exist, and a cell is dropped as soon
//! as its last entry leaves. Coordinates may be negative; cell indices use true
//! floor division.
//!
//! # Example
//!
//! ```rust
//! use spatial_hash::SpatialHash;
//!
//! let mut hash: SpatialHash<u32> = SpatialHash::new(32.0);
//! hash.add(1, 10.0, 10.0, 8.0, 8.0)?;
//! hash.add(2, 30.0, 30.0, 10.0, 10.0)?; // straddles four cells
//!
//! let hits = hash.query(0.0, 0.0, 64.0, 64.0)?;
//! assert_eq!(hits.len(), 2);
//!
//! // Moving within the same cell does not touch the grid.
//! hash.update(1, 12.0, 12.0, 8.0, 8.0)?;
//! hash.remove(2)?;
//! assert_eq!(hash.query(32.0, 32.0, 8.0, 8.0)?.len(), 0);
//! # Ok::<(), spatial_hash::Error>(())
//! ```
//!
//! ## Candidates, not intersections
//!
//! Results are cell-level candidates: an object is returned when it shares a
//! cell with the query rectangle, even if the boxes themselves do not overlap.
//! Run the exact test yourself. [`SpatialHash::query_into`] fills a result set
//! you own, which leaves the index free for lookups while you filter:
//!
//! ```rust
//! use spatial_hash::{Aabb, QueryResults, SpatialHash};
//!
//! let mut hash: SpatialHash<&str, i64> = SpatialHash::new(64);
//! hash.add("near", 0, 0, 10, 10)?;
//! hash.add("far", 50, 50, 10, 10)?;
//!
//! let probe = Aabb::new(0, 0, 12, 12);
//! let mut candidates = QueryResults::new();
//! hash.query_into(probe.x, probe.y, probe.w, probe.h, |_| true, &mut candidates)?;
//! assert_eq!(candidates.len(), 2);
//!
//! let touching: Vec<_> = candidates
//!     .iter()
//!     .filter(|&&obj| hash.get_bbox(obj).is_some_and(|b| b.intersects(&probe)))
//!     .collect();
//! assert_eq!(touching, [&"near"]);
//! # Ok::<(), spatial_hash::Error>(())
//! ```
//!
//! ## Errors
//!
//! Adding an object twice, or updating/removing one that was never added, is a
//! caller bug and returns [`Error::DuplicateObject`] / [`Error::UnknownObject`].
//! Non-finite coordinates and negative sizes return [`Error::InvalidRegion`].
//! A failed call never changes the index.
//!
//! ## Threading
//!
//! The index is a plain single-writer data structure. Share it across threads
//! by wrapping the whole thing in a mutex.

pub mod cell;
pub mod error;
pub mod grid;
pub mod hash;
pub mod pool;
pub mod query;
mod registry;
pub mod types;

pub use cell::{Cell, CellIter};
pub use error::{Error, Result};
pub use grid::Grid;
pub use hash::SpatialHash;
pub use pool::{EntryHandle, EntryPool, PoolStats};
pub use query::QueryResults;
pub use types::{Aabb, CellCoord, CellSpan, Scalar};

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn add_update_query_remove() {
        init_logging();
        let mut hash: SpatialHash<u32> = SpatialHash::new(32.0);
        hash.add(1, 0.0, 0.0, 10.0, 10.0).unwrap();
        hash.add(2, 5.0, 5.0, 10.0, 10.0).unwrap();

        hash.update(1, 100.0, 0.0, 10.0, 10.0).unwrap();
        let hits = hash.query(0.0, 0.0, 16.0, 16.0).unwrap();
        assert_eq!(hits.as_slice(), [2]);

        hash.remove(2).unwrap();
        assert!(hash.query(0.0, 0.0, 16.0, 16.0).unwrap().is_empty());
        assert_eq!(hash.len(), 1);
    }

    #[test]
    fn negative_coordinates_use_their_own_cells() {
        init_logging();
        let mut hash: SpatialHash<u32, f32> = SpatialHash::new(16.0);
        hash.add(1, -8.0, -8.0, 4.0, 4.0).unwrap();
        hash.add(2, 4.0, 4.0, 4.0, 4.0).unwrap();
        assert_eq!(hash.cells_of(1).map(|s| (s.x0, s.y0)), Some((-1, -1)));
        assert_eq!(hash.query(-16.0, -16.0, 8.0, 8.0).unwrap().as_slice(), [1]);
        assert_eq!(hash.query(0.0, 0.0, 8.0, 8.0).unwrap().as_slice(), [2]);
    }

    #[test]
    fn errors_display() {
        assert_eq!(
            Error::UnknownObject.to_string(),
            "object is not registered"
        );
        assert_eq!(
            Error::DuplicateObject.to_string(),
            "object is already registered"
        );
    }

    #[test]
    fn debug_is_available_for_any_key() {
        #[derive(Copy, Clone, PartialEq, Eq, Hash)]
        struct Opaque(u16);

        let mut hash: SpatialHash<Opaque, i32> = SpatialHash::new(4);
        hash.add(Opaque(1), 0, 0, 1, 1).unwrap();
        assert!(format!("{hash:?}").contains("objects: 1"));
    }

    #[test]
    fn debug_is_concise() {
        let mut hash: SpatialHash<u32> = SpatialHash::new(8.0);
        hash.add(1, 0.0, 0.0, 20.0, 1.0).unwrap();
        let s = format!("{hash:?}");
        assert!(s.starts_with("SpatialHash"));
        assert!(s.contains("objects: 1"));
        assert!(s.contains("cells: 3"));
    }
}
