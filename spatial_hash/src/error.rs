// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for spatial hash operations.

use thiserror::Error;

/// Errors returned by [`SpatialHash`](crate::SpatialHash) operations.
///
/// All of them are contract violations by the caller. A call that fails leaves
/// the index exactly as it was before the call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// `add` was called with an object that is already registered.
    #[error("object is already registered")]
    DuplicateObject,

    /// `remove` or `update` was called with an object that is not registered.
    #[error("object is not registered")]
    UnknownObject,

    /// A box had a non-finite coordinate or a negative or non-finite extent.
    #[error("region must be finite with non-negative width and height")]
    InvalidRegion,

    /// The cell size was zero, negative, or not finite.
    #[error("cell size must be positive and finite")]
    InvalidCellSize,
}

/// Result alias using the crate [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
