// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Spatial Hash: add, move, query and remove boxes.

use spatial_hash::SpatialHash;

fn main() -> Result<(), spatial_hash::Error> {
    let mut hash: SpatialHash<u32> = SpatialHash::new(32.0);
    hash.add(1, 10.0, 10.0, 8.0, 8.0)?;
    hash.add(2, 30.0, 30.0, 10.0, 10.0)?;
    println!("cells after add: {}", hash.cell_count());

    // Move box 1 into the next column of cells.
    hash.update(1, 40.0, 10.0, 8.0, 8.0)?;
    println!("box 1 now spans {:?}", hash.cells_of(1));

    let hits = hash.query(0.0, 0.0, 64.0, 64.0)?.to_vec();
    println!("hits in (0,0,64,64): {hits:?}");

    hash.remove(2)?;
    println!("after remove: {hash:?}");
    Ok(())
}
