// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only inspection as a debug overlay would do it: list live cells and
//! the boxes visible in a viewport without mutating the index.

use spatial_hash::{QueryResults, SpatialHash};

fn main() -> Result<(), spatial_hash::Error> {
    env_logger::init();

    let mut hash: SpatialHash<&str, i32> = SpatialHash::new(16);
    hash.add("player", 4, 4, 8, 8)?;
    hash.add("crate", 14, 2, 6, 6)?;
    hash.add("door", -20, 0, 4, 24)?;
    log::info!("index: {hash:?}");

    let mut cells: Vec<_> = hash.live_cells().collect();
    cells.sort();
    for coord in &cells {
        println!("cell ({:>3}, {:>3})", coord.cx, coord.cy);
    }

    let mut visible = QueryResults::new();
    hash.query_into(0, 0, 32, 16, |_| true, &mut visible)?;
    let mut names: Vec<_> = visible.iter().copied().collect();
    names.sort_unstable();
    for name in names {
        if let Some(b) = hash.get_bbox(name) {
            println!("{name:<8} at {:?}", b.to_tuple());
        }
    }
    Ok(())
}
