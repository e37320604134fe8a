// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small simulation loop: agents move every tick, the hash tracks them, and
//! each tick gathers broad-phase candidates before an exact overlap test.

use spatial_hash::{Aabb, QueryResults, SpatialHash};

const WORLD: f64 = 512.0;
const SIZE: f64 = 6.0;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

struct Agent {
    pos: (f64, f64),
    vel: (f64, f64),
}

fn main() -> Result<(), spatial_hash::Error> {
    env_logger::init();

    let mut rng = Rng(0x5EED_CAFE_F00D_0001);
    let mut agents: Vec<Agent> = (0..200)
        .map(|_| Agent {
            pos: (rng.next_f64() * WORLD, rng.next_f64() * WORLD),
            vel: (rng.next_f64() * 4.0 - 2.0, rng.next_f64() * 4.0 - 2.0),
        })
        .collect();

    let mut hash: SpatialHash<usize> = SpatialHash::with_capacity(32.0, agents.len());
    for (id, a) in agents.iter().enumerate() {
        hash.add(id, a.pos.0, a.pos.1, SIZE, SIZE)?;
    }

    let mut candidates = QueryResults::new();
    for tick in 0..60 {
        for (id, a) in agents.iter_mut().enumerate() {
            a.pos.0 = (a.pos.0 + a.vel.0).rem_euclid(WORLD);
            a.pos.1 = (a.pos.1 + a.vel.1).rem_euclid(WORLD);
            hash.update(id, a.pos.0, a.pos.1, SIZE, SIZE)?;
        }

        let mut contacts = 0;
        let mut broad = 0;
        for id in 0..agents.len() {
            let Some(me) = hash.get_bbox(id) else {
                continue;
            };
            // Only look at higher ids so each pair is counted once.
            hash.query_into(me.x, me.y, me.w, me.h, |&other| other > id, &mut candidates)?;
            broad += candidates.len();
            contacts += candidates
                .iter()
                .filter(|&&other| hash.get_bbox(other).is_some_and(|b| b.intersects(&me)))
                .count();
        }

        if tick % 10 == 0 {
            let stats = hash.pool_stats();
            println!(
                "tick {tick:>2}: {broad:>4} candidate pairs, {contacts:>3} contacts, {} cells, {} entry slots",
                hash.cell_count(),
                stats.entry_slots
            );
        }
    }

    // Agents that wandered into the top-left quadrant.
    let quadrant = Aabb::new(0.0, 0.0, WORLD / 2.0, WORLD / 2.0);
    let inside = hash
        .query(quadrant.x, quadrant.y, quadrant.w, quadrant.h)?
        .len();
    println!("{inside} agents are candidates for the top-left quadrant");
    Ok(())
}
