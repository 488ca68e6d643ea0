//! Pruning tables: the exact distance to solved of every pair of
//! coordinates, ignoring the rest of the cube. Since solving the whole cube
//! also solves the pair, these distances are admissible heuristics.

use crate::{
    coord::Coordinate, move_table::MoveTable, moves::Move, start, success, working,
};
use log::{debug, info};
use rayon::prelude::*;
use std::{
    sync::atomic::{AtomicU8, Ordering},
    time::Instant,
};
use thiserror::Error;

const UNLABELED: u8 = u8::MAX;

/// Work is split over chunks of this many entries per layer.
const CHUNK_SIZE: usize = 1 << 12;

#[derive(Error, Debug)]
pub enum TableError {
    #[error(
        "The {table} pruning table has {unlabeled} entries that cannot be reached from solved"
    )]
    UnreachableEntries {
        table: &'static str,
        unlabeled: usize,
    },
}

pub struct PruningTable {
    name: &'static str,
    second_count: usize,
    distances: Box<[u8]>,
}

impl PruningTable {
    /// Label every pair `(a, b)` of coordinates `A` and `B` with its distance
    /// from `(0, 0)` under `moves`, by expanding one breadth-first layer at a
    /// time. Entries of a layer are expanded in parallel; a neighbor is
    /// labeled by whichever worker gets to it first, and they all agree on
    /// the label.
    ///
    /// # Errors
    ///
    /// If some pair is never labeled.
    pub fn generate<A: Coordinate, B: Coordinate>(
        name: &'static str,
        first: &MoveTable<A>,
        second: &MoveTable<B>,
        moves: &[Move],
    ) -> Result<Self, TableError> {
        info!(start!("Generating the {} pruning table"), name);
        let start = Instant::now();

        let size = A::COUNT * B::COUNT;
        let distances = (0..size)
            .map(|_| AtomicU8::new(UNLABELED))
            .collect::<Vec<_>>();
        distances[0].store(0, Ordering::Relaxed);

        let mut labeled = 1;
        let mut depth = 0;
        while labeled < size {
            let depth_start = Instant::now();
            let newly_labeled = distances
                .par_chunks(CHUNK_SIZE)
                .enumerate()
                .map(|(chunk_index, chunk)| {
                    let mut newly_labeled = 0;
                    for (offset, distance) in chunk.iter().enumerate() {
                        if distance.load(Ordering::Relaxed) != depth {
                            continue;
                        }
                        let index = chunk_index * CHUNK_SIZE + offset;
                        let a = (index / B::COUNT) as u16;
                        let b = (index % B::COUNT) as u16;
                        for &move_ in moves {
                            let next = first.apply(a, move_) as usize * B::COUNT
                                + second.apply(b, move_) as usize;
                            if distances[next]
                                .compare_exchange(
                                    UNLABELED,
                                    depth + 1,
                                    Ordering::Relaxed,
                                    Ordering::Relaxed,
                                )
                                .is_ok()
                            {
                                newly_labeled += 1;
                            }
                        }
                    }
                    newly_labeled
                })
                .sum::<usize>();

            if newly_labeled == 0 {
                break;
            }
            labeled += newly_labeled;
            depth += 1;
            debug!(
                working!("{}: depth {} has {} entries ({:.3}s)"),
                name,
                depth,
                newly_labeled,
                depth_start.elapsed().as_secs_f64()
            );
        }

        if labeled < size {
            return Err(TableError::UnreachableEntries {
                table: name,
                unlabeled: size - labeled,
            });
        }

        info!(
            success!("Generated the {} pruning table in {:.3}s, max depth {}"),
            name,
            start.elapsed().as_secs_f64(),
            depth
        );
        Ok(Self {
            name,
            second_count: B::COUNT,
            distances: distances.into_iter().map(AtomicU8::into_inner).collect(),
        })
    }

    #[inline]
    #[must_use]
    pub fn distance(&self, first: u16, second: u16) -> u8 {
        self.distances[first as usize * self.second_count + second as usize]
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The largest distance in the table.
    #[must_use]
    pub fn max_distance(&self) -> u8 {
        self.distances.iter().copied().max().unwrap_or(0)
    }

    /// The number of entries at every distance, starting at zero.
    #[must_use]
    pub fn histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.max_distance() as usize + 1];
        for &distance in &*self.distances {
            histogram[distance as usize] += 1;
        }
        histogram
    }
}
