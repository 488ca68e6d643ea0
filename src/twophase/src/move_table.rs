//! Move tables: the coordinate reached from every coordinate value by every
//! move, so the search never touches cubie states.

use crate::{coord::Coordinate, cubie::CubieCube, moves::Move, start, success};
use log::debug;
use rayon::prelude::*;
use std::{marker::PhantomData, time::Instant};

pub struct MoveTable<C: Coordinate> {
    // `COUNT` rows of `Move::COUNT` entries
    table: Box<[u16]>,
    _marker: PhantomData<C>,
}

impl<C: Coordinate> MoveTable<C> {
    /// Fill `table[x][m]` with the coordinate of `decode(x)` after move `m`.
    /// Rows are independent and generated in parallel.
    #[must_use]
    pub fn generate() -> Self {
        debug!(start!("Generating the {} move table"), C::NAME);
        let start = Instant::now();

        let mut table = vec![0_u16; C::COUNT * Move::COUNT].into_boxed_slice();
        table
            .par_chunks_exact_mut(Move::COUNT)
            .enumerate()
            .for_each(|(value, row)| {
                let cube = C::decode(value as u16);
                for (entry, move_cube) in row.iter_mut().zip(Move::ALL.map(CubieCube::of_move)) {
                    *entry = C::encode(&cube.multiply(move_cube));
                }
            });

        debug!(
            success!("Generated the {} move table ({} entries) in {:.3}s"),
            C::NAME,
            table.len(),
            start.elapsed().as_secs_f64()
        );
        Self {
            table,
            _marker: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn apply(&self, value: u16, move_: Move) -> u16 {
        self.table[value as usize * Move::COUNT + move_.id()]
    }
}
