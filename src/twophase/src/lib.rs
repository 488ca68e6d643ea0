#![warn(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::too_many_lines, clippy::cast_possible_truncation)]

//! Kociemba's two-phase algorithm for the 3x3x3 cube.
//!
//! A cube is read from its 54 facelets ([`facelet`]), turned into a cubie
//! level state ([`cubie`]) and solved by [`solver::Solver`], which consults
//! the move and pruning tables bundled in [`tables::Tables`].

pub(crate) mod canonical_fsm;
pub mod coord;
pub mod cubie;
pub mod facelet;
pub mod move_table;
pub mod moves;
pub mod pruning;
pub mod solver;
pub mod tables;

pub use cubie::{CubieCube, InvariantError};
pub use facelet::{FaceletCube, FaceletError, parse_cube};
pub use moves::{Face, Move, MoveParseError, parse_moves};
pub use pruning::TableError;
pub use solver::{Solution, SolveError, Solver, SolverConfig};
pub use tables::Tables;

#[macro_export]
macro_rules! start {
    ($msg:expr) => {
        concat!("⏳ ", $msg)
    };
}

#[macro_export]
macro_rules! working {
    ($msg:expr) => {
        concat!("🛠  ", $msg)
    };
}

#[macro_export]
macro_rules! success {
    ($msg:expr) => {
        concat!("✅ ", $msg)
    };
}

/// God's number: every reachable state is solvable in this many face turns.
pub const GODS_NUMBER: usize = 20;

/// A precomputed factorial table where index[i] is i!. Permutation
/// coordinates never rank more than twelve pieces.
const FACT_UNTIL_12: [u32; 13] = {
    let mut arr = [0; 13];
    arr[0] = 1;
    let mut i = 1;
    while i < arr.len() {
        arr[i] = arr[i - 1] * i as u32;
        i += 1;
    }
    arr
};
