//! Coordinates compress one aspect of a cube state into a small dense
//! integer that indexes move and pruning tables.
//!
//! Phase 1 uses `Twist`, `Flip`, and `Slice`, which are all zero exactly
//! when the cube is in the subgroup generated by the phase 2 moves. Phase 2
//! uses `CornerPerm`, `EdgePerm`, and `SlicePerm`, which are all zero exactly
//! when a cube of that subgroup is solved.

use crate::{
    FACT_UNTIL_12,
    cubie::{CORNERS, CubieCube, EDGES, FIRST_SLICE_EDGE, rank_permutation, unrank_permutation},
};

/// A bijection between the values `0..COUNT` and classes of cube states.
/// `decode` picks some member of the class; the parts of the state the
/// coordinate does not describe are left solved.
pub trait Coordinate: Sync {
    const COUNT: usize;
    const NAME: &'static str;

    fn encode(cube: &CubieCube) -> u16;

    /// # Panics
    ///
    /// Values outside of `0..COUNT` are a contract violation.
    fn decode(value: u16) -> CubieCube;
}

/// Corner orientation, in base 3 over the first seven corners.
pub struct Twist;

/// Edge orientation, in base 2 over the first eleven edges.
pub struct Flip;

/// The set of positions holding the four UD slice edges, ranked as a
/// 4-combination of 12.
pub struct Slice;

/// The permutation of all eight corners.
pub struct CornerPerm;

/// The permutation of the eight U and D edges, in the order they appear.
pub struct EdgePerm;

/// The permutation of the four UD slice edges, in the order they appear.
pub struct SlicePerm;

const SLICE_EDGES: usize = EDGES - FIRST_SLICE_EDGE as usize;

/// `BINOMIAL[n][k]` is n choose k, zero when `k > n`, built by Pascal's rule.
const BINOMIAL: [[u16; SLICE_EDGES + 1]; EDGES] = {
    let mut arr = [[0; SLICE_EDGES + 1]; EDGES];
    let mut n = 0;
    while n < EDGES {
        arr[n][0] = 1;
        let mut k = 1;
        while k <= SLICE_EDGES {
            if n > 0 {
                arr[n][k] = arr[n - 1][k - 1] + arr[n - 1][k];
            }
            k += 1;
        }
        n += 1;
    }
    arr
};

impl Coordinate for Twist {
    const COUNT: usize = 2187;
    const NAME: &'static str = "twist";

    fn encode(cube: &CubieCube) -> u16 {
        cube.co[..CORNERS - 1]
            .iter()
            .fold(0, |acc, &o| acc * 3 + u16::from(o))
    }

    fn decode(mut value: u16) -> CubieCube {
        debug_assert!((value as usize) < Self::COUNT);
        let mut cube = CubieCube::SOLVED;
        let mut twist = 0;
        for o in cube.co[..CORNERS - 1].iter_mut().rev() {
            *o = (value % 3) as u8;
            twist += *o;
            value /= 3;
        }
        cube.co[CORNERS - 1] = (3 - twist % 3) % 3;
        cube
    }
}

impl Coordinate for Flip {
    const COUNT: usize = 2048;
    const NAME: &'static str = "flip";

    fn encode(cube: &CubieCube) -> u16 {
        cube.eo[..EDGES - 1]
            .iter()
            .fold(0, |acc, &o| acc * 2 + u16::from(o))
    }

    fn decode(mut value: u16) -> CubieCube {
        debug_assert!((value as usize) < Self::COUNT);
        let mut cube = CubieCube::SOLVED;
        let mut flip = 0;
        for o in cube.eo[..EDGES - 1].iter_mut().rev() {
            *o = (value % 2) as u8;
            flip += *o;
            value /= 2;
        }
        cube.eo[EDGES - 1] = flip % 2;
        cube
    }
}

impl Coordinate for Slice {
    const COUNT: usize = 495;
    const NAME: &'static str = "slice";

    fn encode(cube: &CubieCube) -> u16 {
        let mut value = 0;
        let mut seen = 0;
        for (position, &edge) in cube.ep.iter().enumerate().rev() {
            if edge >= FIRST_SLICE_EDGE {
                value += BINOMIAL[EDGES - 1 - position][seen + 1];
                seen += 1;
            }
        }
        value
    }

    fn decode(mut value: u16) -> CubieCube {
        debug_assert!((value as usize) < Self::COUNT);
        let mut cube = CubieCube::SOLVED;
        let mut slice_positions = [false; EDGES];
        let mut remaining = SLICE_EDGES;
        for (position, slot) in slice_positions.iter_mut().enumerate() {
            let binomial = BINOMIAL[EDGES - 1 - position][remaining];
            if remaining > 0 && value >= binomial {
                *slot = true;
                value -= binomial;
                remaining -= 1;
            }
        }
        let mut slice_edges = FIRST_SLICE_EDGE..EDGES as u8;
        let mut other_edges = 0..FIRST_SLICE_EDGE;
        for (edge, is_slice) in cube.ep.iter_mut().zip(slice_positions) {
            let next = if is_slice {
                slice_edges.next()
            } else {
                other_edges.next()
            };
            // Exactly four positions are marked, so neither range runs out
            *edge = next.unwrap_or_default();
        }
        cube
    }
}

impl Coordinate for CornerPerm {
    const COUNT: usize = FACT_UNTIL_12[CORNERS] as usize;
    const NAME: &'static str = "corner permutation";

    fn encode(cube: &CubieCube) -> u16 {
        rank_permutation(&cube.cp) as u16
    }

    fn decode(value: u16) -> CubieCube {
        debug_assert!((value as usize) < Self::COUNT);
        let mut cube = CubieCube::SOLVED;
        unrank_permutation(u32::from(value), &mut cube.cp);
        cube
    }
}

impl Coordinate for EdgePerm {
    const COUNT: usize = FACT_UNTIL_12[FIRST_SLICE_EDGE as usize] as usize;
    const NAME: &'static str = "edge permutation";

    fn encode(cube: &CubieCube) -> u16 {
        let mut ud_edges = [0; FIRST_SLICE_EDGE as usize];
        for (slot, &edge) in ud_edges
            .iter_mut()
            .zip(cube.ep.iter().filter(|&&e| e < FIRST_SLICE_EDGE))
        {
            *slot = edge;
        }
        rank_permutation(&ud_edges) as u16
    }

    fn decode(value: u16) -> CubieCube {
        debug_assert!((value as usize) < Self::COUNT);
        let mut cube = CubieCube::SOLVED;
        unrank_permutation(
            u32::from(value),
            &mut cube.ep[..FIRST_SLICE_EDGE as usize],
        );
        cube
    }
}

impl Coordinate for SlicePerm {
    const COUNT: usize = FACT_UNTIL_12[SLICE_EDGES] as usize;
    const NAME: &'static str = "slice permutation";

    fn encode(cube: &CubieCube) -> u16 {
        let mut slice_edges = [0; SLICE_EDGES];
        for (slot, &edge) in slice_edges
            .iter_mut()
            .zip(cube.ep.iter().filter(|&&e| e >= FIRST_SLICE_EDGE))
        {
            *slot = edge - FIRST_SLICE_EDGE;
        }
        rank_permutation(&slice_edges) as u16
    }

    fn decode(value: u16) -> CubieCube {
        debug_assert!((value as usize) < Self::COUNT);
        let mut cube = CubieCube::SOLVED;
        let slice = &mut cube.ep[FIRST_SLICE_EDGE as usize..];
        unrank_permutation(u32::from(value), slice);
        for edge in slice {
            *edge += FIRST_SLICE_EDGE;
        }
        cube
    }
}

/// The phase 1 coordinates of a cube.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Phase1Coords {
    pub twist: u16,
    pub flip: u16,
    pub slice: u16,
}

impl Phase1Coords {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.twist == 0 && self.flip == 0 && self.slice == 0
    }
}

impl From<&CubieCube> for Phase1Coords {
    fn from(cube: &CubieCube) -> Self {
        Phase1Coords {
            twist: Twist::encode(cube),
            flip: Flip::encode(cube),
            slice: Slice::encode(cube),
        }
    }
}

/// The phase 2 coordinates of a cube. Only meaningful for cubes that phase 1
/// has brought into the phase 2 subgroup.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Phase2Coords {
    pub corner_perm: u16,
    pub edge_perm: u16,
    pub slice_perm: u16,
}

impl Phase2Coords {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.corner_perm == 0 && self.edge_perm == 0 && self.slice_perm == 0
    }
}

impl From<&CubieCube> for Phase2Coords {
    fn from(cube: &CubieCube) -> Self {
        Phase2Coords {
            corner_perm: CornerPerm::encode(cube),
            edge_perm: EdgePerm::encode(cube),
            slice_perm: SlicePerm::encode(cube),
        }
    }
}
