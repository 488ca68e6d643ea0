//! The cubie level representation of the cube and its group operation.
//!
//! A state is given by four arrays: which corner and which edge cubie sits at
//! every position, and how each of them is twisted or flipped. The arrays are
//! in "replaced-by" form, so `cp[i]` is the cubie found at position `i`.
//!
//! Positions and cubies are numbered as follows:
//! - Corners: URF UFL ULB UBR DFR DLF DBL DRB
//! - Edges: UR UF UL UB DR DF DL DB FR FL BL BR

use crate::{
    FACT_UNTIL_12,
    moves::{Face, Move},
};
use thiserror::Error;

pub const CORNERS: usize = 8;
pub const EDGES: usize = 12;

/// The four edges of the UD slice are the last four edges.
pub const FIRST_SLICE_EDGE: u8 = 8;

#[derive(PartialEq, Eq, Hash, Debug, Clone, Copy)]
pub struct CubieCube {
    pub cp: [u8; CORNERS],
    pub co: [u8; CORNERS],
    pub ep: [u8; EDGES],
    pub eo: [u8; EDGES],
}

/// Why a cubie state cannot be reached by turning faces.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum InvariantError {
    #[error("The corner permutation is not a permutation")]
    CornerPermutation,
    #[error("The edge permutation is not a permutation")]
    EdgePermutation,
    #[error("The corner at position {corner} has orientation {orientation}, expected 0, 1, or 2")]
    CornerOrientation { corner: usize, orientation: u8 },
    #[error("The edge at position {edge} has orientation {orientation}, expected 0 or 1")]
    EdgeOrientation { edge: usize, orientation: u8 },
    #[error("A corner is twisted: the corner orientations sum to {0}, which is not a multiple of 3")]
    Twist(u32),
    #[error("An edge is flipped: the edge orientations sum to {0}, which is not a multiple of 2")]
    Flip(u32),
    #[error("Two pieces are swapped: the corner and edge permutation parities differ")]
    Parity,
}

const fn cube(cp: [u8; CORNERS], co: [u8; CORNERS], ep: [u8; EDGES], eo: [u8; EDGES]) -> CubieCube {
    CubieCube { cp, co, ep, eo }
}

/// Clockwise quarter turns of U R F D L B.
const QUARTER_TURNS: [CubieCube; 6] = [
    cube(
        [3, 0, 1, 2, 4, 5, 6, 7],
        [0; CORNERS],
        [3, 0, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11],
        [0; EDGES],
    ),
    cube(
        [4, 1, 2, 0, 7, 5, 6, 3],
        [2, 0, 0, 1, 1, 0, 0, 2],
        [8, 1, 2, 3, 11, 5, 6, 7, 4, 9, 10, 0],
        [0; EDGES],
    ),
    cube(
        [1, 5, 2, 3, 0, 4, 6, 7],
        [1, 2, 0, 0, 2, 1, 0, 0],
        [0, 9, 2, 3, 4, 8, 6, 7, 1, 5, 10, 11],
        [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
    ),
    cube(
        [0, 1, 2, 3, 5, 6, 7, 4],
        [0; CORNERS],
        [0, 1, 2, 3, 5, 6, 7, 4, 8, 9, 10, 11],
        [0; EDGES],
    ),
    cube(
        [0, 2, 6, 3, 4, 1, 5, 7],
        [0, 1, 2, 0, 0, 2, 1, 0],
        [0, 1, 10, 3, 4, 5, 9, 7, 8, 2, 6, 11],
        [0; EDGES],
    ),
    cube(
        [0, 1, 3, 7, 4, 5, 2, 6],
        [0, 0, 1, 2, 0, 0, 2, 1],
        [0, 1, 2, 11, 4, 5, 6, 10, 8, 9, 3, 7],
        [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
    ),
];

/// The cubie representation of all 18 moves, indexed by move identifier. The
/// half and inverse quarter turns are the quarter turn composed with itself.
const MOVE_CUBES: [CubieCube; Move::COUNT] = {
    let mut arr = [CubieCube::SOLVED; Move::COUNT];
    let mut face = 0;
    while face < 6 {
        let quarter = QUARTER_TURNS[face];
        let mut power = 0;
        let mut acc = quarter;
        while power < 3 {
            arr[face * 3 + power] = acc;
            acc = acc.multiply(&quarter);
            power += 1;
        }
        face += 1;
    }
    arr
};

impl Default for CubieCube {
    fn default() -> Self {
        CubieCube::SOLVED
    }
}

impl CubieCube {
    pub const SOLVED: CubieCube = cube(
        [0, 1, 2, 3, 4, 5, 6, 7],
        [0; CORNERS],
        [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        [0; EDGES],
    );

    /// The cubie representation of a move.
    #[must_use]
    pub const fn of_move(move_: Move) -> &'static CubieCube {
        &MOVE_CUBES[move_.id()]
    }

    /// Compose `self` and `other`: the state reached by first doing `self`
    /// and then `other`.
    #[must_use]
    pub const fn multiply(&self, other: &CubieCube) -> CubieCube {
        let mut ret = CubieCube::SOLVED;
        let mut i = 0;
        while i < CORNERS {
            let from = other.cp[i] as usize;
            ret.cp[i] = self.cp[from];
            ret.co[i] = (self.co[from] + other.co[i]) % 3;
            i += 1;
        }
        let mut i = 0;
        while i < EDGES {
            let from = other.ep[i] as usize;
            ret.ep[i] = self.ep[from];
            ret.eo[i] = (self.eo[from] + other.eo[i]) % 2;
            i += 1;
        }
        ret
    }

    #[must_use]
    pub fn apply_move(&self, move_: Move) -> CubieCube {
        self.multiply(CubieCube::of_move(move_))
    }

    #[must_use]
    pub fn apply_moves<'a>(&self, moves: impl IntoIterator<Item = &'a Move>) -> CubieCube {
        moves
            .into_iter()
            .fold(*self, |cube, &move_| cube.apply_move(move_))
    }

    /// The state reached from the solved cube by a move sequence.
    #[must_use]
    pub fn from_moves<'a>(moves: impl IntoIterator<Item = &'a Move>) -> CubieCube {
        CubieCube::SOLVED.apply_moves(moves)
    }

    /// The group inverse, so that `c.multiply(&c.inverse())` is solved.
    #[must_use]
    pub fn inverse(&self) -> CubieCube {
        let mut ret = CubieCube::SOLVED;
        for (i, &c) in self.cp.iter().enumerate() {
            ret.cp[c as usize] = i as u8;
        }
        for (i, &c) in ret.cp.iter().enumerate() {
            ret.co[i] = (3 - self.co[c as usize]) % 3;
        }
        for (i, &e) in self.ep.iter().enumerate() {
            ret.ep[e as usize] = i as u8;
        }
        for (i, &e) in ret.ep.iter().enumerate() {
            ret.eo[i] = self.eo[e as usize];
        }
        ret
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        *self == CubieCube::SOLVED
    }

    /// `true` if the corner permutation is odd.
    #[must_use]
    pub fn corner_parity(&self) -> bool {
        permutation_parity(&self.cp)
    }

    /// `true` if the edge permutation is odd.
    #[must_use]
    pub fn edge_parity(&self) -> bool {
        permutation_parity(&self.ep)
    }

    /// Check that the state can be reached from the solved cube.
    ///
    /// # Errors
    ///
    /// The first broken invariant.
    pub fn verify(&self) -> Result<(), InvariantError> {
        if !is_permutation(&self.cp) {
            return Err(InvariantError::CornerPermutation);
        }
        if !is_permutation(&self.ep) {
            return Err(InvariantError::EdgePermutation);
        }
        if let Some((corner, &orientation)) = self.co.iter().enumerate().find(|(_, o)| **o >= 3) {
            return Err(InvariantError::CornerOrientation { corner, orientation });
        }
        if let Some((edge, &orientation)) = self.eo.iter().enumerate().find(|(_, o)| **o >= 2) {
            return Err(InvariantError::EdgeOrientation { edge, orientation });
        }
        let twist = self.co.iter().map(|&o| u32::from(o)).sum::<u32>();
        if twist % 3 != 0 {
            return Err(InvariantError::Twist(twist));
        }
        let flip = self.eo.iter().map(|&o| u32::from(o)).sum::<u32>();
        if flip % 2 != 0 {
            return Err(InvariantError::Flip(flip));
        }
        if self.corner_parity() != self.edge_parity() {
            return Err(InvariantError::Parity);
        }
        Ok(())
    }

    /// A uniformly random reachable state.
    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> CubieCube {
        let mut ret = CubieCube::SOLVED;
        loop {
            unrank_permutation(rng.u32(0..FACT_UNTIL_12[EDGES]), &mut ret.ep);
            unrank_permutation(rng.u32(0..FACT_UNTIL_12[CORNERS]), &mut ret.cp);
            if ret.corner_parity() == ret.edge_parity() {
                break;
            }
        }
        let mut twist = 0;
        for o in &mut ret.co[..CORNERS - 1] {
            *o = rng.u8(0..3);
            twist += *o;
        }
        ret.co[CORNERS - 1] = (3 - twist % 3) % 3;
        let mut flip = 0;
        for o in &mut ret.eo[..EDGES - 1] {
            *o = rng.u8(0..2);
            flip += *o;
        }
        ret.eo[EDGES - 1] = flip % 2;
        ret
    }

    /// The state reached by a random sequence of `length` face turns, none of
    /// which turns the same face as the one before it.
    #[must_use]
    pub fn random_scramble(rng: &mut fastrand::Rng, length: usize) -> (CubieCube, Vec<Move>) {
        let mut moves: Vec<Move> = Vec::with_capacity(length);
        while moves.len() < length {
            let move_ = Move::from_id(rng.usize(0..Move::COUNT));
            if moves.last().is_some_and(|last| last.face() == move_.face()) {
                continue;
            }
            moves.push(move_);
        }
        (CubieCube::from_moves(&moves), moves)
    }

    /// `true` if this state needs no quarter turn of R, F, L, or B to be
    /// solved, that is the cube is in the subgroup phase 2 works in.
    #[must_use]
    pub fn in_phase2_subgroup(&self) -> bool {
        self.co.iter().all(|&o| o == 0)
            && self.eo.iter().all(|&o| o == 0)
            && self.ep[FIRST_SLICE_EDGE as usize..]
                .iter()
                .all(|&e| e >= FIRST_SLICE_EDGE)
    }
}

fn is_permutation(perm: &[u8]) -> bool {
    let mut seen = 0_u32;
    for &p in perm {
        if p as usize >= perm.len() || seen & (1 << p) != 0 {
            return false;
        }
        seen |= 1 << p;
    }
    true
}

fn permutation_parity(perm: &[u8]) -> bool {
    let mut inversions = 0;
    for i in 0..perm.len() {
        for j in i + 1..perm.len() {
            if perm[j] < perm[i] {
                inversions += 1;
            }
        }
    }
    inversions % 2 == 1
}

/// Fill `perm` with the permutation of `0..perm.len()` whose Lehmer rank is
/// `rank`. Shared with the permutation coordinates.
pub(crate) fn unrank_permutation(mut rank: u32, perm: &mut [u8]) {
    let n = perm.len();
    let mut available = (0..n as u8).collect::<Vec<_>>();
    for (i, slot) in perm.iter_mut().enumerate() {
        let fact = FACT_UNTIL_12[n - 1 - i];
        let digit = (rank / fact) as usize;
        rank %= fact;
        *slot = available.remove(digit);
    }
}

/// The Lehmer rank of a permutation of `0..perm.len()`: for every position,
/// the number of later entries smaller than it, weighted by a factorial.
pub(crate) fn rank_permutation(perm: &[u8]) -> u32 {
    let n = perm.len();
    let mut rank = 0;
    for i in 0..n.saturating_sub(1) {
        let smaller_after = perm[i + 1..].iter().filter(|&&p| p < perm[i]).count() as u32;
        rank += smaller_after * FACT_UNTIL_12[n - 1 - i];
    }
    rank
}

impl From<Face> for CubieCube {
    /// The clockwise quarter turn of a face.
    fn from(face: Face) -> Self {
        QUARTER_TURNS[face.index()]
    }
}
