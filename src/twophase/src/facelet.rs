//! The sticker level view of a cube: 54 facelets in the order U, R, F, D, L,
//! B, each face read row by row as seen from outside the cube.
//!
//! ```text
//!              |************|
//!              |*U1**U2**U3*|
//!              |************|
//!              |*U4**U5**U6*|
//!              |************|
//!              |*U7**U8**U9*|
//!              |************|
//! |************|************|************|************|
//! |*L1**L2**L3*|*F1**F2**F3*|*R1**R2**R3*|*B1**B2**B3*|
//! |************|************|************|************|
//! |*L4**L5**L6*|*F4**F5**F6*|*R4**R5**R6*|*B4**B5**B6*|
//! |************|************|************|************|
//! |*L7**L8**L9*|*F7**F8**F9*|*R7**R8**R9*|*B7**B8**B9*|
//! |************|************|************|************|
//!              |************|
//!              |*D1**D2**D3*|
//!              |************|
//!              |*D4**D5**D6*|
//!              |************|
//!              |*D7**D8**D9*|
//!              |************|
//! ```
//!
//! A facelet is named after the face whose center has its color.

use crate::{
    cubie::{CORNERS, CubieCube, EDGES, InvariantError},
    moves::Face,
};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const FACELETS: usize = 54;

const FACELETS_PER_FACE: usize = 9;

const CORNER_NAMES: [&str; CORNERS] = ["URF", "UFL", "ULB", "UBR", "DFR", "DLF", "DBL", "DRB"];

const EDGE_NAMES: [&str; EDGES] = [
    "UR", "UF", "UL", "UB", "DR", "DF", "DL", "DB", "FR", "FL", "BL", "BR",
];

/// The facelets of each corner position, clockwise starting with its U or D
/// facelet.
const CORNER_FACELETS: [[usize; 3]; CORNERS] = [
    [8, 9, 20],
    [6, 18, 38],
    [0, 36, 47],
    [2, 45, 11],
    [29, 26, 15],
    [27, 44, 24],
    [33, 53, 42],
    [35, 17, 51],
];

/// The facelets of each edge position, starting with its U, D, F, or B
/// facelet.
const EDGE_FACELETS: [[usize; 2]; EDGES] = [
    [5, 10],
    [7, 19],
    [3, 37],
    [1, 46],
    [32, 16],
    [28, 25],
    [30, 43],
    [34, 52],
    [23, 12],
    [21, 41],
    [50, 39],
    [48, 14],
];

/// The colors of each corner cubie, in the same order as `CORNER_FACELETS`.
const CORNER_COLORS: [[Face; 3]; CORNERS] = {
    use Face::{B, D, F, L, R, U};
    [
        [U, R, F],
        [U, F, L],
        [U, L, B],
        [U, B, R],
        [D, F, R],
        [D, L, F],
        [D, B, L],
        [D, R, B],
    ]
};

const EDGE_COLORS: [[Face; 2]; EDGES] = {
    use Face::{B, D, F, L, R, U};
    [
        [U, R],
        [U, F],
        [U, L],
        [U, B],
        [D, R],
        [D, F],
        [D, L],
        [D, B],
        [F, R],
        [F, L],
        [B, L],
        [B, R],
    ]
};

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FaceletError {
    #[error("Expected 54 facelets but found {0}")]
    WrongLength(usize),
    #[error("Invalid facelet {character:?} at position {index}, expected one of URFDLB")]
    InvalidCharacter { character: char, index: usize },
    #[error("The center of the {face} face is {found}")]
    MisplacedCenter { face: Face, found: Face },
    #[error("There are {count} {face} facelets instead of 9")]
    WrongColorCount { face: Face, count: usize },
    #[error("The corner at {} does not exist", CORNER_NAMES[*.0])]
    UnidentifiedCorner(usize),
    #[error("The edge at {} does not exist", EDGE_NAMES[*.0])]
    UnidentifiedEdge(usize),
    #[error("The {} corner appears more than once", CORNER_NAMES[*.0])]
    DuplicateCorner(usize),
    #[error("The {} edge appears more than once", EDGE_NAMES[*.0])]
    DuplicateEdge(usize),
    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FaceletCube(pub [Face; FACELETS]);

impl FaceletCube {
    pub const SOLVED: FaceletCube = {
        let mut facelets = [Face::U; FACELETS];
        let mut i = 0;
        while i < FACELETS {
            facelets[i] = Face::from_index(i / FACELETS_PER_FACE);
            i += 1;
        }
        FaceletCube(facelets)
    };
}

impl FromStr for FaceletCube {
    type Err = FaceletError;

    /// Parse 54 characters of `URFDLB`. Centers must be in place and every
    /// color must appear nine times; whether the stickers form a real cube
    /// is left to the conversion into a [`CubieCube`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let length = s.chars().count();
        if length != FACELETS {
            return Err(FaceletError::WrongLength(length));
        }

        let mut facelets = [Face::U; FACELETS];
        for (index, (facelet, character)) in facelets.iter_mut().zip(s.chars()).enumerate() {
            *facelet = Face::from_letter(character)
                .ok_or(FaceletError::InvalidCharacter { character, index })?;
        }

        for face in Face::ALL {
            let found = facelets[face.index() * FACELETS_PER_FACE + FACELETS_PER_FACE / 2];
            if found != face {
                return Err(FaceletError::MisplacedCenter { face, found });
            }
        }

        let mut counts = [0; Face::ALL.len()];
        for facelet in facelets {
            counts[facelet.index()] += 1;
        }
        for (face, count) in Face::ALL.into_iter().zip(counts) {
            if count != FACELETS_PER_FACE {
                return Err(FaceletError::WrongColorCount { face, count });
            }
        }

        Ok(FaceletCube(facelets))
    }
}

impl fmt::Display for FaceletCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for facelet in self.0 {
            write!(f, "{facelet}")?;
        }
        Ok(())
    }
}

impl TryFrom<&FaceletCube> for CubieCube {
    type Error = FaceletError;

    /// Identify every corner by its U or D colored facelet and the two colors
    /// that follow it clockwise, and every edge by its pair of colors.
    fn try_from(facelets: &FaceletCube) -> Result<Self, Self::Error> {
        let facelets = &facelets.0;
        let mut cube = CubieCube::SOLVED;

        let mut seen_corners = [false; CORNERS];
        for (position, corner_facelets) in CORNER_FACELETS.iter().enumerate() {
            let orientation = corner_facelets
                .iter()
                .position(|&i| matches!(facelets[i], Face::U | Face::D))
                .ok_or(FaceletError::UnidentifiedCorner(position))?;
            let color_1 = facelets[corner_facelets[(orientation + 1) % 3]];
            let color_2 = facelets[corner_facelets[(orientation + 2) % 3]];
            let corner = CORNER_COLORS
                .iter()
                .position(|colors| colors[1] == color_1 && colors[2] == color_2)
                .ok_or(FaceletError::UnidentifiedCorner(position))?;
            if std::mem::replace(&mut seen_corners[corner], true) {
                return Err(FaceletError::DuplicateCorner(corner));
            }
            cube.cp[position] = corner as u8;
            cube.co[position] = orientation as u8;
        }

        let mut seen_edges = [false; EDGES];
        for (position, [first, second]) in EDGE_FACELETS.into_iter().enumerate() {
            let colors = [facelets[first], facelets[second]];
            let (edge, flipped) = EDGE_COLORS
                .iter()
                .enumerate()
                .find_map(|(edge, &[a, b])| {
                    if colors == [a, b] {
                        Some((edge, false))
                    } else if colors == [b, a] {
                        Some((edge, true))
                    } else {
                        None
                    }
                })
                .ok_or(FaceletError::UnidentifiedEdge(position))?;
            if std::mem::replace(&mut seen_edges[edge], true) {
                return Err(FaceletError::DuplicateEdge(edge));
            }
            cube.ep[position] = edge as u8;
            cube.eo[position] = u8::from(flipped);
        }

        cube.verify()?;
        Ok(cube)
    }
}

impl From<&CubieCube> for FaceletCube {
    fn from(cube: &CubieCube) -> Self {
        let mut facelets = FaceletCube::SOLVED.0;
        for (position, corner_facelets) in CORNER_FACELETS.iter().enumerate() {
            let corner = cube.cp[position] as usize;
            let orientation = cube.co[position] as usize;
            for (n, &color) in CORNER_COLORS[corner].iter().enumerate() {
                facelets[corner_facelets[(n + orientation) % 3]] = color;
            }
        }
        for (position, edge_facelets) in EDGE_FACELETS.iter().enumerate() {
            let edge = cube.ep[position] as usize;
            let orientation = cube.eo[position] as usize;
            for (n, &color) in EDGE_COLORS[edge].iter().enumerate() {
                facelets[edge_facelets[(n + orientation) % 2]] = color;
            }
        }
        FaceletCube(facelets)
    }
}

/// Parse a facelet string into a cubie state that can be solved.
///
/// # Errors
///
/// If the string does not describe a reachable cube.
pub fn parse_cube(facelets: &str) -> Result<CubieCube, FaceletError> {
    CubieCube::try_from(&facelets.parse::<FaceletCube>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{Move, parse_moves};

    const SOLVED: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

    #[test]
    fn test_solved() {
        assert_eq!(FaceletCube::SOLVED.to_string(), SOLVED);
        assert_eq!(parse_cube(SOLVED), Ok(CubieCube::SOLVED));
        assert_eq!(FaceletCube::from(&CubieCube::SOLVED), FaceletCube::SOLVED);
    }

    #[test]
    fn test_quarter_turn() {
        let cube = CubieCube::SOLVED.apply_move("R".parse::<Move>().unwrap());
        assert_eq!(
            FaceletCube::from(&cube).to_string(),
            "UUFUUFUUFRRRRRRRRRFFDFFDFFDDDBDDBDDBLLLLLLLLLUBBUBBUBB"
        );
    }

    #[test]
    fn test_round_trip() {
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..100 {
            let cube = CubieCube::random(&mut rng);
            let facelets = FaceletCube::from(&cube).to_string();
            assert_eq!(parse_cube(&facelets), Ok(cube));
        }
    }

    #[test]
    fn test_scrambled_cube() {
        let cube = parse_cube("DRLUUBFBRBLURRLRUBLRDDFDLFUFUFFDBRDUBRUFLLFDDBFLUBLRBD").unwrap();
        let solution = parse_moves("D2 R' D' F2 B D R2 D2 R' F2 D' F2 U' B2 L2 U2 D R2 U").unwrap();
        assert!(cube.apply_moves(&solution).is_solved());
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(parse_cube(&SOLVED[1..]), Err(FaceletError::WrongLength(53)));
        assert_eq!(parse_cube(""), Err(FaceletError::WrongLength(0)));
    }

    #[test]
    fn test_invalid_character() {
        let facelets = SOLVED.replacen('R', "X", 1);
        assert_eq!(
            parse_cube(&facelets),
            Err(FaceletError::InvalidCharacter {
                character: 'X',
                index: 9
            })
        );
        assert_eq!(
            parse_cube(&SOLVED.to_lowercase()),
            Err(FaceletError::InvalidCharacter {
                character: 'u',
                index: 0
            })
        );
    }

    #[test]
    fn test_misplaced_center() {
        let mut facelets = SOLVED.as_bytes().to_vec();
        facelets.swap(4, 13);
        let facelets = String::from_utf8(facelets).unwrap();
        assert_eq!(
            parse_cube(&facelets),
            Err(FaceletError::MisplacedCenter {
                face: Face::U,
                found: Face::R
            })
        );
    }

    #[test]
    fn test_wrong_color_count() {
        let facelets = SOLVED.replacen('R', "U", 1);
        assert_eq!(
            parse_cube(&facelets),
            Err(FaceletError::WrongColorCount {
                face: Face::U,
                count: 10
            })
        );
    }

    #[test]
    fn test_twisted_corner() {
        let mut cube = CubieCube::SOLVED;
        cube.co[0] = 1;
        let facelets = FaceletCube::from(&cube).to_string();
        assert_eq!(
            parse_cube(&facelets),
            Err(FaceletError::Invariant(InvariantError::Twist(1)))
        );
    }

    #[test]
    fn test_flipped_edge() {
        let mut cube = CubieCube::SOLVED;
        cube.eo[3] = 1;
        let facelets = FaceletCube::from(&cube).to_string();
        assert_eq!(
            parse_cube(&facelets),
            Err(FaceletError::Invariant(InvariantError::Flip(1)))
        );
    }

    #[test]
    fn test_swapped_pieces() {
        let mut cube = CubieCube::SOLVED;
        cube.ep.swap(0, 1);
        let facelets = FaceletCube::from(&cube).to_string();
        assert_eq!(
            parse_cube(&facelets),
            Err(FaceletError::Invariant(InvariantError::Parity))
        );
    }

    #[test]
    fn test_unidentified_pieces() {
        // A URF corner without its U sticker
        let mut facelets = FaceletCube::SOLVED;
        facelets.0.swap(8, 10);
        assert_eq!(
            CubieCube::try_from(&facelets),
            Err(FaceletError::UnidentifiedCorner(0))
        );

        // An edge with two U stickers
        let mut facelets = FaceletCube::SOLVED;
        facelets.0.swap(10, 7);
        assert_eq!(
            CubieCube::try_from(&facelets),
            Err(FaceletError::UnidentifiedEdge(0))
        );
    }

    #[test]
    fn test_duplicate_pieces() {
        // Two UR edges, one UF edge fewer
        let mut cube = CubieCube::SOLVED;
        cube.ep[1] = 0;
        let facelets = FaceletCube::from(&cube);
        assert_eq!(
            CubieCube::try_from(&facelets),
            Err(FaceletError::DuplicateEdge(0))
        );

        let mut cube = CubieCube::SOLVED;
        cube.cp[1] = 0;
        let facelets = FaceletCube::from(&cube);
        assert_eq!(
            CubieCube::try_from(&facelets),
            Err(FaceletError::DuplicateCorner(0))
        );
    }

    #[test]
    fn test_piece_errors_name_the_piece() {
        assert_eq!(
            FaceletError::UnidentifiedCorner(2).to_string(),
            "The corner at ULB does not exist"
        );
        assert_eq!(
            FaceletError::UnidentifiedEdge(8).to_string(),
            "The edge at FR does not exist"
        );
        assert_eq!(
            FaceletError::DuplicateCorner(7).to_string(),
            "The DRB corner appears more than once"
        );
        assert_eq!(
            FaceletError::DuplicateEdge(1).to_string(),
            "The UF edge appears more than once"
        );
    }
}
