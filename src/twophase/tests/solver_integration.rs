use log::info;
use std::sync::LazyLock;
use twophase::{
    CubieCube, FaceletCube, FaceletError, GODS_NUMBER, SolveError, Solver, SolverConfig, Tables,
    parse_cube, parse_moves,
};

static TABLES: LazyLock<Tables> = LazyLock::new(|| Tables::generate().unwrap());

fn solve_facelets(facelets: &str, config: SolverConfig) -> Result<Vec<String>, SolveError> {
    let cube = parse_cube(facelets).unwrap();
    let solution = Solver::new(&TABLES, config).solve(&cube)?;
    assert!(cube.apply_moves(solution.moves()).is_solved());
    Ok(solution.moves().iter().map(ToString::to_string).collect())
}

#[test_log::test]
fn test_solved_facelets() {
    let solution = solve_facelets(
        "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB",
        SolverConfig::default(),
    )
    .unwrap();
    assert!(solution.is_empty());
}

#[test_log::test]
fn test_scrambled_facelets() {
    let solution = solve_facelets(
        "DRLUUBFBRBLURRLRUBLRDDFDLFUFUFFDBRDUBRUFLLFDDBFLUBLRBD",
        SolverConfig::default(),
    )
    .unwrap();
    info!("Solution: {}", solution.join(" "));
    assert!(solution.len() <= GODS_NUMBER);
}

#[test_log::test]
fn test_superflip() {
    // Every edge flipped in place; one of the hardest positions there is
    let mut cube = CubieCube::SOLVED;
    cube.eo = [1; 12];
    let facelets = FaceletCube::from(&cube).to_string();
    assert_eq!(
        facelets,
        "UBULURUFURURFRBRDRFUFLFRFDFDFDLDRDBDLULBLFLDLBUBRBLBDB"
    );
    let solution = solve_facelets(&facelets, SolverConfig::default()).unwrap();
    assert!(solution.len() <= GODS_NUMBER);
}

#[test_log::test]
fn test_random_cubes() {
    let mut rng = fastrand::Rng::with_seed(42);
    let solver = Solver::new(&TABLES, SolverConfig::default());
    for _ in 0..10 {
        let cube = CubieCube::random(&mut rng);
        let solution = solver.solve(&cube).unwrap();
        assert!(solution.len() <= GODS_NUMBER);
        assert!(cube.apply_moves(solution.moves()).is_solved());
        let phase1_cube = cube.apply_moves(solution.phase1());
        assert!(phase1_cube.in_phase2_subgroup());
        assert!(solution.phase2().iter().all(|move_| move_.is_phase2()));
    }
}

#[test_log::test]
fn test_scrambles_are_undone() {
    let mut rng = fastrand::Rng::with_seed(7);
    let solver = Solver::new(&TABLES, SolverConfig::default());
    for length in [2, 5, 9, 14, 25] {
        let (cube, scramble) = CubieCube::random_scramble(&mut rng, length);
        let solution = solver.solve(&cube).unwrap();
        assert!(solution.len() <= GODS_NUMBER);
        assert_eq!(
            cube.apply_moves(solution.moves()),
            CubieCube::SOLVED,
            "{scramble:?}"
        );
    }
}

#[test_log::test]
fn test_lower_target_gives_shorter_solutions() {
    let cube = CubieCube::from_moves(&parse_moves("R2 U F' L D2 B R' U2").unwrap());
    let first = Solver::new(&TABLES, SolverConfig::default())
        .solve(&cube)
        .unwrap();
    let short = Solver::new(&TABLES, SolverConfig::default().with_target_length(8))
        .solve(&cube)
        .unwrap();
    assert!(short.len() <= 8);
    assert!(short.len() <= first.len());
    assert!(cube.apply_moves(short.moves()).is_solved());
}

#[test_log::test]
fn test_malformed_input() {
    assert_eq!(
        parse_cube("UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBB"),
        Err(FaceletError::WrongLength(53))
    );
    assert!(matches!(
        parse_cube("UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBX"),
        Err(FaceletError::InvalidCharacter {
            character: 'X',
            index: 53
        })
    ));
}
