use crate::{
    GODS_NUMBER,
    canonical_fsm::CanonicalFSMState,
    coord::{Phase1Coords, Phase2Coords},
    cubie::{CubieCube, InvariantError},
    moves::{Move, format_moves},
    start, success,
    tables::Tables,
    working,
};
use itertools::Itertools;
use log::{Level, debug, info, log_enabled};
use rayon::prelude::*;
use std::{
    fmt,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Instant,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("The cube is not solvable: {0}")]
    Invariant(#[from] InvariantError),
    #[error("No solution of at most {0} moves was found")]
    SearchExhausted(usize),
    #[error("The solution found does not solve the cube")]
    VerificationFailed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    max_length: usize,
    target_length: Option<usize>,
    max_phase2_length: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_length: GODS_NUMBER,
            target_length: None,
            max_phase2_length: 10,
        }
    }
}

impl SolverConfig {
    /// No solution longer than this is ever returned.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Keep searching until a solution at most this long is found. Defaults to
    /// the maximum length, so the first solution found is returned.
    #[must_use]
    pub fn with_target_length(mut self, target_length: usize) -> Self {
        self.target_length = Some(target_length);
        self
    }

    /// Bound the length of every phase 2 search.
    #[must_use]
    pub fn with_max_phase2_length(mut self, max_phase2_length: usize) -> Self {
        self.max_phase2_length = max_phase2_length;
        self
    }

    #[must_use]
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    #[must_use]
    pub fn target_length(&self) -> usize {
        self.target_length
            .map_or(self.max_length, |target_length| {
                target_length.min(self.max_length)
            })
    }

    #[must_use]
    pub fn max_phase2_length(&self) -> usize {
        self.max_phase2_length
    }
}

/// A sequence of moves that solves a cube, split into the moves that bring it
/// into the phase 2 subgroup and the moves that solve it from there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    moves: Vec<Move>,
    phase1_len: usize,
}

impl Solution {
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[must_use]
    pub fn into_moves(self) -> Vec<Move> {
        self.moves
    }

    #[must_use]
    pub fn phase1(&self) -> &[Move] {
        &self.moves[..self.phase1_len]
    }

    #[must_use]
    pub fn phase2(&self) -> &[Move] {
        &self.moves[self.phase1_len..]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Moves are separated by spaces. The alternate form `{:#}` also puts a `.`
/// between the two phases.
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() && !self.is_empty() {
            let phase1 = self.phase1().iter().map(Move::to_string);
            let phase2 = self.phase2().iter().map(Move::to_string);
            write!(
                f,
                "{}",
                phase1.chain(std::iter::once(".".to_owned())).chain(phase2).join(" ")
            )
        } else {
            write!(f, "{}", format_moves(&self.moves))
        }
    }
}

/// The best solution found so far, shared by all search workers.
struct BestSolution {
    length: AtomicUsize,
    solution: Mutex<Option<Solution>>,
}

impl BestSolution {
    fn new(max_length: usize) -> Self {
        Self {
            length: AtomicUsize::new(max_length.saturating_add(1)),
            solution: Mutex::new(None),
        }
    }

    fn length(&self) -> usize {
        self.length.load(Ordering::Relaxed)
    }

    /// Keep `moves` if it is strictly shorter than the best solution.
    fn offer(&self, moves: &[Move], phase1_len: usize) {
        let mut solution = self
            .solution
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if moves.len() < self.length() {
            debug!(
                working!("Found a solution of length {} ({} + {})"),
                moves.len(),
                phase1_len,
                moves.len() - phase1_len
            );
            self.length.store(moves.len(), Ordering::Relaxed);
            *solution = Some(Solution {
                moves: moves.to_vec(),
                phase1_len,
            });
        }
    }

    fn into_solution(self) -> Option<Solution> {
        self.solution
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The state owned by one search worker.
struct Worker<'a> {
    cube: &'a CubieCube,
    best: &'a BestSolution,
    path: Vec<Move>,
    nodes_visited: u64,
}

impl<'a> Worker<'a> {
    fn new(cube: &'a CubieCube, best: &'a BestSolution) -> Self {
        Self {
            cube,
            best,
            path: Vec::with_capacity(2 * GODS_NUMBER),
            nodes_visited: 0,
        }
    }
}

pub struct Solver<'a> {
    tables: &'a Tables,
    config: SolverConfig,
}

impl<'a> Solver<'a> {
    #[must_use]
    pub fn new(tables: &'a Tables, config: SolverConfig) -> Self {
        Self { tables, config }
    }

    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn phase1_heuristic(&self, coords: Phase1Coords) -> usize {
        let twist_slice = self.tables.twist_slice.distance(coords.twist, coords.slice);
        let flip_slice = self.tables.flip_slice.distance(coords.flip, coords.slice);
        usize::from(twist_slice.max(flip_slice))
    }

    fn phase2_heuristic(&self, coords: Phase2Coords) -> usize {
        let corner = self
            .tables
            .corner_slice_perm
            .distance(coords.corner_perm, coords.slice_perm);
        let edge = self
            .tables
            .edge_slice_perm
            .distance(coords.edge_perm, coords.slice_perm);
        usize::from(corner.max(edge))
    }

    fn apply_phase1(&self, coords: Phase1Coords, move_: Move) -> Phase1Coords {
        Phase1Coords {
            twist: self.tables.twist.apply(coords.twist, move_),
            flip: self.tables.flip.apply(coords.flip, move_),
            slice: self.tables.slice.apply(coords.slice, move_),
        }
    }

    fn apply_phase2(&self, coords: Phase2Coords, move_: Move) -> Phase2Coords {
        Phase2Coords {
            corner_perm: self.tables.corner_perm.apply(coords.corner_perm, move_),
            edge_perm: self.tables.edge_perm.apply(coords.edge_perm, move_),
            slice_perm: self.tables.slice_perm.apply(coords.slice_perm, move_),
        }
    }

    fn is_done(&self, worker: &Worker) -> bool {
        worker.best.length() <= self.config.target_length()
    }

    /// Depth first search for phase 1 solutions of exactly `remaining` more
    /// moves. Each one is handed to phase 2 unless its last move is a phase 2
    /// move, since then a shorter phase 1 solution already covers it.
    fn search_phase1(
        &self,
        worker: &mut Worker,
        coords: Phase1Coords,
        fsm_state: CanonicalFSMState,
        remaining: usize,
    ) {
        if log_enabled!(Level::Debug) {
            worker.nodes_visited += 1;
        }
        if remaining == 0 {
            if coords.is_solved() && worker.path.last().is_none_or(|move_| !move_.is_phase2()) {
                self.start_phase2(worker, fsm_state);
            }
            return;
        }

        for move_ in Move::ALL {
            if self.is_done(worker) {
                return;
            }
            let Some(next_fsm_state) = self
                .tables
                .canonical_fsm
                .next_state(fsm_state, move_.face())
            else {
                continue;
            };
            let next_coords = self.apply_phase1(coords, move_);
            if self.phase1_heuristic(next_coords) >= remaining {
                continue;
            }
            worker.path.push(move_);
            self.search_phase1(worker, next_coords, next_fsm_state, remaining - 1);
            worker.path.pop();
        }
    }

    /// Solve the phase 2 subgroup state reached by the current path, as long
    /// as the total stays shorter than the best solution.
    fn start_phase2(&self, worker: &mut Worker, fsm_state: CanonicalFSMState) {
        let phase1_len = worker.path.len();
        let budget = self
            .config
            .max_phase2_length
            .min(self.config.max_length - phase1_len)
            .min(worker.best.length().saturating_sub(phase1_len + 1));

        // Phase 2 coordinates are only tracked by their move tables inside the
        // subgroup, so they are computed from the actual state.
        let coords = Phase2Coords::from(&worker.cube.apply_moves(&worker.path));
        for depth in self.phase2_heuristic(coords)..=budget {
            if self.is_done(worker) || phase1_len + depth >= worker.best.length() {
                return;
            }
            if self.search_phase2(worker, coords, fsm_state, depth) {
                worker.best.offer(&worker.path, phase1_len);
                worker.path.truncate(phase1_len);
                return;
            }
        }
    }

    /// Depth first search for a phase 2 solution of exactly `remaining` more
    /// moves. On success the solution is left on the path.
    fn search_phase2(
        &self,
        worker: &mut Worker,
        coords: Phase2Coords,
        fsm_state: CanonicalFSMState,
        remaining: usize,
    ) -> bool {
        if log_enabled!(Level::Debug) {
            worker.nodes_visited += 1;
        }
        if remaining == 0 {
            return coords.is_solved();
        }

        for move_ in Move::PHASE2 {
            if self.is_done(worker) {
                return false;
            }
            let Some(next_fsm_state) = self
                .tables
                .canonical_fsm
                .next_state(fsm_state, move_.face())
            else {
                continue;
            };
            let next_coords = self.apply_phase2(coords, move_);
            if self.phase2_heuristic(next_coords) >= remaining {
                continue;
            }
            worker.path.push(move_);
            if self.search_phase2(worker, next_coords, next_fsm_state, remaining - 1) {
                return true;
            }
            worker.path.pop();
        }
        false
    }

    /// Find a solution of at most `max_length` moves, searching phase 1
    /// solutions by increasing length. The first solution at most
    /// `target_length` long is returned; otherwise the search goes on while
    /// longer phase 1 solutions can still beat the best one.
    ///
    /// # Errors
    ///
    /// If the cube is not solvable, or if no solution within the maximum
    /// length exists.
    pub fn solve(&self, cube: &CubieCube) -> Result<Solution, SolveError> {
        cube.verify()?;
        info!(start!("Solving"));
        let start = Instant::now();

        let best = BestSolution::new(self.config.max_length);
        let root = Phase1Coords::from(cube);
        let mut depth = self.phase1_heuristic(root);
        loop {
            let best_length = best.length();
            if depth > self.config.max_length
                || depth >= best_length
                || best_length <= self.config.target_length()
            {
                break;
            }

            debug!(working!("Searching phase 1 depth {}..."), depth);
            let depth_start = Instant::now();
            let nodes_visited = if depth == 0 {
                let mut worker = Worker::new(cube, &best);
                self.search_phase1(&mut worker, root, CanonicalFSMState::default(), 0);
                worker.nodes_visited
            } else {
                Move::ALL
                    .par_iter()
                    .map(|&first_move| {
                        let mut worker = Worker::new(cube, &best);
                        let Some(fsm_state) = self
                            .tables
                            .canonical_fsm
                            .next_state(CanonicalFSMState::default(), first_move.face())
                        else {
                            return 0;
                        };
                        let coords = self.apply_phase1(root, first_move);
                        if self.phase1_heuristic(coords) < depth {
                            worker.path.push(first_move);
                            self.search_phase1(&mut worker, coords, fsm_state, depth - 1);
                        }
                        worker.nodes_visited
                    })
                    .sum::<u64>()
            };
            debug!(
                working!("Traversed {} nodes in {:.3}s"),
                nodes_visited,
                depth_start.elapsed().as_secs_f64()
            );
            depth += 1;
        }

        let solution = best
            .into_solution()
            .ok_or(SolveError::SearchExhausted(self.config.max_length))?;
        if !cube.apply_moves(solution.moves()).is_solved() {
            return Err(SolveError::VerificationFailed);
        }
        info!(
            success!("Found a solution of length {} in {:.3}s"),
            solution.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::parse_moves;
    use std::sync::LazyLock;

    static TABLES: LazyLock<Tables> = LazyLock::new(|| Tables::generate().unwrap());

    fn solve(cube: &CubieCube, config: SolverConfig) -> Result<Solution, SolveError> {
        Solver::new(&TABLES, config).solve(cube)
    }

    #[test_log::test]
    fn test_solved_cube_has_empty_solution() {
        let solution = solve(&CubieCube::SOLVED, SolverConfig::default()).unwrap();
        assert!(solution.is_empty());
        assert_eq!(solution.to_string(), "");
        assert_eq!(format!("{solution:#}"), "");
    }

    #[test_log::test]
    fn test_single_moves_are_undone() {
        for move_ in Move::ALL {
            let cube = CubieCube::SOLVED.apply_move(move_);
            let solution = solve(&cube, SolverConfig::default().with_target_length(1)).unwrap();
            assert_eq!(solution.moves(), [move_.inverse()], "{move_}");
        }
    }

    #[test_log::test]
    fn test_phase2_scramble_is_solved_in_phase2() {
        let scramble = parse_moves("U R2 F2 D' L2 B2 U2").unwrap();
        let cube = CubieCube::from_moves(&scramble);
        let solution = solve(&cube, SolverConfig::default()).unwrap();
        assert!(solution.phase1().is_empty());
        assert!(solution.len() <= scramble.len());
        assert!(solution.moves().iter().all(|move_| move_.is_phase2()));
    }

    #[test_log::test]
    fn test_random_cubes() {
        let mut rng = fastrand::Rng::with_seed(8);
        for _ in 0..4 {
            let cube = CubieCube::random(&mut rng);
            let solution = solve(&cube, SolverConfig::default()).unwrap();
            assert!(solution.len() <= GODS_NUMBER);
            assert!(cube.apply_moves(solution.moves()).is_solved());
        }
    }

    #[test_log::test]
    fn test_target_length_finds_short_solutions() {
        let scramble = parse_moves("R U F").unwrap();
        let cube = CubieCube::from_moves(&scramble);
        let solution = solve(&cube, SolverConfig::default().with_target_length(3)).unwrap();
        assert_eq!(solution.len(), 3);
        assert!(cube.apply_moves(solution.moves()).is_solved());
    }

    #[test_log::test]
    fn test_max_length_is_respected() {
        let cube = CubieCube::from_moves(&parse_moves("R U").unwrap());
        assert!(matches!(
            solve(&cube, SolverConfig::default().with_max_length(1)),
            Err(SolveError::SearchExhausted(1))
        ));
        let solution = solve(&cube, SolverConfig::default().with_max_length(2)).unwrap();
        assert_eq!(solution.len(), 2);
        let solution = solve(&cube, SolverConfig::default().with_max_length(usize::MAX)).unwrap();
        assert!(cube.apply_moves(solution.moves()).is_solved());
    }

    #[test_log::test]
    fn test_unsolvable_cube_is_rejected() {
        let mut cube = CubieCube::SOLVED;
        cube.co[0] = 1;
        assert!(matches!(
            solve(&cube, SolverConfig::default()),
            Err(SolveError::Invariant(InvariantError::Twist(_)))
        ));

        let mut cube = CubieCube::SOLVED;
        cube.co[0] = 3;
        assert!(matches!(
            solve(&cube, SolverConfig::default()),
            Err(SolveError::Invariant(InvariantError::CornerOrientation {
                corner: 0,
                orientation: 3
            }))
        ));
        let mut cube = CubieCube::SOLVED;
        cube.eo[0] = 2;
        assert!(matches!(
            solve(&cube, SolverConfig::default()),
            Err(SolveError::Invariant(InvariantError::EdgeOrientation {
                edge: 0,
                orientation: 2
            }))
        ));
    }

    #[test]
    fn test_config() {
        let config = SolverConfig::default();
        assert_eq!(config.max_length(), 20);
        assert_eq!(config.target_length(), 20);
        assert_eq!(config.max_phase2_length(), 10);
        let config = config.with_max_length(18).with_target_length(25);
        assert_eq!(config.target_length(), 18);
    }

    #[test]
    fn test_display() {
        let solution = Solution {
            moves: parse_moves("R U' F2 D").unwrap(),
            phase1_len: 2,
        };
        assert_eq!(solution.to_string(), "R U' F2 D");
        assert_eq!(format!("{solution:#}"), "R U' . F2 D");
        assert_eq!(solution.phase1().len(), 2);
        assert_eq!(solution.phase2().len(), 2);
    }
}
