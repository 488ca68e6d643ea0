use crate::{
    canonical_fsm::CanonicalFSM,
    coord::{CornerPerm, EdgePerm, Flip, Slice, SlicePerm, Twist},
    move_table::MoveTable,
    moves::Move,
    pruning::{PruningTable, TableError},
    start, success,
};
use log::info;
use std::time::Instant;

/// Every table the search reads. Built once, then only shared by reference.
pub struct Tables {
    pub(crate) twist: MoveTable<Twist>,
    pub(crate) flip: MoveTable<Flip>,
    pub(crate) slice: MoveTable<Slice>,
    pub(crate) corner_perm: MoveTable<CornerPerm>,
    pub(crate) edge_perm: MoveTable<EdgePerm>,
    pub(crate) slice_perm: MoveTable<SlicePerm>,
    pub(crate) twist_slice: PruningTable,
    pub(crate) flip_slice: PruningTable,
    pub(crate) corner_slice_perm: PruningTable,
    pub(crate) edge_slice_perm: PruningTable,
    pub(crate) canonical_fsm: CanonicalFSM,
}

impl Tables {
    /// Generate all move tables, then all pruning tables.
    ///
    /// # Errors
    ///
    /// If a pruning table could not label every entry, which means the move
    /// tables are wrong.
    pub fn generate() -> Result<Self, TableError> {
        info!(start!("Generating tables"));
        let start = Instant::now();

        let twist = MoveTable::<Twist>::generate();
        let flip = MoveTable::<Flip>::generate();
        let slice = MoveTable::<Slice>::generate();
        let corner_perm = MoveTable::<CornerPerm>::generate();
        let edge_perm = MoveTable::<EdgePerm>::generate();
        let slice_perm = MoveTable::<SlicePerm>::generate();
        info!(
            success!("Generated move tables in {:.3}s"),
            start.elapsed().as_secs_f64()
        );

        let twist_slice = PruningTable::generate("twist-slice", &twist, &slice, &Move::ALL)?;
        let flip_slice = PruningTable::generate("flip-slice", &flip, &slice, &Move::ALL)?;
        let corner_slice_perm = PruningTable::generate(
            "corner-slice permutation",
            &corner_perm,
            &slice_perm,
            &Move::PHASE2,
        )?;
        let edge_slice_perm = PruningTable::generate(
            "edge-slice permutation",
            &edge_perm,
            &slice_perm,
            &Move::PHASE2,
        )?;

        info!(
            success!("Generated all tables in {:.3}s"),
            start.elapsed().as_secs_f64()
        );
        Ok(Self {
            twist,
            flip,
            slice,
            corner_perm,
            edge_perm,
            slice_perm,
            twist_slice,
            flip_slice,
            corner_slice_perm,
            edge_slice_perm,
            canonical_fsm: CanonicalFSM::new(),
        })
    }
}
