//! A finite state machine of canonical move sequences, after Lucas Garron's
//! canonical FSM in twsearch:
//! https://github.com/cubing/twsearch/blob/main/src/rs/_internal/canonical_fsm/canonical_fsm.rs
//!
//! Move classes are the six faces. A face may not follow itself, and of two
//! commuting faces only the lower-numbered one may come first once both have
//! been turned; so `D U` is canonical while `U D` and `D U D` are not.

use crate::{cubie::CubieCube, moves::Face};
use std::collections::HashMap;

const NUM_MOVE_CLASSES: usize = Face::ALL.len();

// Bit N is indexed by a face index of N.
#[derive(Copy, Clone, Eq, Hash, PartialEq, Debug)]
struct MoveClassMask(u8);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CanonicalFSMState(usize);

const ILLEGAL: CanonicalFSMState = CanonicalFSMState(usize::MAX);

#[derive(Debug)]
pub struct CanonicalFSM {
    next_state_lookup: Vec<[CanonicalFSMState; NUM_MOVE_CLASSES]>,
}

impl Default for CanonicalFSM {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalFSM {
    #[must_use]
    pub fn new() -> Self {
        let mut commutes = [MoveClassMask((1 << NUM_MOVE_CLASSES) - 1); NUM_MOVE_CLASSES];
        for face_1 in Face::ALL {
            for face_2 in Face::ALL {
                let a = CubieCube::from(face_1);
                let b = CubieCube::from(face_2);
                if a.multiply(&b) != b.multiply(&a) {
                    commutes[face_1.index()].0 &= !(1 << face_2.index());
                    commutes[face_2.index()].0 &= !(1 << face_1.index());
                }
            }
        }

        let mut next_state_lookup = vec![];
        let mut mask_to_state = HashMap::new();
        mask_to_state.insert(MoveClassMask(0), CanonicalFSMState(0));
        // Indexed by state, the set of faces turned since the last face that
        // does not commute with them
        let mut state_to_mask = vec![MoveClassMask(0)];

        let mut queue_index = 0;
        while queue_index < state_to_mask.len() {
            let dequeue_move_class_mask = state_to_mask[queue_index];
            queue_index += 1;

            let mut next_state = [ILLEGAL; NUM_MOVE_CLASSES];
            for move_class_index in 0..NUM_MOVE_CLASSES {
                let commuting = dequeue_move_class_mask.0 & commutes[move_class_index].0;
                // The same face again, or a lower commuting face is already
                // in the sequence.
                if (dequeue_move_class_mask.0 >> move_class_index) & 1 != 0
                    || commuting & ((1 << move_class_index) - 1) != 0
                {
                    continue;
                }

                let mut next_state_bits = commuting | (1 << move_class_index);

                // Faces with identical commuting sets are interchangeable for
                // every later decision, so only the lowest one is kept.
                for i in 0..NUM_MOVE_CLASSES {
                    if (next_state_bits >> i) & 1 == 0 {
                        continue;
                    }
                    for j in (i + 1)..NUM_MOVE_CLASSES {
                        if (next_state_bits >> j) & 1 != 0 && commutes[i] == commutes[j] {
                            next_state_bits &= !(1 << j);
                        }
                    }
                }

                let next_move_class_mask = MoveClassMask(next_state_bits);
                next_state[move_class_index] =
                    *mask_to_state.entry(next_move_class_mask).or_insert_with(|| {
                        state_to_mask.push(next_move_class_mask);
                        CanonicalFSMState(state_to_mask.len() - 1)
                    });
            }
            next_state_lookup.push(next_state);
        }

        Self { next_state_lookup }
    }

    /// The state after turning `face`, or `None` if the resulting sequence is
    /// not canonical.
    #[must_use]
    pub fn next_state(
        &self,
        current_fsm_state: CanonicalFSMState,
        face: Face,
    ) -> Option<CanonicalFSMState> {
        match self.next_state_lookup[current_fsm_state.0][face.index()] {
            ILLEGAL => None,
            state => Some(state),
        }
    }

    /// The state after a whole face sequence.
    #[cfg(test)]
    fn walk(&self, faces: impl IntoIterator<Item = Face>) -> Option<CanonicalFSMState> {
        faces
            .into_iter()
            .try_fold(CanonicalFSMState::default(), |state, face| {
                self.next_state(state, face)
            })
    }

    #[cfg(test)]
    fn state_count(&self) -> usize {
        self.next_state_lookup.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_fsm_initially_all_legal() {
        let canonical_fsm = CanonicalFSM::new();
        for face in Face::ALL {
            assert!(
                canonical_fsm
                    .next_state(CanonicalFSMState::default(), face)
                    .is_some()
            );
        }
    }

    #[test]
    fn test_canonical_fsm_prevents_self() {
        let canonical_fsm = CanonicalFSM::new();
        for face in Face::ALL {
            assert!(canonical_fsm.walk([face, face]).is_none());
        }
    }

    #[test]
    fn test_canonical_fsm_prevents_self_and_antipode() {
        let canonical_fsm = CanonicalFSM::new();
        for face_1 in Face::ALL {
            for face_2 in Face::ALL {
                let allows_1_after_2 = canonical_fsm.walk([face_2, face_1]).is_some();
                let allows_2_after_1 = canonical_fsm.walk([face_1, face_2]).is_some();
                if face_1 == face_2 {
                    assert!(!allows_2_after_1 && !allows_1_after_2);
                } else if face_1.opposite() == face_2 {
                    // Exactly one order of an opposite pair is canonical
                    assert!(allows_1_after_2 ^ allows_2_after_1);
                } else {
                    assert!(allows_1_after_2 && allows_2_after_1);
                }
            }
        }
    }

    #[test]
    fn test_second_side_never_follows_first_side() {
        let canonical_fsm = CanonicalFSM::new();
        assert!(canonical_fsm.walk([Face::U, Face::D]).is_none());
        assert!(canonical_fsm.walk([Face::R, Face::L]).is_none());
        assert!(canonical_fsm.walk([Face::F, Face::B]).is_none());
        assert!(canonical_fsm.walk([Face::D, Face::U]).is_some());
        assert!(canonical_fsm.walk([Face::D, Face::U, Face::D]).is_none());
        assert!(canonical_fsm.walk([Face::D, Face::U, Face::R, Face::U]).is_some());
    }

    #[test]
    fn test_canonical_fsm_state_count() {
        // The start state, one state per face after a lone face, and the
        // three states after a pair of opposite faces collapse into the
        // state of their lower face.
        assert_eq!(CanonicalFSM::new().state_count(), 7);
    }
}
