/// Position allocator
///
/// Pure planning functions for the integer-position ordering protocol.
/// Given the current `(id, position)` pairs of one parent's children in
/// reader order (position ascending, id ascending), these functions compute
/// the target 1..N sequence for an append, reorder, insert, or removal, and
/// return only the placements that actually change.
///
/// Returning a minimal change set matters twice over: a move to the current
/// slot yields an empty set (callers skip the write and the timestamp
/// churn entirely), and rows whose position is already correct are left
/// untouched by the engine. Because changes are computed against the
/// *observed* positions rather than assumed contiguity, a parent left with
/// gaps (for example after a delete) is repaired to 1..N by the next plan
/// that touches it.
///
/// No I/O happens here; everything is synchronous and fully unit-tested.

/// Position assigned to the first child of an empty parent
pub const FIRST_POSITION: i32 = 1;

/// A target position for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Entity id
    pub id: i64,

    /// Target position (1-based)
    pub position: i32,
}

/// The outcome of planning one reorder/insert/removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlan {
    /// Full target order of the parent's children
    pub sequence: Vec<i64>,

    /// Placements whose position differs from the observed one.
    /// Empty when the plan is a no-op.
    pub changed: Vec<Placement>,
}

impl OrderPlan {
    /// Whether applying this plan would write anything
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Returns the position for an entity appended after all current siblings
///
/// `existing_max` is the parent's current maximum position, or None for an
/// empty parent.
///
/// # Example
///
/// ```
/// use corkboard_shared::ordering::position::append_position;
///
/// assert_eq!(append_position(None), 1);
/// assert_eq!(append_position(Some(4)), 5);
/// ```
pub fn append_position(existing_max: Option<i32>) -> i32 {
    match existing_max {
        Some(max) => max + 1,
        None => FIRST_POSITION,
    }
}

/// Assigns contiguous positions 1..N to ids in sequence order
pub fn renumber(ordered_ids: &[i64]) -> Vec<Placement> {
    ordered_ids
        .iter()
        .enumerate()
        .map(|(index, &id)| Placement {
            id,
            position: (index + 1) as i32,
        })
        .collect()
}

/// Plans moving `moving_id` to `target_index` among its current siblings
///
/// `current` must be the parent's children in reader order. The target
/// index is clamped to the valid range [0, N-1]. Returns None if
/// `moving_id` is not among the siblings.
///
/// The returned change set is empty exactly when the entity already sits
/// at the target slot and every sibling position is already contiguous.
pub fn plan_reorder(
    current: &[(i64, i32)],
    moving_id: i64,
    target_index: usize,
) -> Option<OrderPlan> {
    let from = current.iter().position(|&(id, _)| id == moving_id)?;

    let mut sequence: Vec<i64> = current.iter().map(|&(id, _)| id).collect();
    sequence.remove(from);
    let index = target_index.min(sequence.len());
    sequence.insert(index, moving_id);

    Some(diff_against_current(sequence, current))
}

/// Plans inserting `new_id` (not currently a sibling) at `target_index`
///
/// `current` must be the destination parent's children in reader order;
/// the target index is clamped to [0, N]. The new entity's placement is
/// always part of the change set.
pub fn plan_insert(current: &[(i64, i32)], new_id: i64, target_index: usize) -> OrderPlan {
    let mut sequence: Vec<i64> = current.iter().map(|&(id, _)| id).collect();
    let index = target_index.min(sequence.len());
    sequence.insert(index, new_id);

    diff_against_current(sequence, current)
}

/// Plans removing `removed_id` from its siblings, closing the gap
///
/// Returns None if `removed_id` is not among the siblings. The change set
/// renumbers the survivors to 1..N; the removed entity itself gets no
/// placement.
pub fn plan_removal(current: &[(i64, i32)], removed_id: i64) -> Option<OrderPlan> {
    let from = current.iter().position(|&(id, _)| id == removed_id)?;

    let mut sequence: Vec<i64> = current.iter().map(|&(id, _)| id).collect();
    sequence.remove(from);

    Some(diff_against_current(sequence, current))
}

/// Renumbers `sequence` to 1..N and keeps only placements that differ from
/// the observed positions in `current`
fn diff_against_current(sequence: Vec<i64>, current: &[(i64, i32)]) -> OrderPlan {
    let changed = sequence
        .iter()
        .enumerate()
        .filter_map(|(index, &id)| {
            let position = (index + 1) as i32;
            let observed = current.iter().find(|&&(cid, _)| cid == id).map(|&(_, p)| p);
            if observed == Some(position) {
                None
            } else {
                Some(Placement { id, position })
            }
        })
        .collect();

    OrderPlan { sequence, changed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contiguous(ids: &[i64]) -> Vec<(i64, i32)> {
        ids.iter()
            .enumerate()
            .map(|(i, &id)| (id, (i + 1) as i32))
            .collect()
    }

    #[test]
    fn test_append_position() {
        assert_eq!(append_position(None), 1);
        assert_eq!(append_position(Some(1)), 2);
        assert_eq!(append_position(Some(7)), 8);
    }

    #[test]
    fn test_renumber_assigns_one_to_n() {
        let placements = renumber(&[30, 10, 20]);
        assert_eq!(
            placements,
            vec![
                Placement { id: 30, position: 1 },
                Placement { id: 10, position: 2 },
                Placement { id: 20, position: 3 },
            ]
        );
    }

    #[test]
    fn test_renumber_empty() {
        assert!(renumber(&[]).is_empty());
    }

    #[test]
    fn test_plan_reorder_move_to_front() {
        // Lists L1, L2, L3 at positions 1, 2, 3; move L3 to index 0
        let current = contiguous(&[1, 2, 3]);
        let plan = plan_reorder(&current, 3, 0).unwrap();

        assert_eq!(plan.sequence, vec![3, 1, 2]);
        assert_eq!(
            plan.changed,
            vec![
                Placement { id: 3, position: 1 },
                Placement { id: 1, position: 2 },
                Placement { id: 2, position: 3 },
            ]
        );
    }

    #[test]
    fn test_plan_reorder_move_forward() {
        let current = contiguous(&[1, 2, 3, 4]);
        let plan = plan_reorder(&current, 1, 2).unwrap();

        assert_eq!(plan.sequence, vec![2, 3, 1, 4]);
        // Only the first three rows move; the last stays put
        assert_eq!(
            plan.changed,
            vec![
                Placement { id: 2, position: 1 },
                Placement { id: 3, position: 2 },
                Placement { id: 1, position: 3 },
            ]
        );
    }

    #[test]
    fn test_plan_reorder_same_slot_is_noop() {
        let current = contiguous(&[5, 6, 7]);
        let plan = plan_reorder(&current, 6, 1).unwrap();

        assert_eq!(plan.sequence, vec![5, 6, 7]);
        assert!(plan.is_noop());
    }

    #[test]
    fn test_plan_reorder_same_slot_repairs_gaps() {
        // Positions left gapped by an earlier delete: the plan restores 1..N
        // even though the order itself does not change
        let current = vec![(5, 2), (6, 5), (7, 9)];
        let plan = plan_reorder(&current, 6, 1).unwrap();

        assert_eq!(plan.sequence, vec![5, 6, 7]);
        assert_eq!(
            plan.changed,
            vec![
                Placement { id: 5, position: 1 },
                Placement { id: 6, position: 2 },
                Placement { id: 7, position: 3 },
            ]
        );
    }

    #[test]
    fn test_plan_reorder_clamps_target_index() {
        let current = contiguous(&[1, 2, 3]);
        let plan = plan_reorder(&current, 1, 99).unwrap();

        assert_eq!(plan.sequence, vec![2, 3, 1]);
    }

    #[test]
    fn test_plan_reorder_unknown_id() {
        let current = contiguous(&[1, 2, 3]);
        assert!(plan_reorder(&current, 42, 0).is_none());
    }

    #[test]
    fn test_plan_reorder_single_element() {
        let current = contiguous(&[9]);
        let plan = plan_reorder(&current, 9, 0).unwrap();
        assert!(plan.is_noop());
    }

    #[test]
    fn test_plan_insert_into_empty() {
        let plan = plan_insert(&[], 42, 0);

        assert_eq!(plan.sequence, vec![42]);
        assert_eq!(plan.changed, vec![Placement { id: 42, position: 1 }]);
    }

    #[test]
    fn test_plan_insert_shifts_later_siblings() {
        let current = contiguous(&[1, 2, 3]);
        let plan = plan_insert(&current, 42, 1);

        assert_eq!(plan.sequence, vec![1, 42, 2, 3]);
        assert_eq!(
            plan.changed,
            vec![
                Placement { id: 42, position: 2 },
                Placement { id: 2, position: 3 },
                Placement { id: 3, position: 4 },
            ]
        );
    }

    #[test]
    fn test_plan_insert_at_end_touches_only_newcomer() {
        let current = contiguous(&[1, 2, 3]);
        let plan = plan_insert(&current, 42, 3);

        assert_eq!(plan.sequence, vec![1, 2, 3, 42]);
        assert_eq!(plan.changed, vec![Placement { id: 42, position: 4 }]);
    }

    #[test]
    fn test_plan_insert_clamps_target_index() {
        let current = contiguous(&[1, 2]);
        let plan = plan_insert(&current, 42, 99);

        assert_eq!(plan.sequence, vec![1, 2, 42]);
    }

    #[test]
    fn test_plan_removal_closes_gap() {
        let current = contiguous(&[1, 2, 3]);
        let plan = plan_removal(&current, 2).unwrap();

        assert_eq!(plan.sequence, vec![1, 3]);
        // Only the survivor behind the gap moves
        assert_eq!(plan.changed, vec![Placement { id: 3, position: 2 }]);
    }

    #[test]
    fn test_plan_removal_of_last_is_noop() {
        let current = contiguous(&[1, 2, 3]);
        let plan = plan_removal(&current, 3).unwrap();

        assert_eq!(plan.sequence, vec![1, 2]);
        assert!(plan.is_noop());
    }

    #[test]
    fn test_plan_removal_unknown_id() {
        let current = contiguous(&[1, 2, 3]);
        assert!(plan_removal(&current, 42).is_none());
    }

    #[test]
    fn test_sequences_stay_one_to_n_across_plans() {
        // Apply a series of moves to an in-memory parent and verify the
        // 1..N invariant after every step
        let mut rows = contiguous(&[10, 20, 30, 40, 50]);

        for (moving, target) in [(50, 0), (10, 4), (30, 2), (20, 0), (40, 3)] {
            let plan = plan_reorder(&rows, moving, target).unwrap();
            rows = plan
                .sequence
                .iter()
                .enumerate()
                .map(|(i, &id)| (id, (i + 1) as i32))
                .collect();

            let positions: Vec<i32> = rows.iter().map(|&(_, p)| p).collect();
            let expected: Vec<i32> = (1..=rows.len() as i32).collect();
            assert_eq!(positions, expected);
        }
    }

    #[test]
    fn test_append_then_read_back_in_creation_order() {
        // Repeated appends yield positions exactly 1..N in creation order
        let mut rows: Vec<(i64, i32)> = Vec::new();

        for id in 1..=6i64 {
            let max = rows.iter().map(|&(_, p)| p).max();
            rows.push((id, append_position(max)));
        }

        let positions: Vec<i32> = rows.iter().map(|&(_, p)| p).collect();
        assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);
    }
}
