//! Card ordering within stages.
//!
//! Positions are sparse integers: a move writes a single row and never
//! renumbers siblings. Ties are broken by `moved_at DESC, id ASC`, so a card
//! dropped onto another card's slot sorts before it. Drift is repaired by
//! explicitly normalizing a stage.

use uuid::Uuid;

/// Where a card was dropped in the target stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Dropped on the stage area itself: goes to the end
    Header,
    /// Dropped onto the card at this index among the stage's other cards
    Index(usize),
}

impl From<Option<usize>> for DropTarget {
    fn from(index: Option<usize>) -> Self {
        match index {
            Some(i) => DropTarget::Index(i),
            None => DropTarget::Header,
        }
    }
}

/// A card's slot in a stage, as returned in read order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub card_id: Uuid,
    pub position: i32,
}

/// Persisted outcome of a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePlan {
    /// Nothing to write
    NoOp,
    Update { stage_id: Uuid, position: i32 },
}

/// Position for a new last element: `max + 1`, or `0` when empty.
pub fn append_position<I>(positions: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    positions
        .into_iter()
        .max()
        .map(|max| max.saturating_add(1))
        .unwrap_or(0)
}

/// Plan the move of `card_id` from `current_stage` into `target_stage`.
///
/// `target_slots` are the target stage's cards in read order. When the card
/// already lives in the target stage it may appear in the list; it is
/// excluded before the index is applied (insert-before semantics).
pub fn plan_move(
    card_id: Uuid,
    current_stage: Uuid,
    target_stage: Uuid,
    target: DropTarget,
    target_slots: &[Slot],
) -> MovePlan {
    let same_stage = current_stage == target_stage;

    if same_stage
        && target == DropTarget::Header
        && target_slots.last().map(|s| s.card_id) == Some(card_id)
    {
        return MovePlan::NoOp;
    }

    let others: Vec<&Slot> = target_slots
        .iter()
        .filter(|s| s.card_id != card_id)
        .collect();

    let position = match target {
        DropTarget::Index(i) if i < others.len() => others[i].position,
        _ => append_position(others.iter().map(|s| s.position)),
    };

    MovePlan::Update {
        stage_id: target_stage,
        position,
    }
}

/// Positions `0..len` for a stage renumbered in its current read order.
pub fn normalized_positions(len: usize) -> impl Iterator<Item = i32> {
    (0..len).map(|i| i32::try_from(i).unwrap_or(i32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(positions: &[i32]) -> Vec<Slot> {
        positions
            .iter()
            .map(|&position| Slot {
                card_id: Uuid::new_v4(),
                position,
            })
            .collect()
    }

    #[test]
    fn test_append_position() {
        assert_eq!(append_position(Vec::<i32>::new()), 0);
        assert_eq!(append_position(vec![0, 1, 2]), 3);
        assert_eq!(append_position(vec![7, 2, 2]), 8);
        assert_eq!(append_position(vec![i32::MAX]), i32::MAX);
    }

    #[test]
    fn test_drop_target_from_index() {
        assert_eq!(DropTarget::from(None), DropTarget::Header);
        assert_eq!(DropTarget::from(Some(2)), DropTarget::Index(2));
    }

    #[test]
    fn test_move_to_first_of_other_stage() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let moved = Uuid::new_v4();
        let target = slots(&[3, 5, 9]);

        let plan = plan_move(moved, a, b, DropTarget::Index(0), &target);
        assert_eq!(
            plan,
            MovePlan::Update {
                stage_id: b,
                position: 3
            }
        );
    }

    #[test]
    fn test_move_to_header_of_other_stage_appends() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let plan = plan_move(Uuid::new_v4(), a, b, DropTarget::Header, &slots(&[0, 4]));
        assert_eq!(
            plan,
            MovePlan::Update {
                stage_id: b,
                position: 5
            }
        );

        let plan = plan_move(Uuid::new_v4(), a, b, DropTarget::Header, &[]);
        assert_eq!(
            plan,
            MovePlan::Update {
                stage_id: b,
                position: 0
            }
        );
    }

    #[test]
    fn test_same_stage_move_to_top_takes_first_position() {
        // Cards at positions 0 and 1; the second is dragged above the first.
        let stage = Uuid::new_v4();
        let target = slots(&[0, 1]);
        let moved = target[1].card_id;

        let plan = plan_move(moved, stage, stage, DropTarget::Index(0), &target);
        assert_eq!(
            plan,
            MovePlan::Update {
                stage_id: stage,
                position: 0
            }
        );
    }

    #[test]
    fn test_index_excludes_moved_card() {
        let stage = Uuid::new_v4();
        let target = slots(&[0, 1, 2, 3]);
        let moved = target[0].card_id;

        // Without the moved card the stage reads [1, 2, 3]; index 1 is the card at 2.
        let plan = plan_move(moved, stage, stage, DropTarget::Index(1), &target);
        assert_eq!(
            plan,
            MovePlan::Update {
                stage_id: stage,
                position: 2
            }
        );
    }

    #[test]
    fn test_index_past_end_appends() {
        let stage = Uuid::new_v4();
        let target = slots(&[0, 1, 2]);
        let moved = target[2].card_id;

        let plan = plan_move(moved, stage, stage, DropTarget::Index(10), &target);
        assert_eq!(
            plan,
            MovePlan::Update {
                stage_id: stage,
                position: 2
            }
        );
    }

    #[test]
    fn test_same_stage_header_on_last_card_is_noop() {
        let stage = Uuid::new_v4();
        let target = slots(&[0, 1, 2]);

        let plan = plan_move(target[2].card_id, stage, stage, DropTarget::Header, &target);
        assert_eq!(plan, MovePlan::NoOp);

        let plan = plan_move(target[0].card_id, stage, stage, DropTarget::Header, &target);
        assert_eq!(
            plan,
            MovePlan::Update {
                stage_id: stage,
                position: 3
            }
        );
    }

    #[test]
    fn test_only_card_in_stage_header_is_noop() {
        let stage = Uuid::new_v4();
        let target = slots(&[4]);
        let plan = plan_move(target[0].card_id, stage, stage, DropTarget::Header, &target);
        assert_eq!(plan, MovePlan::NoOp);
    }

    #[test]
    fn test_normalized_positions() {
        assert_eq!(normalized_positions(0).count(), 0);
        assert_eq!(normalized_positions(3).collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
