use crate::models::heat::Surfer;
use crate::models::ranking::{PriorityEntry, PriorityPosition};

/// Moves `surfer_idx` to the back of the priority order. The most recent
/// grant is the least advantaged.
pub fn grant(order: &mut Vec<usize>, surfer_idx: usize) {
    order.retain(|&idx| idx != surfer_idx);
    order.push(surfer_idx);
}

/// Surfers without a call come first as `TIED` (line-up order), then the
/// called surfers numbered after them.
pub fn view(order: &[usize], surfers: &[Surfer]) -> Vec<PriorityEntry> {
    let tied = (0..surfers.len()).filter(|idx| !order.contains(idx));
    let tied_count = tied.clone().count();

    let tied_entries = tied.map(|idx| PriorityEntry {
        position: PriorityPosition::Tied,
        color: surfers[idx].color.clone(),
        idx,
    });
    let ordered_entries = order
        .iter()
        .filter(|&&idx| idx < surfers.len())
        .enumerate()
        .map(|(n, &idx)| PriorityEntry {
            position: PriorityPosition::Place(tied_count + n + 1),
            color: surfers[idx].color.clone(),
            idx,
        });

    tied_entries.chain(ordered_entries).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::heat::SURFER_COLORS;

    fn lineup() -> Vec<Surfer> {
        SURFER_COLORS.iter().map(|c| Surfer::new(c, 20)).collect()
    }

    #[test]
    fn test_initial_view_is_all_tied() {
        let entries = view(&[], &lineup());
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.position == PriorityPosition::Tied));
        assert_eq!(entries.iter().map(|e| e.idx).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_grant_moves_to_back() {
        let mut order = Vec::new();
        grant(&mut order, 2);
        grant(&mut order, 0);
        grant(&mut order, 2);
        assert_eq!(order, vec![0, 2]);

        let entries = view(&order, &lineup());
        let tail: Vec<_> = entries.iter().skip(3).map(|e| (e.position, e.idx)).collect();
        assert_eq!(
            tail,
            vec![(PriorityPosition::Place(4), 0), (PriorityPosition::Place(5), 2)]
        );
        assert_eq!(entries[0].color, "Yellow");
    }

    #[test]
    fn test_repeat_grant_leaves_order_unchanged() {
        let mut order = vec![1, 3];
        grant(&mut order, 3);
        assert_eq!(order, vec![1, 3]);
    }
}
