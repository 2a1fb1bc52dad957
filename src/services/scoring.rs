use crate::models::heat::{Score, Surfer};
use crate::models::ranking::{RankedResult, Total};
use crate::models::rules::{Penalty, RuleSet};
use std::cmp::Ordering;

/// Present waves of one surfer, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveSelection {
    pub top_two: Vec<Score>,
    pub all_sorted: Vec<Score>,
}

pub fn select_waves(waves: impl IntoIterator<Item = Score>) -> WaveSelection {
    let mut all_sorted: Vec<Score> = waves.into_iter().collect();
    all_sorted.sort_by(|a, b| b.cmp(a));
    let top_two = all_sorted.iter().copied().take(2).collect();
    WaveSelection {
        top_two,
        all_sorted,
    }
}

/// Best-two sum after the interference deduction, never below zero.
pub fn counted_total(top_two: &[Score], penalty: &Penalty) -> Total {
    if penalty.disqualify {
        return Total::ZERO;
    }
    let hundredths = |w: Option<&Score>| w.map_or(0, |s| u32::from(s.hundredths()));
    let first = hundredths(top_two.first());
    let second = hundredths(top_two.get(1));

    // Half-hundredths: the raw sum doubles, one removed half of a wave is
    // that wave's hundredths.
    let raw = 2 * (first + second);
    let deduction = first * u32::from(penalty.first_halves) + second * u32::from(penalty.second_halves);
    Total::from_half_hundredths(raw.saturating_sub(deduction))
}

fn compare_keys(a: &RankedResult, b: &RankedResult, capacity: usize) -> Ordering {
    let padded = |r: &RankedResult, i: usize| r.all_waves_sorted.get(i).map_or(0, |s| s.hundredths());
    a.total.cmp(&b.total).then_with(|| {
        (0..capacity)
            .map(|i| padded(a, i).cmp(&padded(b, i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Ranks every surfer by counted total, then by best single wave down
/// through every wave slot. Fully tied surfers keep their line-up order.
pub fn rank(surfers: &[Surfer], rules: &RuleSet) -> Vec<RankedResult> {
    let mut results: Vec<RankedResult> = surfers
        .iter()
        .enumerate()
        .map(|(idx, surfer)| {
            let selection = select_waves(surfer.present_waves());
            let penalty = rules.penalty(surfer.interference);
            RankedResult {
                idx,
                color: surfer.color.clone(),
                name: surfer.name.clone(),
                total: counted_total(&selection.top_two, penalty),
                top_waves: selection.top_two,
                all_waves_sorted: selection.all_sorted,
                all_waves: surfer.present_waves().collect(),
                interference: surfer.interference,
                interference_label: penalty.label,
                position: 0,
            }
        })
        .collect();

    let capacity = rules.wave_capacity;
    // sort_by is stable, so equal keys stay in line-up order
    results.sort_by(|a, b| compare_keys(b, a, capacity));

    for (pos, result) in results.iter_mut().enumerate() {
        result.position = pos + 1;
    }
    results
}
