//! Randomized partition of a savings target into denomination batches.
//!
//! The generator works entirely in millimes. Each step picks one of the
//! denominations that still fits the remaining amount, sizes the batch from
//! that denomination's bundle hints, and subtracts it. When nothing fits any
//! more, a single closing batch absorbs the remainder so the batches always
//! add up to the target exactly. The result is then shuffled (Fisher–Yates)
//! so batches of the same denomination are not clustered.

mod random;

pub use random::{RandomSource, RngSource, SequenceSource};

use crate::{
    currency::{denomination::Denomination, Amount},
    goal::Batch,
};

/// Splits `target` into batches drawn from `allowed`.
///
/// Returns an empty list when the target is not positive or no positive
/// denomination is allowed.
pub fn generate<S>(target: Amount, allowed: &[Amount], source: &mut S) -> Vec<Batch>
where
    S: RandomSource + ?Sized,
{
    if !target.is_positive() {
        tracing::debug!(amount = %target, "non-positive target, no batches generated");
        return Vec::new();
    }

    let mut denoms: Vec<Amount> = allowed.iter().copied().filter(|v| v.is_positive()).collect();
    denoms.sort_by(|a, b| b.cmp(a));
    denoms.dedup();
    let Some(&smallest) = denoms.last() else {
        tracing::debug!("no denominations selected, no batches generated");
        return Vec::new();
    };

    let mut batches = Vec::new();
    let mut remaining = target;

    while remaining.is_positive() {
        let fitting: Vec<Amount> = denoms.iter().copied().filter(|v| *v <= remaining).collect();
        let id = format!("batch-{}", batches.len() + 1);

        if fitting.is_empty() {
            tracing::debug!(
                remaining = %remaining,
                denomination = %smallest,
                "remaining amount below smallest denomination, closing with partial batch"
            );
            batches.push(Batch::closing(id, smallest, remaining));
            break;
        }

        let denom = fitting[source.int_in_range(0, fitting.len() - 1)];
        let count = pick_count(denom, remaining, source);
        let batch = Batch::new(id, denom, count);
        remaining -= batch.total_value;
        batches.push(batch);
    }

    shuffle(&mut batches, source);
    batches
}

/// Chooses how many pieces of `denom` go into the next batch.
fn pick_count<S>(denom: Amount, remaining: Amount, source: &mut S) -> u32
where
    S: RandomSource + ?Sized,
{
    let sizes: Vec<u32> = Denomination::bundle_sizes_for(denom)
        .iter()
        .copied()
        .filter(|size| denom.checked_mul(*size).is_some_and(|total| total <= remaining))
        .collect();

    if sizes.is_empty() {
        let fits = remaining.millimes() / denom.millimes();
        u32::try_from(fits).unwrap_or(u32::MAX).max(1)
    } else {
        sizes[source.int_in_range(0, sizes.len() - 1)]
    }
}

/// Unbiased in-place Fisher–Yates shuffle.
fn shuffle<T, S>(items: &mut [T], source: &mut S)
where
    S: RandomSource + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = source.int_in_range(0, i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn millimes(values: &[i64]) -> Vec<Amount> {
        values.iter().copied().map(Amount::from_millimes).collect()
    }

    fn total(batches: &[Batch]) -> Amount {
        batches.iter().map(|b| b.total_value).sum()
    }

    #[test]
    fn half_dinar_pair_fills_one_dinar_in_one_bundle() {
        let batches = generate(
            Amount::from_dinars(1),
            &millimes(&[500]),
            &mut RngSource::seeded(1),
        );
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.denomination_value, Amount::from_millimes(500));
        assert_eq!(batch.count, 2);
        assert_eq!(batch.total_value, Amount::from_dinars(1));
        assert!(!batch.is_partial());
        assert!(!batch.is_completed);
    }

    #[test]
    fn unlisted_value_splits_into_single_pieces() {
        let batches = generate(
            Amount::from_millimes(600),
            &millimes(&[300]),
            &mut RngSource::seeded(1),
        );
        assert_eq!(batches.len(), 2);
        for batch in &batches {
            assert_eq!(batch.denomination_value, Amount::from_millimes(300));
            assert_eq!(batch.count, 1);
            assert_eq!(batch.total_value, Amount::from_millimes(300));
            assert!(!batch.is_completed);
        }
        assert_eq!(total(&batches), Amount::from_millimes(600));
    }

    #[test]
    fn remainder_below_smallest_denomination_becomes_closing_batch() {
        let batches = generate(
            Amount::from_millimes(30),
            &millimes(&[500, 1_000]),
            &mut RngSource::seeded(1),
        );
        assert_eq!(batches.len(), 1);
        let closing = &batches[0];
        assert_eq!(closing.denomination_value, Amount::from_millimes(500));
        assert_eq!(closing.count, 1);
        assert_eq!(closing.total_value, Amount::from_millimes(30));
        assert!(closing.is_partial());
    }

    #[test]
    fn empty_selection_or_non_positive_target_yields_nothing() {
        let mut source = SequenceSource::lowest();
        assert!(generate(Amount::from_dinars(100), &[], &mut source).is_empty());
        assert!(generate(Amount::ZERO, &millimes(&[1_000]), &mut source).is_empty());
        assert!(generate(Amount::from_millimes(-5), &millimes(&[1_000]), &mut source).is_empty());
        assert!(generate(Amount::from_dinars(3), &millimes(&[0, -100]), &mut source).is_empty());
        assert_eq!(source.consumed(), 0);
    }

    #[test]
    fn scripted_picks_drive_denomination_and_bundle_choice() {
        // Sorted descending: [5dt, 1dt]. First step takes 5dt with bundle index 0 (one bill).
        // Second step takes 1dt; its 10-coin bundle no longer fits the 5 DT left, so index 2
        // of [1, 2, 5] selects five coins.
        let mut source = SequenceSource::new(vec![0, 0, 1, 2]);
        let batches = generate(
            Amount::from_dinars(10),
            &[Amount::from_dinars(1), Amount::from_dinars(5)],
            &mut source,
        );
        let mut shapes: Vec<_> = batches
            .iter()
            .map(|b| (b.denomination_value.millimes(), b.count))
            .collect();
        shapes.sort();
        assert_eq!(shapes, vec![(1_000, 5), (5_000, 1)]);
    }

    #[test]
    fn oversized_bundles_fall_back_to_max_fit() {
        // 50 millimes bundles start at 10 pieces (500 millimes); 150 millimes only fits 3.
        let batches = generate(
            Amount::from_millimes(150),
            &millimes(&[50]),
            &mut SequenceSource::lowest(),
        );
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].count, 3);
        assert_eq!(batches[0].total_value, Amount::from_millimes(150));
        assert!(!batches[0].is_partial());
    }

    #[test]
    fn denominations_outside_the_table_use_single_pieces() {
        let batches = generate(
            Amount::from_millimes(900),
            &millimes(&[300]),
            &mut SequenceSource::lowest(),
        );
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.count == 1));
    }

    #[test]
    fn sum_invariant_holds_across_seeds_and_selections() {
        let selections = [
            millimes(&[50]),
            millimes(&[500, 1_000, 2_000, 5_000, 10_000]),
            millimes(&[200, 20_000, 50_000]),
            millimes(&[100, 300]),
            millimes(&[50_000]),
        ];
        let targets = [1, 29, 999, 1_000, 10_050, 123_456, 1_000_000];
        for seed in 0..20u64 {
            for allowed in &selections {
                for target in targets {
                    let target = Amount::from_millimes(target);
                    let batches = generate(target, allowed, &mut RngSource::seeded(seed));
                    assert_eq!(total(&batches), target, "seed {seed}, allowed {allowed:?}");
                    let min = *allowed.iter().min().unwrap();
                    for (idx, batch) in batches.iter().enumerate() {
                        assert!(batch.count >= 1);
                        assert!(batch.total_value.is_positive());
                        assert!(allowed.contains(&batch.denomination_value));
                        if batch.is_partial() {
                            assert_eq!(batch.denomination_value, min);
                            assert!(batch.total_value < min);
                            assert_eq!(
                                batches.iter().filter(|b| b.is_partial()).count(),
                                1,
                                "only one closing batch at {idx}"
                            );
                        }
                    }
                    let bound = (target.millimes() / min.millimes()) as usize + 1;
                    assert!(batches.len() <= bound);
                }
            }
        }
    }

    #[test]
    fn batch_ids_are_unique() {
        let batches = generate(
            Amount::from_dinars(500),
            &millimes(&[500, 1_000, 2_000]),
            &mut RngSource::seeded(99),
        );
        let mut ids: Vec<_> = batches.iter().map(|b| b.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), batches.len());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut RngSource::seeded(3));
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_is_not_biased_toward_identity() {
        let mut first_positions: HashMap<u32, usize> = HashMap::new();
        let mut source = RngSource::seeded(11);
        for _ in 0..3_000 {
            let mut items = [0u32, 1, 2];
            shuffle(&mut items, &mut source);
            *first_positions.entry(items[0]).or_default() += 1;
        }
        for value in 0..3 {
            let hits = first_positions.get(&value).copied().unwrap_or(0);
            assert!((800..1_200).contains(&hits), "value {value} led {hits} times");
        }
    }
}
