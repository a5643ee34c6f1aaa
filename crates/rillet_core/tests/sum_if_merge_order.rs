//! Partial aggregation must give the same result no matter how rows are
//! partitioned and in what order partial states are merged.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rillet_core::arrays::array::{Array, ArrayData};
use rillet_core::arrays::datatype::DataType;
use rillet_core::arrays::testutil::assert_array_data_eq;
use rillet_core::functions::aggregate::AggregatePartition;
use rillet_core::functions::aggregate::builtin::sum_if::{
    FUNCTION_SET_SUM_IF,
    NullableSumState,
    SumState,
};

const SEEDS: [u64; 4] = [0, 7, 42, 9001];

fn random_rows(rng: &mut ChaCha8Rng, num_rows: usize) -> Vec<(bool, i64, i64)> {
    (0..num_rows)
        .map(|_| {
            // Large values so sums regularly wrap.
            (rng.random_bool(0.4), rng.random::<i64>(), rng.random_range(-100..100))
        })
        .collect()
}

/// Split `items` into `num_partitions` randomly sized chunks, some possibly
/// empty.
fn random_partitions<T: Clone>(rng: &mut ChaCha8Rng, items: &[T], num_partitions: usize) -> Vec<Vec<T>> {
    let mut partitions = vec![Vec::new(); num_partitions];
    for item in items {
        let idx = rng.random_range(0..num_partitions);
        partitions[idx].push(item.clone());
    }
    partitions
}

/// Merge states pairwise in a random tree shape.
fn merge_random_tree<S, F>(rng: &mut ChaCha8Rng, mut states: Vec<S>, merge: F) -> S
where
    S: Default,
    F: Fn(&mut S, &S),
{
    states.shuffle(rng);
    while states.len() > 1 {
        let right = states.swap_remove(rng.random_range(0..states.len()));
        let left_idx = rng.random_range(0..states.len());
        merge(&mut states[left_idx], &right);
    }
    states.pop().unwrap_or_default()
}

#[test]
fn nullable_two_arg_any_merge_order() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rows = random_rows(&mut rng, 500);

        let mut expected = NullableSumState::default();
        for &(cond, value, _) in &rows {
            expected.input(cond, value);
        }

        for num_partitions in [1, 2, 5, 17] {
            let partials: Vec<_> = random_partitions(&mut rng, &rows, num_partitions)
                .into_iter()
                .map(|partition| {
                    let mut state = NullableSumState::default();
                    for (cond, value, _) in partition {
                        state.input(cond, value);
                    }
                    state
                })
                .collect();

            let got = merge_random_tree(&mut rng, partials, NullableSumState::combine);
            assert_eq!(expected.output(), got.output(), "seed: {seed}, partitions: {num_partitions}");
            assert_eq!(expected.is_null(), got.is_null());
        }
    }
}

#[test]
fn nullable_mostly_false_keeps_nulls_consistent() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        // Few true conditions so that many partitions stay null.
        let rows: Vec<_> = (0..40)
            .map(|_| (rng.random_bool(0.05), rng.random_range(-10..10_i64)))
            .collect();

        let mut expected = NullableSumState::default();
        for &(cond, value) in &rows {
            expected.input(cond, value);
        }

        let partials: Vec<_> = random_partitions(&mut rng, &rows, 8)
            .into_iter()
            .map(|partition| {
                let mut state = NullableSumState::default();
                for (cond, value) in partition {
                    state.input(cond, value);
                }
                state
            })
            .collect();

        let got = merge_random_tree(&mut rng, partials, NullableSumState::combine);
        assert_eq!(expected.output(), got.output(), "seed: {seed}");
    }
}

#[test]
fn non_null_three_arg_any_merge_order() {
    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let rows = random_rows(&mut rng, 300);

        let mut expected = SumState::default();
        for &(cond, value, default) in &rows {
            expected.input_with_default(cond, value, default);
        }

        let partials: Vec<_> = random_partitions(&mut rng, &rows, 6)
            .into_iter()
            .map(|partition| {
                let mut state = SumState::default();
                for (cond, value, default) in partition {
                    state.input_with_default(cond, value, default);
                }
                state
            })
            .collect();

        let got = merge_random_tree(&mut rng, partials, SumState::combine);
        assert_eq!(expected.output(), got.output(), "seed: {seed}");
    }
}

#[test]
fn function_partition_order_irrelevant() {
    let func = FUNCTION_SET_SUM_IF
        .find_exact(&[DataType::Boolean, DataType::Int64, DataType::Int64])
        .unwrap();

    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let num_groups = 4;

        let rows: Vec<_> = (0..200)
            .map(|_| {
                let cond = rng.random_bool(0.8).then(|| rng.random_bool(0.5));
                let value = rng.random_bool(0.9).then(|| rng.random::<i64>());
                let default = rng.random_range(-5..5_i64);
                let group = rng.random_range(0..num_groups);
                (cond, value, default, group)
            })
            .collect();

        let to_partition = |rows: &[(Option<bool>, Option<i64>, i64, usize)]| AggregatePartition {
            inputs: vec![
                Array::from_iter(rows.iter().map(|r| r.0)).into(),
                Array::from_iter(rows.iter().map(|r| r.1)).into(),
                Array::from_iter(rows.iter().map(|r| Some(r.2))).into(),
            ],
            mapping: rows.iter().map(|r| r.3).collect(),
        };

        let expected = func.aggregate(&[to_partition(rows.as_slice())], num_groups).unwrap();

        let mut partitions: Vec<_> = random_partitions(&mut rng, &rows, 5)
            .iter()
            .map(|rows| to_partition(rows.as_slice()))
            .collect();
        partitions.shuffle(&mut rng);

        let got: ArrayData = func.aggregate(&partitions, num_groups).unwrap();
        assert_array_data_eq(&expected, &got);
    }
}
