use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// SplitOutcome — train/test partition of mapped records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitOutcome<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

impl<T> SplitOutcome<T> {
    pub fn new(train: Vec<T>, test: Vec<T>) -> Self {
        Self { train, test }
    }
}

/// Shuffles `records` with a seeded RNG, then moves the last `test_size`
/// records into the test set. Train and test are disjoint and together hold
/// every input record. If there are `test_size` records or fewer, all of them
/// go to test.
pub fn holdout_split<T>(mut records: Vec<T>, test_size: usize, seed: u64) -> SplitOutcome<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    records.shuffle(&mut rng);

    let cut = records.len().saturating_sub(test_size);
    let test = records.split_off(cut);
    SplitOutcome::new(records, test)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
