use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of uniform random integers consumed by the batch generator.
pub trait RandomSource {
    /// Returns an integer in `[min, max]`, both inclusive. Callers guarantee `min <= max`.
    fn int_in_range(&mut self, min: usize, max: usize) -> usize;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn int_in_range(&mut self, min: usize, max: usize) -> usize {
        (**self).int_in_range(min, max)
    }
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible source; the same seed always yields the same batches.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn int_in_range(&mut self, min: usize, max: usize) -> usize {
        self.rng.gen_range(min..=max)
    }
}

/// Replays a fixed list of picks, clamping each into the requested range.
///
/// Once the list is exhausted every request returns its lower bound.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    picks: Vec<usize>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(picks: impl Into<Vec<usize>>) -> Self {
        Self {
            picks: picks.into(),
            cursor: 0,
        }
    }

    /// A source that always picks the lower bound.
    pub fn lowest() -> Self {
        Self::default()
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn int_in_range(&mut self, min: usize, max: usize) -> usize {
        let pick = self.picks.get(self.cursor).copied().unwrap_or(min);
        self.cursor += 1;
        pick.clamp(min, max)
    }
}
