/// Millisecond accumulator that fires once per elapsed period.
///
/// Overrun is carried into the next period instead of being dropped, so
/// a timer fed uneven steps stays in phase over the long run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cadence {
    elapsed: u64,
    period: u64,
}

impl Cadence {
    pub fn new(period: u64) -> Self {
        Self::with_offset(period, 0)
    }

    pub fn with_offset(period: u64, elapsed: u64) -> Self {
        assert!(period > 0, "cadence period must be non-zero");
        Cadence { elapsed, period }
    }

    /// Adds `ms` and returns how many whole periods were crossed.
    pub fn advance(&mut self, ms: u64) -> u32 {
        self.elapsed += ms;

        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }

    #[cfg(test)]
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }
}
