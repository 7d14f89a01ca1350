use std::time::Instant;
use tdigest::TDigest;

/// Collects scoring latencies and reports percentiles.
#[derive(Clone)]
pub struct Stopwatch {
    start_time: Instant,
    scoring_durations_micros: Vec<f64>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            start_time: Instant::now(),
            scoring_durations_micros: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn stop(&mut self) {
        let duration_as_micros = self.start_time.elapsed().as_micros() as f64;
        self.record(duration_as_micros);
    }

    pub fn record(&mut self, duration_as_micros: f64) {
        self.scoring_durations_micros.push(duration_as_micros);
    }

    pub fn get_n(&self) -> usize {
        self.scoring_durations_micros.len()
    }

    /// Estimated latency quantile, `q` in `[0, 1]`.
    pub fn get_percentile_in_micros(&self, q: f64) -> f64 {
        if self.scoring_durations_micros.is_empty() {
            return 0.0;
        }
        let t_digest = TDigest::new_with_size(100);
        let sorted_digest = t_digest.merge_unsorted(self.scoring_durations_micros.clone());
        sorted_digest.estimate_quantile(q)
    }
}
