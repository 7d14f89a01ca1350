use crate::metrics::RatingMetric;

/// Fraction of requested predictions that produced a number.
pub struct Coverage {
    qty_predicted: usize,
    qty: usize,
}

impl Coverage {
    pub fn new() -> Coverage {
        Coverage {
            qty_predicted: 0,
            qty: 0,
        }
    }
}

impl Default for Coverage {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingMetric for Coverage {
    fn add(&mut self, predicted: f64, _actual: f64) {
        self.qty += 1;
        if predicted.is_finite() {
            self.qty_predicted += 1;
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.qty_predicted as f64 / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        "Coverage".to_string()
    }
}
