use crate::metrics::RatingMetric;

/// Root mean squared error over the predictions that produced a number.
pub struct Rmse {
    sum_of_squares: f64,
    qty: usize,
}

impl Rmse {
    pub fn new() -> Rmse {
        Rmse {
            sum_of_squares: 0_f64,
            qty: 0,
        }
    }
}

impl Default for Rmse {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingMetric for Rmse {
    fn add(&mut self, predicted: f64, actual: f64) {
        if predicted.is_finite() {
            let error = predicted - actual;
            self.sum_of_squares += error * error;
            self.qty += 1;
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            (self.sum_of_squares / self.qty as f64).sqrt()
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        "RMSE".to_string()
    }
}
