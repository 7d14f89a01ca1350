use crate::metrics::RatingMetric;

pub struct Mae {
    sum_of_errors: f64,
    qty: usize,
}

impl Mae {
    pub fn new() -> Mae {
        Mae {
            sum_of_errors: 0_f64,
            qty: 0,
        }
    }
}

impl Default for Mae {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingMetric for Mae {
    fn add(&mut self, predicted: f64, actual: f64) {
        if predicted.is_finite() {
            self.sum_of_errors += (predicted - actual).abs();
            self.qty += 1;
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_errors / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        "MAE".to_string()
    }
}

#[cfg(test)]
mod mae_test {
    use super::*;

    #[test]
    fn should_calculate_mae() {
        let mut undertest = Mae::new();
        undertest.add(4.0, 5.0);
        undertest.add(3.5, 1.5);
        undertest.add(f64::NAN, 2.0);
        assert!((1.5 - undertest.result()).abs() < f64::EPSILON);
        assert_eq!("MAE", undertest.get_name());
    }

    #[test]
    fn should_handle_divide_by_zero() {
        let undertest = Mae::new();
        assert!((0.0 - undertest.result()).abs() < f64::EPSILON);
    }
}
