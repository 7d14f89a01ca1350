use crate::metrics::coverage::Coverage;
use crate::metrics::mae::Mae;
use crate::metrics::rmse::Rmse;
use crate::metrics::RatingMetric;

pub struct EvaluationReporter {
    rmse: Rmse,
    mae: Mae,
    coverage: Coverage,
}

impl EvaluationReporter {
    pub fn new() -> EvaluationReporter {
        EvaluationReporter {
            rmse: Rmse::new(),
            mae: Mae::new(),
            coverage: Coverage::new(),
        }
    }

    pub fn add(&mut self, predicted: f64, actual: f64) {
        self.rmse.add(predicted, actual);
        self.mae.add(predicted, actual);
        self.coverage.add(predicted, actual);
    }

    pub fn result(&self) -> String {
        format!(
            "{:.4},{:.4},{:.4}",
            self.rmse.result(),
            self.mae.result(),
            self.coverage.result()
        )
    }

    pub fn get_name(&self) -> String {
        format!(
            "{},{},{}",
            self.rmse.get_name(),
            self.mae.get_name(),
            self.coverage.get_name()
        )
    }
}

impl Default for EvaluationReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod evaluation_reporter_test {
    use super::*;

    #[test]
    fn should_report_all_metrics() {
        let mut reporter = EvaluationReporter::new();
        reporter.add(4.0, 5.0);
        reporter.add(f64::NAN, 3.0);
        assert_eq!("RMSE,MAE,Coverage", reporter.get_name());
        assert_eq!("1.0000,1.0000,0.5000", reporter.result());
    }
}
