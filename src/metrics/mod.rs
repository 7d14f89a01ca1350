pub mod coverage;
pub mod evaluation_reporter;
pub mod mae;
pub mod rmse;

/// Accuracy metric accumulated over (predicted, actual) rating pairs.
pub trait RatingMetric {
    fn add(&mut self, predicted: f64, actual: f64);
    fn result(&self) -> f64;
    fn get_name(&self) -> String;
}
