use anyhow::{anyhow, Context};
use indicatif::ProgressBar;
use itertools::Itertools;
use serde_derive::Serialize;

use userknn::config::AppConfig;
use userknn::io::{group_by_user, read_ratings, ItemId};
use userknn::logging;
use userknn::metrics::evaluation_reporter::EvaluationReporter;
use userknn::stopwatch::Stopwatch;
use userknn::store::InMemoryRatingStore;
use userknn::uuknn::UserUserScorer;

#[derive(Serialize)]
struct PredictionRow {
    user: u64,
    item: u64,
    actual: f64,
    predicted: f64,
}

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(&config_path)?;
    logging::init(&config.log.level);
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.compute.num_threads)
        .build_global()
        .context("unable to configure thread pool")?;

    let test_data_path = config
        .data
        .test_data_path
        .as_deref()
        .ok_or_else(|| anyhow!("data.test_data_path is required for evaluation"))?;
    tracing::info!(test_data_path, "evaluating");

    let store = InMemoryRatingStore::from_csv(&config.data.ratings_path, config.data.has_headers)?;
    let scorer = UserUserScorer::new(store);

    let test_records = read_ratings(test_data_path, config.data.has_headers)?;
    let test_users = group_by_user(&test_records);

    let mut writer = match &config.eval.out_path {
        Some(out_path) => Some(
            csv::Writer::from_path(out_path)
                .with_context(|| format!("unable to create {}", out_path))?,
        ),
        None => None,
    };

    let mut reporter = EvaluationReporter::new();
    let mut stopwatch = Stopwatch::new();
    let progress_bar = ProgressBar::new(test_users.len() as u64);

    for (user, held_out) in test_users.iter().sorted_by_key(|(user, _)| **user) {
        progress_bar.inc(1);
        let items: Vec<ItemId> = held_out.iter().map(|(item, _rating)| *item).collect();

        stopwatch.start();
        let predictions = scorer
            .score(*user, &items)
            .with_context(|| format!("scoring user {} failed", user))?;
        stopwatch.stop();

        for (item, actual) in held_out.iter() {
            let predicted = predictions[item];
            reporter.add(predicted, *actual);
            if let Some(writer) = writer.as_mut() {
                writer.serialize(PredictionRow {
                    user: *user,
                    item: *item,
                    actual: *actual,
                    predicted,
                })?;
            }
        }
    }
    progress_bar.finish();
    if let Some(mut writer) = writer {
        writer.flush()?;
    }

    println!("===============================================================");
    println!("===               START EVALUATING TEST FILE               ====");
    println!("===============================================================");
    println!("{}", reporter.get_name());
    println!("{}", reporter.result());
    println!("Qty scored users: {}", stopwatch.get_n());
    println!("Scoring latency per user");
    println!("p90 (microseconds): {}", stopwatch.get_percentile_in_micros(0.90));
    println!("p95 (microseconds): {}", stopwatch.get_percentile_in_micros(0.95));
    println!("p99.5 (microseconds): {}", stopwatch.get_percentile_in_micros(0.995));
    Ok(())
}
