use anyhow::{bail, Context};
use itertools::Itertools;

use userknn::config::AppConfig;
use userknn::io::parse_scoring_request;
use userknn::logging;
use userknn::store::InMemoryRatingStore;
use userknn::uuknn::UserUserScorer;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_default();
    let requests = args
        .map(|request| parse_scoring_request(&request))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if requests.is_empty() {
        bail!("usage: predict <config> <user>:<item>[,<item>...] ...");
    }

    let config = AppConfig::new(&config_path)?;
    logging::init(&config.log.level);
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.compute.num_threads)
        .build_global()
        .context("unable to configure thread pool")?;

    let store = InMemoryRatingStore::from_csv(&config.data.ratings_path, config.data.has_headers)?;
    let scorer = UserUserScorer::new(store);

    for (user, items) in requests.iter() {
        let predictions = scorer
            .score(*user, items)
            .with_context(|| format!("scoring user {} failed", user))?;
        for item in items.iter().unique() {
            println!("{},{},{:.4}", user, item, predictions[item]);
        }
    }
    Ok(())
}
