use anyhow::{anyhow, ensure, Context};
use hashbrown::HashMap;
use itertools::Itertools;
use std::path::Path;

pub type UserId = u64;
pub type ItemId = u64;
pub type Rating = f64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingRecord {
    pub user: UserId,
    pub item: ItemId,
    pub rating: Rating,
}

impl RatingRecord {
    pub fn new(user: UserId, item: ItemId, rating: Rating) -> Self {
        RatingRecord { user, item, rating }
    }
}

/// Reads comma separated `user,item,rating[,timestamp]` rows. Columns after the rating
/// are ignored.
pub fn read_ratings<P: AsRef<Path>>(path: P, has_headers: bool) -> anyhow::Result<Vec<RatingRecord>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("unable to open ratings file {}", path.display()))?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.with_context(|| format!("unable to read {}", path.display()))?;
        let line = row.position().map(|position| position.line()).unwrap_or_default();
        let record = parse_row(&row).with_context(|| format!("{}:{}", path.display(), line))?;
        records.push(record);
    }
    Ok(records)
}

fn parse_row(row: &csv::StringRecord) -> anyhow::Result<RatingRecord> {
    let user = field(row, 0, "user")?
        .parse::<UserId>()
        .context("invalid user id")?;
    let item = field(row, 1, "item")?
        .parse::<ItemId>()
        .context("invalid item id")?;
    let rating = field(row, 2, "rating")?
        .parse::<Rating>()
        .context("invalid rating")?;
    ensure!(rating.is_finite(), "invalid rating '{}'", rating);
    Ok(RatingRecord::new(user, item, rating))
}

fn field<'a>(row: &'a csv::StringRecord, index: usize, name: &str) -> anyhow::Result<&'a str> {
    row.get(index)
        .ok_or_else(|| anyhow!("missing {} column", name))
}

/// Groups records per user, keeping the items of each user in file order.
pub fn group_by_user(records: &[RatingRecord]) -> HashMap<UserId, Vec<(ItemId, Rating)>> {
    records
        .iter()
        .map(|record| (record.user, (record.item, record.rating)))
        .into_group_map()
        .into_iter()
        .collect()
}

/// Parses a `<user>:<item>[,<item>...]` scoring request.
pub fn parse_scoring_request(request: &str) -> anyhow::Result<(UserId, Vec<ItemId>)> {
    let (user, items) = request
        .split_once(':')
        .ok_or_else(|| anyhow!("expected <user>:<item>[,<item>...], got '{}'", request))?;
    let user = user
        .trim()
        .parse::<UserId>()
        .with_context(|| format!("invalid user id in '{}'", request))?;
    let items = items
        .split(',')
        .map(|item| {
            item.trim()
                .parse::<ItemId>()
                .with_context(|| format!("invalid item id '{}' in '{}'", item, request))
        })
        .collect::<anyhow::Result<Vec<ItemId>>>()?;
    Ok((user, items))
}

#[cfg(test)]
mod io_test {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("userknn_{}_{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn should_read_ratings_with_optional_timestamp() {
        let path = write_temp("ratings.csv", "1,10,4.5\n1,11,3,881250949\n2, 10 ,2.0\n");
        let records = read_ratings(&path, false).unwrap();
        assert_eq!(
            vec![
                RatingRecord::new(1, 10, 4.5),
                RatingRecord::new(1, 11, 3.0),
                RatingRecord::new(2, 10, 2.0),
            ],
            records
        );
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn should_skip_header_when_requested() {
        let path = write_temp("ratings_header.csv", "userId,movieId,rating\n7,70,1.5\n");
        let records = read_ratings(&path, true).unwrap();
        assert_eq!(vec![RatingRecord::new(7, 70, 1.5)], records);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn should_report_malformed_rows() {
        let path = write_temp("ratings_bad.csv", "1,10,4.5\n1,abc,3\n");
        let error = read_ratings(&path, false).unwrap_err();
        assert!(format!("{:#}", error).contains("invalid item id"));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn should_reject_non_finite_ratings() {
        for (name, rating) in [("nan", "NaN"), ("inf", "inf"), ("neg_inf", "-inf")] {
            let path = write_temp(
                &format!("ratings_{}.csv", name),
                &format!("1,10,5\n2,10,4\n3,10,{}\n", rating),
            );
            let error = read_ratings(&path, false).unwrap_err();
            let message = format!("{:#}", error);
            assert!(message.contains("invalid rating"));
            assert!(message.contains(":3"));
            std::fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn should_group_records_per_user() {
        let records = vec![
            RatingRecord::new(1, 10, 4.0),
            RatingRecord::new(2, 10, 2.0),
            RatingRecord::new(1, 12, 5.0),
        ];
        let grouped = group_by_user(&records);
        assert_eq!(2, grouped.len());
        assert_eq!(vec![(10, 4.0), (12, 5.0)], grouped[&1]);
        assert_eq!(vec![(10, 2.0)], grouped[&2]);
    }

    #[test]
    fn should_parse_scoring_request() {
        let (user, items) = parse_scoring_request("42:10, 11,12").unwrap();
        assert_eq!(42, user);
        assert_eq!(vec![10, 11, 12], items);
    }

    #[test]
    fn should_reject_malformed_scoring_request() {
        assert!(parse_scoring_request("42").is_err());
        assert!(parse_scoring_request("x:1").is_err());
        assert!(parse_scoring_request("42:1,,2").is_err());
    }
}
