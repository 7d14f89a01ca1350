use std::path::Path;
use std::time::Instant;

use hashbrown::HashMap;
use itertools::Itertools;
use rayon::prelude::*;

use crate::io::{read_ratings, ItemId, Rating, RatingRecord, UserId};
use crate::store::{RatingStore, StoreError};

/// Rating store held fully in memory, indexed in both directions.
pub struct InMemoryRatingStore {
    user_to_ratings_sorted: HashMap<UserId, Vec<(ItemId, Rating)>>,
    item_to_users_sorted: HashMap<ItemId, Vec<UserId>>,
    qty_ratings: usize,
}

impl InMemoryRatingStore {
    pub fn from_csv<P: AsRef<Path>>(path: P, has_headers: bool) -> anyhow::Result<Self> {
        let start_time = Instant::now();
        let records = read_ratings(&path, has_headers)?;
        tracing::info!(
            path = %path.as_ref().display(),
            qty_records = records.len(),
            micros = start_time.elapsed().as_micros() as u64,
            "read rating records"
        );

        let start_time = Instant::now();
        let store = InMemoryRatingStore::new(&records);
        tracing::info!(
            qty_users = store.qty_users(),
            qty_items = store.qty_items(),
            qty_ratings = store.qty_ratings(),
            micros = start_time.elapsed().as_micros() as u64,
            "prepared rating indexes"
        );
        Ok(store)
    }

    /// Indexes the records. When a user rated the same item more than once, the last
    /// record wins.
    pub fn new(records: &[RatingRecord]) -> Self {
        let user_to_ratings_sorted: HashMap<UserId, Vec<(ItemId, Rating)>> = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.user, (position, record.item, record.rating)))
            .into_group_map()
            .into_par_iter()
            .map(|(user, mut ratings)| {
                ratings.sort_unstable_by(|left, right| left.1.cmp(&right.1).then(right.0.cmp(&left.0)));
                ratings.dedup_by_key(|(_position, item, _rating)| *item);
                let ratings = ratings
                    .into_iter()
                    .map(|(_position, item, rating)| (item, rating))
                    .collect_vec();
                (user, ratings)
            })
            .collect();

        let item_to_users_sorted: HashMap<ItemId, Vec<UserId>> = user_to_ratings_sorted
            .iter()
            .flat_map(|(user, ratings)| ratings.iter().map(move |(item, _rating)| (*item, *user)))
            .into_group_map()
            .into_par_iter()
            .map(|(item, mut users)| {
                users.sort_unstable();
                (item, users)
            })
            .collect();

        let qty_ratings = user_to_ratings_sorted.values().map(|ratings| ratings.len()).sum();

        InMemoryRatingStore {
            user_to_ratings_sorted,
            item_to_users_sorted,
            qty_ratings,
        }
    }

    pub fn qty_users(&self) -> usize {
        self.user_to_ratings_sorted.len()
    }

    pub fn qty_items(&self) -> usize {
        self.item_to_users_sorted.len()
    }

    /// Number of distinct (user, item) ratings.
    pub fn qty_ratings(&self) -> usize {
        self.qty_ratings
    }
}

impl RatingStore for InMemoryRatingStore {
    fn ratings_for_user(&self, user: UserId) -> Result<Vec<(ItemId, Rating)>, StoreError> {
        Ok(self
            .user_to_ratings_sorted
            .get(&user)
            .cloned()
            .unwrap_or_default())
    }

    fn users_who_rated(&self, item: ItemId) -> Result<Vec<UserId>, StoreError> {
        Ok(self
            .item_to_users_sorted
            .get(&item)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod in_memory_test {
    use super::*;

    #[test]
    fn should_index_both_directions() {
        let records = vec![
            RatingRecord::new(1, 10, 4.0),
            RatingRecord::new(2, 10, 2.0),
            RatingRecord::new(1, 11, 5.0),
            RatingRecord::new(3, 12, 1.0),
        ];
        let store = InMemoryRatingStore::new(&records);

        assert_eq!(3, store.qty_users());
        assert_eq!(3, store.qty_items());
        assert_eq!(4, store.qty_ratings());
        assert_eq!(vec![(10, 4.0), (11, 5.0)], store.ratings_for_user(1).unwrap());
        assert_eq!(vec![1, 2], store.users_who_rated(10).unwrap());
        assert_eq!(vec![3], store.users_who_rated(12).unwrap());
    }

    #[test]
    fn should_keep_last_duplicate_rating() {
        let records = vec![
            RatingRecord::new(1, 10, 1.0),
            RatingRecord::new(1, 10, 3.5),
        ];
        let store = InMemoryRatingStore::new(&records);
        assert_eq!(vec![(10, 3.5)], store.ratings_for_user(1).unwrap());
        assert_eq!(vec![1], store.users_who_rated(10).unwrap());
        assert_eq!(1, store.qty_ratings());
    }

    #[test]
    fn should_return_empty_for_unknown_ids() {
        let store = InMemoryRatingStore::new(&[RatingRecord::new(1, 10, 4.0)]);
        assert!(store.ratings_for_user(99).unwrap().is_empty());
        assert!(store.users_who_rated(99).unwrap().is_empty());
    }
}
