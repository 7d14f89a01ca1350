use std::cmp::Ordering;

use hashbrown::HashMap;
use rayon::prelude::*;

use crate::io::{ItemId, UserId};
use crate::store::{RatingStore, StoreError};
use crate::uuknn::rating_vector::rating_vector;
use crate::uuknn::similarity::cosine_similarity;
use crate::uuknn::sparse_vector::SparseVector;

pub mod rating_vector;
pub mod similarity;
pub mod sparse_vector;

/// Number of most similar neighbors that contribute to a prediction.
pub const NEIGHBORHOOD_SIZE: usize = 30;

/// A candidate neighbor for one item: its similarity to the target user and its
/// mean-centered rating for that item.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Neighbor {
    pub user: UserId,
    pub similarity: f64,
    pub offset: f64,
}

impl Neighbor {
    pub fn new(user: UserId, similarity: f64, offset: f64) -> Self {
        Neighbor {
            user,
            similarity,
            offset,
        }
    }
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order by similarity, ties broken by ascending user id
        other
            .similarity
            .total_cmp(&self.similarity)
            .then(self.user.cmp(&other.user))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ranks the neighbors from most to least similar and keeps the first `size`.
pub fn select_neighborhood(mut neighbors: Vec<Neighbor>, size: usize) -> Vec<Neighbor> {
    if size == 0 {
        return Vec::new();
    }
    if neighbors.len() > size {
        neighbors.select_nth_unstable(size - 1);
        neighbors.truncate(size);
    }
    neighbors.sort_unstable();
    neighbors
}

/// Similarity-weighted average of the neighbors' offsets, added to the target user's mean.
///
/// No smoothing is applied: without neighbors, or when every similarity is zero, the
/// weight is zero and the prediction is NaN. A user without ratings has a NaN mean and
/// therefore also gets NaN.
pub fn predict_rating(user_mean: f64, neighborhood: &[Neighbor]) -> f64 {
    let (sum, weight) = neighborhood
        .iter()
        .fold((0.0, 0.0), |(sum, weight), neighbor| {
            (
                sum + neighbor.similarity * neighbor.offset,
                weight + neighbor.similarity.abs(),
            )
        });
    user_mean + sum / weight
}

/// User-user collaborative filtering scorer.
///
/// Items of one scoring call are scored in parallel, and so are the candidate neighbors
/// of one item. Ranking and aggregation run sequentially in rank order, so the
/// predictions do not depend on the thread count.
pub struct UserUserScorer<S> {
    store: S,
}

impl<S: RatingStore> UserUserScorer<S> {
    pub fn new(store: S) -> Self {
        UserUserScorer { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Predicts the user's rating for every item in `items`. Every requested item gets an
    /// entry, possibly NaN. Only a failing rating store makes the whole call fail.
    pub fn score(&self, user: UserId, items: &[ItemId]) -> Result<HashMap<ItemId, f64>, StoreError> {
        let user_vector = rating_vector(&self.store, user)?;
        let user_mean = user_vector.mean();
        let user_centered = user_vector.centered(user_mean);
        if user_vector.is_empty() {
            tracing::debug!(user, "user has no ratings, predictions will be NaN");
        }

        items
            .par_iter()
            .map(|&item| -> Result<(ItemId, f64), StoreError> {
                let neighbors = self.neighbors_for_item(user, &user_centered, item)?;
                let qty_candidates = neighbors.len();
                let neighborhood = select_neighborhood(neighbors, NEIGHBORHOOD_SIZE);
                for neighbor in neighborhood.iter() {
                    tracing::trace!(
                        user,
                        item,
                        neighbor = neighbor.user,
                        similarity = neighbor.similarity,
                        offset = neighbor.offset,
                        "neighbor"
                    );
                }
                let prediction = predict_rating(user_mean, &neighborhood);
                tracing::debug!(
                    user,
                    item,
                    qty_candidates,
                    qty_neighbors = neighborhood.len(),
                    prediction,
                    "scored item"
                );
                Ok((item, prediction))
            })
            .collect()
    }

    /// Every other user that rated `item`, with similarity and offset.
    pub(crate) fn neighbors_for_item(
        &self,
        user: UserId,
        user_centered: &SparseVector,
        item: ItemId,
    ) -> Result<Vec<Neighbor>, StoreError> {
        let candidates = self.store.users_who_rated(item)?;
        let neighbors: Vec<Option<Neighbor>> = candidates
            .par_iter()
            .filter(|&&candidate| candidate != user)
            .map(|&candidate| -> Result<Option<Neighbor>, StoreError> {
                let candidate_vector = rating_vector(&self.store, candidate)?;
                let candidate_rating = match candidate_vector.get(item) {
                    Some(rating) => rating,
                    None => {
                        tracing::warn!(
                            neighbor = candidate,
                            item,
                            "rating store lists a rater without a rating, skipping"
                        );
                        return Ok(None);
                    }
                };
                let candidate_mean = candidate_vector.mean();
                let candidate_centered = candidate_vector.centered(candidate_mean);
                let similarity = cosine_similarity(user_centered, &candidate_centered);
                Ok(Some(Neighbor::new(
                    candidate,
                    similarity,
                    candidate_rating - candidate_mean,
                )))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(neighbors.into_iter().flatten().collect())
    }
}
