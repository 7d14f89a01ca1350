use thiserror::Error;

use crate::io::{ItemId, Rating, UserId};

pub mod in_memory;

pub use in_memory::InMemoryRatingStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("rating store unavailable: {0}")]
    Unavailable(String),
    #[error("rating store backend failure")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Read access to user ratings, as needed by the neighborhood scorer.
///
/// Unknown users and unknown items are not errors: they yield empty results. An `Err`
/// is reserved for infrastructural failures and aborts the scoring call it happens in.
pub trait RatingStore: Sync {
    /// All `(item, rating)` pairs the user has rated.
    fn ratings_for_user(&self, user: UserId) -> Result<Vec<(ItemId, Rating)>, StoreError>;

    /// All users that have rated the item.
    fn users_who_rated(&self, item: ItemId) -> Result<Vec<UserId>, StoreError>;
}
