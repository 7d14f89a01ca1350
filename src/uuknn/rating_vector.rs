use crate::io::UserId;
use crate::store::{RatingStore, StoreError};
use crate::uuknn::sparse_vector::SparseVector;

/// The user's literal ratings keyed by item id. A user without history gets an empty
/// vector.
pub fn rating_vector<S: RatingStore + ?Sized>(store: &S, user: UserId) -> Result<SparseVector, StoreError> {
    let ratings = store.ratings_for_user(user)?;
    Ok(SparseVector::from_pairs(ratings))
}

#[cfg(test)]
mod rating_vector_test {
    use super::*;
    use crate::io::RatingRecord;
    use crate::store::InMemoryRatingStore;

    #[test]
    fn should_build_vector_from_history() {
        let store = InMemoryRatingStore::new(&[
            RatingRecord::new(1, 20, 2.0),
            RatingRecord::new(1, 10, 4.0),
        ]);
        let vector = rating_vector(&store, 1).unwrap();
        assert_eq!(vec![(10, 4.0), (20, 2.0)], vector.iter().collect::<Vec<_>>());
    }

    #[test]
    fn should_return_empty_vector_for_unknown_user() {
        let store = InMemoryRatingStore::new(&[RatingRecord::new(1, 10, 4.0)]);
        let vector = rating_vector(&store, 42).unwrap();
        assert!(vector.is_empty());
    }
}
