use crate::uuknn::sparse_vector::SparseVector;

/// Similarity reported when the cosine is undefined: no shared keys, a zero norm, or a
/// non-finite result (for example a NaN-centered vector of a user without ratings).
pub const UNDEFINED_SIMILARITY: f64 = 0.0;

/// Cosine similarity of two (mean-centered) rating vectors.
///
/// The dot product only covers the keys both vectors share, while each norm covers the
/// full vector it belongs to.
pub fn cosine_similarity(left: &SparseVector, right: &SparseVector) -> f64 {
    let (dot, qty_shared) = left.dot(right);
    if qty_shared == 0 {
        return UNDEFINED_SIMILARITY;
    }
    let denominator = left.norm() * right.norm();
    if denominator == 0.0 {
        return UNDEFINED_SIMILARITY;
    }
    let similarity = dot / denominator;
    if similarity.is_finite() {
        similarity
    } else {
        UNDEFINED_SIMILARITY
    }
}

#[cfg(test)]
mod similarity_test {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn should_use_full_norms_with_overlapping_dot() {
        let target = SparseVector::from_pairs(vec![(1, 1.0), (2, -1.0), (3, 0.0)]);
        let neighbor = SparseVector::from_pairs(vec![(1, -0.5), (4, 0.5)]);
        // dot = -0.5, norms = sqrt(2) * sqrt(0.5) = 1
        assert!(approx_eq!(f64, -0.5, cosine_similarity(&target, &neighbor), epsilon = 1e-12));
    }

    #[test]
    fn should_return_sentinel_without_overlap() {
        let left = SparseVector::from_pairs(vec![(1, 1.0)]);
        let right = SparseVector::from_pairs(vec![(2, 1.0)]);
        assert_eq!(UNDEFINED_SIMILARITY, cosine_similarity(&left, &right));
        assert_eq!(UNDEFINED_SIMILARITY, cosine_similarity(&SparseVector::empty(), &right));
    }

    #[test]
    fn should_return_sentinel_for_zero_norm() {
        // A single rating centers to zero.
        let single = SparseVector::from_pairs(vec![(1, 4.0)]);
        let single = single.centered(single.mean());
        let other = SparseVector::from_pairs(vec![(1, 1.0), (2, -1.0)]);
        assert_eq!(UNDEFINED_SIMILARITY, cosine_similarity(&single, &other));
    }

    #[test]
    fn should_return_sentinel_for_nan_entries() {
        let nan_vector = SparseVector::from_pairs(vec![(1, f64::NAN)]);
        let other = SparseVector::from_pairs(vec![(1, 1.0), (2, -1.0)]);
        assert_eq!(UNDEFINED_SIMILARITY, cosine_similarity(&nan_vector, &other));
    }

    fn ratings() -> impl Strategy<Value = SparseVector> {
        proptest::collection::vec((0u64..40, -5.0f64..5.0), 0..30).prop_map(SparseVector::from_pairs)
    }

    proptest! {
        #[test]
        fn similarity_is_symmetric(left in ratings(), right in ratings()) {
            prop_assert_eq!(
                cosine_similarity(&left, &right).to_bits(),
                cosine_similarity(&right, &left).to_bits()
            );
        }

        #[test]
        fn similarity_is_bounded(left in ratings(), right in ratings()) {
            let similarity = cosine_similarity(&left, &right);
            prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&similarity));
        }

        #[test]
        fn self_similarity_is_one(vector in ratings()) {
            prop_assume!(vector.norm() > 1e-6);
            prop_assert!((cosine_similarity(&vector, &vector) - 1.0).abs() < 1e-9);
        }
    }
}
