use std::cmp::Ordering;

/// A sparse rating vector keyed by id.
///
/// Keys are kept sorted ascending with their values in a parallel array, the same
/// layout the session indices use for their sorted item ids. All reductions walk the
/// entries in key order, so two vectors with the same entries always produce
/// bit-identical sums.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    keys: Vec<u64>,
    values: Vec<f64>,
}

impl SparseVector {
    pub fn empty() -> Self {
        SparseVector {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a vector from `(key, value)` pairs in any order. When a key occurs more
    /// than once the last pair wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u64, f64)>,
    {
        let mut entries: Vec<(usize, u64, f64)> = pairs
            .into_iter()
            .enumerate()
            .map(|(position, (key, value))| (position, key, value))
            .collect();
        // Sort by key and, within a key, latest position first so dedup keeps it.
        entries.sort_unstable_by(|left, right| left.1.cmp(&right.1).then(right.0.cmp(&left.0)));
        entries.dedup_by_key(|(_position, key, _value)| *key);

        let mut keys = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for (_position, key, value) in entries.into_iter() {
            keys.push(key);
            values.push(value);
        }
        SparseVector { keys, values }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// `None` means the key was not rated, which is different from a rating of `0.0`.
    pub fn get(&self, key: u64) -> Option<f64> {
        self.keys
            .binary_search(&key)
            .ok()
            .map(|index| self.values[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.keys.iter().copied().zip(self.values.iter().copied())
    }

    /// Mean of all entries. An empty vector has no mean and yields NaN.
    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Copy of this vector with `shift` subtracted from every entry.
    pub fn centered(&self, shift: f64) -> SparseVector {
        SparseVector {
            keys: self.keys.clone(),
            values: self.values.iter().map(|value| value - shift).collect(),
        }
    }

    /// L2 norm over all entries.
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|value| value * value).sum::<f64>().sqrt()
    }

    /// Dot product over the keys both vectors share, together with the number of
    /// shared keys.
    pub fn dot(&self, other: &SparseVector) -> (f64, usize) {
        let mut left = 0;
        let mut right = 0;
        let mut sum = 0.0;
        let mut qty_shared = 0;
        while left < self.keys.len() && right < other.keys.len() {
            match self.keys[left].cmp(&other.keys[right]) {
                Ordering::Less => left += 1,
                Ordering::Greater => right += 1,
                Ordering::Equal => {
                    sum += self.values[left] * other.values[right];
                    qty_shared += 1;
                    left += 1;
                    right += 1;
                }
            }
        }
        (sum, qty_shared)
    }
}
