use std::collections::BTreeMap;

/// Greedy acceptance of pairwise-disjoint closed integer ranges,
/// presented in whatever priority order the caller sorts them into.
///
/// Stored intervals are keyed by their left endpoint; because they are
/// pairwise disjoint, a new interval only has to be checked against its
/// successor (smallest stored `left >= left`) and that successor's
/// predecessor in sorted order.
#[derive(Debug)]
pub struct DisjointIntervals<T: Ord + Copy> {
    intervals: BTreeMap<T, T>,
}

impl<T: Ord + Copy> DisjointIntervals<T> {
    pub fn new() -> Self {
        Self {
            intervals: BTreeMap::new(),
        }
    }

    /// Accepts and stores `[left, right]` iff it overlaps no stored
    /// interval. Touching at a shared endpoint counts as overlap.
    /// Rejected intervals are not stored.
    pub fn insert(&mut self, left: T, right: T) -> bool {
        debug_assert!(left <= right);

        if let Some((&l, &r)) = self.intervals.range(left..).next() {
            if Self::overlaps((left, right), (l, r)) {
                return false;
            }
        }

        if let Some((&l, &r)) = self.intervals.range(..left).next_back() {
            if Self::overlaps((left, right), (l, r)) {
                return false;
            }
        }

        self.intervals.insert(left, right);
        true
    }

    /// Stored intervals in ascending order of their left endpoint.
    pub fn iter(&self) -> impl Iterator<Item = (T, T)> + '_ {
        self.intervals.iter().map(|(&left, &right)| (left, right))
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Closed intervals intersect when either endpoint of one falls
    /// within the other, endpoints included.
    #[inline]
    fn overlaps((a_left, a_right): (T, T), (b_left, b_right): (T, T)) -> bool {
        a_left <= b_right && b_left <= a_right
    }
}

impl<T: Ord + Copy> Default for DisjointIntervals<T> {
    fn default() -> Self {
        Self::new()
    }
}
