//! Bounded memo of engine results.
//!
//! Arithmetic on decimals is pure, so a result computed once for an exact
//! operand pair can be handed out again. Keys use the serialized form of each
//! operand so `2.5` and `2.50` (equal, but with a different scale) never share
//! an entry. When full, the least recently used entry is evicted.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::engine::Operator;

type CacheKey = (Operator, [u8; 16], [u8; 16]);

#[derive(Clone, Debug)]
struct CacheEntry {
    value: Decimal,
    last_used: u64,
}

/// Least-recently-used cache of `(operator, a, b) -> result`.
#[derive(Debug)]
pub struct OperationCache {
    map: HashMap<CacheKey, CacheEntry>,
    capacity: usize,
    clock: u64,
}

impl OperationCache {
    /// Create a cache holding at most `capacity` results.
    ///
    /// A capacity of zero produces a cache that never stores anything.
    pub fn new(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
            capacity,
            clock: 0,
        }
    }

    /// Look up a previously stored result, marking it as recently used.
    pub fn get(&mut self, op: Operator, a: &Decimal, b: &Decimal) -> Option<Decimal> {
        self.clock += 1;
        let entry = self.map.get_mut(&key(op, a, b))?;
        entry.last_used = self.clock;
        Some(entry.value)
    }

    /// Store a result, evicting the least recently used entry when full.
    pub fn insert(&mut self, op: Operator, a: &Decimal, b: &Decimal, value: Decimal) {
        if self.capacity == 0 {
            return;
        }
        self.clock += 1;
        let key = key(op, a, b);

        if self.map.len() >= self.capacity
            && !self.map.contains_key(&key)
            && let Some(oldest) = self
                .map
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(k, _)| *k)
        {
            self.map.remove(&oldest);
        }

        self.map.insert(
            key,
            CacheEntry {
                value,
                last_used: self.clock,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn key(op: Operator, a: &Decimal, b: &Decimal) -> CacheKey {
    (op, a.serialize(), b.serialize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_get_after_insert() {
        let mut cache = OperationCache::new(4);
        cache.insert(Operator::Add, &dec!(1), &dec!(2), dec!(3));
        assert_eq!(cache.get(Operator::Add, &dec!(1), &dec!(2)), Some(dec!(3)));
        assert_eq!(cache.get(Operator::Subtract, &dec!(1), &dec!(2)), None);
    }

    #[test]
    fn test_scale_is_part_of_the_key() {
        let mut cache = OperationCache::new(4);
        cache.insert(Operator::Add, &dec!(2.5), &dec!(1), dec!(3.5));
        assert_eq!(cache.get(Operator::Add, &dec!(2.50), &dec!(1)), None);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = OperationCache::new(2);
        cache.insert(Operator::Add, &dec!(1), &dec!(1), dec!(2));
        cache.insert(Operator::Add, &dec!(2), &dec!(2), dec!(4));

        // Touch the first entry so the second becomes the oldest.
        assert!(cache.get(Operator::Add, &dec!(1), &dec!(1)).is_some());
        cache.insert(Operator::Add, &dec!(3), &dec!(3), dec!(6));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(Operator::Add, &dec!(1), &dec!(1)).is_some());
        assert!(cache.get(Operator::Add, &dec!(2), &dec!(2)).is_none());
        assert!(cache.get(Operator::Add, &dec!(3), &dec!(3)).is_some());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = OperationCache::new(0);
        cache.insert(Operator::Multiply, &dec!(2), &dec!(3), dec!(6));
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 0);
    }
}
