use std::{collections::HashSet, hash::Hash};

use rand::{seq::SliceRandom, Rng};

/// Outcome of drawing an unseen item. `Exhausted` is a normal result, not a
/// fault: callers substitute their own sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    Picked(T),
    Exhausted,
}

impl<T> Selection<T> {
    pub fn picked(self) -> Option<T> {
        match self {
            Selection::Picked(item) => Some(item),
            Selection::Exhausted => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Selection::Exhausted)
    }
}

/// Draws uniformly from the items of `pool` whose key is not in `used`.
pub fn select<'a, T, K, F, R>(pool: &'a [T], used: &HashSet<K>, key_fn: F, rng: &mut R) -> Selection<&'a T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
    R: Rng + ?Sized,
{
    let eligible = eligible(pool, used, key_fn);

    match eligible.choose(rng) {
        Some(item) => Selection::Picked(*item),
        None => Selection::Exhausted,
    }
}

/// Draws up to `count` distinct unseen items, uniformly without replacement.
pub fn select_many<'a, T, K, F, R>(
    pool: &'a [T],
    used: &HashSet<K>,
    count: usize,
    key_fn: F,
    rng: &mut R,
) -> Vec<&'a T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
    R: Rng + ?Sized,
{
    eligible(pool, used, key_fn)
        .choose_multiple(rng, count)
        .copied()
        .collect()
}

fn eligible<'a, T, K, F>(pool: &'a [T], used: &HashSet<K>, key_fn: F) -> Vec<&'a T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    pool.iter().filter(|item| !used.contains(&key_fn(item))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const POOL: [&str; 3] = ["a", "b", "c"];

    fn used(items: &[&'static str]) -> HashSet<&'static str> {
        items.iter().copied().collect()
    }

    #[test]
    fn only_unseen_item_is_always_picked() {
        let used = used(&["a", "b"]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let picked = select(&POOL, &used, |s| *s, &mut rng);
            assert_eq!(picked, Selection::Picked(&"c"));
        }
    }

    #[test]
    fn fully_used_pool_is_exhausted() {
        let used = used(&["a", "b", "c"]);
        let mut rng = StdRng::seed_from_u64(7);

        let picked = select(&POOL, &used, |s| *s, &mut rng);
        assert!(picked.is_exhausted());
        assert_eq!(picked.picked(), None);
    }

    #[test]
    fn empty_pool_is_exhausted() {
        let empty: [&str; 0] = [];
        let mut rng = StdRng::seed_from_u64(1);

        assert!(select(&empty, &HashSet::new(), |s| *s, &mut rng).is_exhausted());
    }

    #[test]
    fn draws_cover_every_eligible_item() {
        let used = used(&["a"]);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            if let Selection::Picked(item) = select(&POOL, &used, |s| *s, &mut rng) {
                seen.insert(*item);
            }
        }

        assert_eq!(seen, ["b", "c"].into_iter().collect());
    }

    #[test]
    fn select_many_returns_distinct_unseen_items() {
        let pool: Vec<String> = (0..10).map(|i| format!("s{i}")).collect();
        let used: HashSet<String> = ["s0".to_string(), "s1".to_string()].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(3);

        let picked = select_many(&pool, &used, 5, |s| s.clone(), &mut rng);

        assert_eq!(picked.len(), 5);
        let distinct: HashSet<&String> = picked.iter().copied().collect();
        assert_eq!(distinct.len(), 5);
        assert!(picked.iter().all(|s| !used.contains(*s)));
    }

    #[test]
    fn select_many_is_capped_by_eligible_count() {
        let used = used(&["b"]);
        let mut rng = StdRng::seed_from_u64(9);

        let picked = select_many(&POOL, &used, 10, |s| *s, &mut rng);
        assert_eq!(picked.len(), 2);
    }
}
