use rand::Rng;

use crate::engine::weights::{WEIGHT_DEFAULT, WeightStore};
use crate::error::{QuizError, Result};

/// Cumulative-weight table over one snapshot of the item weights.
///
/// Items are ordered by ascending weight before the running totals are
/// built. The order only decides which bucket maps to which index; every
/// key is still drawn with probability `weight / total`.
pub struct WeightedSampler<'a> {
    keys: Vec<&'a str>,
    totals: Vec<f64>,
    total: f64,
}

impl<'a> WeightedSampler<'a> {
    pub fn new<I>(keys: I, weights: &WeightStore) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut choices: Vec<(&'a str, f64)> = keys
            .into_iter()
            .map(|key| (key, weights.get(key).unwrap_or(WEIGHT_DEFAULT)))
            .collect();
        if choices.is_empty() {
            return Err(QuizError::EmptyItemSet);
        }

        choices.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut keys = Vec::with_capacity(choices.len());
        let mut totals = Vec::with_capacity(choices.len());
        let mut running = 0.0;
        for (key, weight) in choices {
            running += weight;
            keys.push(key);
            totals.push(running);
        }

        if !(running > 0.0 && running.is_finite()) {
            return Err(QuizError::InvalidWeights(running));
        }

        Ok(Self {
            keys,
            totals,
            total: running,
        })
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a str {
        let target = rng.gen_range(0.0..self.total);
        let idx = self.totals.partition_point(|&t| t < target);
        // Float rounding can put `target` past the last running total.
        self.keys[idx.min(self.keys.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::engine::weights::WeightPolicy;

    fn store_with(weights: &[(&str, f64)]) -> WeightStore {
        let policy = WeightPolicy {
            min: 0.01,
            max: 1024.0,
            ..WeightPolicy::default()
        };
        let mut store = WeightStore::new(weights.iter().map(|(k, _)| *k), policy);
        // Drive each key to its target weight through the public API.
        for &(key, target) in weights {
            while store.get(key).unwrap() < target {
                store.increase(key);
            }
            while store.get(key).unwrap() > target {
                store.decrease(key);
            }
        }
        store
    }

    #[test]
    fn test_frequencies_follow_weight_order() {
        let store = store_with(&[("foo", 128.0), ("bar", 16.0), ("baz", 2.0), ("boo", 0.25)]);
        assert_eq!(store.get("foo"), Some(128.0));
        assert_eq!(store.get("boo"), Some(0.25));

        let keys = ["foo", "bar", "baz", "boo"];
        let sampler = WeightedSampler::new(keys, &store).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..1024 {
            *counts.entry(sampler.draw(&mut rng)).or_default() += 1;
        }

        let count = |k: &str| counts.get(k).copied().unwrap_or(0);
        assert!(count("foo") > count("bar"));
        assert!(count("bar") > count("baz"));
        assert!(count("baz") > count("boo"));
    }

    #[test]
    fn test_equal_weights_are_roughly_uniform() {
        let store = WeightStore::new(["a", "b", "c", "d"], WeightPolicy::default());
        let sampler = WeightedSampler::new(["a", "b", "c", "d"], &store).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..8000 {
            *counts.entry(sampler.draw(&mut rng)).or_default() += 1;
        }
        for key in ["a", "b", "c", "d"] {
            let c = counts[key];
            assert!((1700..2300).contains(&c), "{key} drawn {c} times");
        }
    }

    #[test]
    fn test_single_item_always_drawn() {
        let store = WeightStore::new(["only"], WeightPolicy::default());
        let sampler = WeightedSampler::new(["only"], &store).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_eq!(sampler.draw(&mut rng), "only");
        }
    }

    #[test]
    fn test_cumulative_totals_sorted_ascending() {
        let store = store_with(&[("hi", 8.0), ("lo", 0.5), ("mid", 1.0)]);
        let sampler = WeightedSampler::new(["hi", "lo", "mid"], &store).unwrap();
        assert_eq!(sampler.keys, vec!["lo", "mid", "hi"]);
        assert_eq!(sampler.totals, vec![0.5, 1.5, 9.5]);
        assert_eq!(sampler.total_weight(), 9.5);
    }

    #[test]
    fn test_empty_item_set_is_an_error() {
        let store = WeightStore::new(Vec::<String>::new(), WeightPolicy::default());
        let result = WeightedSampler::new(std::iter::empty(), &store);
        assert!(matches!(result, Err(QuizError::EmptyItemSet)));
    }

    #[test]
    fn test_overflowing_total_is_invalid_weights() {
        let policy = WeightPolicy {
            increase_factor: 1e300,
            max: f64::INFINITY,
            ..WeightPolicy::default()
        };
        let mut store = WeightStore::new(["a", "b"], policy);
        store.increase("a");
        store.increase("a");
        let result = WeightedSampler::new(["a", "b"], &store);
        assert!(matches!(result, Err(QuizError::InvalidWeights(total)) if total.is_infinite()));
    }
}
