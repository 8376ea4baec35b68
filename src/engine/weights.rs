use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const WEIGHT_DEFAULT: f64 = 1.0;
const DEFAULT_INCREASE_FACTOR: f64 = 8.0;
const DEFAULT_DECREASE_FACTOR: f64 = 2.0;
const DEFAULT_WEIGHT_MIN: f64 = 0.0625;
const DEFAULT_WEIGHT_MAX: f64 = 512.0;

/// Geometric, clamped weight adjustment. A miss multiplies by
/// `increase_factor`, a hit divides by `decrease_factor`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightPolicy {
    #[serde(default = "default_increase_factor")]
    pub increase_factor: f64,
    #[serde(default = "default_decrease_factor")]
    pub decrease_factor: f64,
    #[serde(default = "default_weight_min")]
    pub min: f64,
    #[serde(default = "default_weight_max")]
    pub max: f64,
}

fn default_increase_factor() -> f64 {
    DEFAULT_INCREASE_FACTOR
}
fn default_decrease_factor() -> f64 {
    DEFAULT_DECREASE_FACTOR
}
fn default_weight_min() -> f64 {
    DEFAULT_WEIGHT_MIN
}
fn default_weight_max() -> f64 {
    DEFAULT_WEIGHT_MAX
}

impl Default for WeightPolicy {
    fn default() -> Self {
        Self {
            increase_factor: default_increase_factor(),
            decrease_factor: default_decrease_factor(),
            min: default_weight_min(),
            max: default_weight_max(),
        }
    }
}

impl WeightPolicy {
    /// Both factors must be > 1 and `0 < min <= WEIGHT_DEFAULT <= max`,
    /// otherwise adjustments would stop being monotonic or leave the bounds.
    pub fn is_valid(&self) -> bool {
        let all_finite = [self.increase_factor, self.decrease_factor, self.min, self.max]
            .iter()
            .all(|v| v.is_finite());
        all_finite
            && self.increase_factor > 1.0
            && self.decrease_factor > 1.0
            && self.min > 0.0
            && self.min <= WEIGHT_DEFAULT
            && WEIGHT_DEFAULT <= self.max
    }
}

#[derive(Clone, Debug)]
pub struct WeightStore {
    weights: HashMap<String, f64>,
    policy: WeightPolicy,
}

impl WeightStore {
    pub fn new<I, S>(keys: I, policy: WeightPolicy) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let weights = keys
            .into_iter()
            .map(|key| (key.into(), WEIGHT_DEFAULT))
            .collect();
        Self { weights, policy }
    }

    pub fn policy(&self) -> &WeightPolicy {
        &self.policy
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.weights.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Make `key` more likely to be drawn. Saturates at `policy.max`.
    pub fn increase(&mut self, key: &str) {
        let max = self.policy.max;
        let factor = self.policy.increase_factor;
        if let Some(weight) = self.weights.get_mut(key) {
            if *weight >= max {
                return;
            }
            *weight = (*weight * factor).min(max);
            debug!(key, weight = *weight, "weight increased");
        }
    }

    /// Make `key` less likely to be drawn. Saturates at `policy.min`.
    pub fn decrease(&mut self, key: &str) {
        let min = self.policy.min;
        let factor = self.policy.decrease_factor;
        if let Some(weight) = self.weights.get_mut(key) {
            if *weight <= min {
                return;
            }
            *weight = (*weight / factor).max(min);
            debug!(key, weight = *weight, "weight decreased");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(keys: &[&str]) -> WeightStore {
        WeightStore::new(keys.iter().copied(), WeightPolicy::default())
    }

    #[test]
    fn test_new_store_starts_at_default_weight() {
        let store = store(&["ア", "イ", "ウ"]);
        assert_eq!(store.len(), 3);
        for key in ["ア", "イ", "ウ"] {
            assert_eq!(store.get(key), Some(1.0));
        }
    }

    #[test]
    fn test_increase_is_geometric_and_saturates() {
        let mut store = store(&["ヂ"]);
        let policy = *store.policy();
        let mut expected: f64 = 1.0;
        for _ in 0..6 {
            store.increase("ヂ");
            expected = (expected * policy.increase_factor).min(policy.max);
            assert_eq!(store.get("ヂ"), Some(expected));
        }
        assert_eq!(store.get("ヂ"), Some(512.0));
    }

    #[test]
    fn test_decrease_is_geometric_and_saturates() {
        let mut store = store(&["ヂ"]);
        store.decrease("ヂ");
        assert_eq!(store.get("ヂ"), Some(0.5));
        store.decrease("ヂ");
        assert_eq!(store.get("ヂ"), Some(0.25));
        store.decrease("ヂ");
        assert_eq!(store.get("ヂ"), Some(0.125));
        store.decrease("ヂ");
        assert_eq!(store.get("ヂ"), Some(0.0625));
        store.decrease("ヂ");
        assert_eq!(store.get("ヂ"), Some(0.0625));
    }

    #[test]
    fn test_clamps_when_factor_overshoots_bound() {
        let policy = WeightPolicy {
            increase_factor: 3.0,
            decrease_factor: 3.0,
            min: 0.2,
            max: 5.0,
        };
        let mut store = WeightStore::new(["a"], policy);
        store.increase("a");
        store.increase("a");
        assert_eq!(store.get("a"), Some(5.0));

        for _ in 0..4 {
            store.decrease("a");
        }
        assert_eq!(store.get("a"), Some(0.2));
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let mut store = store(&["a"]);
        store.increase("missing");
        store.decrease("missing");
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_policy_validation() {
        assert!(WeightPolicy::default().is_valid());
        let bad = WeightPolicy {
            increase_factor: 1.0,
            ..WeightPolicy::default()
        };
        assert!(!bad.is_valid());
        let inverted = WeightPolicy {
            min: 10.0,
            max: 2.0,
            ..WeightPolicy::default()
        };
        assert!(!inverted.is_valid());
        let nan = WeightPolicy {
            max: f64::NAN,
            ..WeightPolicy::default()
        };
        assert!(!nan.is_valid());
    }
}
