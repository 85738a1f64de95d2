// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! Named-parameter container with per-parameter "explicitly set" tracking.
//!
//! The set of tracked names is fixed when the store is built. Values only
//! enter through [`ConfigStore::assign`], which is also the only place the
//! "set" flag flips, so [`ConfigStore::check_complete`] can guarantee that no
//! parameter silently falls back to an engine default.

use ahash::AHashMap;

use crate::types::{ParameterValue, REQUIRED_PARAMETERS};
use crate::{ConfigError, ConfigResult};

#[derive(Debug, Clone)]
struct ParameterSlot {
    name: String,
    value: Option<ParameterValue>,
}

/// Experiment parameters keyed by name, in declaration order
#[derive(Debug, Clone)]
pub struct ConfigStore {
    slots: Vec<ParameterSlot>,
    index: AHashMap<String, usize>,
    validated: bool,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Store tracking the engine's full [`REQUIRED_PARAMETERS`] list, all unset
    pub fn new() -> Self {
        Self::with_required(REQUIRED_PARAMETERS.iter().copied())
    }

    /// Store tracking a caller-supplied set of names, all unset.
    ///
    /// Duplicate names are tracked once, at their first position.
    pub fn with_required<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slots = Vec::new();
        let mut index = AHashMap::new();
        for name in names {
            let name = name.into();
            if index.contains_key(&name) {
                continue;
            }
            index.insert(name.clone(), slots.len());
            slots.push(ParameterSlot { name, value: None });
        }
        Self {
            slots,
            index,
            validated: false,
        }
    }

    /// Assign a value and mark the parameter as set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownParameter` if `name` is not tracked by this store.
    pub fn assign(&mut self, name: &str, value: impl Into<ParameterValue>) -> ConfigResult<()> {
        let slot_idx = *self
            .index
            .get(name)
            .ok_or_else(|| ConfigError::UnknownParameter(name.to_string()))?;
        self.slots[slot_idx].value = Some(value.into());
        self.validated = false;
        Ok(())
    }

    /// Verify every tracked parameter has been assigned.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::IncompleteConfiguration` listing every unset name,
    /// in declaration order.
    pub fn check_complete(&mut self) -> ConfigResult<()> {
        let missing = self.missing_parameters();
        if !missing.is_empty() {
            self.validated = false;
            return Err(ConfigError::IncompleteConfiguration { missing });
        }
        self.validated = true;
        Ok(())
    }

    /// True once `check_complete` has passed and nothing was assigned since
    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn missing_parameters(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|slot| slot.value.is_none())
            .map(|slot| slot.name.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        self.index.get(name).and_then(|&i| self.slots[i].value)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|v| v.as_bool())
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| v.as_int())
    }

    /// Numeric lookup; integer values widen to `f64`
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_float())
    }

    /// Iterate `(name, value)` in declaration order, including unset parameters
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<ParameterValue>)> {
        self.slots.iter().map(|slot| (slot.name.as_str(), slot.value))
    }

    /// Number of tracked parameters
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_tracks_required_list_unset() {
        let store = ConfigStore::new();
        assert_eq!(store.len(), REQUIRED_PARAMETERS.len());
        assert_eq!(store.missing_parameters().len(), REQUIRED_PARAMETERS.len());
        assert!(!store.is_validated());
    }

    #[test]
    fn test_assign_unknown_parameter_fails() {
        let mut store = ConfigStore::with_required(["a", "b"]);
        let err = store.assign("c", 1_i64).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownParameter(ref n) if n == "c"));
        assert!(!store.contains("c"));
    }

    #[test]
    fn test_assign_all_then_check_complete() {
        let mut store = ConfigStore::new();
        for name in REQUIRED_PARAMETERS {
            store.assign(name, 0.5).unwrap();
        }
        assert!(store.check_complete().is_ok());
        assert!(store.is_validated());
    }

    #[test]
    fn test_omitting_each_name_is_reported_exactly() {
        for omitted in REQUIRED_PARAMETERS {
            let mut store = ConfigStore::new();
            for name in REQUIRED_PARAMETERS.iter().filter(|n| *n != omitted) {
                store.assign(name, 1_i64).unwrap();
            }
            match store.check_complete() {
                Err(ConfigError::IncompleteConfiguration { missing }) => {
                    assert_eq!(missing, vec![omitted.to_string()]);
                }
                other => panic!("expected incomplete configuration, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_listed_in_declaration_order() {
        let mut store = ConfigStore::with_required(["z", "a", "m"]);
        store.assign("a", true).unwrap();
        match store.check_complete() {
            Err(ConfigError::IncompleteConfiguration { missing }) => {
                assert_eq!(missing, vec!["z".to_string(), "m".to_string()]);
            }
            other => panic!("expected incomplete configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_reassign_overwrites_and_invalidates() {
        let mut store = ConfigStore::with_required(["a"]);
        store.assign("a", 1_i64).unwrap();
        store.check_complete().unwrap();
        store.assign("a", 2.5).unwrap();
        assert!(!store.is_validated());
        assert_eq!(store.get("a"), Some(ParameterValue::Float(2.5)));
    }

    #[test]
    fn test_typed_getters() {
        let mut store = ConfigStore::with_required(["flag", "count", "rate"]);
        store.assign("flag", true).unwrap();
        store.assign("count", 7_i64).unwrap();
        store.assign("rate", 0.25).unwrap();

        assert_eq!(store.get_bool("flag"), Some(true));
        assert_eq!(store.get_int("count"), Some(7));
        assert_eq!(store.get_float("count"), Some(7.0));
        assert_eq!(store.get_float("rate"), Some(0.25));
        assert_eq!(store.get_bool("rate"), None);
        assert_eq!(store.get("unknown"), None);
    }

    #[test]
    fn test_duplicate_required_names_tracked_once() {
        let store = ConfigStore::with_required(["a", "b", "a"]);
        assert_eq!(store.len(), 2);
        let names: Vec<&str> = store.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
