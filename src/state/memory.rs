use anyhow::{Result, anyhow};
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::StateStore;

/// Process-local state, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryState {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryState {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("State lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("State lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unset_key() {
        let state = MemoryState::new();
        assert_eq!(state.get("broadridge.access_token").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let state = MemoryState::new();
        state.set("broadridge.api_version", "2.4").unwrap();
        state.set("broadridge.api_version", "2.5").unwrap();
        assert_eq!(
            state.get("broadridge.api_version").unwrap().as_deref(),
            Some("2.5")
        );
    }

    #[test]
    fn test_empty_value_is_stored_verbatim() {
        let state = MemoryState::new();
        state.set("broadridge.access_token", "").unwrap();
        assert_eq!(
            state.get("broadridge.access_token").unwrap().as_deref(),
            Some("")
        );
    }
}
