use anyhow::{Context, Result};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::StateStore;
use crate::runtime::Runtime;

/// State persisted as a flat JSON object on disk.
///
/// Every `set` rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written state file behind.
pub struct FileState<R: Runtime> {
    runtime: R,
    path: PathBuf,
}

impl<R: Runtime> FileState<R> {
    pub fn new(runtime: R, path: PathBuf) -> Self {
        Self { runtime, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.runtime.exists(&self.path) {
            debug!("State file {:?} does not exist yet", self.path);
            return Ok(BTreeMap::new());
        }

        let content = self.runtime.read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {:?}", self.path))
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            self.runtime.create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(values)?;
        let tmp_path = self.path.with_extension("json.tmp");
        self.runtime.write(&tmp_path, json.as_bytes())?;
        self.runtime.rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl<R: Runtime> StateStore for FileState<R> {
    #[tracing::instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    #[tracing::instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        debug!("Writing {} to {:?}", key, self.path);
        self.save(&values)
    }
}

/// Get the default location of the state file
#[tracing::instrument(skip(runtime))]
pub fn default_state_path<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let config_dir = runtime
        .config_dir()
        .context("Could not find configuration directory")?;
    Ok(config_dir.join("broadridge").join("state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_state_path() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_config_dir()
            .returning(|| Some(PathBuf::from("/home/user/.config")));

        let path = default_state_path(&runtime).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/user/.config/broadridge/state.json")
        );
    }

    #[test]
    fn test_default_state_path_without_config_dir() {
        let mut runtime = MockRuntime::new();
        runtime.expect_config_dir().returning(|| None);

        let err = default_state_path(&runtime).unwrap_err();
        assert!(err.to_string().contains("configuration directory"));
    }

    #[test]
    fn test_get_missing_file_returns_none() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_read_to_string().never();

        let state = FileState::new(runtime, PathBuf::from("/state/state.json"));
        assert_eq!(state.get("broadridge.access_token").unwrap(), None);
    }

    #[test]
    fn test_get_reads_existing_file() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(PathBuf::from("/state/state.json")))
            .returning(|_| Ok(r#"{"broadridge.api_version": "2.5"}"#.to_string()));

        let state = FileState::new(runtime, PathBuf::from("/state/state.json"));
        assert_eq!(
            state.get("broadridge.api_version").unwrap().as_deref(),
            Some("2.5")
        );
        assert_eq!(state.get("broadridge.api_endpoint").unwrap(), None);
    }

    #[test]
    fn test_get_corrupt_file_is_an_error() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("not json".to_string()));

        let state = FileState::new(runtime, PathBuf::from("/state/state.json"));
        let err = state.get("broadridge.access_token").unwrap_err();
        assert!(err.to_string().contains("Failed to parse state file"));
    }

    #[test]
    fn test_set_writes_through_temp_file() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime
            .expect_create_dir_all()
            .with(eq(PathBuf::from("/state")))
            .times(1)
            .returning(|_| Ok(()));
        runtime
            .expect_write()
            .withf(|path, contents| {
                let json = std::str::from_utf8(contents).unwrap();
                path == Path::new("/state/state.json.tmp")
                    && json.contains(r#""broadridge.access_token": "abc123""#)
            })
            .times(1)
            .returning(|_, _| Ok(()));
        runtime
            .expect_rename()
            .with(
                eq(PathBuf::from("/state/state.json.tmp")),
                eq(PathBuf::from("/state/state.json")),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let state = FileState::new(runtime, PathBuf::from("/state/state.json"));
        state.set("broadridge.access_token", "abc123").unwrap();
    }

    #[test]
    fn test_real_file_round_trip_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/state.json");

        let state = FileState::new(RealRuntime, path.clone());
        state.set("broadridge.api_endpoint", "https://example.com").unwrap();
        state.set("broadridge.api_version", "2.5").unwrap();

        // A fresh store over the same file sees both values
        let reopened = FileState::new(RealRuntime, path.clone());
        assert_eq!(
            reopened.get("broadridge.api_endpoint").unwrap().as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            reopened.get("broadridge.api_version").unwrap().as_deref(),
            Some("2.5")
        );
        assert!(!path.with_extension("json.tmp").exists());
    }
}
