use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::profile::profile_model::Profile;

/// Profiles persisted as one pretty-printed JSON array.
///
/// The matching engine never touches the store; callers load a profile and
/// hand a snapshot of it to the engine.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: Vec<Profile>,
}

impl ProfileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let profiles = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        debug!(path = %path.display(), count = profiles.len(), "opened profile store");
        Ok(Self { path, profiles })
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Look a profile up by id, then by name.
    pub fn find(&self, id_or_name: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.id == id_or_name)
            .or_else(|| self.profiles.iter().find(|p| p.name == id_or_name))
    }

    /// Profile used when the caller does not pick one.
    pub fn default_profile(&self) -> Option<&Profile> {
        self.profiles.first()
    }

    /// Insert or replace (by id) and persist.
    pub fn save_profile(&mut self, profile: Profile) -> Result<(), StoreError> {
        profile.validate()?;

        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }

        self.persist()
    }

    pub fn delete_profile(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.profiles.len();
        self.profiles.retain(|p| p.id != id);
        if self.profiles.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.persist()
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.profiles.clear();
        self.persist()
    }

    pub fn export_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.profiles)?)
    }

    /// Replace every stored profile with the ones in `json`.
    pub fn import_json(&mut self, json: &str) -> Result<usize, StoreError> {
        let profiles = parse_profiles(json)?;
        let count = profiles.len();
        self.profiles = profiles;
        self.persist()?;
        Ok(count)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = self.export_json()?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// Parse an exported profile list. The payload must be an array whose
/// entries all carry a non-empty `id` and `name` and a `fields` array.
pub fn parse_profiles(json: &str) -> Result<Vec<Profile>, StoreError> {
    let value: serde_json::Value = serde_json::from_str(json)?;

    let entries = value
        .as_array()
        .ok_or_else(|| StoreError::InvalidFormat("expected an array of profiles".into()))?;

    let well_formed = entries.iter().all(|p| {
        let non_empty = |k: &str| p[k].as_str().is_some_and(|s| !s.is_empty());
        non_empty("id") && non_empty("name") && p["fields"].is_array()
    });
    if !well_formed {
        return Err(StoreError::InvalidFormat(
            "every profile needs an id, a name and a fields array".into(),
        ));
    }

    Ok(serde_json::from_value(value)?)
}
