/// Admin allow-list structures and parsing
/// Provides functionality to load, mutate, and persist the set of user
/// IDs allowed to run moderation operations

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use crate::settings::DEFAULT_ADMIN_FILE;

/// The admin allow-list: an ordered, deduplicated set of numeric user
/// IDs. Loaded once at startup and mutated only through `add`/`remove`;
/// callers persist changes with `save_to_file`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminConfig {
    ids: Vec<i64>,
}

impl AdminConfig {
    /// Creates an AdminConfig from a list of IDs, dropping duplicates
    /// while preserving first-seen order.
    pub fn new(ids: Vec<i64>) -> Self {
        let mut seen = HashSet::new();
        let ids = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Self { ids }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }

    /// Add a user to the admin list. Returns true if added, false if
    /// already present.
    pub fn add(&mut self, user_id: i64) -> bool {
        if self.ids.contains(&user_id) {
            return false;
        }
        self.ids.push(user_id);
        true
    }

    /// Remove a user from the admin list. Returns true if removed,
    /// false if not found.
    pub fn remove(&mut self, user_id: i64) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&id| id != user_id);
        self.ids.len() != before
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Parses admin IDs from the ADMIN_IDS environment variable.
    ///
    /// Format: comma-separated numeric user IDs
    /// Example: "184858845221224448,123456789012345678"
    pub fn from_env() -> Result<Self, String> {
        let raw = env::var("ADMIN_IDS")
            .map_err(|_| "ADMIN_IDS environment variable not set".to_string())?;

        if raw.trim().is_empty() {
            return Err("ADMIN_IDS is empty. Provide comma-separated user IDs.".to_string());
        }

        let mut ids = Vec::new();
        for (idx, part) in raw.split(',').map(str::trim).enumerate() {
            if part.is_empty() {
                continue; // trailing commas
            }
            let id: i64 = part
                .parse()
                .map_err(|_| format!("Invalid admin ID at position {}: '{}'", idx + 1, part))?;
            ids.push(id);
        }

        if ids.is_empty() {
            return Err("No valid admin IDs found in ADMIN_IDS".to_string());
        }

        Ok(Self::new(ids))
    }

    /// Loads the admin list from a JSON file containing a plain array
    /// of numeric user IDs: `[184858845221224448]`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read file {}: {}", path.display(), e))?;

        let ids: Vec<i64> = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        if ids.is_empty() {
            return Err("Admin file contains no IDs".to_string());
        }

        Ok(Self::new(ids))
    }

    /// Loads admin configuration with fallback chain:
    /// 1. Try the admins file (highest priority)
    /// 2. Try ADMIN_IDS env var
    /// 3. Error if neither is present
    pub fn load() -> Result<Self, String> {
        Self::load_from(DEFAULT_ADMIN_FILE)
    }

    /// As `load`, with an explicit file path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        if path.as_ref().exists() {
            return Self::from_file(path);
        }

        if env::var("ADMIN_IDS").is_ok() {
            return Self::from_env();
        }

        Err(format!(
            "No admin configuration found. Create {} or set the ADMIN_IDS environment variable.",
            path.as_ref().display()
        ))
    }

    /// Persists the current list back to disk as a JSON array.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.ids)
            .map_err(|e| format!("Failed to serialize admin IDs: {}", e))?;
        fs::write(path, json)
            .map_err(|e| format!("Failed to write file {}: {}", path.display(), e))
    }
}
