/// Settings and configuration management
/// Handles constants, the pet seed list, and environment variable loading

use anyhow::Result;
use std::env;

// ============================================================================
// Validation Constants
// ============================================================================

/// Maximum quantity per rarity entry.
pub const MAX_QUANTITY: u32 = 10_000;

/// Minimum quantity per rarity entry. Zero means "absent", not "listed".
pub const MIN_QUANTITY: u32 = 1;

/// Bounds for the price-history lookback window, in days.
pub const MIN_WINDOW_DAYS: u32 = 1;
pub const MAX_WINDOW_DAYS: u32 = 365;
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Returns true if the lookback window is acceptable. The command layer
/// checks this before asking for a price report.
#[inline]
pub fn validate_window_days(days: u32) -> bool {
    (MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS).contains(&days)
}

// ============================================================================
// File Constants
// ============================================================================

pub const DEFAULT_DB_PATH: &str = "auction_house.db";
pub const DEFAULT_ADMIN_FILE: &str = "admins.json";

// ============================================================================
// Pet Seed Data
// ============================================================================

/// Pets loaded into a fresh database: (name, image URL). Reference data
/// only; not mutable through the library.
pub const SEED_PETS: [(&str, &str); 13] = [
    ("Delve", "https://cdn.discordapp.com/emojis/1439426782406246524.webp?size=96"),
    ("Bramble", "https://cdn.discordapp.com/emojis/1439427181095944454.webp?size=96"),
    ("Kragg", "https://cdn.discordapp.com/emojis/1439427215631843398.webp?size=96"),
    ("Malgrim", "https://cdn.discordapp.com/emojis/1429474495889936494.webp?size=96"),
    ("Mimic", "https://cdn.discordapp.com/emojis/1439427321219125400.webp?size=96"),
    ("Smolder", "https://cdn.discordapp.com/emojis/1429474259759140904.webp?size=96"),
    ("Vyra", "https://cdn.discordapp.com/emojis/1439427265040486561.webp?size=96"),
    ("Luma", "https://cdn.discordapp.com/emojis/1429473389705167079.webp?size=96"),
    ("Oblivion", "https://cdn.discordapp.com/emojis/1429474805593145425.webp?size=96"),
    ("Weave", "https://cdn.discordapp.com/emojis/1438188450506473532.webp?size=96"),
    ("Embi", "https://cdn.discordapp.com/emojis/1436084498034065580.webp?size=96"),
    ("Aurelia", "https://cdn.discordapp.com/emojis/1439409968725098606.webp?size=96"),
    ("Grimm", "https://cdn.discordapp.com/emojis/1438188479132467341.webp?size=96"),
];

// ============================================================================
// Runtime Configuration (loaded from environment)
// ============================================================================

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: String,
    /// Path to the persisted admin allow-list.
    pub admin_file: String,
}

impl Config {
    /// Load configuration from environment variables. A `.env` file is
    /// honored when present; every setting has a default, so this only
    /// fails if the process environment itself is unreadable.
    pub fn from_env() -> Result<Self> {
        // Load .env if present; a missing file is fine
        let _ = dotenvy::dotenv();

        let db_path = env::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        let admin_file = env::var("ADMIN_FILE").unwrap_or_else(|_| DEFAULT_ADMIN_FILE.to_string());

        Ok(Config { db_path, admin_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_validate_window_days_bounds() {
        assert!(!validate_window_days(0));
        assert!(validate_window_days(1));
        assert!(validate_window_days(30));
        assert!(validate_window_days(365));
        assert!(!validate_window_days(366));
    }

    #[test]
    fn test_seed_pets_unique_names() {
        let names: HashSet<String> = SEED_PETS.iter().map(|(n, _)| n.to_lowercase()).collect();
        assert_eq!(names.len(), SEED_PETS.len());
    }
}
