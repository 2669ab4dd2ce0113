// store.rs - SQLite persistence implementation
//
// Provides AuctionStore, the single collaborator behind the parsing and
// reporting logic:
// - WAL mode for concurrent reads
// - NORMAL synchronous mode for performance
// - Schema initialization and one-time pet seeding

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row};
use std::path::Path;

use crate::listings::{filter_and_sort, pet_presence, ListingFilter, ListingSort};
use crate::models::{Listing, Pet, PetCatalog, Rarity, Section, Trade, TradeEntry};
use crate::pricing::{self, PetActivity, PriceReport};
use crate::settings::SEED_PETS;

const MS_PER_DAY: i64 = 86_400_000;

impl ToSql for Rarity {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Rarity {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        Rarity::from_name(raw)
            .ok_or_else(|| FromSqlError::Other(format!("unknown rarity '{}'", raw).into()))
    }
}

/// AuctionStore manages the SQLite database holding pets, listings and
/// trades. Every operation is a short independent transaction; there is
/// no caching layer and no cross-call state.
pub struct AuctionStore {
    pub(crate) conn: Connection,
}

impl AuctionStore {
    /// Open (or create) the database at `db_path`, initializing the
    /// schema and seeding the pets table from the built-in list when it
    /// is empty. Pass `":memory:"` for an in-memory database.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref())
            .context("Failed to open SQLite database")?;

        // WAL mode: concurrent reads during writes
        // NORMAL synchronous: balance between safety and performance
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )
        .context("Failed to configure database settings")?;

        let schema_sql = include_str!("schema.sql");
        conn.execute_batch(schema_sql)
            .context("Failed to initialize schema")?;

        let store = AuctionStore { conn };
        store.seed_pets_if_empty()?;
        Ok(store)
    }

    fn seed_pets_if_empty(&self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM pets", [], |row| row.get(0))
            .context("Failed to count pets")?;
        if count > 0 {
            return Ok(());
        }

        for (name, image_url) in SEED_PETS {
            self.conn
                .execute(
                    "INSERT INTO pets (name, image_url) VALUES (?1, ?2)",
                    params![name, image_url],
                )
                .context("Failed to seed pets table")?;
        }
        log::info!("seeded {} pets into database", SEED_PETS.len());
        Ok(())
    }

    /// Get current journal mode (for testing)
    pub fn get_journal_mode(&self) -> Result<String> {
        let mode: String = self
            .conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .context("Failed to query journal_mode")?;
        Ok(mode)
    }

    /// Check if a table exists (for testing)
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                params![table_name],
                |row| row.get(0),
            )
            .context("Failed to check table existence")?;
        Ok(count > 0)
    }

    // ========================================================================
    // Pets (static reference data)
    // ========================================================================

    /// Look up a pet by name, case-insensitively.
    pub fn get_pet_by_name(&self, pet_name: &str) -> Result<Option<Pet>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, image_url FROM pets WHERE LOWER(name) = LOWER(?1)")
            .context("Failed to prepare pet lookup")?;

        let mut rows = stmt
            .query_map(params![pet_name], row_to_pet)
            .context("Failed to query pet by name")?;

        rows.next().transpose().context("Failed to read pet row")
    }

    /// All pets in name order.
    pub fn get_all_pets(&self) -> Result<Vec<Pet>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, image_url FROM pets ORDER BY name")
            .context("Failed to prepare pets query")?;

        let pets = stmt
            .query_map([], row_to_pet)
            .context("Failed to query pets")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to collect pets")?;

        Ok(pets)
    }

    /// Build the in-memory catalog used by the parsers.
    pub fn pet_catalog(&self) -> Result<PetCatalog> {
        Ok(PetCatalog::new(self.get_all_pets()?))
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Create a new listing and return its id.
    pub fn create_listing(
        &self,
        user_id: i64,
        haves: &Section,
        wants: &Section,
        description: Option<&str>,
    ) -> Result<i64> {
        let now_ms = Utc::now().timestamp_millis();
        self.conn
            .execute(
                "INSERT INTO listings (user_id, haves, wants, description, created_at_ms, updated_at_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user_id,
                    section_to_json(haves)?,
                    section_to_json(wants)?,
                    description,
                    now_ms,
                    now_ms,
                ],
            )
            .context("Failed to insert listing")?;

        let listing_id = self.conn.last_insert_rowid();
        log::info!("created listing {} for user {}", listing_id, user_id);
        Ok(listing_id)
    }

    pub fn get_listing_by_id(&self, listing_id: i64) -> Result<Option<Listing>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, haves, wants, description, created_at_ms, updated_at_ms
                 FROM listings WHERE id = ?1",
            )
            .context("Failed to prepare listing lookup")?;

        let mut rows = stmt
            .query_map(params![listing_id], row_to_listing)
            .context("Failed to query listing by id")?;

        rows.next()
            .transpose()
            .context("Failed to read listing row")
    }

    /// All listings for a user, newest first.
    pub fn get_user_listings(&self, user_id: i64) -> Result<Vec<Listing>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, haves, wants, description, created_at_ms, updated_at_ms
                 FROM listings WHERE user_id = ?1 ORDER BY created_at_ms DESC",
            )
            .context("Failed to prepare user listings query")?;

        let listings = stmt
            .query_map(params![user_id], row_to_listing)
            .context("Failed to query user listings")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to collect user listings")?;

        Ok(listings)
    }

    /// A user's listings narrowed by shape and ordered for display.
    pub fn get_user_listings_filtered(
        &self,
        user_id: i64,
        filter: ListingFilter,
        sort: ListingSort,
    ) -> Result<Vec<Listing>> {
        let listings = self.get_user_listings(user_id)?;
        Ok(filter_and_sort(listings, filter, sort))
    }

    /// Partial update of a listing. Omitted fields keep their current
    /// value; `updated_at_ms` is refreshed. Returns false when the
    /// listing does not exist.
    pub fn update_listing(
        &self,
        listing_id: i64,
        haves: Option<&Section>,
        wants: Option<&Section>,
        description: Option<&str>,
    ) -> Result<bool> {
        let Some(current) = self.get_listing_by_id(listing_id)? else {
            return Ok(false);
        };

        let haves = haves.unwrap_or(&current.haves);
        let wants = wants.unwrap_or(&current.wants);
        let description = description.or(current.description.as_deref());
        let now_ms = Utc::now().timestamp_millis();

        self.conn
            .execute(
                "UPDATE listings
                 SET haves = ?1, wants = ?2, description = ?3, updated_at_ms = ?4
                 WHERE id = ?5",
                params![
                    section_to_json(haves)?,
                    section_to_json(wants)?,
                    description,
                    now_ms,
                    listing_id,
                ],
            )
            .context("Failed to update listing")?;

        log::info!("updated listing {}", listing_id);
        Ok(true)
    }

    /// Delete a listing. Returns true when a row was removed.
    pub fn delete_listing(&self, listing_id: i64) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM listings WHERE id = ?1", params![listing_id])
            .context("Failed to delete listing")?;

        if deleted > 0 {
            log::info!("deleted listing {}", listing_id);
        }
        Ok(deleted > 0)
    }

    /// Delete every listing owned by a user. Returns the number removed.
    pub fn delete_user_listings(&self, user_id: i64) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM listings WHERE user_id = ?1", params![user_id])
            .context("Failed to delete user listings")?;

        if deleted > 0 {
            log::info!("deleted {} listings for user {}", deleted, user_id);
        }
        Ok(deleted)
    }

    /// Wipe all listings and trades (demo reset).
    pub fn clear_all(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM listings", [])
            .context("Failed to clear listings")?;
        self.conn
            .execute("DELETE FROM trades", [])
            .context("Failed to clear trades")?;
        log::info!("cleared all listings and trades");
        Ok(())
    }

    /// Listings mentioning `pet_name` in either section, or every
    /// listing when no name is given. The name match happens in memory
    /// against the parsed sections, since the column is opaque JSON.
    pub fn search_listings(&self, pet_name: Option<&str>) -> Result<Vec<Listing>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, haves, wants, description, created_at_ms, updated_at_ms
                 FROM listings",
            )
            .context("Failed to prepare search query")?;

        let listings = stmt
            .query_map([], row_to_listing)
            .context("Failed to query listings")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to collect listings")?;

        Ok(match pet_name {
            Some(name) => listings
                .into_iter()
                .filter(|l| pet_presence(l, name).anywhere())
                .collect(),
            None => listings,
        })
    }

    // ========================================================================
    // Trades (append-only)
    // ========================================================================

    /// Record a completed trade stamped with the current time. Trades
    /// are never updated or deleted.
    pub fn record_trade(&self, user_id: i64, gave: &TradeEntry, received: &TradeEntry) -> Result<i64> {
        let trade = Trade {
            id: 0,
            user_id,
            gave_pet: gave.pet_name.clone(),
            gave_qty: gave.quantity,
            gave_rarity: gave.rarity,
            received_pet: received.pet_name.clone(),
            received_qty: received.quantity,
            received_rarity: received.rarity,
            created_at_ms: Utc::now().timestamp_millis(),
        };
        self.insert_trade(&trade)
    }

    /// Insert a trade row as-is (the id field is ignored). Used by bulk
    /// import, where rows carry their original timestamps.
    pub fn insert_trade(&self, trade: &Trade) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO trades (
                    user_id, gave_pet, gave_qty, gave_rarity,
                    received_pet, received_qty, received_rarity, created_at_ms
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    trade.user_id,
                    &trade.gave_pet,
                    trade.gave_qty,
                    trade.gave_rarity,
                    &trade.received_pet,
                    trade.received_qty,
                    trade.received_rarity,
                    trade.created_at_ms,
                ],
            )
            .context("Failed to insert trade record")?;

        let trade_id = self.conn.last_insert_rowid();
        log::info!(
            "recorded trade {}: user {} gave {}x {} ({})",
            trade_id,
            trade.user_id,
            trade.gave_qty,
            trade.gave_pet,
            trade.gave_rarity
        );
        Ok(trade_id)
    }

    /// Trades where `pet_name` was given away, recorded after
    /// `since_ms`, newest first.
    pub fn get_trades_for_pet(&self, pet_name: &str, since_ms: i64) -> Result<Vec<Trade>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, gave_pet, gave_qty, gave_rarity,
                        received_pet, received_qty, received_rarity, created_at_ms
                 FROM trades
                 WHERE LOWER(gave_pet) = LOWER(?1) AND created_at_ms > ?2
                 ORDER BY created_at_ms DESC",
            )
            .context("Failed to prepare trades query")?;

        let trades = stmt
            .query_map(params![pet_name, since_ms], row_to_trade)
            .context("Failed to query trades for pet")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to collect trades")?;

        Ok(trades)
    }

    /// Get count of trades in database
    pub fn get_trade_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM trades", [], |row| row.get(0))
            .context("Failed to query trade count")?;
        Ok(count)
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// Price history for one pet over the trailing `window_days`. The
    /// window must already be validated by the caller.
    pub fn price_report(&self, pet_name: &str, window_days: u32) -> Result<PriceReport> {
        let cutoff_ms = Utc::now().timestamp_millis() - window_days as i64 * MS_PER_DAY;
        let trades = self.get_trades_for_pet(pet_name, cutoff_ms)?;
        Ok(pricing::average_prices(pet_name, window_days, cutoff_ms, &trades))
    }

    /// Trade activity across the whole catalog, most active pets first.
    pub fn market_overview(&self, window_days: u32) -> Result<Vec<PetActivity>> {
        let mut reports = Vec::new();
        for pet in self.get_all_pets()? {
            reports.push(self.price_report(&pet.name, window_days)?);
        }
        Ok(pricing::market_overview(&reports))
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn row_to_pet(row: &Row<'_>) -> rusqlite::Result<Pet> {
    Ok(Pet {
        id: row.get(0)?,
        name: row.get(1)?,
        image_url: row.get(2)?,
    })
}

fn row_to_listing(row: &Row<'_>) -> rusqlite::Result<Listing> {
    Ok(Listing {
        id: row.get(0)?,
        user_id: row.get(1)?,
        haves: section_from_json(2, row.get(2)?)?,
        wants: section_from_json(3, row.get(3)?)?,
        description: row.get(4)?,
        created_at_ms: row.get(5)?,
        updated_at_ms: row.get(6)?,
    })
}

fn row_to_trade(row: &Row<'_>) -> rusqlite::Result<Trade> {
    Ok(Trade {
        id: row.get(0)?,
        user_id: row.get(1)?,
        gave_pet: row.get(2)?,
        gave_qty: row.get(3)?,
        gave_rarity: row.get(4)?,
        received_pet: row.get(5)?,
        received_qty: row.get(6)?,
        received_rarity: row.get(7)?,
        created_at_ms: row.get(8)?,
    })
}

fn section_to_json(section: &Section) -> Result<String> {
    serde_json::to_string(section).context("Failed to serialize section")
}

fn section_from_json(column: usize, raw: String) -> rusqlite::Result<Section> {
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}
