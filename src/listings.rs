//! Listing Edit, Filter and Sort Logic
//!
//! Pure transformations over listings fetched from the store: applying
//! a merge/replace edit to one section, narrowing a user's listings by
//! shape, and ordering them for display.

use crate::models::{Listing, RarityMap, Section};
use std::cmp::Reverse;
use std::str::FromStr;

/// How an incoming set of quantities is combined with a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Listing creation: plain insert, overwriting a same-name key.
    New,
    /// Merge with an existing entry, summing quantities per rarity.
    Add,
    /// Drop any existing entry for the pet, then insert the new one.
    Replace,
}

/// Apply an edit for one pet to a section. Timestamp maintenance
/// (`updated_at`) belongs to the store, not here.
pub fn apply_edit(section: &mut Section, pet_name: &str, quantities: RarityMap, mode: EditMode) {
    match mode {
        EditMode::New => section.insert(pet_name, quantities),
        EditMode::Replace => {
            section.remove(pet_name);
            section.insert(pet_name, quantities);
        }
        EditMode::Add => {
            let existing = section.entry(pet_name);
            for (rarity, quantity) in quantities {
                let slot = existing.entry(rarity).or_insert(0);
                *slot = slot.saturating_add(quantity);
            }
        }
    }
}

// ============================================================================
// Filtering and sorting
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingFilter {
    #[default]
    All,
    /// Non-empty haves and empty wants.
    Have,
    /// Non-empty wants and empty haves.
    Want,
    /// Both sections non-empty.
    Both,
}

impl FromStr for ListingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ListingFilter::All),
            "have" => Ok(ListingFilter::Have),
            "want" => Ok(ListingFilter::Want),
            "both" => Ok(ListingFilter::Both),
            _ => Err(format!("'{}' is not a valid filter. Use all, have, want, or both", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingSort {
    #[default]
    Newest,
    Oldest,
    /// Most distinct pets across haves + wants first.
    Most,
    Least,
}

impl FromStr for ListingSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(ListingSort::Newest),
            "oldest" => Ok(ListingSort::Oldest),
            "most" => Ok(ListingSort::Most),
            "least" => Ok(ListingSort::Least),
            _ => Err(format!("'{}' is not a valid sort. Use newest, oldest, most, or least", s)),
        }
    }
}

/// Narrow and order a set of listings. Sorting is stable: listings with
/// equal keys keep their relative input order. A missing creation
/// timestamp sorts as the lowest value.
pub fn filter_and_sort(
    mut listings: Vec<Listing>,
    filter: ListingFilter,
    sort: ListingSort,
) -> Vec<Listing> {
    listings.retain(|l| match filter {
        ListingFilter::All => true,
        ListingFilter::Have => !l.haves.is_empty() && l.wants.is_empty(),
        ListingFilter::Want => !l.wants.is_empty() && l.haves.is_empty(),
        ListingFilter::Both => !l.haves.is_empty() && !l.wants.is_empty(),
    });

    match sort {
        ListingSort::Newest => listings.sort_by_key(|l| Reverse(created_key(l))),
        ListingSort::Oldest => listings.sort_by_key(created_key),
        ListingSort::Most => listings.sort_by_key(|l| Reverse(item_count(l))),
        ListingSort::Least => listings.sort_by_key(item_count),
    }

    listings
}

fn created_key(listing: &Listing) -> i64 {
    listing.created_at_ms.unwrap_or(i64::MIN)
}

fn item_count(listing: &Listing) -> usize {
    listing.haves.pet_count() + listing.wants.pet_count()
}

/// Where a pet appears in a listing; used to split search results into
/// offers and requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PetPresence {
    pub in_haves: bool,
    pub in_wants: bool,
}

impl PetPresence {
    pub fn anywhere(&self) -> bool {
        self.in_haves || self.in_wants
    }
}

/// Case-insensitive membership of a pet in each section of a listing.
pub fn pet_presence(listing: &Listing, pet_name: &str) -> PetPresence {
    PetPresence {
        in_haves: listing.haves.contains(pet_name),
        in_wants: listing.wants.contains(pet_name),
    }
}

// ============================================================================
// Tests
// ============================================================================
