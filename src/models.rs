// src/models.rs
// Core types for the auction house: rarities, listing sections, pets, trades

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Rarity tier of a pet instance. Closed set; parsing is exact-match on
/// the canonical capitalized spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Legendary,
    Mythic,
}

impl Rarity {
    /// All rarities in display order.
    pub const ALL: [Rarity; 2] = [Rarity::Legendary, Rarity::Mythic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }

    /// Exact-match lookup. "legendary" does not resolve; the canonical
    /// spelling is part of the input contract.
    pub fn from_name(name: &str) -> Option<Rarity> {
        match name {
            "Legendary" => Some(Rarity::Legendary),
            "Mythic" => Some(Rarity::Mythic),
            _ => None,
        }
    }

    /// Comma-joined list of valid names, for error messages.
    pub fn valid_names() -> String {
        Rarity::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rarity::from_name(s).ok_or_else(|| {
            format!(
                "'{}' is not a valid rarity. Valid options: {}",
                s,
                Rarity::valid_names()
            )
        })
    }
}

/// Per-rarity quantities for one pet. A rarity with zero quantity is
/// simply absent from the map.
pub type RarityMap = BTreeMap<Rarity, u32>;

/// One side of a listing (haves or wants): pet name -> rarity -> quantity.
///
/// Pet-name keys are unique case-insensitively but stored with their
/// catalog casing. Serializes as the plain nested JSON object used in
/// the listings table columns: `{"Kragg": {"Legendary": 10}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section(BTreeMap<String, RarityMap>);

impl Section {
    pub fn new() -> Self {
        Section(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct pets in this section.
    pub fn pet_count(&self) -> usize {
        self.0.len()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, pet_name: &str) -> Option<&RarityMap> {
        let key = self.find_key(pet_name)?;
        self.0.get(&key)
    }

    pub fn contains(&self, pet_name: &str) -> bool {
        self.find_key(pet_name).is_some()
    }

    /// Insert under `pet_name`, first evicting any case-insensitive
    /// duplicate so the uniqueness invariant holds.
    pub fn insert(&mut self, pet_name: &str, quantities: RarityMap) {
        self.remove(pet_name);
        self.0.insert(pet_name.to_string(), quantities);
    }

    /// Case-insensitive removal. Returns the removed quantities, if any.
    pub fn remove(&mut self, pet_name: &str) -> Option<RarityMap> {
        let key = self.find_key(pet_name)?;
        self.0.remove(&key)
    }

    /// Mutable access to the quantities for `pet_name`, inserting an
    /// empty map under the given casing when the pet is absent.
    pub fn entry(&mut self, pet_name: &str) -> &mut RarityMap {
        let key = self
            .find_key(pet_name)
            .unwrap_or_else(|| pet_name.to_string());
        self.0.entry(key).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RarityMap)> {
        self.0.iter()
    }

    fn find_key(&self, pet_name: &str) -> Option<String> {
        self.0
            .keys()
            .find(|k| k.eq_ignore_ascii_case(pet_name))
            .cloned()
    }
}

impl FromIterator<(String, RarityMap)> for Section {
    fn from_iter<I: IntoIterator<Item = (String, RarityMap)>>(iter: I) -> Self {
        let mut section = Section::new();
        for (name, quantities) in iter {
            section.insert(&name, quantities);
        }
        section
    }
}

/// Static reference data for a tradable pet. Seeded once at database
/// initialization, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub image_url: String,
}

/// In-memory index over the pets table providing case-insensitive name
/// resolution to the canonical record.
#[derive(Debug, Clone, Default)]
pub struct PetCatalog {
    pets: Vec<Pet>,
    name_map: HashMap<String, usize>, // lowercased name -> index in pets
}

impl PetCatalog {
    pub fn new(pets: Vec<Pet>) -> Self {
        let mut name_map = HashMap::new();
        for (idx, pet) in pets.iter().enumerate() {
            name_map.insert(pet.name.to_lowercase(), idx);
        }
        Self { pets, name_map }
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    /// Case-insensitive lookup of a pet by name.
    pub fn resolve(&self, name: &str) -> Option<&Pet> {
        self.name_map
            .get(&name.to_lowercase())
            .and_then(|&idx| self.pets.get(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pet> {
        self.pets.iter()
    }
}

/// A user's posted trade offer/request.
///
/// Timestamps are Unix epoch milliseconds; rows created before the
/// timestamp columns existed carry `None` and sort as the lowest value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: i64,
    pub user_id: i64,
    pub haves: Section,
    pub wants: Section,
    pub description: Option<String>,
    pub created_at_ms: Option<i64>,
    pub updated_at_ms: Option<i64>,
}

/// Immutable record of a completed exchange, used for price history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub id: i64,
    pub user_id: i64,
    pub gave_pet: String,
    pub gave_qty: u32,
    pub gave_rarity: Rarity,
    pub received_pet: String,
    pub received_qty: u32,
    pub received_rarity: Rarity,
    pub created_at_ms: i64,
}

/// One validated side of a trade ("Aurelia Legendary 10"), ready to be
/// recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEntry {
    pub pet_name: String,
    pub rarity: Rarity,
    pub quantity: u32,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> PetCatalog {
        PetCatalog::new(vec![
            Pet {
                id: 1,
                name: "Kragg".to_string(),
                image_url: "https://example.com/kragg.webp".to_string(),
            },
            Pet {
                id: 2,
                name: "Grimm".to_string(),
                image_url: "https://example.com/grimm.webp".to_string(),
            },
        ])
    }

    #[test]
    fn test_rarity_from_name_exact_match_only() {
        assert_eq!(Rarity::from_name("Legendary"), Some(Rarity::Legendary));
        assert_eq!(Rarity::from_name("Mythic"), Some(Rarity::Mythic));
        assert_eq!(Rarity::from_name("legendary"), None);
        assert_eq!(Rarity::from_name("Epic"), None);
    }

    #[test]
    fn test_rarity_display_round_trip() {
        for rarity in Rarity::ALL {
            assert_eq!(Rarity::from_name(&rarity.to_string()), Some(rarity));
        }
    }

    #[test]
    fn test_section_case_insensitive_lookup() {
        let mut section = Section::new();
        section.insert("Kragg", RarityMap::from([(Rarity::Legendary, 10)]));

        assert!(section.contains("kragg"));
        assert!(section.contains("KRAGG"));
        assert_eq!(
            section.get("kRaGg"),
            Some(&RarityMap::from([(Rarity::Legendary, 10)]))
        );
        assert!(!section.contains("Grimm"));
    }

    #[test]
    fn test_section_insert_evicts_case_duplicate() {
        let mut section = Section::new();
        section.insert("Kragg", RarityMap::from([(Rarity::Legendary, 10)]));
        section.insert("kragg", RarityMap::from([(Rarity::Mythic, 2)]));

        // Only one entry survives, keyed by the later casing
        assert_eq!(section.pet_count(), 1);
        assert_eq!(
            section.get("Kragg"),
            Some(&RarityMap::from([(Rarity::Mythic, 2)]))
        );
    }

    #[test]
    fn test_section_remove_case_insensitive() {
        let mut section = Section::new();
        section.insert("Kragg", RarityMap::from([(Rarity::Legendary, 10)]));

        let removed = section.remove("KRAGG");
        assert_eq!(removed, Some(RarityMap::from([(Rarity::Legendary, 10)])));
        assert!(section.is_empty());
        assert_eq!(section.remove("Kragg"), None);
    }

    #[test]
    fn test_section_entry_reuses_existing_casing() {
        let mut section = Section::new();
        section.insert("Kragg", RarityMap::from([(Rarity::Legendary, 10)]));

        section.entry("kragg").insert(Rarity::Mythic, 2);
        assert_eq!(section.pet_count(), 1);
        assert_eq!(
            section.get("Kragg"),
            Some(&RarityMap::from([(Rarity::Legendary, 10), (Rarity::Mythic, 2)]))
        );
    }

    #[test]
    fn test_section_json_round_trip() {
        let mut section = Section::new();
        section.insert(
            "Aurelia",
            RarityMap::from([(Rarity::Legendary, 50), (Rarity::Mythic, 3)]),
        );
        section.insert("Bramble", RarityMap::from([(Rarity::Legendary, 10)]));

        let json = serde_json::to_string(&section).unwrap();
        let parsed: Section = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, section);

        // Matches the flat nested-object column format
        let raw: Section =
            serde_json::from_str(r#"{"Aurelia": {"Legendary": 50, "Mythic": 3}}"#).unwrap();
        assert_eq!(
            raw.get("Aurelia"),
            Some(&RarityMap::from([(Rarity::Legendary, 50), (Rarity::Mythic, 3)]))
        );
    }

    #[test]
    fn test_catalog_resolves_case_insensitively() {
        let catalog = catalog();
        assert_eq!(catalog.resolve("kragg").map(|p| p.name.as_str()), Some("Kragg"));
        assert_eq!(catalog.resolve("GRIMM").map(|p| p.name.as_str()), Some("Grimm"));
        assert!(catalog.resolve("Unknown").is_none());
    }
}
