//! Free-Text Input Parsing
//!
//! Converts the quantity strings users type ("Legendary:5, Mythic:3",
//! "Kragg Legendary 10, Grimm Mythic 1") into validated nested mappings.
//! Every failure names the offending substring so the command layer can
//! render it back to the user; a failed parse has no side effects.

use crate::models::{PetCatalog, Rarity, RarityMap, Section, TradeEntry};
use crate::settings::{MAX_QUANTITY, MIN_QUANTITY};
use thiserror::Error;

/// Validation failures for user-typed input. These are expected input
/// rejection, never system faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid format: '{entry}'. Use 'Rarity:Quantity' (e.g. 'Legendary:5') or 'Pet Rarity Quantity'")]
    Format { entry: String },

    #[error("'{value}' is not a valid rarity. Valid options: Legendary, Mythic")]
    InvalidRarity { value: String },

    #[error("'{value}' is not a valid quantity. Quantity must be a number between 1 and 10000")]
    InvalidQuantity { value: String },

    #[error("pet '{name}' not found")]
    UnknownPet { name: String },

    #[error("no quantities provided")]
    EmptyInput,

    #[error("no entries with a non-zero quantity")]
    EmptyResult,
}

/// Parse comma-separated `Rarity:Quantity` entries into a rarity map.
///
/// Blank entries (doubled or trailing commas) are skipped. A duplicated
/// rarity keeps the last occurrence. A quantity of zero is a hard error
/// here (it fails the range check); the multi-pet parser below drops
/// zero entries silently instead.
pub fn parse_rarity_quantities(input: &str) -> Result<RarityMap, ParseError> {
    let mut quantities = RarityMap::new();

    for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = entry.split(':').collect();
        if parts.len() != 2 {
            return Err(ParseError::Format {
                entry: entry.to_string(),
            });
        }

        let rarity = parse_rarity(parts[0].trim())?;
        let quantity = parse_quantity(parts[1].trim())?;

        // Last occurrence wins on duplicates
        quantities.insert(rarity, quantity);
    }

    if quantities.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    Ok(quantities)
}

/// Parse multi-pet input into a section: `pet rarity quantity` entries,
/// separated by newlines when the input contains any, otherwise by
/// commas (the separator is chosen once for the whole input).
///
/// Pet names resolve case-insensitively against the catalog and are
/// stored under their catalog casing. Tokens past the third are
/// ignored. An entry with quantity zero is dropped without error;
/// repeated entries for one pet accumulate, with a repeated rarity
/// overwriting the earlier value.
pub fn parse_pet_quantities(input: &str, catalog: &PetCatalog) -> Result<Section, ParseError> {
    let entries: Vec<&str> = if input.contains('\n') {
        input.split('\n').collect()
    } else {
        input.split(',').collect()
    };

    let mut section = Section::new();

    for entry in entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
        let tokens: Vec<&str> = entry.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(ParseError::Format {
                entry: entry.to_string(),
            });
        }

        let pet = catalog
            .resolve(tokens[0])
            .ok_or_else(|| ParseError::UnknownPet {
                name: tokens[0].to_string(),
            })?;
        let rarity = parse_rarity(tokens[1])?;

        let quantity: i64 = tokens[2].parse().map_err(|_| ParseError::InvalidQuantity {
            value: tokens[2].to_string(),
        })?;
        if quantity == 0 {
            continue; // zero means "not listed", not an error
        }
        if quantity < MIN_QUANTITY as i64 || quantity > MAX_QUANTITY as i64 {
            return Err(ParseError::InvalidQuantity {
                value: tokens[2].to_string(),
            });
        }

        section.entry(&pet.name).insert(rarity, quantity as u32);
    }

    if section.is_empty() {
        return Err(ParseError::EmptyResult);
    }

    Ok(section)
}

/// Parse one side of a recorded trade: `pet rarity quantity`, with any
/// trailing tokens ignored.
pub fn parse_trade_entry(input: &str, catalog: &PetCatalog) -> Result<TradeEntry, ParseError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(ParseError::Format {
            entry: input.trim().to_string(),
        });
    }

    let pet = catalog
        .resolve(tokens[0])
        .ok_or_else(|| ParseError::UnknownPet {
            name: tokens[0].to_string(),
        })?;
    let rarity = parse_rarity(tokens[1])?;
    let quantity = parse_quantity(tokens[2])?;

    Ok(TradeEntry {
        pet_name: pet.name.clone(),
        rarity,
        quantity,
    })
}

fn parse_rarity(raw: &str) -> Result<Rarity, ParseError> {
    Rarity::from_name(raw).ok_or_else(|| ParseError::InvalidRarity {
        value: raw.to_string(),
    })
}

fn parse_quantity(raw: &str) -> Result<u32, ParseError> {
    let quantity: i64 = raw.parse().map_err(|_| ParseError::InvalidQuantity {
        value: raw.to_string(),
    })?;
    if quantity < MIN_QUANTITY as i64 || quantity > MAX_QUANTITY as i64 {
        return Err(ParseError::InvalidQuantity {
            value: raw.to_string(),
        });
    }
    Ok(quantity as u32)
}

// ============================================================================
// Display formatting
// ============================================================================

/// Render a rarity map as `"Legendary: 5 | Mythic: 3"` in fixed rarity
/// order, or `"None"` when empty.
pub fn format_quantities(quantities: &RarityMap) -> String {
    if quantities.is_empty() {
        return "None".to_string();
    }
    Rarity::ALL
        .iter()
        .filter_map(|r| quantities.get(r).map(|q| format!("{}: {}", r, q)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Render a whole section as `"Pet: <quantities>, Pet: <quantities>"`,
/// or `"None"` when empty.
pub fn format_section(section: &Section) -> String {
    if section.is_empty() {
        return "None".to_string();
    }
    section
        .iter()
        .map(|(pet, quantities)| format!("{}: {}", pet, format_quantities(quantities)))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pet;

    fn catalog() -> PetCatalog {
        let pets = ["Kragg", "Grimm", "Aurelia", "Bramble"]
            .iter()
            .enumerate()
            .map(|(i, name)| Pet {
                id: i as i64 + 1,
                name: name.to_string(),
                image_url: format!("https://example.com/{}.webp", name.to_lowercase()),
            })
            .collect();
        PetCatalog::new(pets)
    }

    // ------------------------------------------------------------------
    // parse_rarity_quantities
    // ------------------------------------------------------------------

    #[test]
    fn test_parse_rarity_quantities_basic() {
        let parsed = parse_rarity_quantities("Legendary:5,Mythic:3").unwrap();
        assert_eq!(
            parsed,
            RarityMap::from([(Rarity::Legendary, 5), (Rarity::Mythic, 3)])
        );
    }

    #[test]
    fn test_parse_rarity_quantities_whitespace_and_trailing_comma() {
        let parsed = parse_rarity_quantities(" Legendary : 5 , Mythic : 10 , ").unwrap();
        assert_eq!(
            parsed,
            RarityMap::from([(Rarity::Legendary, 5), (Rarity::Mythic, 10)])
        );
    }

    #[test]
    fn test_parse_rarity_quantities_missing_colon() {
        let err = parse_rarity_quantities("Legendary 5").unwrap_err();
        assert_eq!(
            err,
            ParseError::Format {
                entry: "Legendary 5".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rarity_quantities_too_many_segments() {
        let err = parse_rarity_quantities("Legendary:5:9").unwrap_err();
        assert!(matches!(err, ParseError::Format { .. }));
    }

    #[test]
    fn test_parse_rarity_quantities_invalid_rarity() {
        let err = parse_rarity_quantities("Epic:5").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidRarity {
                value: "Epic".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rarity_quantities_rejects_zero() {
        // Zero fails the range check here; only the multi-pet parser
        // drops zero entries silently
        let err = parse_rarity_quantities("Legendary:0").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidQuantity {
                value: "0".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rarity_quantities_range_and_numeric() {
        assert!(matches!(
            parse_rarity_quantities("Legendary:10001").unwrap_err(),
            ParseError::InvalidQuantity { .. }
        ));
        assert!(matches!(
            parse_rarity_quantities("Legendary:-3").unwrap_err(),
            ParseError::InvalidQuantity { .. }
        ));
        assert!(matches!(
            parse_rarity_quantities("Legendary:abc").unwrap_err(),
            ParseError::InvalidQuantity { .. }
        ));
        assert_eq!(
            parse_rarity_quantities("Legendary:10000").unwrap(),
            RarityMap::from([(Rarity::Legendary, 10000)])
        );
    }

    #[test]
    fn test_parse_rarity_quantities_duplicate_last_wins() {
        let parsed = parse_rarity_quantities("Legendary:5,Legendary:8").unwrap();
        assert_eq!(parsed, RarityMap::from([(Rarity::Legendary, 8)]));
    }

    #[test]
    fn test_parse_rarity_quantities_empty_input() {
        assert_eq!(parse_rarity_quantities("").unwrap_err(), ParseError::EmptyInput);
        assert_eq!(parse_rarity_quantities(" , ,").unwrap_err(), ParseError::EmptyInput);
    }

    #[test]
    fn test_format_round_trip_contains_every_rarity() {
        let parsed = parse_rarity_quantities("Legendary:5,Mythic:3").unwrap();
        let formatted = format_quantities(&parsed);
        for rarity in parsed.keys() {
            assert!(formatted.contains(rarity.as_str()));
        }
        assert_eq!(formatted, "Legendary: 5 | Mythic: 3");
    }

    #[test]
    fn test_format_quantities_empty() {
        assert_eq!(format_quantities(&RarityMap::new()), "None");
    }

    // ------------------------------------------------------------------
    // parse_pet_quantities
    // ------------------------------------------------------------------

    #[test]
    fn test_parse_pet_quantities_comma_separated() {
        let parsed = parse_pet_quantities("Kragg Legendary 10, Grimm Mythic 1", &catalog()).unwrap();
        assert_eq!(parsed.pet_count(), 2);
        assert_eq!(
            parsed.get("Kragg"),
            Some(&RarityMap::from([(Rarity::Legendary, 10)]))
        );
        assert_eq!(
            parsed.get("Grimm"),
            Some(&RarityMap::from([(Rarity::Mythic, 1)]))
        );
    }

    #[test]
    fn test_parse_pet_quantities_newline_mode() {
        let parsed =
            parse_pet_quantities("Kragg Legendary 10\nGrimm Mythic 1\n", &catalog()).unwrap();
        assert_eq!(parsed.pet_count(), 2);
    }

    #[test]
    fn test_parse_pet_quantities_newline_mode_is_global() {
        // With a newline present, commas are not separators; this entry
        // has tokens "Kragg" "Legendary" "10," and the quantity fails
        let err = parse_pet_quantities("Kragg Legendary 10, Grimm Mythic 1\n", &catalog())
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_parse_pet_quantities_resolves_catalog_casing() {
        let parsed = parse_pet_quantities("kragg Legendary 10", &catalog()).unwrap();
        assert_eq!(
            parsed.iter().next().map(|(name, _)| name.as_str()),
            Some("Kragg")
        );
    }

    #[test]
    fn test_parse_pet_quantities_unknown_pet() {
        let err = parse_pet_quantities("Unknown Legendary 5", &catalog()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownPet {
                name: "Unknown".to_string()
            }
        );
    }

    #[test]
    fn test_parse_pet_quantities_short_entry() {
        let err = parse_pet_quantities("Kragg Legendary", &catalog()).unwrap_err();
        assert_eq!(
            err,
            ParseError::Format {
                entry: "Kragg Legendary".to_string()
            }
        );
    }

    #[test]
    fn test_parse_pet_quantities_extra_tokens_ignored() {
        let parsed = parse_pet_quantities("Kragg Legendary 10 please", &catalog()).unwrap();
        assert_eq!(
            parsed.get("Kragg"),
            Some(&RarityMap::from([(Rarity::Legendary, 10)]))
        );
    }

    #[test]
    fn test_parse_pet_quantities_zero_dropped_silently() {
        let parsed =
            parse_pet_quantities("Kragg Legendary 0, Grimm Mythic 2", &catalog()).unwrap();
        assert_eq!(parsed.pet_count(), 1);
        assert!(!parsed.contains("Kragg"));
    }

    #[test]
    fn test_parse_pet_quantities_all_zero_is_empty_result() {
        let err = parse_pet_quantities("Kragg Legendary 0", &catalog()).unwrap_err();
        assert_eq!(err, ParseError::EmptyResult);
    }

    #[test]
    fn test_parse_pet_quantities_accumulates_same_pet() {
        let parsed = parse_pet_quantities(
            "Kragg Legendary 10, Kragg Mythic 2, Kragg Legendary 4",
            &catalog(),
        )
        .unwrap();
        // Later rarity entries for the same pet overwrite earlier ones
        assert_eq!(
            parsed.get("Kragg"),
            Some(&RarityMap::from([(Rarity::Legendary, 4), (Rarity::Mythic, 2)]))
        );
    }

    #[test]
    fn test_parse_pet_quantities_validates_rarity_before_zero_skip() {
        let err = parse_pet_quantities("Kragg Epic 0", &catalog()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRarity { .. }));
    }

    // ------------------------------------------------------------------
    // parse_trade_entry
    // ------------------------------------------------------------------

    #[test]
    fn test_parse_trade_entry_basic() {
        let entry = parse_trade_entry("Aurelia Legendary 10", &catalog()).unwrap();
        assert_eq!(
            entry,
            TradeEntry {
                pet_name: "Aurelia".to_string(),
                rarity: Rarity::Legendary,
                quantity: 10,
            }
        );
    }

    #[test]
    fn test_parse_trade_entry_failures() {
        assert!(matches!(
            parse_trade_entry("Aurelia Legendary", &catalog()).unwrap_err(),
            ParseError::Format { .. }
        ));
        assert!(matches!(
            parse_trade_entry("Nobody Legendary 10", &catalog()).unwrap_err(),
            ParseError::UnknownPet { .. }
        ));
        assert!(matches!(
            parse_trade_entry("Aurelia Common 10", &catalog()).unwrap_err(),
            ParseError::InvalidRarity { .. }
        ));
        assert!(matches!(
            parse_trade_entry("Aurelia Legendary 0", &catalog()).unwrap_err(),
            ParseError::InvalidQuantity { .. }
        ));
    }

    #[test]
    fn test_format_section() {
        let mut section = Section::new();
        section.insert("Bramble", RarityMap::from([(Rarity::Legendary, 15), (Rarity::Mythic, 2)]));
        section.insert("Aurelia", RarityMap::from([(Rarity::Legendary, 25)]));

        assert_eq!(
            format_section(&section),
            "Aurelia: Legendary: 25, Bramble: Legendary: 15 | Mythic: 2"
        );
        assert_eq!(format_section(&Section::new()), "None");
    }
}
