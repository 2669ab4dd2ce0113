//! Trade Price Aggregation
//!
//! Turns recorded trades into human-readable "what this pet typically
//! sells for" summaries: trades where the pet was given away are
//! grouped by the rarity given, and each group tallies what came back
//! in exchange.

use crate::models::{Rarity, Trade};
use serde::Serialize;
use std::collections::BTreeMap;

/// Price summary for one rarity tier of the queried pet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RarityPrices {
    /// Number of recorded trades in this group.
    pub trade_count: usize,
    /// Tally of what was received, e.g. `"10x Bramble (Mythic) + 3x Delve (Legendary)"`.
    pub summary: String,
}

/// Aggregated price history for one pet over a lookback window.
///
/// `total_trades == 0` with an empty `by_rarity` means "no data", which
/// callers present as such rather than treating as a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    pub pet_name: String,
    pub window_days: u32,
    pub total_trades: usize,
    pub by_rarity: BTreeMap<Rarity, RarityPrices>,
}

/// Aggregate the trades where `pet_name` was given away (matched
/// case-insensitively) and recorded after `cutoff_ms`, grouped by the
/// rarity given.
///
/// The window is assumed pre-validated by the command layer; a window
/// that matches nothing simply yields an empty report.
pub fn average_prices(
    pet_name: &str,
    window_days: u32,
    cutoff_ms: i64,
    trades: &[Trade],
) -> PriceReport {
    let mut groups: BTreeMap<Rarity, Vec<&Trade>> = BTreeMap::new();

    for trade in trades {
        if trade.gave_pet.eq_ignore_ascii_case(pet_name) && trade.created_at_ms > cutoff_ms {
            groups.entry(trade.gave_rarity).or_default().push(trade);
        }
    }

    let total_trades = groups.values().map(|g| g.len()).sum();
    let by_rarity = groups
        .into_iter()
        .map(|(rarity, group)| {
            (
                rarity,
                RarityPrices {
                    trade_count: group.len(),
                    summary: summarize_received(&group),
                },
            )
        })
        .collect();

    PriceReport {
        pet_name: pet_name.to_string(),
        window_days,
        total_trades,
        by_rarity,
    }
}

/// Tally received pets as `"qty x Pet (Rarity)"` terms joined by
/// `" + "`, sorted lexicographically by label for determinism.
fn summarize_received(group: &[&Trade]) -> String {
    let mut tally: BTreeMap<String, u64> = BTreeMap::new();
    for trade in group {
        let label = format!("{} ({})", trade.received_pet, trade.received_rarity);
        *tally.entry(label).or_insert(0) += trade.received_qty as u64;
    }

    tally
        .into_iter()
        .map(|(label, qty)| format!("{}x {}", qty, label))
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Trade activity for one pet over a window, for the market overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetActivity {
    pub pet_name: String,
    pub trade_count: usize,
}

/// Rank pets by recorded trade activity, most active first. Pets with
/// no trades in the window are omitted. Stable for ties, so pets with
/// equal counts keep their catalog order.
pub fn market_overview(reports: &[PriceReport]) -> Vec<PetActivity> {
    let mut activity: Vec<PetActivity> = reports
        .iter()
        .filter(|r| r.total_trades > 0)
        .map(|r| PetActivity {
            pet_name: r.pet_name.clone(),
            trade_count: r.total_trades,
        })
        .collect();

    activity.sort_by_key(|a| std::cmp::Reverse(a.trade_count));
    activity
}

// ============================================================================
// Tests
// ============================================================================
