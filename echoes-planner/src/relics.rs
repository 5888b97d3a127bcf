//! Relic tier rules
//!
//! Tiers below [`SINGLE_SLOT_TIER`] hold one relic each. While the Reloaded
//! relic is selected, exactly one of those tiers may hold a second relic (the
//! "doubled" tier). Tiers from [`SINGLE_SLOT_TIER`] upward are independent
//! single slots and never double.
use log::debug;
use smallvec::SmallVec;

use crate::catalog::{Catalog, Relic};
use crate::constants::{RELOADED_CODE, SINGLE_SLOT_TIER};
use crate::selection::{SelectedRelic, Selection};

type Occupants<'a> = SmallVec<[&'a SelectedRelic; 2]>;

/// Selected relics in one tier, in the order they were added.
fn occupants(relics: &[SelectedRelic], order: u8) -> Occupants<'_> {
    relics.iter().filter(|r| r.order == order).collect()
}

fn reloaded(relics: &[SelectedRelic]) -> Option<&SelectedRelic> {
    relics.iter().find(|r| r.code == RELOADED_CODE)
}

/// The tier currently holding two relics thanks to Reloaded.
///
/// When several tiers qualify (only reachable through hand-edited links) the
/// lowest order wins.
#[must_use]
pub fn doubled_tier(relics: &[SelectedRelic]) -> Option<u8> {
    let mut orders: SmallVec<[u8; 8]> = relics
        .iter()
        .map(|r| r.order)
        .filter(|order| *order < SINGLE_SLOT_TIER)
        .collect();
    orders.sort_unstable();
    orders.dedup();
    orders
        .into_iter()
        .find(|order| occupants(relics, *order).len() > 1)
}

/// Whether a relic list satisfies the tier occupancy rules.
#[must_use]
pub fn respects_tier_rules(relics: &[SelectedRelic]) -> bool {
    let allowed_doubles = usize::from(reloaded(relics).is_some());
    let mut orders: SmallVec<[u8; 8]> = relics.iter().map(|r| r.order).collect();
    orders.sort_unstable();
    orders.dedup();

    let mut doubles = 0;
    for order in orders {
        match occupants(relics, order).len() {
            0 | 1 => {}
            2 if order < SINGLE_SLOT_TIER => doubles += 1,
            _ => return false,
        }
    }
    doubles <= allowed_doubles
}

/// Select or deselect a relic by code.
///
/// Deselecting always removes the clicked relic; deselecting Reloaded also
/// removes the most recently added relic of the doubled tier. Selecting
/// replaces whatever occupies the clicked relic's tier, except that with
/// Reloaded active and no tier doubled yet the new relic joins its tier.
/// Swapping Reloaded for another relic of its tier empties the doubled tier.
#[must_use]
pub fn toggle_relic(catalog: &Catalog, selection: &Selection, code: &str) -> Selection {
    let Some(relic) = catalog.relic_by_code(code) else {
        debug!("ignoring toggle for unknown relic code {code:?}");
        return selection.clone();
    };

    let mut next = selection.clone();
    next.relics = if selection.has_relic(&relic.code) {
        remove_relic(&selection.relics, relic)
    } else {
        add_relic(&selection.relics, relic)
    };
    next
}

fn remove_relic(relics: &[SelectedRelic], relic: &Relic) -> Vec<SelectedRelic> {
    let mut kept: Vec<SelectedRelic> = relics
        .iter()
        .filter(|r| r.code != relic.code)
        .cloned()
        .collect();

    if relic.is_reloaded()
        && let Some(tier) = doubled_tier(relics)
    {
        let tier_relics = occupants(relics, tier);
        if let Some(extra) = tier_relics.last() {
            debug!("dropping {} from doubled tier {tier}", extra.name);
            kept.retain(|r| r.code != extra.code);
        }
    }
    kept
}

fn add_relic(relics: &[SelectedRelic], relic: &Relic) -> Vec<SelectedRelic> {
    let reloaded_order = reloaded(relics).map(|r| r.order);
    let has_reloaded = reloaded_order.is_some();
    let swapping_reloaded = reloaded_order == Some(relic.order);
    let doubled = doubled_tier(relics);

    let keep = |r: &SelectedRelic| {
        if r.order >= SINGLE_SLOT_TIER {
            return r.order != relic.order;
        }
        match doubled {
            Some(tier) if swapping_reloaded => r.order != relic.order && r.order != tier,
            Some(_) => r.order != relic.order,
            None => r.order != relic.order || has_reloaded,
        }
    };

    let mut next: Vec<SelectedRelic> = relics.iter().filter(|&r| keep(r)).cloned().collect();
    next.push(SelectedRelic::from(relic));
    next
}
