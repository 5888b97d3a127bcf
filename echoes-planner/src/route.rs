//! Route codec
//!
//! A selection is shared as `/b/<seg0>/<seg1>/...`:
//!
//! - segments 0..=2 hold the region code of priority slots 1, 2 and 3, or
//!   `_` for an empty slot;
//! - segments 3..=5 hold the Melee, Ranged and Magic mastery levels;
//! - every remaining segment is a relic code, lowest tier first.
//!
//! Mastery and relic segments are only written when at least one mastery or
//! relic is selected. Without them the region segments stop at the highest
//! occupied slot. Decoding never fails: segments that do not resolve against
//! the catalog are dropped.
use log::debug;

use crate::catalog::{Catalog, CombatStyle};
use crate::constants::{EMPTY_SLOT, MASTERY_BUDGET, REGION_SLOTS, ROUTE_PREFIX};
use crate::selection::{SelectedMastery, SelectedRegion, SelectedRelic, Selection};

const MASTERY_START: usize = REGION_SLOTS as usize;
const RELIC_START: usize = MASTERY_START + CombatStyle::ALL.len();

/// Encode a selection into ordered path segments.
#[must_use]
pub fn encode(selection: &Selection) -> Vec<String> {
    let has_tail = selection.masteries.iter().any(|m| m.level > 0) || !selection.relics.is_empty();
    let region_count = if has_tail {
        REGION_SLOTS
    } else {
        selection.highest_slot()
    };

    let mut segments: Vec<String> = (1..=region_count)
        .map(|slot| {
            selection
                .region_in_slot(slot)
                .and_then(|r| r.code.clone())
                .unwrap_or_else(|| EMPTY_SLOT.to_string())
        })
        .collect();

    if has_tail {
        segments.extend(
            CombatStyle::ALL
                .iter()
                .map(|style| selection.mastery_level(*style).to_string()),
        );

        let mut relics: Vec<&SelectedRelic> = selection.relics.iter().collect();
        relics.sort_by_key(|r| r.order);
        segments.extend(relics.into_iter().map(|r| r.code.clone()));
    }
    segments
}

/// Rebuild a selection from path segments.
///
/// Default regions are always part of the result.
#[must_use]
pub fn decode<S: AsRef<str>>(catalog: &Catalog, segments: &[S]) -> Selection {
    let mut selection = Selection::new(catalog);

    for (index, segment) in segments.iter().take(MASTERY_START).enumerate() {
        let code = segment.as_ref();
        if code == EMPTY_SLOT {
            continue;
        }
        let Some(region) = catalog.region_by_code(code).filter(|r| r.is_selectable()) else {
            debug!("dropping region segment {code:?} at position {index}");
            continue;
        };
        if selection.has_region(&region.name) {
            debug!("dropping repeated region {code:?} at position {index}");
            continue;
        }
        // index < REGION_SLOTS so the slot always fits
        let slot = u8::try_from(index + 1).unwrap_or(REGION_SLOTS);
        selection.regions.push(SelectedRegion::slotted(region, slot));
    }

    let mastery_segments = segments
        .iter()
        .skip(MASTERY_START)
        .take(CombatStyle::ALL.len());
    for (style, segment) in CombatStyle::ALL.iter().zip(mastery_segments) {
        let raw = segment.as_ref();
        let Ok(level) = raw.parse::<u8>() else {
            debug!("dropping unparsable {style} mastery segment {raw:?}");
            continue;
        };
        if level == 0 {
            continue;
        }
        if level > catalog.max_mastery_level(*style) {
            debug!("dropping {style} mastery level {level} above catalog maximum");
            continue;
        }
        if selection.mastery_total().saturating_add(level) > MASTERY_BUDGET {
            debug!("dropping {style} mastery level {level} over the shared budget");
            continue;
        }
        selection.masteries.push(SelectedMastery {
            style: *style,
            level,
        });
    }

    for segment in segments.iter().skip(RELIC_START) {
        let code = segment.as_ref();
        match catalog.relic_by_code(code) {
            Some(relic) if !selection.has_relic(&relic.code) => {
                selection.relics.push(SelectedRelic::from(relic));
            }
            Some(_) => debug!("dropping repeated relic segment {code:?}"),
            None => debug!("dropping unknown relic segment {code:?}"),
        }
    }
    selection
}

/// Whether `slug` is exactly the encoding of `selection`.
#[must_use]
pub fn route_equals<S: AsRef<str>>(slug: &[S], selection: &Selection) -> bool {
    let encoded = encode(selection);
    slug.len() == encoded.len()
        && slug
            .iter()
            .zip(&encoded)
            .all(|(a, b)| a.as_ref() == b.as_str())
}

/// Segments of a `/b/...` path. Paths outside the planner prefix have none.
#[must_use]
pub fn slug_from_path(path: &str) -> Vec<String> {
    let Some(rest) = path.strip_prefix(ROUTE_PREFIX) else {
        return Vec::new();
    };
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    if rest.is_empty() {
        return Vec::new();
    }
    rest.split('/').map(str::to_string).collect()
}

#[must_use]
pub fn path_from_slug<S: AsRef<str>>(segments: &[S]) -> String {
    let joined: Vec<&str> = segments.iter().map(|s| s.as_ref()).collect();
    format!("{ROUTE_PREFIX}{}", joined.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relics::toggle_relic;
    use crate::selection::{toggle_mastery, toggle_region};

    fn catalog() -> Catalog {
        Catalog::bundled().unwrap()
    }

    #[test]
    fn regions_only_are_not_padded() {
        let catalog = catalog();
        let sel = ["MI", "KA", "AS"].iter().fold(Selection::new(&catalog), |s, c| {
            toggle_region(&catalog, &s, c)
        });
        assert_eq!(encode(&sel), vec!["MI", "KA", "AS"]);

        let gap = toggle_region(&catalog, &sel, "AS");
        let gap = toggle_region(&catalog, &gap, "MI");
        assert_eq!(encode(&gap), vec!["_", "KA"]);
    }

    #[test]
    fn mastery_pads_region_slots() {
        let catalog = catalog();
        let sel = toggle_mastery(&catalog, &Selection::new(&catalog), CombatStyle::Melee, 4);
        assert_eq!(encode(&sel), vec!["_", "_", "_", "4", "0", "0"]);
    }

    #[test]
    fn empty_selection_encodes_to_nothing() {
        let catalog = catalog();
        let sel = Selection::new(&catalog);
        assert!(encode(&sel).is_empty());
        assert!(route_equals::<&str>(&[], &sel));
        assert_eq!(decode::<&str>(&catalog, &[]), sel);
    }

    #[test]
    fn relics_are_sorted_by_tier() {
        let catalog = catalog();
        let sel = ["GG", "PM", "R", "LJ"]
            .iter()
            .fold(Selection::new(&catalog), |s, c| toggle_relic(&catalog, &s, c));
        assert_eq!(
            encode(&sel),
            vec!["_", "_", "_", "0", "0", "0", "PM", "LJ", "R"]
        );
    }

    #[test]
    fn decode_restores_selection() {
        let catalog = catalog();
        let slug = ["KA", "_", "MO", "2", "0", "3", "PM", "FF", "R"];
        let sel = decode(&catalog, &slug);
        assert_eq!(sel.region_in_slot(1).unwrap().name, "Karamja");
        assert!(sel.region_in_slot(2).is_none());
        assert_eq!(sel.region_in_slot(3).unwrap().name, "Morytania");
        assert!(sel.has_region("Varlamore"));
        assert_eq!(sel.mastery_level(CombatStyle::Melee), 2);
        assert_eq!(sel.mastery_level(CombatStyle::Ranged), 0);
        assert_eq!(sel.mastery_level(CombatStyle::Magic), 3);
        assert_eq!(sel.relics.len(), 3);
        assert!(route_equals(&slug, &sel));
    }

    #[test]
    fn decode_drops_bad_segments() {
        let catalog = catalog();
        let slug = ["ZZ", "KO", "VA", "x", "9", "7", "PM", "nope", "PM", "LJ"];
        let sel = decode(&catalog, &slug);
        assert_eq!(sel.non_default_region_count(), 0);
        assert!(sel.masteries.is_empty());
        let codes: Vec<&str> = sel.relics.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["PM", "LJ"]);
    }

    #[test]
    fn decode_keeps_first_of_repeated_region() {
        let catalog = catalog();
        let sel = decode(&catalog, &["MI", "MI", "KA"]);
        assert_eq!(sel.region_in_slot(1).unwrap().name, "Misthalin");
        assert!(sel.region_in_slot(2).is_none());
        assert_eq!(sel.region_in_slot(3).unwrap().name, "Karamja");
    }

    #[test]
    fn decode_enforces_mastery_budget() {
        let catalog = catalog();
        let sel = decode(&catalog, &["_", "_", "_", "6", "4", "1"]);
        assert_eq!(sel.mastery_total(), 10);
        assert_eq!(sel.mastery_level(CombatStyle::Magic), 0);
    }

    #[test]
    fn route_equals_is_positional() {
        let catalog = catalog();
        let sel = decode(&catalog, &["MI", "KA"]);
        assert!(route_equals(&["MI", "KA"], &sel));
        assert!(!route_equals(&["KA", "MI"], &sel));
        assert!(!route_equals(&["MI", "KA", "_"], &sel));
    }

    #[test]
    fn reloaded_double_survives_round_trip() {
        let catalog = catalog();
        let sel = ["PM", "R", "LJ"]
            .iter()
            .fold(Selection::new(&catalog), |s, c| toggle_relic(&catalog, &s, c));
        let slug = encode(&sel);
        let back = decode(&catalog, &slug);
        assert!(back.is_equivalent(&sel));
        assert_eq!(encode(&back), slug);

        let off = toggle_relic(&catalog, &back, "R");
        assert_eq!(off.relics.len(), 1);
    }

    #[test]
    fn path_helpers() {
        assert_eq!(slug_from_path("/b/MI/_/KA"), vec!["MI", "_", "KA"]);
        assert_eq!(slug_from_path("/b/MI/"), vec!["MI"]);
        assert_eq!(slug_from_path("/b/MI//KA"), vec!["MI", "", "KA"]);
        assert!(slug_from_path("/b/").is_empty());
        assert!(slug_from_path("/").is_empty());
        assert!(slug_from_path("/x/MI").is_empty());
        assert_eq!(path_from_slug(&["MI", "KA"]), "/b/MI/KA");
        assert_eq!(path_from_slug::<String>(&[]), "/b/");
    }
}
