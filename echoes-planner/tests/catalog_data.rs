use echoes_planner::constants::{RELOADED_CODE, SINGLE_SLOT_TIER};
use echoes_planner::{Catalog, CombatStyle, clean_name};
use std::collections::HashSet;

fn bundled() -> Catalog {
    Catalog::bundled().expect("bundled catalog parses")
}

#[test]
fn exactly_one_default_region() {
    let catalog = bundled();
    let defaults: Vec<&str> = catalog
        .default_regions()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(defaults, vec!["Varlamore"]);
    assert!(catalog.selectable_regions().count() >= 3);
}

#[test]
fn content_references_known_regions_and_relics() {
    let catalog = bundled();
    let regions: HashSet<String> = catalog.regions().iter().map(|r| clean_name(&r.name)).collect();
    let relics: HashSet<String> = catalog.relics().iter().map(|r| clean_name(&r.name)).collect();

    let activities = catalog
        .bosses()
        .iter()
        .chain(catalog.minigames())
        .chain(catalog.runes())
        .chain(catalog.prayers())
        .chain(catalog.spellbooks())
        .chain(catalog.slayer_masters());
    for activity in activities {
        for name in activity.regions.keys() {
            assert!(regions.contains(&clean_name(name)), "{}: {name}", activity.name);
        }
        for name in activity.relics.keys() {
            assert!(relics.contains(&clean_name(name)), "{}: {name}", activity.name);
        }
    }
    for skill in catalog.skills() {
        for name in skill.regions.keys() {
            assert!(regions.contains(&clean_name(name)), "{}: {name}", skill.name);
        }
        for name in skill.relics.keys() {
            assert!(relics.contains(&clean_name(name)), "{}: {name}", skill.name);
        }
    }
    for teleport in catalog.teleports() {
        assert!(catalog.relic_by_name(&teleport.relic).is_some());
        assert!(teleport.regions.iter().all(|r| regions.contains(&clean_name(r))));
    }
    for gear in catalog.gear() {
        assert!(catalog.region_by_name(&gear.region).is_some(), "{}", gear.name);
    }
}

#[test]
fn reloaded_sits_on_the_first_single_slot_tier() {
    let catalog = bundled();
    let reloaded = catalog.relic_by_code(RELOADED_CODE).unwrap();
    assert_eq!(reloaded.order, SINGLE_SLOT_TIER);
    assert!(catalog.relic_tiers().iter().any(|t| *t < SINGLE_SLOT_TIER));
}

#[test]
fn every_style_has_contiguous_mastery_ranks() {
    let catalog = bundled();
    for style in CombatStyle::ALL {
        let max = catalog.max_mastery_level(style);
        assert_eq!(max, 6, "{style}");
        for level in 1..=max {
            assert!(catalog.mastery(style, level).is_some(), "{style} {level}");
        }
    }
}
