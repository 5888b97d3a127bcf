//! Static content catalog
//!
//! Read-only reference data loaded once at startup: the selectable regions,
//! relics and combat masteries, plus every piece of content (skills, bosses,
//! teleports, gear, ...) tagged with the regions and relics that unlock it.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::RELOADED_CODE;
use crate::names::clean_name;

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// A game area that can be unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    /// Default regions are always unlocked and never take a priority slot.
    #[serde(default, rename = "default")]
    pub is_default: bool,
    /// Hidden regions exist only as content tags and cannot be chosen.
    #[serde(default)]
    pub hidden: bool,
}

impl Region {
    /// Whether the region can be picked into one of the priority slots.
    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        !self.is_default && !self.hidden && self.code.is_some()
    }
}

/// A perk organized into ordered tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relic {
    pub name: String,
    pub code: String,
    /// Display label of the tier ("1", "2", ... or a named tier).
    pub tier: String,
    /// Ordinal position of the tier; relics sharing an order compete for it.
    pub order: u8,
}

impl Relic {
    #[must_use]
    pub fn tier_label(&self) -> String {
        if self.tier.parse::<u32>().is_ok() {
            format!("Tier {}", self.tier)
        } else {
            format!("{} Tier", self.tier)
        }
    }

    #[must_use]
    pub fn is_reloaded(&self) -> bool {
        self.code == RELOADED_CODE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CombatStyle {
    Melee,
    Ranged,
    Magic,
}

impl CombatStyle {
    /// Canonical style order used by the route codec.
    pub const ALL: [Self; 3] = [Self::Melee, Self::Ranged, Self::Magic];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Melee => 0,
            Self::Ranged => 1,
            Self::Magic => 2,
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Melee),
            1 => Some(Self::Ranged),
            2 => Some(Self::Magic),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Melee => "Melee",
            Self::Ranged => "Ranged",
            Self::Magic => "Magic",
        }
    }
}

impl fmt::Display for CombatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown combat style `{0}`")]
pub struct UnknownStyleError(pub String);

impl FromStr for CombatStyle {
    type Err = UnknownStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "melee" => Ok(Self::Melee),
            "ranged" | "range" => Ok(Self::Ranged),
            "magic" | "mage" => Ok(Self::Magic),
            _ => Err(UnknownStyleError(s.to_string())),
        }
    }
}

/// One rank of a combat style's mastery track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatMastery {
    pub name: String,
    pub style: CombatStyle,
    pub level: u8,
    #[serde(default = "default_point_cost")]
    pub point_cost: u8,
    #[serde(default)]
    pub description: String,
}

const fn default_point_cost() -> u8 {
    1
}

/// Point value annotated with a short explanation of the unlocking method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotedCell {
    pub value: u32,
    #[serde(default)]
    pub note: Option<String>,
}

/// A piece of content with per-region and per-relic point values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity<P = u32> {
    pub name: String,
    #[serde(default)]
    pub regions: BTreeMap<String, P>,
    #[serde(default)]
    pub relics: BTreeMap<String, P>,
}

/// Skill sheet rows carry notes describing each unlocking method.
pub type NotedActivity = Activity<NotedCell>;

/// A relic-granted teleport that needs all of its regions unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleport {
    pub relic: String,
    pub category: String,
    #[serde(default)]
    pub regions: Vec<String>,
    pub location: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub distance: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GearSlot {
    Weapon,
    Armour,
}

impl GearSlot {
    pub const ALL: [Self; 2] = [Self::Weapon, Self::Armour];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weapon => "Weapon",
            Self::Armour => "Armour",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GearTier {
    Early,
    Mid,
    Late,
}

impl GearTier {
    pub const ALL: [Self; 3] = [Self::Early, Self::Mid, Self::Late];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Early => "Early",
            Self::Mid => "Mid",
            Self::Late => "Late",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub name: String,
    pub slot: GearSlot,
    pub tier: GearTier,
    /// Region the item is obtained in.
    pub region: String,
    #[serde(default)]
    pub melee: bool,
    #[serde(default)]
    pub ranged: bool,
    #[serde(default)]
    pub magic: bool,
    /// Weapons with a special attack.
    #[serde(default)]
    pub spec: bool,
    #[serde(default)]
    pub tick_speed: Option<u8>,
}

impl Gear {
    #[must_use]
    pub const fn supports(&self, style: CombatStyle) -> bool {
        match style {
            CombatStyle::Melee => self.melee,
            CombatStyle::Ranged => self.ranged,
            CombatStyle::Magic => self.magic,
        }
    }

    #[must_use]
    pub fn fits(&self, slot: GearSlot, tier: GearTier, style: CombatStyle) -> bool {
        self.supports(style) && self.slot == slot && self.tier == tier
    }
}

/// Raw catalog document as authored in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogData {
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub relics: Vec<Relic>,
    #[serde(default)]
    pub masteries: Vec<CombatMastery>,
    #[serde(default)]
    pub skills: Vec<NotedActivity>,
    #[serde(default)]
    pub bosses: Vec<Activity>,
    #[serde(default)]
    pub minigames: Vec<Activity>,
    #[serde(default)]
    pub runes: Vec<Activity>,
    #[serde(default)]
    pub prayers: Vec<Activity>,
    #[serde(default)]
    pub spellbooks: Vec<Activity>,
    #[serde(default)]
    pub slayer_masters: Vec<Activity>,
    #[serde(default)]
    pub teleports: Vec<Teleport>,
    #[serde(default)]
    pub gear: Vec<Gear>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate region code `{0}`")]
    DuplicateRegionCode(String),
    #[error("duplicate relic code `{0}`")]
    DuplicateRelicCode(String),
    #[error("relic `{0}` has tier order 0")]
    ZeroRelicOrder(String),
    #[error("mastery `{0}` has level 0")]
    ZeroMasteryLevel(String),
}

/// Immutable catalog with lookup tables built once at load time.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    data: CatalogData,
    region_codes: HashMap<String, usize>,
    region_names: HashMap<String, usize>,
    relic_codes: HashMap<String, usize>,
    relic_names: HashMap<String, usize>,
    masteries: HashMap<(CombatStyle, u8), usize>,
}

impl Catalog {
    /// Validate a raw document and index it.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate region or relic codes, relics with tier
    /// order 0 and masteries with level 0.
    pub fn from_data(data: CatalogData) -> Result<Self, CatalogError> {
        let mut region_codes = HashMap::new();
        let mut region_names = HashMap::new();
        for (idx, region) in data.regions.iter().enumerate() {
            if let Some(code) = &region.code
                && region_codes.insert(code.clone(), idx).is_some()
            {
                return Err(CatalogError::DuplicateRegionCode(code.clone()));
            }
            region_names.entry(clean_name(&region.name)).or_insert(idx);
        }

        let mut relic_codes = HashMap::new();
        let mut relic_names = HashMap::new();
        for (idx, relic) in data.relics.iter().enumerate() {
            if relic.order == 0 {
                return Err(CatalogError::ZeroRelicOrder(relic.name.clone()));
            }
            if relic_codes.insert(relic.code.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateRelicCode(relic.code.clone()));
            }
            relic_names.entry(clean_name(&relic.name)).or_insert(idx);
        }

        let mut masteries = HashMap::new();
        for (idx, mastery) in data.masteries.iter().enumerate() {
            if mastery.level == 0 {
                return Err(CatalogError::ZeroMasteryLevel(mastery.name.clone()));
            }
            masteries.entry((mastery.style, mastery.level)).or_insert(idx);
        }

        Ok(Self {
            data,
            region_codes,
            region_names,
            relic_codes,
            relic_names,
            masteries,
        })
    }

    /// Parse and index a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Catalog compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded document fails to parse or validate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn data(&self) -> &CatalogData {
        &self.data
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.data.regions
    }

    #[must_use]
    pub fn relics(&self) -> &[Relic] {
        &self.data.relics
    }

    #[must_use]
    pub fn masteries(&self) -> &[CombatMastery] {
        &self.data.masteries
    }

    #[must_use]
    pub fn skills(&self) -> &[NotedActivity] {
        &self.data.skills
    }

    #[must_use]
    pub fn bosses(&self) -> &[Activity] {
        &self.data.bosses
    }

    #[must_use]
    pub fn minigames(&self) -> &[Activity] {
        &self.data.minigames
    }

    #[must_use]
    pub fn runes(&self) -> &[Activity] {
        &self.data.runes
    }

    #[must_use]
    pub fn prayers(&self) -> &[Activity] {
        &self.data.prayers
    }

    #[must_use]
    pub fn spellbooks(&self) -> &[Activity] {
        &self.data.spellbooks
    }

    #[must_use]
    pub fn slayer_masters(&self) -> &[Activity] {
        &self.data.slayer_masters
    }

    #[must_use]
    pub fn teleports(&self) -> &[Teleport] {
        &self.data.teleports
    }

    #[must_use]
    pub fn gear(&self) -> &[Gear] {
        &self.data.gear
    }

    #[must_use]
    pub fn region_by_code(&self, code: &str) -> Option<&Region> {
        self.region_codes
            .get(code)
            .and_then(|&idx| self.data.regions.get(idx))
    }

    #[must_use]
    pub fn region_by_name(&self, name: &str) -> Option<&Region> {
        self.region_names
            .get(&clean_name(name))
            .and_then(|&idx| self.data.regions.get(idx))
    }

    #[must_use]
    pub fn relic_by_code(&self, code: &str) -> Option<&Relic> {
        self.relic_codes
            .get(code)
            .and_then(|&idx| self.data.relics.get(idx))
    }

    #[must_use]
    pub fn relic_by_name(&self, name: &str) -> Option<&Relic> {
        self.relic_names
            .get(&clean_name(name))
            .and_then(|&idx| self.data.relics.get(idx))
    }

    #[must_use]
    pub fn mastery(&self, style: CombatStyle, level: u8) -> Option<&CombatMastery> {
        self.masteries
            .get(&(style, level))
            .and_then(|&idx| self.data.masteries.get(idx))
    }

    /// Mastery ranks for one style, in catalog order.
    pub fn masteries_for(&self, style: CombatStyle) -> impl Iterator<Item = &CombatMastery> {
        self.data.masteries.iter().filter(move |m| m.style == style)
    }

    /// Highest rank defined for a style, 0 when the style has no ranks.
    #[must_use]
    pub fn max_mastery_level(&self, style: CombatStyle) -> u8 {
        self.masteries_for(style)
            .map(|m| m.level)
            .max()
            .unwrap_or(0)
    }

    pub fn default_regions(&self) -> impl Iterator<Item = &Region> {
        self.data.regions.iter().filter(|r| r.is_default)
    }

    pub fn selectable_regions(&self) -> impl Iterator<Item = &Region> {
        self.data.regions.iter().filter(|r| r.is_selectable())
    }

    /// Distinct relic tier orders, ascending.
    #[must_use]
    pub fn relic_tiers(&self) -> Vec<u8> {
        let mut tiers: Vec<u8> = self.data.relics.iter().map(|r| r.order).collect();
        tiers.sort_unstable();
        tiers.dedup();
        tiers
    }

    pub fn relics_in_tier(&self, order: u8) -> impl Iterator<Item = &Relic> {
        self.data.relics.iter().filter(move |r| r.order == order)
    }
}
