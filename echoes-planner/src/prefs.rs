//! Display preferences persisted alongside the planner.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A togglable block of the planner view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Regions,
    Masteries,
    Relics,
    Skills,
    Prayers,
    Spellbooks,
    Runes,
    Bosses,
    SlayerMasters,
    Minigames,
    Teleports,
    Gear,
}

impl Section {
    pub const ALL: [Self; 12] = [
        Self::Regions,
        Self::Masteries,
        Self::Relics,
        Self::Skills,
        Self::Prayers,
        Self::Spellbooks,
        Self::Runes,
        Self::Bosses,
        Self::SlayerMasters,
        Self::Minigames,
        Self::Teleports,
        Self::Gear,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Regions => "regions",
            Self::Masteries => "masteries",
            Self::Relics => "relics",
            Self::Skills => "skills",
            Self::Prayers => "prayers",
            Self::Spellbooks => "spellbooks",
            Self::Runes => "runes",
            Self::Bosses => "bosses",
            Self::SlayerMasters => "slayer_masters",
            Self::Minigames => "minigames",
            Self::Teleports => "teleports",
            Self::Gear => "gear",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Regions => "Regions",
            Self::Masteries => "Combat Masteries",
            Self::Relics => "Relics",
            Self::Skills => "Skills",
            Self::Prayers => "Prayers",
            Self::Spellbooks => "Spellbooks",
            Self::Runes => "Runes",
            Self::Bosses => "Bosses",
            Self::SlayerMasters => "Slayer Masters",
            Self::Minigames => "Minigames",
            Self::Teleports => "Teleports",
            Self::Gear => "Gear",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown section `{0}`")]
pub struct UnknownSectionError(pub String);

impl FromStr for Section {
    type Err = UnknownSectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|section| section.key() == key)
            .ok_or_else(|| UnknownSectionError(s.to_string()))
    }
}

const fn visible() -> bool {
    true
}

/// Per-section visibility. Missing keys in a stored document read as visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "visible")]
    pub regions: bool,
    #[serde(default = "visible")]
    pub masteries: bool,
    #[serde(default = "visible")]
    pub relics: bool,
    #[serde(default = "visible")]
    pub skills: bool,
    #[serde(default = "visible")]
    pub prayers: bool,
    #[serde(default = "visible")]
    pub spellbooks: bool,
    #[serde(default = "visible")]
    pub runes: bool,
    #[serde(default = "visible")]
    pub bosses: bool,
    #[serde(default = "visible")]
    pub slayer_masters: bool,
    #[serde(default = "visible")]
    pub minigames: bool,
    #[serde(default = "visible")]
    pub teleports: bool,
    #[serde(default = "visible")]
    pub gear: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            regions: true,
            masteries: true,
            relics: true,
            skills: true,
            prayers: true,
            spellbooks: true,
            runes: true,
            bosses: true,
            slayer_masters: true,
            minigames: true,
            teleports: true,
            gear: true,
        }
    }
}

impl DisplaySettings {
    fn slot(&mut self, section: Section) -> &mut bool {
        match section {
            Section::Regions => &mut self.regions,
            Section::Masteries => &mut self.masteries,
            Section::Relics => &mut self.relics,
            Section::Skills => &mut self.skills,
            Section::Prayers => &mut self.prayers,
            Section::Spellbooks => &mut self.spellbooks,
            Section::Runes => &mut self.runes,
            Section::Bosses => &mut self.bosses,
            Section::SlayerMasters => &mut self.slayer_masters,
            Section::Minigames => &mut self.minigames,
            Section::Teleports => &mut self.teleports,
            Section::Gear => &mut self.gear,
        }
    }

    #[must_use]
    pub const fn is_visible(&self, section: Section) -> bool {
        match section {
            Section::Regions => self.regions,
            Section::Masteries => self.masteries,
            Section::Relics => self.relics,
            Section::Skills => self.skills,
            Section::Prayers => self.prayers,
            Section::Spellbooks => self.spellbooks,
            Section::Runes => self.runes,
            Section::Bosses => self.bosses,
            Section::SlayerMasters => self.slayer_masters,
            Section::Minigames => self.minigames,
            Section::Teleports => self.teleports,
            Section::Gear => self.gear,
        }
    }

    pub fn set(&mut self, section: Section, visible: bool) {
        *self.slot(section) = visible;
    }

    pub fn hidden(&self) -> impl Iterator<Item = Section> + '_ {
        Section::ALL
            .into_iter()
            .filter(|section| !self.is_visible(*section))
    }
}

/// Everything the planner persists between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Preferences {
    pub display: DisplaySettings,
    /// When set the selection is treated as read-only.
    pub locked: bool,
}
