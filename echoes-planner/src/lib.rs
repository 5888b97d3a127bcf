//! Raging Echoes Planner Core
//!
//! Platform-agnostic league planning logic: region, mastery and relic
//! selection rules, the shareable `/b/...` route codec, and the eligibility
//! scoring that decides which content a selection unlocks.
//! This crate has no UI or platform-specific dependencies.

pub mod availability;
pub mod catalog;
pub mod constants;
pub mod names;
pub mod prefs;
pub mod relics;
pub mod route;
pub mod scoring;
pub mod selection;
pub mod session;

// Re-export commonly used types
pub use availability::{
    GearCell, GearEntry, PlannerReport, ScoredItem, SkillReport, TeleportGroup, TeleportStop,
};
pub use catalog::{
    Activity, Catalog, CatalogData, CatalogError, CombatMastery, CombatStyle, Gear, GearSlot,
    GearTier, NotedActivity, NotedCell, Region, Relic, Teleport, UnknownStyleError,
};
pub use names::{clean_name, names_match};
pub use prefs::{DisplaySettings, Preferences, Section, UnknownSectionError};
pub use relics::{doubled_tier, respects_tier_rules, toggle_relic};
pub use route::{decode, encode, path_from_slug, route_equals, slug_from_path};
pub use scoring::{MethodNote, Points, SkillRating, is_available, matching_notes, score};
pub use selection::{
    SelectedMastery, SelectedRegion, SelectedRelic, Selection, toggle_mastery, toggle_region,
};
pub use session::{Interaction, PlannerSession};

/// Trait for abstracting where the content catalog comes from
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and index the content catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or fails validation.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Trait for abstracting preference persistence
/// Platform-specific implementations should provide this
pub trait PreferenceStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load stored preferences, `None` when nothing was saved yet
    ///
    /// # Errors
    ///
    /// Returns an error if the stored document cannot be read or parsed.
    fn load_preferences(&self) -> Result<Option<Preferences>, Self::Error>;

    /// Save preferences
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be written.
    fn save_preferences(&self, preferences: &Preferences) -> Result<(), Self::Error>;

    /// Remove stored preferences
    ///
    /// # Errors
    ///
    /// Returns an error if the stored document cannot be removed.
    fn clear_preferences(&self) -> Result<(), Self::Error>;
}

/// Loader backed by the catalog compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl CatalogLoader for BundledCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Catalog::bundled()
    }
}

/// Main planner engine tying a catalog source to preference storage
pub struct PlannerEngine<L, S>
where
    L: CatalogLoader,
    S: PreferenceStore,
{
    loader: L,
    store: S,
}

impl<L, S> PlannerEngine<L, S>
where
    L: CatalogLoader,
    S: PreferenceStore,
{
    /// Create a new planner engine with the provided catalog loader and store
    pub const fn new(loader: L, store: S) -> Self {
        Self { loader, store }
    }

    /// Load the catalog and rehydrate a session from a URL path
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn open_session(&self, path: &str) -> Result<PlannerSession, L::Error> {
        let catalog = self.loader.load_catalog()?;
        Ok(PlannerSession::from_path(catalog, path))
    }

    /// Stored preferences, or the defaults when nothing was saved
    ///
    /// # Errors
    ///
    /// Returns an error if the stored preferences cannot be read.
    pub fn preferences(&self) -> Result<Preferences, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let stored = self.store.load_preferences().map_err(Into::into)?;
        Ok(stored.unwrap_or_default())
    }

    /// Save preferences
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences cannot be written.
    pub fn save_preferences(&self, preferences: &Preferences) -> Result<(), S::Error> {
        self.store.save_preferences(preferences)
    }

    /// Forget stored preferences and return the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the stored preferences cannot be removed.
    pub fn reset_preferences(&self) -> Result<Preferences, S::Error> {
        self.store.clear_preferences()?;
        Ok(Preferences::default())
    }
}
