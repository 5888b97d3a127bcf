//! Keeps the current URL path and the selection in step.
//!
//! Interactions flow selection → path; navigation flows path → selection.
//! Both directions compare against the encoded route first so that neither
//! one re-triggers the other.
use log::debug;

use crate::availability::PlannerReport;
use crate::catalog::{Catalog, CombatStyle};
use crate::relics::toggle_relic;
use crate::route::{decode, encode, path_from_slug, route_equals, slug_from_path};
use crate::selection::{Selection, toggle_mastery, toggle_region};

/// A discrete user action against the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    ToggleRegion(String),
    ToggleMastery { style: CombatStyle, level: u8 },
    ToggleRelic(String),
    Reset,
}

#[derive(Debug, Clone)]
pub struct PlannerSession {
    catalog: Catalog,
    selection: Selection,
    path: String,
}

impl PlannerSession {
    /// Rehydrate a session from a URL path.
    #[must_use]
    pub fn from_path(catalog: Catalog, path: &str) -> Self {
        let selection = decode(&catalog, &slug_from_path(path));
        Self {
            catalog,
            selection,
            path: path.to_string(),
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The last path pushed or navigated to.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Canonical path of the current selection.
    #[must_use]
    pub fn canonical_path(&self) -> String {
        path_from_slug(&encode(&self.selection))
    }

    /// Apply an interaction and commit the result.
    ///
    /// Returns the path to push onto history, or `None` when the current path
    /// already describes the new selection.
    pub fn apply(&mut self, interaction: &Interaction) -> Option<String> {
        let next = match interaction {
            Interaction::ToggleRegion(code) => toggle_region(&self.catalog, &self.selection, code),
            Interaction::ToggleMastery { style, level } => {
                toggle_mastery(&self.catalog, &self.selection, *style, *level)
            }
            Interaction::ToggleRelic(code) => toggle_relic(&self.catalog, &self.selection, code),
            Interaction::Reset => Selection::new(&self.catalog),
        };
        self.selection = next;

        if route_equals(&slug_from_path(&self.path), &self.selection) {
            return None;
        }
        self.path = self.canonical_path();
        debug!("pushing {}", self.path);
        Some(self.path.clone())
    }

    /// Follow a navigation event. Returns whether the selection was rebuilt.
    pub fn navigate(&mut self, path: &str) -> bool {
        self.path = path.to_string();
        let slug = slug_from_path(path);
        if route_equals(&slug, &self.selection) {
            return false;
        }
        debug!("rehydrating selection from {path}");
        self.selection = decode(&self.catalog, &slug);
        true
    }

    #[must_use]
    pub fn report(&self) -> PlannerReport {
        PlannerReport::build(&self.catalog, &self.selection)
    }
}
