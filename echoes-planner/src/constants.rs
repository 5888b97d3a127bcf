//! Planner rule constants.
//!
//! These values are baked into every shared `/b/...` link, so changing any of
//! them breaks previously shared URLs.

/// Number of priority slots available to non-default regions.
pub const REGION_SLOTS: u8 = 3;

/// Total combat mastery levels that may be spread across the three styles.
pub const MASTERY_BUDGET: u8 = 10;

/// Relic code of the perk that allows one lower tier to hold two relics.
pub const RELOADED_CODE: &str = "R";

/// First relic tier order that behaves as an independent single slot.
pub const SINGLE_SLOT_TIER: u8 = 4;

/// Path prefix under which planner selections are encoded.
pub const ROUTE_PREFIX: &str = "/b/";

/// Placeholder segment for an unoccupied region slot.
pub const EMPTY_SLOT: &str = "_";
