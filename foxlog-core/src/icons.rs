//! Human-readable categories for map icon codes.
//!
//! The war service identifies every map icon by a bare integer. The table
//! below covers the codes published for the world-conquest map; anything
//! else resolves to [`IconCategory::Unknown`] so new upstream codes never
//! break logging.

use std::fmt;

/// Known icon codes, sorted by code for binary search.
static ICON_TABLE: &[(u32, &str)] = &[
    (5, "Static Base 1"),
    (6, "Static Base 2"),
    (7, "Static Base 3"),
    (8, "Forward Base 1"),
    (9, "Forward Base 2"),
    (10, "Forward Base 3"),
    (11, "Hospital"),
    (12, "Vehicle Factory"),
    (13, "Armory"),
    (14, "Supply Station"),
    (15, "Workshop"),
    (16, "Manufacturing Plant"),
    (17, "Refinery"),
    (18, "Shipyard"),
    (19, "Tech Center"),
    (20, "Salvage Field"),
    (21, "Component Field"),
    (22, "Fuel Field"),
    (23, "Sulfur Field"),
    (24, "World Map Tent"),
    (25, "Travel Tent"),
    (26, "Training Area"),
    (27, "Special Base"),
    (28, "Observation Tower"),
    (29, "Fort"),
    (30, "Troop Ship"),
    (32, "Sulfur Mine"),
    (33, "Storage Facility"),
    (34, "Factory"),
    (35, "Garrison Station"),
    (36, "Ammo Factory"),
    (37, "Rocket Site"),
    (38, "Salvage Mine"),
    (39, "Construction Yard"),
    (40, "Component Mine"),
    (41, "Oil Well"),
    (45, "Relic Base"),
    (46, "Relic Base 2"),
    (47, "Relic Base 3"),
    (51, "Mass Production Factory"),
    (52, "Seaport"),
    (53, "Coastal Gun"),
    (54, "Soul Factory"),
    (56, "Town Base 1"),
    (57, "Town Base 2"),
    (58, "Town Base 3"),
    (59, "Storm Cannon"),
    (60, "Intel Center"),
    (61, "Coal Field"),
    (62, "Oil Field"),
    (70, "Rocket Target"),
    (71, "Rocket Ground Zero"),
    (72, "Rocket Site With Rocket"),
    (75, "Facility Mine Oil Rig"),
    (83, "Weather Station"),
    (84, "Mortar House"),
];

/// Category of a map icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconCategory {
    /// A code present in the static table.
    Known(&'static str),
    /// A code the table does not cover.
    Unknown,
}

impl IconCategory {
    /// Look up the category for `icon_type`.
    #[must_use]
    pub fn of(icon_type: u32) -> Self {
        ICON_TABLE
            .binary_search_by_key(&icon_type, |&(code, _)| code)
            .map_or(Self::Unknown, |idx| Self::Known(ICON_TABLE[idx].1))
    }

    /// Display name; `"Unknown"` for unmapped codes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Known(name) => name,
            Self::Unknown => "Unknown",
        }
    }

    /// Whether the code was found in the table.
    #[must_use]
    pub fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl fmt::Display for IconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shorthand for `IconCategory::of(icon_type).as_str()`.
#[must_use]
pub fn category_of(icon_type: u32) -> &'static str {
    IconCategory::of(icon_type).as_str()
}
