//! Core type definitions for the war-map domain.
//!
//! Everything here mirrors the shapes returned by the war service, plus the
//! derived [`EntityIdentity`] used to recognise the same map icon across polls.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Decimal places kept when rounding icon coordinates into an identity.
pub const IDENTITY_PRECISION: i32 = 5;

const IDENTITY_SCALE: f64 = 100_000.0;

// ---------------------------------------------------------------------------
// War
// ---------------------------------------------------------------------------

/// Opaque war identifier as reported upstream (a UUID-like string today).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WarId(pub String);

impl fmt::Display for WarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current war metadata, fetched fresh every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarInfo {
    /// Upstream war identifier.
    pub war_id: WarId,
    /// Monotonically increasing war counter.
    pub war_number: u32,
    /// Start of the conquest phase, epoch milliseconds.
    pub conquest_start_time: i64,
    /// Set once the war has entered resistance, epoch milliseconds.
    pub resistance_start_time: Option<i64>,
    /// Set once the conquest phase has ended, epoch milliseconds.
    pub conquest_end_time: Option<i64>,
}

impl WarInfo {
    /// A war is in resistance once both the resistance start and the
    /// conquest end have been published.
    #[must_use]
    pub fn is_resistance_phase(&self) -> bool {
        self.resistance_start_time.is_some() && self.conquest_end_time.is_some()
    }
}

// ---------------------------------------------------------------------------
// Factions
// ---------------------------------------------------------------------------

/// Controlling side of a map item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Team {
    /// Unclaimed (`"NONE"` upstream).
    #[default]
    None,
    /// `"WARDENS"`.
    Wardens,
    /// `"COLONIALS"`.
    Colonials,
    /// Any value the service introduces that we do not know yet.
    Other(String),
}

impl Team {
    /// The upstream string for this team.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "NONE",
            Self::Wardens => "WARDENS",
            Self::Colonials => "COLONIALS",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Team {
    fn from(value: &str) -> Self {
        match value {
            "NONE" => Self::None,
            "WARDENS" => Self::Wardens,
            "COLONIALS" => Self::Colonials,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Team {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Team> for String {
    fn from(team: Team) -> Self {
        team.as_str().to_string()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Map items
// ---------------------------------------------------------------------------

/// A positioned, typed entity from a dynamic map snapshot.
///
/// Coordinates are normalised to the map hex (0.0–1.0 upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapItem {
    /// Numeric icon code, see [`crate::icons`].
    pub icon_type: u32,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Owning faction.
    #[serde(default, deserialize_with = "team_or_none")]
    pub team_id: Team,
}

impl MapItem {
    /// Identity of this item across polls.
    #[must_use]
    pub fn identity(&self) -> EntityIdentity {
        EntityIdentity::of(self)
    }
}

/// Stable key for a map item: icon type plus coordinates rounded to
/// [`IDENTITY_PRECISION`] decimals.
///
/// Coordinates are kept as scaled integers so the key is `Eq + Hash + Ord`.
/// Two distinct entities closer than the rounding step collapse into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityIdentity {
    icon_type: u32,
    x_scaled: i64,
    y_scaled: i64,
}

impl EntityIdentity {
    /// Derive the identity of `item`.
    #[must_use]
    pub fn of(item: &MapItem) -> Self {
        Self::from_parts(item.icon_type, item.x, item.y)
    }

    /// Build an identity from raw parts.
    #[must_use]
    pub fn from_parts(icon_type: u32, x: f64, y: f64) -> Self {
        Self {
            icon_type,
            x_scaled: scale(x),
            y_scaled: scale(y),
        }
    }

    /// Icon type of the entity.
    #[must_use]
    pub fn icon_type(&self) -> u32 {
        self.icon_type
    }

    /// Rounded x coordinate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn x(&self) -> f64 {
        self.x_scaled as f64 / IDENTITY_SCALE
    }

    /// Rounded y coordinate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn y(&self) -> f64 {
        self.y_scaled as f64 / IDENTITY_SCALE
    }
}

impl fmt::Display for EntityIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iconType {} at ({:.5}, {:.5})",
            self.icon_type,
            self.x(),
            self.y()
        )
    }
}

/// `teamId` may be absent or `null`; both mean unclaimed.
fn team_or_none<'de, D>(deserializer: D) -> Result<Team, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .map(Team::from)
        .unwrap_or_default())
}

#[allow(clippy::cast_possible_truncation)]
fn scale(value: f64) -> i64 {
    // Half-way cases round away from zero.
    (value * IDENTITY_SCALE).round() as i64
}
