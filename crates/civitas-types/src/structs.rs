//! Record structs stored by the registries.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{CivilizationId, TechnologyId};
use crate::principal::Principal;

// ---------------------------------------------------------------------------
// Civilization defaults
// ---------------------------------------------------------------------------

/// Technology level every new civilization starts at.
pub const INITIAL_TECHNOLOGY_LEVEL: u32 = 1;

/// Population every new civilization starts with.
pub const INITIAL_POPULATION: u64 = 1_000_000;

/// Resource stock every new civilization starts with.
pub const INITIAL_RESOURCES: u64 = 1_000;

/// Level every newly discovered technology starts at.
pub const INITIAL_DISCOVERY_LEVEL: u32 = 1;

/// Well-known civilization status tags.
///
/// Status is free text; these are only the values the system itself
/// produces or that callers commonly use. None of them is special-cased.
pub mod status {
    /// Status assigned at creation.
    pub const ACTIVE: &str = "active";
    /// A civilization in decline.
    pub const DECLINING: &str = "declining";
    /// A civilization that no longer exists. Still mutable like any other.
    pub const EXTINCT: &str = "extinct";
}

// ---------------------------------------------------------------------------
// Civilization
// ---------------------------------------------------------------------------

/// A civilization record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Civilization {
    /// Sequential registry id.
    pub id: CivilizationId,
    /// Principal that created the record. Never changes.
    pub creator: Principal,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Ordered numeric parameter vector. Only the creator may replace it.
    pub parameters: Vec<i64>,
    /// Technology level.
    pub technology_level: u32,
    /// Population count.
    pub population: u64,
    /// Resource stock.
    pub resources: u64,
    /// Free-text status tag.
    pub status: String,
}

impl Civilization {
    /// Build a freshly created civilization with the static defaults.
    pub fn founded(
        id: CivilizationId,
        creator: Principal,
        name: String,
        description: String,
        parameters: Vec<i64>,
    ) -> Self {
        Self {
            id,
            creator,
            name,
            description,
            parameters,
            technology_level: INITIAL_TECHNOLOGY_LEVEL,
            population: INITIAL_POPULATION,
            resources: INITIAL_RESOURCES,
            status: String::from(status::ACTIVE),
        }
    }
}

// ---------------------------------------------------------------------------
// Technology
// ---------------------------------------------------------------------------

/// A technology record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Technology {
    /// Sequential registry id, independent of civilization ids.
    pub id: TechnologyId,
    /// The civilization this technology is attributed to. Not validated
    /// against the civilization registry unless the caller opts in.
    pub civilization_id: CivilizationId,
    /// Principal that reported the discovery.
    pub creator: Principal,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Advancement level, starts at 1 and only ever increases by one.
    pub level: u32,
    /// Ordering marker taken from the discovery clock at creation.
    pub discovery_block: u64,
}

impl Technology {
    /// Build a freshly discovered technology at the initial level.
    pub fn discovered(
        id: TechnologyId,
        civilization_id: CivilizationId,
        creator: Principal,
        name: String,
        description: String,
        discovery_block: u64,
    ) -> Self {
        Self {
            id,
            civilization_id,
            creator,
            name,
            description,
            level: INITIAL_DISCOVERY_LEVEL,
            discovery_block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn founded_civilization_uses_static_defaults() {
        let civ = Civilization::founded(
            CivilizationId(1),
            Principal::from("user1"),
            String::from("Zorgons"),
            String::from("An advanced spacefaring civilization"),
            vec![1, 2, 3, 4, 5],
        );
        assert_eq!(civ.technology_level, 1);
        assert_eq!(civ.population, 1_000_000);
        assert_eq!(civ.resources, 1_000);
        assert_eq!(civ.status, "active");
        assert_eq!(civ.parameters, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn discovered_technology_starts_at_level_one() {
        let tech = Technology::discovered(
            TechnologyId(1),
            CivilizationId(4),
            Principal::from("user4"),
            String::from("Nanotechnology"),
            String::from("Manipulation of matter at the atomic scale"),
            17,
        );
        assert_eq!(tech.level, 1);
        assert_eq!(tech.civilization_id, CivilizationId(4));
        assert_eq!(tech.discovery_block, 17);
    }

    #[test]
    fn civilization_serde_uses_snake_case_fields() {
        let civ = Civilization::founded(
            CivilizationId(2),
            Principal::from("user2"),
            String::from("Humans"),
            String::new(),
            vec![2, 4],
        );
        let json = serde_json::to_value(&civ).ok();
        let level = json
            .as_ref()
            .and_then(|v| v.get("technology_level"))
            .and_then(serde_json::Value::as_u64);
        assert_eq!(level, Some(1));
    }
}
