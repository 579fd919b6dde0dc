//! The four player-allocatable attributes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::model::Status;

/// An attribute the player may spend points on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Physical power.
    Strength,
    /// Agility and precision.
    Dexterity,
    /// Magical insight.
    Wisdom,
    /// Awareness of surroundings.
    Perception,
}

impl Attribute {
    /// All allocatable attributes in display order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Wisdom,
        Attribute::Perception,
    ];

    /// Read this attribute from a status record.
    pub fn get(self, status: &Status) -> i32 {
        match self {
            Attribute::Strength => status.strength,
            Attribute::Dexterity => status.dexterity,
            Attribute::Wisdom => status.wisdom,
            Attribute::Perception => status.perception,
        }
    }

    /// Mutable access to this attribute in a status record.
    pub fn get_mut(self, status: &mut Status) -> &mut i32 {
        match self {
            Attribute::Strength => &mut status.strength,
            Attribute::Dexterity => &mut status.dexterity,
            Attribute::Wisdom => &mut status.wisdom,
            Attribute::Perception => &mut status.perception,
        }
    }

    /// Lowercase identifier, as used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Attribute::Strength => "strength",
            Attribute::Dexterity => "dexterity",
            Attribute::Wisdom => "wisdom",
            Attribute::Perception => "perception",
        }
    }

    /// Capitalized label for display.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Strength => "Strength",
            Attribute::Dexterity => "Dexterity",
            Attribute::Wisdom => "Wisdom",
            Attribute::Perception => "Perception",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = CoreError;

    /// Accepts full names and three-letter abbreviations, ignoring case.
    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "strength" | "str" => Ok(Attribute::Strength),
            "dexterity" | "dex" => Ok(Attribute::Dexterity),
            "wisdom" | "wis" => Ok(Attribute::Wisdom),
            "perception" | "per" => Ok(Attribute::Perception),
            _ => Err(CoreError::UnknownAttribute(s.trim().to_string())),
        }
    }
}
