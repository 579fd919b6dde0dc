use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validate::{check_email, check_present, validate_password};

/// Server-assigned identifier of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub u64);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CharacterId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Server-assigned identifier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A character's status record as held by the server.
///
/// Only strength, dexterity, wisdom, and perception can be changed by the
/// player; everything else is derived server-side and read-only here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Record identifier.
    #[serde(default)]
    pub id: u64,
    /// Current health.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Health regenerated per tick.
    #[serde(default)]
    pub health_regen: i32,
    /// Current mana.
    pub mana: i32,
    /// Maximum mana.
    pub max_mana: i32,
    /// Mana regenerated per tick.
    #[serde(default)]
    pub mana_regen: i32,
    /// Strength (allocatable).
    pub strength: i32,
    /// Dexterity (allocatable).
    pub dexterity: i32,
    /// Wisdom (allocatable).
    pub wisdom: i32,
    /// Perception (allocatable).
    pub perception: i32,
    /// Minimum damage.
    #[serde(default)]
    pub damage: i32,
    /// Maximum damage.
    #[serde(default)]
    pub max_damage: i32,
    /// Attacks per second.
    #[serde(default)]
    pub attack_speed: f64,
    /// Defence against melee attacks.
    #[serde(default)]
    pub melee_defence: i32,
    /// Defence against magic.
    #[serde(default)]
    pub magic_defence: i32,
    /// Chance to evade.
    #[serde(default)]
    pub evasion: f64,
    /// Critical hit multiplier.
    #[serde(default)]
    pub critical_damage: f64,
}

impl Status {
    /// The allocatable part of this record, as sent on commit.
    pub fn allocatable(&self) -> StatusUpdate {
        StatusUpdate {
            strength: self.strength,
            dexterity: self.dexterity,
            wisdom: self.wisdom,
            perception: self.perception,
        }
    }
}

/// Payload of the status-commit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// New strength.
    pub strength: i32,
    /// New dexterity.
    pub dexterity: i32,
    /// New wisdom.
    pub wisdom: i32,
    /// New perception.
    pub perception: i32,
}

/// A player character with its progression and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Character identifier.
    pub id: CharacterId,
    /// Display name.
    pub name: String,
    /// Portrait, as a URL or base64 data.
    #[serde(rename = "imagem", default)]
    pub image: String,
    /// Current level.
    pub level: u32,
    /// Experience accumulated in the current level.
    #[serde(default)]
    pub experience: u32,
    /// Experience needed for the next level.
    #[serde(default)]
    pub experience_next_level: u32,
    /// Points not yet assigned to any attribute.
    #[serde(default)]
    pub available_attribute_points: u32,
    /// Points assigned over the character's lifetime.
    #[serde(default)]
    pub total_attribute_points: u32,
    /// Currency held.
    #[serde(default)]
    pub coins: u64,
    /// Creation time.
    #[serde(default)]
    pub create_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub update_at: Option<DateTime<Utc>>,
    /// Status record.
    pub status: Status,
}

/// Payload for creating a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCharacter {
    /// Display name.
    pub name: String,
    /// Portrait URL or base64 data; may be empty.
    #[serde(rename = "imagem")]
    pub image: String,
    /// Starting level.
    pub level: u32,
    /// Starting experience.
    pub experience: u32,
    /// Experience needed for level 2.
    pub experience_next_level: u32,
    /// Points to spend right after creation.
    pub available_attribute_points: u32,
    /// Points already spent.
    pub total_attribute_points: u32,
    /// Starting currency.
    pub coins: u64,
    /// Owner account.
    pub user_id: UserId,
}

impl NewCharacter {
    /// A level 1 character with the standard starting progression.
    pub fn new(name: impl Into<String>, user_id: UserId) -> Self {
        Self {
            name: name.into(),
            image: String::new(),
            level: 1,
            experience: 0,
            experience_next_level: 100,
            available_attribute_points: 3,
            total_attribute_points: 0,
            coins: 100,
            user_id,
        }
    }

    /// Set the portrait.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Reject a blank name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_present("name", &self.name)
    }
}

/// A user account as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Account role.
    #[serde(rename = "type", default)]
    pub role: String,
    /// Creation time.
    #[serde(default)]
    pub create_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub update_at: Option<DateTime<Utc>>,
    /// Characters owned by the account, in whatever shape the server sends.
    #[serde(default)]
    pub characters: Vec<serde_json::Value>,
}

/// Sign-up form. The confirmation is checked locally and never sent.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// Full name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Password typed a second time.
    #[serde(skip)]
    pub confirm_password: String,
}

impl Registration {
    /// Check the form before it is submitted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_present("name", &self.name)?;
        check_present("email", &self.email)?;
        check_present("password", &self.password)?;
        check_present("confirm password", &self.confirm_password)?;

        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if !validate_password(&self.password) {
            return Err(ValidationError::WeakPassword);
        }
        check_email(&self.email)
    }
}

/// Login form.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Both fields must be filled in.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_present("email", &self.email)?;
        check_present("password", &self.password)
    }
}
