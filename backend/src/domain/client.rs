//! Client record model.
//!
//! A [`Client`] is always held in plaintext inside the domain; encryption is
//! the persistence adapter's concern. Construction validates every field so
//! services never see a half-valid record.

use std::fmt;
use std::str::FromStr;

use oib::Oib;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum length, in characters, of a first or last name.
pub const NAME_MIN: usize = 2;
/// Maximum length, in characters, of a first or last name.
pub const NAME_MAX: usize = 50;

/// Lifecycle state of a client's card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    /// Application accepted, card not yet produced.
    Accepted,
    /// Application awaiting a decision.
    Pending,
    /// Application refused.
    Rejected,
    /// Card issued and usable.
    Active,
    /// Card past its validity period.
    Expired,
}

impl CardStatus {
    /// Stable upper-case name used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "ACCEPTED",
            Self::Pending => "PENDING",
            Self::Rejected => "REJECTED",
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not a known [`CardStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown card status: {0}")]
pub struct UnknownCardStatus(pub String);

impl FromStr for CardStatus {
    type Err = UnknownCardStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCEPTED" => Ok(Self::Accepted),
            "PENDING" => Ok(Self::Pending),
            "REJECTED" => Ok(Self::Rejected),
            "ACTIVE" => Ok(Self::Active),
            "EXPIRED" => Ok(Self::Expired),
            other => Err(UnknownCardStatus(other.to_owned())),
        }
    }
}

/// Surrogate key assigned by the store on first save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(i64);

impl ClientId {
    /// Wrap a store-assigned key.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw key value.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for [`PersonName`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameValidationError {
    /// Fewer than [`NAME_MIN`] characters after trimming.
    #[error("name must be at least {min} characters, found {actual}")]
    TooShort { min: usize, actual: usize },
    /// More than [`NAME_MAX`] characters after trimming.
    #[error("name must be at most {max} characters, found {actual}")]
    TooLong { max: usize, actual: usize },
}

/// A first or last name trimmed and bounded to `NAME_MIN..=NAME_MAX`
/// characters.
///
/// # Examples
/// ```
/// use client_card::domain::PersonName;
///
/// let name = PersonName::new("  Ana ").expect("valid name");
/// assert_eq!(name.as_ref(), "Ana");
/// assert!(PersonName::new("A").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NameValidationError> {
        let trimmed = raw.as_ref().trim();
        let actual = trimmed.chars().count();
        if actual < NAME_MIN {
            return Err(NameValidationError::TooShort {
                min: NAME_MIN,
                actual,
            });
        }
        if actual > NAME_MAX {
            return Err(NameValidationError::TooLong {
                max: NAME_MAX,
                actual,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PersonName {
    type Error = NameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

/// A registered client.
///
/// `id` is `None` until the store has assigned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    id: Option<ClientId>,
    first_name: PersonName,
    last_name: PersonName,
    oib: Oib,
    status: CardStatus,
}

impl Client {
    /// Build an unsaved client from validated parts.
    pub fn new(first_name: PersonName, last_name: PersonName, oib: Oib, status: CardStatus) -> Self {
        Self {
            id: None,
            first_name,
            last_name,
            oib,
            status,
        }
    }

    /// Return the same client tagged with a store-assigned key.
    #[must_use]
    pub fn with_id(mut self, id: ClientId) -> Self {
        self.id = Some(id);
        self
    }

    /// Store-assigned key, if saved.
    pub fn id(&self) -> Option<ClientId> {
        self.id
    }

    /// Client first name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Client last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// National identifier.
    pub fn oib(&self) -> &Oib {
        &self.oib
    }

    /// Current card status.
    pub fn status(&self) -> CardStatus {
        self.status
    }
}
