//! Shared types for the cafe console client.
//!
//! Holds the role tags stored in `USERS.type`, the validated menu price,
//! and the parameter structs that the account and menu crates bind into
//! their statements. Nothing here touches the database.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role tag stored in the `type` column of `USERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserType {
    /// A regular customer. New accounts get this tag unless configured otherwise.
    #[default]
    Customer,
    /// A manager, allowed to add, delete and update menu items.
    Manager,
}

impl UserType {
    /// Returns the label persisted in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Manager => "Manager",
        }
    }

    /// Whether this role may mutate the menu.
    pub fn can_manage_menu(self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = ParseUserTypeError;

    /// Parses a stored role tag. Matching ignores case and surrounding
    /// whitespace, since rows are often provisioned by hand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "manager" => Ok(Self::Manager),
            _ => Err(ParseUserTypeError(s.to_string())),
        }
    }
}

/// Error returned when a role tag is neither `Customer` nor `Manager`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown user type: {0}")]
pub struct ParseUserTypeError(pub String);

/// A menu price in currency units.
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Wraps a raw amount, rejecting negative and non-finite values.
    pub fn new(amount: f64) -> Result<Self, ParsePriceError> {
        if !amount.is_finite() {
            return Err(ParsePriceError::NotFinite);
        }
        if amount < 0.0 {
            return Err(ParsePriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = ParsePriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let amount: f64 = trimmed
            .parse()
            .map_err(|_| ParsePriceError::Invalid(trimmed.to_string()))?;
        Self::new(amount)
    }
}

/// Errors produced when reading a price from user input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsePriceError {
    #[error("invalid price: {0:?}")]
    Invalid(String),
    #[error("price cannot be negative: {0}")]
    Negative(f64),
    #[error("price must be a finite number")]
    NotFinite,
}

/// Parameters for creating a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login: String,
    pub password: String,
    pub phone_num: String,
    pub user_type: UserType,
}

/// Parameters for adding a menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub item_name: String,
    pub item_type: String,
    pub price: Price,
    pub description: String,
    pub image_url: String,
}

/// A single-column change to the menu items matching a name.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUpdate {
    Name(String),
    Type(String),
    Price(Price),
    Description(String),
    ImageUrl(String),
}

impl ItemUpdate {
    /// The `Menu` column this update writes.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name(_) => "itemName",
            Self::Type(_) => "type",
            Self::Price(_) => "price",
            Self::Description(_) => "description",
            Self::ImageUrl(_) => "imageURL",
        }
    }
}
