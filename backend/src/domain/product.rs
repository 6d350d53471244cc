//! Catalog product entities.
//!
//! A [`ProductDraft`] carries raw admin input; [`ProductDetails::new`]
//! validates it and applies the default variant options. [`Product`] adds the
//! store-assigned identity and timestamps.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Money;

/// Option name mapped to the values a buyer may choose from,
/// e.g. `color → [Black, White]`.
pub type Variants = BTreeMap<String, Vec<String>>;

/// Variant options applied when a product is created without any.
///
/// # Examples
/// ```
/// use storefront::domain::default_variants;
///
/// let variants = default_variants();
/// assert_eq!(variants["size"], vec!["S", "M", "L"]);
/// ```
pub fn default_variants() -> Variants {
    BTreeMap::from([
        (
            "color".to_owned(),
            vec!["Black".to_owned(), "White".to_owned()],
        ),
        (
            "size".to_owned(),
            vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
        ),
    ])
}

/// Stable product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(Uuid);

/// Raised when a product identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid product id: {value}")]
pub struct ProductIdParseError {
    value: String,
}

impl ProductId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for ProductId {
    type Err = ProductIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ProductIdParseError {
                value: s.to_owned(),
            })
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors returned by [`ProductDetails::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    EmptyField { field: &'static str },
    NegativeInventory { value: i64 },
    InventoryTooLarge { value: i64 },
    EmptyVariantName,
    EmptyVariantValue { option: String },
}

impl ProductValidationError {
    /// Name of the offending input field for error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } => field,
            Self::NegativeInventory { .. } | Self::InventoryTooLarge { .. } => "inventory",
            Self::EmptyVariantName | Self::EmptyVariantValue { .. } => "variants",
        }
    }
}

impl fmt::Display for ProductValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::NegativeInventory { value } => {
                write!(f, "inventory must be a non-negative number (got {value})")
            }
            Self::InventoryTooLarge { value } => write!(f, "inventory is too large (got {value})"),
            Self::EmptyVariantName => write!(f, "variant option names must not be empty"),
            Self::EmptyVariantValue { option } => {
                write!(f, "variant option {option} must not contain empty values")
            }
        }
    }
}

impl std::error::Error for ProductValidationError {}

/// Raw admin input for creating or replacing a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub price: Money,
    pub inventory: i64,
    pub image: String,
    pub variants: Option<Variants>,
}

/// Validated product attributes shared by create and full-replace updates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    title: String,
    description: String,
    price: Money,
    inventory: u32,
    image: String,
    variants: Variants,
}

impl ProductDetails {
    /// Validate a draft, applying [`default_variants`] when none are given.
    ///
    /// # Examples
    /// ```
    /// use storefront::domain::{Money, ProductDetails, ProductDraft};
    ///
    /// let details = ProductDetails::new(ProductDraft {
    ///     title: "Mouse".into(),
    ///     description: "Wireless".into(),
    ///     price: Money::from_major(20.0).expect("valid price"),
    ///     inventory: 2,
    ///     image: "mouse.png".into(),
    ///     variants: None,
    /// })
    /// .expect("valid draft");
    /// assert_eq!(details.inventory(), 2);
    /// assert!(details.variants().contains_key("color"));
    /// ```
    pub fn new(draft: ProductDraft) -> Result<Self, ProductValidationError> {
        let ProductDraft {
            title,
            description,
            price,
            inventory,
            image,
            variants,
        } = draft;

        let title = require_text(title, "title")?;
        let description = require_text(description, "description")?;
        let image = require_text(image, "image")?;
        if inventory < 0 {
            return Err(ProductValidationError::NegativeInventory { value: inventory });
        }
        let inventory = u32::try_from(inventory)
            .ok()
            .filter(|count| i32::try_from(*count).is_ok())
            .ok_or(ProductValidationError::InventoryTooLarge { value: inventory })?;
        let variants = match variants {
            Some(variants) => validate_variants(variants)?,
            None => default_variants(),
        };

        Ok(Self {
            title,
            description,
            price,
            inventory,
            image,
            variants,
        })
    }

    /// Rehydrate details that were validated before being stored.
    pub(crate) fn from_stored(
        title: String,
        description: String,
        price: Money,
        inventory: u32,
        image: String,
        variants: Variants,
    ) -> Self {
        Self {
            title,
            description,
            price,
            inventory,
            image,
            variants,
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
    pub fn price(&self) -> Money {
        self.price
    }
    pub fn inventory(&self) -> u32 {
        self.inventory
    }
    pub fn image(&self) -> &str {
        self.image.as_str()
    }
    pub fn variants(&self) -> &Variants {
        &self.variants
    }

    pub(crate) fn set_inventory(&mut self, inventory: u32) {
        self.inventory = inventory;
    }
}

fn require_text(value: String, field: &'static str) -> Result<String, ProductValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProductValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

fn validate_variants(variants: Variants) -> Result<Variants, ProductValidationError> {
    let mut cleaned = Variants::new();
    for (name, values) in variants {
        let name = name.trim().to_owned();
        if name.is_empty() {
            return Err(ProductValidationError::EmptyVariantName);
        }
        let mut kept = Vec::with_capacity(values.len());
        for value in values {
            let value = value.trim();
            if value.is_empty() {
                return Err(ProductValidationError::EmptyVariantValue { option: name });
            }
            kept.push(value.to_owned());
        }
        cleaned.insert(name, kept);
    }
    Ok(cleaned)
}

/// Catalog product with its store-assigned identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    details: ProductDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        details: ProductDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            details,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }
    pub fn details(&self) -> &ProductDetails {
        &self.details
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace all mutable attributes, keeping identity and creation time.
    pub(crate) fn replace(&mut self, details: ProductDetails, updated_at: DateTime<Utc>) {
        self.details = details;
        self.updated_at = updated_at;
    }

    pub(crate) fn details_mut(&mut self) -> &mut ProductDetails {
        &mut self.details
    }
}

/// Optional list filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<Money>,
    /// Inclusive upper price bound.
    pub max_price: Option<Money>,
}

impl ProductFilter {
    /// Whether `product` satisfies every filter that is set.
    pub fn matches(&self, product: &Product) -> bool {
        let details = product.details();
        let title_matches = self.title.as_deref().is_none_or(|needle| {
            details
                .title()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let above_min = self.min_price.is_none_or(|min| details.price() >= min);
        let below_max = self.max_price.is_none_or(|max| details.price() <= max);
        title_matches && above_min && below_max
    }
}
