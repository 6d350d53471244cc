//! Order aggregate and its embedded snapshots.
//!
//! An order is written once by the checkout workflow. It embeds a
//! point-in-time copy of the purchased product so later catalog edits never
//! alter historical orders.
//!
//! `payment.status` is the source of truth for the charge result and keeps the
//! declined/error distinction. `status` is the fulfilment state: `processing`
//! for approved charges, `cancelled` otherwise.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{Money, PaymentOutcome, ProductId};

const ORDER_PREFIX: &str = "ORD-";
const SUFFIX_LEN: usize = 4;

/// Human-facing order identifier, `ORD-<unix millis>-<4 hex digits>`.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use storefront::domain::OrderNumber;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_000_000).single().expect("valid instant");
/// let number = OrderNumber::generate(at, 0xBEEF);
/// assert_eq!(number.as_str(), "ORD-1700000000000-BEEF");
/// assert_eq!(number.as_str().parse::<OrderNumber>(), Ok(number));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderNumber(String);

/// Raised when a string is not a well-formed order number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed order number")]
pub struct OrderNumberParseError;

impl OrderNumber {
    /// Build an order number from a timestamp and a random suffix.
    pub fn generate(at: DateTime<Utc>, suffix: u16) -> Self {
        Self(format!("{ORDER_PREFIX}{}-{suffix:04X}", at.timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for OrderNumber {
    type Err = OrderNumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix(ORDER_PREFIX).ok_or(OrderNumberParseError)?;
        let (millis, suffix) = rest.split_once('-').ok_or(OrderNumberParseError)?;
        let millis_ok = !millis.is_empty() && millis.chars().all(|ch| ch.is_ascii_digit());
        let suffix_ok = suffix.len() == SUFFIX_LEN
            && suffix
                .chars()
                .all(|ch| ch.is_ascii_digit() || ('A'..='F').contains(&ch));
        if millis_ok && suffix_ok {
            Ok(Self(s.to_owned()))
        } else {
            Err(OrderNumberParseError)
        }
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage label did not match a known enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status: {value}")]
pub struct UnknownStatusError {
    kind: &'static str,
    value: String,
}

/// Fulfilment state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Status assigned at placement for a given charge outcome.
    pub fn for_outcome(outcome: PaymentOutcome) -> Self {
        if outcome.is_approved() {
            Self::Processing
        } else {
            Self::Cancelled
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatusError {
                kind: "order",
                value: other.to_owned(),
            }),
        }
    }
}

/// Charge state recorded on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Approved,
    Declined,
    Error,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Error => "error",
        }
    }
}

impl From<PaymentOutcome> for PaymentStatus {
    fn from(value: PaymentOutcome) -> Self {
        match value {
            PaymentOutcome::Approved => Self::Approved,
            PaymentOutcome::Declined => Self::Declined,
            PaymentOutcome::Error => Self::Error,
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            "error" => Ok(Self::Error),
            other => Err(UnknownStatusError {
                kind: "payment",
                value: other.to_owned(),
            }),
        }
    }
}

/// Chosen option per variant name, e.g. `color → Black`.
pub type VariantSelection = BTreeMap<String, String>;

/// Product data copied into the order at placement time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub variant: VariantSelection,
    pub quantity: u32,
    pub price: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Buyer contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSummary {
    pub card_last_four: String,
    pub amount: Money,
    pub status: PaymentStatus,
}

/// Raised when order parts violate the total invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderInvariantError {
    #[error("order total overflows")]
    TotalOverflow,
    #[error("payment amount {amount} does not match order total {total}")]
    AmountMismatch { amount: Money, total: Money },
}

/// Persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    order_number: OrderNumber,
    product: ProductSnapshot,
    customer: CustomerDetails,
    payment: PaymentSummary,
    status: OrderStatus,
    total: Money,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Assemble a freshly placed order, deriving total and status.
    pub fn place(
        order_number: OrderNumber,
        product: ProductSnapshot,
        customer: CustomerDetails,
        card_last_four: String,
        outcome: PaymentOutcome,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderInvariantError> {
        let total = product
            .price
            .checked_times(product.quantity)
            .ok_or(OrderInvariantError::TotalOverflow)?;
        Ok(Self {
            order_number,
            product,
            customer,
            payment: PaymentSummary {
                card_last_four,
                amount: total,
                status: outcome.into(),
            },
            status: OrderStatus::for_outcome(outcome),
            total,
            created_at,
        })
    }

    /// Rehydrate an order read back from a store, re-checking the totals.
    pub fn from_parts(
        order_number: OrderNumber,
        product: ProductSnapshot,
        customer: CustomerDetails,
        payment: PaymentSummary,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderInvariantError> {
        let total = product
            .price
            .checked_times(product.quantity)
            .ok_or(OrderInvariantError::TotalOverflow)?;
        if payment.amount != total {
            return Err(OrderInvariantError::AmountMismatch {
                amount: payment.amount,
                total,
            });
        }
        Ok(Self {
            order_number,
            product,
            customer,
            payment,
            status,
            total,
            created_at,
        })
    }

    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }
    pub fn product(&self) -> &ProductSnapshot {
        &self.product
    }
    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }
    pub fn payment(&self) -> &PaymentSummary {
        &self.payment
    }
    pub fn status(&self) -> OrderStatus {
        self.status
    }
    pub fn total(&self) -> Money {
        self.total
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
