//! Payment primitives shared by the checkout workflow and gateway adapters.

use std::fmt;

use zeroize::Zeroizing;

use super::Money;

/// Three-valued result of a charge attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentOutcome {
    Approved,
    Declined,
    Error,
}

impl PaymentOutcome {
    /// Stable lowercase label used on the wire and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Error => "error",
        }
    }

    /// Buyer-facing message for the outcome.
    pub fn message(self) -> &'static str {
        match self {
            Self::Approved => "Payment approved",
            Self::Declined => "Payment declined",
            Self::Error => "Payment processing error",
        }
    }

    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for PaymentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for card-like payment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentInstrumentValidationError {
    /// Fewer than four digits remained after stripping separators.
    CardNumberTooShort,
    /// The card number contained characters other than digits, spaces, or hyphens.
    CardNumberNotNumeric,
}

impl fmt::Display for PaymentInstrumentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CardNumberTooShort => write!(f, "card number must contain at least four digits"),
            Self::CardNumberNotNumeric => write!(f, "card number must contain only digits"),
        }
    }
}

impl std::error::Error for PaymentInstrumentValidationError {}

/// Card-like payment input. Secret fields are wiped on drop.
///
/// Expiry and CVV are carried through to the gateway unvalidated.
///
/// # Examples
/// ```
/// use storefront::domain::PaymentInstrument;
///
/// let card = PaymentInstrument::try_from_parts("4242 4242 4242 4242", "12/30", "123")
///     .expect("valid card");
/// assert_eq!(card.last_four(), "4242");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PaymentInstrument {
    card_number: Zeroizing<String>,
    expiry: String,
    cvv: Zeroizing<String>,
}

impl PaymentInstrument {
    /// Normalise the card number to its digits and retain the other fields.
    pub fn try_from_parts(
        card_number: &str,
        expiry: &str,
        cvv: &str,
    ) -> Result<Self, PaymentInstrumentValidationError> {
        let mut digits = Zeroizing::new(String::with_capacity(card_number.len()));
        for ch in card_number.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' => {}
                _ => return Err(PaymentInstrumentValidationError::CardNumberNotNumeric),
            }
        }
        if digits.len() < 4 {
            return Err(PaymentInstrumentValidationError::CardNumberTooShort);
        }
        Ok(Self {
            card_number: digits,
            expiry: expiry.trim().to_owned(),
            cvv: Zeroizing::new(cvv.trim().to_owned()),
        })
    }

    /// Trailing four digits, safe to persist and display.
    pub fn last_four(&self) -> String {
        let skip = self.card_number.len().saturating_sub(4);
        self.card_number.chars().skip(skip).collect()
    }

    pub fn expiry(&self) -> &str {
        self.expiry.as_str()
    }

    /// Full card number; only gateway adapters should read this.
    pub fn card_number(&self) -> &str {
        self.card_number.as_str()
    }

    pub fn cvv(&self) -> &str {
        self.cvv.as_str()
    }
}

impl fmt::Debug for PaymentInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentInstrument")
            .field("last_four", &self.last_four())
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// Result returned by a payment gateway for one charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeReceipt {
    pub outcome: PaymentOutcome,
    pub amount: Money,
    pub message: String,
}

impl ChargeReceipt {
    /// Receipt carrying the default message for `outcome`.
    pub fn new(outcome: PaymentOutcome, amount: Money) -> Self {
        Self {
            outcome,
            amount,
            message: outcome.message().to_owned(),
        }
    }
}
