//! Price items attached to venues (admission, green fees, set menus...).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors from [`PriceItem::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("price label cannot be empty")]
    EmptyLabel,
    #[error("price amount cannot be negative")]
    NegativeAmount,
    #[error("currency must be a 3-letter ISO 4217 code, got {0:?}")]
    InvalidCurrency(String),
}

/// One line of a venue's price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceItem {
    /// What the price is for (e.g. "Adult admission").
    pub label: String,
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code, upper case.
    pub currency: String,
    /// Free-form remark shown under the price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PriceItem {
    /// Check the item is displayable.
    ///
    /// # Errors
    ///
    /// Returns the first [`PriceError`] found.
    pub fn validate(&self) -> Result<(), PriceError> {
        if self.label.trim().is_empty() {
            return Err(PriceError::EmptyLabel);
        }
        if self.amount.is_sign_negative() {
            return Err(PriceError::NegativeAmount);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(PriceError::InvalidCurrency(self.currency.clone()));
        }
        Ok(())
    }

    /// Display form, e.g. `EUR 17.50`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {}", self.currency, self.amount)
    }
}
