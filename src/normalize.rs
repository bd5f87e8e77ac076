//! Maps raw listings onto the flat record the renderer consumes.
//!
//! Each field is resolved by its own ordered-defaulting function. Optional
//! display fields stay `None` here; the renderer substitutes "N/A" when it
//! draws them.

use crate::listing::{ListingRecord, Scalar};
use bigdecimal::BigDecimal;
use serde::{Serialize, Serializer};
use std::fmt;

pub const DEFAULT_TITLE: &str = "Untitled Listing";
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Listing price as it entered the invoice.
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    Amount(BigDecimal),
    Unavailable,
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Amount(v) => serializer.serialize_str(&v.to_string()),
            Price::Unavailable => serializer.serialize_str("N/A"),
        }
    }
}

impl Price {
    /// Amount used for totals. Unavailable prices count as zero.
    pub fn amount_or_zero(&self) -> BigDecimal {
        match self {
            Price::Amount(v) => v.clone(),
            Price::Unavailable => BigDecimal::from(0),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(v) => write!(f, "{}", v),
            Price::Unavailable => f.write_str("N/A"),
        }
    }
}

/// Flat invoice input. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceData {
    pub title: String,
    pub price: Price,
    pub description: String,
    pub brand: Option<String>,
    pub year: Option<String>,
    pub category: Option<String>,
    pub state: Option<String>,
    pub image: Option<String>,
}

/// Returns the first candidate that is present.
pub fn first_present<T>(candidates: impl IntoIterator<Item = Option<T>>) -> Option<T> {
    candidates.into_iter().flatten().next()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

pub fn resolve_title(record: &ListingRecord) -> String {
    first_present([non_blank(record.listing_title.as_deref())])
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

/// `sellingPrice`, then `appraisedPrice`, then unavailable. A present price
/// that is not numeric resolves to unavailable rather than falling through.
pub fn resolve_price(record: &ListingRecord) -> Price {
    first_present([record.selling_price.as_ref(), record.appraised_price.as_ref()])
        .and_then(Scalar::as_decimal)
        .map(Price::Amount)
        .unwrap_or(Price::Unavailable)
}

pub fn resolve_description(record: &ListingRecord) -> String {
    first_present([non_blank(record.listing_description.as_deref())])
        .unwrap_or(DEFAULT_DESCRIPTION)
        .to_string()
}

fn passthrough(value: Option<&str>) -> Option<String> {
    non_blank(value).map(str::to_string)
}

impl InvoiceData {
    pub fn from_record(record: &ListingRecord) -> Self {
        Self {
            title: resolve_title(record),
            price: resolve_price(record),
            description: resolve_description(record),
            brand: passthrough(record.item_brand.as_deref()),
            year: record
                .item_age
                .as_ref()
                .map(Scalar::to_string)
                .filter(|s| !s.trim().is_empty()),
            category: passthrough(record.category_name()),
            state: passthrough(record.state()),
            image: passthrough(record.first_image_url()),
        }
    }

    /// Normalizes arbitrary listing JSON. Never fails.
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self::from_record(&ListingRecord::from_json(value))
    }
}
