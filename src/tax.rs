//! Sales tax for the subtotal/tax/total block.
//!
//! Invoices ship with tax disabled. The state table is only consulted when
//! a caller opts in with [`TaxPolicy::StateTable`].

use crate::currency::{round_cents, serialize_decimal};
use bigdecimal::BigDecimal;
use serde::Serialize;

/// Base statewide sales-tax rates, in percent. Local surcharges are not
/// modelled.
const STATE_RATES: &[(&str, &str, &str)] = &[
    ("AL", "Alabama", "4"),
    ("AK", "Alaska", "0"),
    ("AZ", "Arizona", "5.6"),
    ("AR", "Arkansas", "6.5"),
    ("CA", "California", "7.25"),
    ("CO", "Colorado", "2.9"),
    ("CT", "Connecticut", "6.35"),
    ("DE", "Delaware", "0"),
    ("DC", "District of Columbia", "6"),
    ("FL", "Florida", "6"),
    ("GA", "Georgia", "4"),
    ("HI", "Hawaii", "4"),
    ("ID", "Idaho", "6"),
    ("IL", "Illinois", "6.25"),
    ("IN", "Indiana", "7"),
    ("IA", "Iowa", "6"),
    ("KS", "Kansas", "6.5"),
    ("KY", "Kentucky", "6"),
    ("LA", "Louisiana", "5"),
    ("ME", "Maine", "5.5"),
    ("MD", "Maryland", "6"),
    ("MA", "Massachusetts", "6.25"),
    ("MI", "Michigan", "6"),
    ("MN", "Minnesota", "6.875"),
    ("MS", "Mississippi", "7"),
    ("MO", "Missouri", "4.225"),
    ("MT", "Montana", "0"),
    ("NE", "Nebraska", "5.5"),
    ("NV", "Nevada", "6.85"),
    ("NH", "New Hampshire", "0"),
    ("NJ", "New Jersey", "6.625"),
    ("NM", "New Mexico", "4.875"),
    ("NY", "New York", "4"),
    ("NC", "North Carolina", "4.75"),
    ("ND", "North Dakota", "5"),
    ("OH", "Ohio", "5.75"),
    ("OK", "Oklahoma", "4.5"),
    ("OR", "Oregon", "0"),
    ("PA", "Pennsylvania", "6"),
    ("RI", "Rhode Island", "7"),
    ("SC", "South Carolina", "6"),
    ("SD", "South Dakota", "4.2"),
    ("TN", "Tennessee", "7"),
    ("TX", "Texas", "6.25"),
    ("UT", "Utah", "6.1"),
    ("VT", "Vermont", "6"),
    ("VA", "Virginia", "5.3"),
    ("WA", "Washington", "6.5"),
    ("WV", "West Virginia", "6"),
    ("WI", "Wisconsin", "5"),
    ("WY", "Wyoming", "4"),
];

/// Looks up a base state rate by two-letter code or full name.
pub fn state_rate_percent(state: &str) -> Option<BigDecimal> {
    let state = state.trim();
    STATE_RATES
        .iter()
        .find(|(code, name, _)| code.eq_ignore_ascii_case(state) || name.eq_ignore_ascii_case(state))
        .and_then(|(_, _, rate)| rate.parse().ok())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaxPolicy {
    /// Tax is always zero.
    #[default]
    Disabled,
    /// Apply the base rate of the listing's state; unknown states pay zero.
    StateTable,
}

/// Money amounts are exact decimals; `tax` is rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    #[serde(serialize_with = "serialize_decimal")]
    pub subtotal: BigDecimal,
    #[serde(serialize_with = "serialize_decimal")]
    pub tax_rate_percent: BigDecimal,
    #[serde(serialize_with = "serialize_decimal")]
    pub tax: BigDecimal,
    #[serde(serialize_with = "serialize_decimal")]
    pub total: BigDecimal,
}

impl Totals {
    pub fn is_taxed(&self) -> bool {
        self.tax_rate_percent > BigDecimal::from(0)
    }
}

impl TaxPolicy {
    pub fn rate_percent(&self, state: Option<&str>) -> BigDecimal {
        match self {
            TaxPolicy::Disabled => BigDecimal::from(0),
            TaxPolicy::StateTable => state
                .and_then(state_rate_percent)
                .unwrap_or_else(|| BigDecimal::from(0)),
        }
    }

    /// Subtotal is taken to whole cents before tax is applied.
    pub fn totals(&self, amount: &BigDecimal, state: Option<&str>) -> Totals {
        let subtotal = round_cents(amount);
        let tax_rate_percent = self.rate_percent(state);
        let tax = round_cents(&(&subtotal * &tax_rate_percent / BigDecimal::from(100)));
        let total = &subtotal + &tax;
        Totals {
            subtotal,
            tax_rate_percent,
            tax,
            total,
        }
    }
}
