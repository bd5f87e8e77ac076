//! Listing lookup: ID extraction from free-form URLs and the remote
//! listings API client.

use crate::error::{InvoiceError, Result};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

static LISTING_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("listing id pattern is valid")
});

/// Extracts the first UUID embedded anywhere in `url`.
pub fn extract_listing_id(url: &str) -> Result<Uuid> {
    LISTING_ID_PATTERN
        .find(url)
        .and_then(|m| Uuid::parse_str(m.as_str()).ok())
        .ok_or_else(|| InvoiceError::InvalidListingUrl(url.to_string()))
}

/// A JSON scalar that may arrive as either a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Exact decimal value, parsing trimmed text when needed.
    ///
    /// Plain decimal text is parsed digit for digit. Exponent notation goes
    /// through `f64` so that a huge exponent cannot expand into an
    /// arbitrarily long number.
    pub fn as_decimal(&self) -> Option<BigDecimal> {
        let text = match self {
            Scalar::Number(n) => return decimal_from_f64(*n),
            Scalar::Text(s) => s.trim(),
        };
        if text.contains(|c| c == 'e' || c == 'E') {
            text.parse::<f64>().ok().and_then(decimal_from_f64)
        } else {
            text.parse().ok()
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// `f64` display is the shortest round-tripping decimal, so `1.005` stays
/// `1.005` rather than its binary expansion.
fn decimal_from_f64(n: f64) -> Option<BigDecimal> {
    if !n.is_finite() {
        return None;
    }
    n.to_string().parse().ok()
}

/// Accepts any JSON value and keeps it only when it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

fn lenient_scalar<'de, D>(deserializer: D) -> std::result::Result<Option<Scalar>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, Scalar>(deserializer)?.filter(|s| !s.is_blank()))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingCategory {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingAddress {
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
}

/// Raw listing as served by the listings API. Every field is optional and
/// a field of the wrong type is treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub listing_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub selling_price: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub appraised_price: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub listing_description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub item_brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub item_age: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub category_v2: Option<ListingCategory>,
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<ListingAddress>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_urls: Option<Vec<Value>>,
}

impl ListingRecord {
    /// Builds a record from arbitrary JSON. Non-object input yields an
    /// empty record.
    pub fn from_json(value: &Value) -> Self {
        if !value.is_object() {
            warn!("Listing payload is not a JSON object; using defaults");
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!(error = %e, "Listing payload did not deserialize; using defaults");
            Self::default()
        })
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category_v2.as_ref()?.name.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.address.as_ref()?.state.as_deref()
    }

    pub fn first_image_url(&self) -> Option<&str> {
        self.image_urls.as_ref()?.first()?.as_str()
    }
}

/// Source of raw listing JSON, keyed by listing ID.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listing(&self, id: Uuid) -> Result<Value>;
}

/// Listings API client.
pub struct HttpListingSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpListingSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn listing_url(&self, id: Uuid) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_listing(&self, id: Uuid) -> Result<Value> {
        let url = self.listing_url(id);
        info!(url = %url, "Fetching listing");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Listing API responded");

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InvoiceError::ListingStatus {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_listing_id() {
        let id = extract_listing_id(
            "https://www.withgarage.com/listing/2019-Pierce-Engine-3F0C1B7A-9D2E-4C11-8A55-0123456789AB?ref=home",
        )
        .unwrap();
        assert_eq!(id.to_string(), "3f0c1b7a-9d2e-4c11-8a55-0123456789ab");
    }

    #[test]
    fn test_extract_listing_id_missing() {
        let err = extract_listing_id("https://www.withgarage.com/listing/not-an-id").unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidListingUrl(ref u) if u.ends_with("not-an-id")));
    }

    #[test]
    fn test_record_reads_nested_fields() {
        let record = ListingRecord::from_json(&json!({
            "listingTitle": "2012 Pierce Arrow XT",
            "sellingPrice": 125000,
            "itemBrand": "Pierce",
            "itemAge": 2012,
            "categoryV2": { "name": "Pumper" },
            "address": { "state": "CA" },
            "imageUrls": ["https://img.test/1.jpg", "https://img.test/2.jpg"]
        }));

        assert_eq!(record.listing_title.as_deref(), Some("2012 Pierce Arrow XT"));
        assert_eq!(record.selling_price, Some(Scalar::Number(125000.0)));
        assert_eq!(record.item_age.as_ref().map(|s| s.to_string()).as_deref(), Some("2012"));
        assert_eq!(record.category_name(), Some("Pumper"));
        assert_eq!(record.state(), Some("CA"));
        assert_eq!(record.first_image_url(), Some("https://img.test/1.jpg"));
    }

    #[test]
    fn test_record_tolerates_wrong_types() {
        let record = ListingRecord::from_json(&json!({
            "listingTitle": 42,
            "sellingPrice": "  ",
            "appraisedPrice": "9500.5",
            "categoryV2": "Pumper",
            "address": null,
            "imageUrls": "nope"
        }));

        assert!(record.listing_title.is_none());
        assert!(record.selling_price.is_none());
        assert_eq!(
            record.appraised_price.as_ref().and_then(Scalar::as_decimal),
            "9500.5".parse::<BigDecimal>().ok()
        );
        assert!(record.category_name().is_none());
        assert!(record.state().is_none());
        assert!(record.first_image_url().is_none());
    }

    #[test]
    fn test_scalar_as_decimal() {
        let dec = |s: &str| s.parse::<BigDecimal>().ok();
        assert_eq!(Scalar::Number(1.005).as_decimal(), dec("1.005"));
        assert_eq!(Scalar::Text(" 12000 ".to_string()).as_decimal(), dec("12000"));
        assert_eq!(Scalar::Text("1.5e3".to_string()).as_decimal(), dec("1500"));
        assert_eq!(Scalar::Text("1e999999999".to_string()).as_decimal(), None);
        assert_eq!(Scalar::Text("call us".to_string()).as_decimal(), None);
        assert_eq!(Scalar::Text("NaN".to_string()).as_decimal(), None);
    }

    #[test]
    fn test_record_from_non_object() {
        let record = ListingRecord::from_json(&json!([1, 2, 3]));
        assert!(record.listing_title.is_none());
        assert!(record.selling_price.is_none());
    }

    #[test]
    fn test_listing_url_trims_trailing_slash() {
        let source =
            HttpListingSource::new("https://api.test/listings/", Duration::from_secs(5)).unwrap();
        let id = Uuid::nil();
        assert_eq!(
            source.listing_url(id),
            "https://api.test/listings/00000000-0000-0000-0000-000000000000"
        );
    }
}
