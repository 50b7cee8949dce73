//! Public holiday record

use chrono::NaiveDate;

/// One public holiday occurrence, as delivered by the holiday data
/// collaborator (REST client or local cache) after JSON conversion.
///
/// Consumed read-only by the layout algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Holiday {
    /// Name of the holiday
    pub name: String,
    /// Localized name, when the source provides one
    #[cfg_attr(feature = "serde", serde(default))]
    pub local_name: Option<String>,
    /// Date of the holiday
    pub date: NaiveDate,
    /// ISO country code the holiday belongs to
    pub country_code: String,
    /// Sub-national regions the holiday is limited to, if any
    #[cfg_attr(feature = "serde", serde(default))]
    pub counties: Option<Vec<String>>,
}

impl Holiday {
    /// Create a nation-wide holiday record
    pub fn new<S: Into<String>>(name: S, date: NaiveDate, country_code: S) -> Self {
        Self {
            name: name.into(),
            local_name: None,
            date,
            country_code: country_code.into(),
            counties: None,
        }
    }
}
