use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub mod error;
pub mod logging;
pub mod query;
pub mod report;
pub mod stats;
pub mod store;
pub mod taxonomy;

pub use error::StatsError;

/// category -> subcategory -> links
pub type Supplementary = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Stored documents may carry `null` for any absent field; those read as
/// empty (or zero) rather than failing the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    #[serde(default, deserialize_with = "null_as_default")]
    pub doi: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: String,
    /// Free text, ";" or "," separated "Last, First" names
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub citations: u64,
    #[serde(default, deserialize_with = "deserialize_supplementary")]
    pub supplementary: Supplementary,
}

impl Publication {
    /// Returns None when the date does not parse; such publications are
    /// left out of every year-keyed aggregation.
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn year(&self) -> Option<i32> {
        self.published_on().map(|d| d.year())
    }

    pub fn links(&self, category: &str, subcategory: &str) -> &[String] {
        self.supplementary
            .get(category)
            .and_then(|subs| subs.get(subcategory))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "ENID")]
    pub enid: u64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

impl Author {
    /// "Last, First": both the match key against publication author
    /// fields and the display name.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name.trim(), self.first_name.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedLink {
    pub link: String,
    pub resource_type: String,
    pub resource: String,
    pub publication_title: String,
    pub publication_doi: String,
    pub date: String,
    pub scientist: String,
}

/// Accepts "YYYY-MM-DD", RFC 3339 timestamps and a bare "YYYY" (1 January).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        return raw
            .parse::<i32>()
            .ok()
            .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }
    // "2020-05-01T00:00:00" without an offset
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Handles both a plain string and the extended JSON form {"$date": "..."}
fn deserialize_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDate {
        Text(String),
        Extended {
            #[serde(rename = "$date")]
            date: String,
        },
        Other(serde::de::IgnoredAny),
    }

    Ok(match RawDate::deserialize(deserializer)? {
        RawDate::Text(s) => s,
        RawDate::Extended { date } => date,
        RawDate::Other(_) => String::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` at any level (the whole map, a category, a link list or a single
/// link) counts as empty.
fn deserialize_supplementary<'de, D>(deserializer: D) -> Result<Supplementary, D::Error>
where
    D: Deserializer<'de>,
{
    type Raw = BTreeMap<String, Option<BTreeMap<String, Option<Vec<Option<String>>>>>>;

    let raw = Option::<Raw>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(category, subs)| {
            let subs: BTreeMap<String, Vec<String>> = subs
                .unwrap_or_default()
                .into_iter()
                .map(|(sub, links)| {
                    (sub, links.unwrap_or_default().into_iter().flatten().collect())
                })
                .collect();
            (category, subs)
        })
        .collect())
}
