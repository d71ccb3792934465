//! Catalog record model shared by the Flug and Spiel feature areas.

use std::collections::BTreeSet;

use chrono::{DateTime, Locale, NaiveDate, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

pub const MIN_RATING: u8 = 0;
pub const MAX_RATING: u8 = 5;

/// Edition type of a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Kindle,
    Druckausgabe,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Kindle => "KINDLE",
            Category::Druckausgabe => "DRUCKAUSGABE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "KINDLE" => Some(Category::Kindle),
            "DRUCKAUSGABE" => Some(Category::Druckausgabe),
            _ => None,
        }
    }
}

/// Publisher of a record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Publisher {
    IwiVerlag,
    HskaVerlag,
}

impl Publisher {
    pub fn as_str(&self) -> &'static str {
        match self {
            Publisher::IwiVerlag => "IWI_VERLAG",
            Publisher::HskaVerlag => "HSKA_VERLAG",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IWI_VERLAG" => Some(Publisher::IwiVerlag),
            "HSKA_VERLAG" => Some(Publisher::HskaVerlag),
            _ => None,
        }
    }
}

/// Recognized keyword tags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Keyword {
    Javascript,
    Typescript,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Javascript => "JAVASCRIPT",
            Keyword::Typescript => "TYPESCRIPT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "JAVASCRIPT" => Some(Keyword::Javascript),
            "TYPESCRIPT" => Some(Keyword::Typescript),
            _ => None,
        }
    }
}

/// Hypermedia link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

/// Hypermedia links attached to server responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<Link>,
}

/// Record as exchanged with the REST backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordPayload {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub titel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    pub art: Category,
    #[serde(
        default,
        deserialize_with = "deserialize_verlag",
        skip_serializing_if = "Option::is_none"
    )]
    pub verlag: Option<Publisher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datum: Option<String>,
    #[serde(default)]
    pub preis: f64,
    #[serde(default)]
    pub rabatt: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lieferbar: Option<bool>,
    #[serde(default)]
    pub schlagwoerter: Vec<String>,
    #[serde(default)]
    pub isbn: String,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

impl RecordPayload {
    /// Identifier taken from the trailing segment of the self link.
    pub fn id_from_self_link(&self) -> Option<String> {
        self.links
            .as_ref()
            .and_then(|links| links.self_link.href.rsplit('/').next())
            .map(str::to_string)
    }
}

/// The publisher arrives as an empty string when unset.
pub(crate) fn deserialize_verlag<'de, D>(deserializer: D) -> Result<Option<Publisher>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Publisher::parse(s)
            .map(Some)
            .ok_or_else(|| de::Error::unknown_variant(s, &["IWI_VERLAG", "HSKA_VERLAG"])),
    }
}

/// Extract the version number from an entity tag such as `"3"` or `W/"3"`.
pub fn parse_etag(etag: &str) -> Option<u32> {
    let etag = etag.trim();
    let etag = etag.strip_prefix("W/").unwrap_or(etag);
    etag.trim_matches('"').parse().ok()
}

/// Parse a creation timestamp: RFC 3339, or a plain `YYYY-MM-DD` date.
pub fn parse_datum(datum: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datum) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(datum, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// A catalog record (Flug or Spiel).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: Option<String>,
    version: Option<u32>,
    pub titel: String,
    pub rating: Option<u8>,
    pub art: Category,
    pub verlag: Option<Publisher>,
    pub datum: Option<DateTime<Utc>>,
    pub preis: f64,
    /// Discount as a fraction, e.g. `0.1` for 10 %
    pub rabatt: f64,
    pub lieferbar: Option<bool>,
    pub isbn: String,
    pub schlagwoerter: BTreeSet<Keyword>,
}

/// New master data applied by the update screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StammdatenUpdate {
    pub titel: String,
    pub art: Category,
    pub verlag: Option<Publisher>,
    pub rating: Option<u8>,
    pub datum: Option<DateTime<Utc>>,
    pub preis: f64,
    pub rabatt: f64,
    pub isbn: String,
}

impl StammdatenUpdate {
    /// Current master data of a record, as the update form is prefilled.
    pub fn from_record(record: &Record) -> Self {
        Self {
            titel: record.titel.clone(),
            art: record.art,
            verlag: record.verlag,
            rating: record.rating,
            datum: record.datum,
            preis: record.preis,
            rabatt: record.rabatt,
            isbn: record.isbn.clone(),
        }
    }
}

impl Record {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: Option<String>,
        version: Option<u32>,
        titel: String,
        rating: Option<u8>,
        art: Category,
        verlag: Option<Publisher>,
        datum: Option<DateTime<Utc>>,
        preis: f64,
        rabatt: f64,
        lieferbar: Option<bool>,
        isbn: String,
        schlagwoerter: BTreeSet<Keyword>,
    ) -> Self {
        Self {
            id,
            version,
            titel,
            rating: rating.map(|r| r.min(MAX_RATING)),
            art,
            verlag,
            datum,
            preis,
            rabatt,
            lieferbar,
            isbn,
            schlagwoerter,
        }
    }

    /// Build a record from a server payload. The identifier comes from the
    /// self link, the version from the `ETag` response header.
    pub fn from_server(payload: RecordPayload, etag: Option<&str>) -> Self {
        let id = payload.id_from_self_link();
        let version = etag.and_then(parse_etag);

        let datum = match payload.datum.as_deref() {
            None => Some(Utc::now()),
            Some(raw) => {
                let parsed = parse_datum(raw);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unparsable datum {:?} of record {:?}", raw, id);
                }
                parsed
            }
        };

        let schlagwoerter = payload
            .schlagwoerter
            .iter()
            .filter_map(|tag| {
                let keyword = Keyword::parse(tag);
                if keyword.is_none() {
                    tracing::warn!("Dropping unknown keyword {:?} of record {:?}", tag, id);
                }
                keyword
            })
            .collect();

        let rating = payload
            .rating
            .map(|r| r.clamp(i64::from(MIN_RATING), i64::from(MAX_RATING)) as u8);

        let record = Self::new(
            id,
            version,
            payload.titel,
            rating,
            payload.art,
            payload.verlag,
            datum,
            payload.preis,
            payload.rabatt,
            payload.lieferbar,
            payload.isbn,
            schlagwoerter,
        );
        tracing::debug!("Record::from_server(): record={:?}", record);
        record
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u32) {
        self.version = Some(version);
    }

    pub(crate) fn clear_version(&mut self) {
        self.version = None;
    }

    /// Rating as filled/unfilled stars.
    pub fn rating_array(&self) -> [bool; MAX_RATING as usize] {
        let filled = usize::from(self.rating.unwrap_or(MIN_RATING));
        std::array::from_fn(|i| i < filled)
    }

    /// Creation date in German long form, e.g. `7. Mai 2020`.
    pub fn datum_formatted(&self) -> String {
        self.datum
            .map(|d| d.format_localized("%-d. %B %Y", Locale::de_DE).to_string())
            .unwrap_or_default()
    }

    /// Case-insensitive substring check on the title.
    pub fn contains_titel(&self, titel: &str) -> bool {
        self.titel.to_lowercase().contains(&titel.to_lowercase())
    }

    pub fn rate_up(&mut self) {
        if let Some(rating) = self.rating.as_mut() {
            if *rating < MAX_RATING {
                *rating += 1;
            }
        }
    }

    pub fn rate_down(&mut self) {
        if let Some(rating) = self.rating.as_mut() {
            if *rating > MIN_RATING {
                *rating -= 1;
            }
        }
    }

    pub fn has_verlag(&self, verlag: Publisher) -> bool {
        self.verlag == Some(verlag)
    }

    pub fn update_stammdaten(&mut self, update: StammdatenUpdate) {
        self.titel = update.titel;
        self.art = update.art;
        self.verlag = update.verlag;
        self.rating = update.rating.map(|r| r.min(MAX_RATING));
        self.datum = Some(update.datum.unwrap_or_else(Utc::now));
        self.preis = update.preis;
        self.rabatt = update.rabatt;
        self.isbn = update.isbn;
    }

    pub fn has_schlagwoerter(&self) -> bool {
        !self.schlagwoerter.is_empty()
    }

    pub fn has_schlagwort(&self, schlagwort: Keyword) -> bool {
        self.schlagwoerter.contains(&schlagwort)
    }

    /// Replace the keyword set from the two checkbox values.
    pub fn update_schlagwoerter(&mut self, javascript: bool, typescript: bool) {
        self.schlagwoerter.clear();
        if javascript {
            self.schlagwoerter.insert(Keyword::Javascript);
        }
        if typescript {
            self.schlagwoerter.insert(Keyword::Typescript);
        }
    }

    /// Server-facing JSON representation.
    pub fn to_payload(&self) -> RecordPayload {
        RecordPayload {
            id: self.id.clone(),
            titel: self.titel.clone(),
            rating: self.rating.map(i64::from),
            art: self.art,
            verlag: self.verlag,
            datum: self
                .datum
                .map(|d| d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            preis: self.preis,
            rabatt: self.rabatt,
            lieferbar: self.lieferbar,
            schlagwoerter: self
                .schlagwoerter
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
            isbn: self.isbn.clone(),
            links: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn server_json() -> serde_json::Value {
        json!({
            "titel": "Alpha",
            "rating": 4,
            "art": "KINDLE",
            "verlag": "IWI_VERLAG",
            "datum": "2020-05-07",
            "preis": 11.1,
            "rabatt": 0.011,
            "lieferbar": true,
            "schlagwoerter": ["TYPESCRIPT", "COBOL", "JAVASCRIPT", "JAVASCRIPT"],
            "isbn": "978-3-89722-583-1",
            "_links": { "self": { "href": "https://localhost:8443/rest/fluege/00000000-0000-0000-0000-000000000001" } }
        })
    }

    fn record_with_rating(rating: Option<u8>) -> Record {
        let payload: RecordPayload = serde_json::from_value(server_json()).unwrap();
        let mut record = Record::from_server(payload, Some("\"0\""));
        record.rating = rating;
        record
    }

    #[test]
    fn test_from_server_extracts_id_and_version() {
        let payload: RecordPayload = serde_json::from_value(server_json()).unwrap();
        let record = Record::from_server(payload, Some("\"2\""));

        assert_eq!(record.id(), Some("00000000-0000-0000-0000-000000000001"));
        assert_eq!(record.version(), Some(2));
        assert_eq!(record.verlag, Some(Publisher::IwiVerlag));
        assert_eq!(
            record.datum,
            Some(Utc.with_ymd_and_hms(2020, 5, 7, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_from_server_keeps_only_known_keywords_once() {
        let payload: RecordPayload = serde_json::from_value(server_json()).unwrap();
        let record = Record::from_server(payload, None);

        let keywords: Vec<Keyword> = record.schlagwoerter.iter().copied().collect();
        assert_eq!(keywords, vec![Keyword::Javascript, Keyword::Typescript]);
        assert!(record.version().is_none());
    }

    #[test]
    fn test_empty_verlag_is_none() {
        let mut value = server_json();
        value["verlag"] = json!("");
        let payload: RecordPayload = serde_json::from_value(value).unwrap();
        assert!(payload.verlag.is_none());
    }

    #[test]
    fn test_out_of_range_rating_is_clamped() {
        let mut value = server_json();
        value["rating"] = json!(9);
        let payload: RecordPayload = serde_json::from_value(value).unwrap();
        assert_eq!(Record::from_server(payload, None).rating, Some(MAX_RATING));
    }

    #[test]
    fn test_parse_etag() {
        assert_eq!(parse_etag("\"0\""), Some(0));
        assert_eq!(parse_etag("\"17\""), Some(17));
        assert_eq!(parse_etag("W/\"3\""), Some(3));
        assert_eq!(parse_etag("\"abc\""), None);
    }

    #[test]
    fn test_rate_up_and_down_stay_in_range() {
        for start in MIN_RATING..=MAX_RATING {
            let mut record = record_with_rating(Some(start));
            record.rate_up();
            assert_eq!(record.rating, Some((start + 1).min(MAX_RATING)));

            let mut record = record_with_rating(Some(start));
            record.rate_down();
            assert_eq!(record.rating, Some(start.saturating_sub(1)));
        }
    }

    #[test]
    fn test_rating_unrated_is_untouched() {
        let mut record = record_with_rating(None);
        record.rate_up();
        record.rate_down();
        assert_eq!(record.rating, None);
        assert_eq!(record.rating_array(), [false; 5]);
    }

    #[test]
    fn test_rating_array() {
        let record = record_with_rating(Some(3));
        assert_eq!(record.rating_array(), [true, true, true, false, false]);
    }

    #[test]
    fn test_datum_formatted_german() {
        let record = record_with_rating(Some(1));
        assert_eq!(record.datum_formatted(), "7. Mai 2020");
    }

    #[test]
    fn test_contains_titel_ignores_case() {
        let record = record_with_rating(None);
        assert!(record.contains_titel("alp"));
        assert!(record.contains_titel("ALPHA"));
        assert!(!record.contains_titel("beta"));
    }

    #[test]
    fn test_update_schlagwoerter_replaces_set() {
        let mut record = record_with_rating(None);
        record.update_schlagwoerter(false, true);
        assert!(!record.has_schlagwort(Keyword::Javascript));
        assert!(record.has_schlagwort(Keyword::Typescript));

        record.update_schlagwoerter(false, false);
        assert!(!record.has_schlagwoerter());
    }

    #[test]
    fn test_update_stammdaten() {
        let mut record = record_with_rating(Some(2));
        let mut update = StammdatenUpdate::from_record(&record);
        update.titel = "Beta".to_string();
        update.verlag = None;
        update.rating = Some(5);
        record.update_stammdaten(update);

        assert_eq!(record.titel, "Beta");
        assert!(!record.has_verlag(Publisher::IwiVerlag));
        assert_eq!(record.rating_array(), [true; 5]);
        assert_eq!(record.version(), Some(0));
    }

    #[test]
    fn test_to_payload_shape() {
        let record = record_with_rating(Some(4));
        let value = serde_json::to_value(record.to_payload()).unwrap();

        assert_eq!(value["_id"], "00000000-0000-0000-0000-000000000001");
        assert_eq!(value["art"], "KINDLE");
        assert_eq!(value["datum"], "2020-05-07T00:00:00.000Z");
        assert_eq!(value["schlagwoerter"], json!(["JAVASCRIPT", "TYPESCRIPT"]));
        assert!(value.get("_links").is_none());
    }
}
