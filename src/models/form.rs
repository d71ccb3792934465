//! Form-facing record data and its validation.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use super::record::{parse_datum, Category, Keyword, Publisher, Record, MAX_RATING};
use crate::errors::{ClientError, FieldError};

/// Accepted ISBN-10 and ISBN-13 layouts with hyphens.
const ISBN_PATTERN: &str = r"^(((\d{3}-)?\d-\d{5}-\d{3})|(\d-\d{4}-\d{4}))-\d$";

fn isbn_regex() -> &'static Regex {
    static ISBN: OnceLock<Regex> = OnceLock::new();
    ISBN.get_or_init(|| Regex::new(ISBN_PATTERN).expect("ISBN pattern is valid"))
}

/// Whether the string is an ISBN in one of the accepted layouts.
pub fn is_valid_isbn(isbn: &str) -> bool {
    isbn_regex().is_match(isbn)
}

/// Record data as entered in the create form: the rating is a string, the
/// discount a percentage and each keyword a separate checkbox.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordForm {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub titel: String,
    #[serde(default)]
    pub rating: String,
    pub art: Category,
    #[serde(default, deserialize_with = "super::record::deserialize_verlag")]
    pub verlag: Option<Publisher>,
    #[serde(default)]
    pub datum: Option<String>,
    #[serde(default)]
    pub preis: f64,
    /// Discount in percent
    #[serde(default)]
    pub rabatt: Option<f64>,
    #[serde(default)]
    pub lieferbar: Option<bool>,
    pub isbn: String,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub javascript: bool,
    #[serde(default)]
    pub typescript: bool,
}

impl RecordForm {
    /// Check the required fields and patterns, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.titel.trim().is_empty() {
            errors.push(FieldError::new("titel", "Ein Titel muss eingegeben werden."));
        }
        if self.isbn.trim().is_empty() {
            errors.push(FieldError::new("isbn", "Eine ISBN muss eingegeben werden."));
        } else if !is_valid_isbn(&self.isbn) {
            errors.push(FieldError::new("isbn", "Die ISBN ist ungueltig."));
        }
        if let Err(message) = self.parse_rating() {
            errors.push(FieldError::new("rating", message));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn parse_rating(&self) -> Result<Option<u8>, String> {
        let rating = self.rating.trim();
        if rating.is_empty() {
            return Ok(None);
        }
        match rating.parse::<u8>() {
            Ok(r) if r <= MAX_RATING => Ok(Some(r)),
            _ => Err(format!("Die Bewertung muss zwischen 0 und {} liegen.", MAX_RATING)),
        }
    }
}

impl Record {
    /// Build a new, not yet persisted record from validated form input.
    pub fn from_form(form: RecordForm) -> Result<Self, ClientError> {
        form.validate().map_err(ClientError::Validation)?;
        let rating = form.parse_rating().map_err(|message| {
            ClientError::Validation(vec![FieldError::new("rating", message)])
        })?;

        let mut schlagwoerter = BTreeSet::new();
        if form.javascript {
            schlagwoerter.insert(Keyword::Javascript);
        }
        if form.typescript {
            schlagwoerter.insert(Keyword::Typescript);
        }

        let datum = form.datum.as_deref().and_then(parse_datum);
        let rabatt = form.rabatt.map_or(0.0, |percent| percent / 100.0);

        let record = Record::new(
            form.id,
            form.version,
            form.titel,
            rating,
            form.art,
            form.verlag,
            datum,
            form.preis,
            rabatt,
            form.lieferbar,
            form.isbn,
            schlagwoerter,
        );
        tracing::debug!("Record::from_form(): record={:?}", record);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> RecordForm {
        serde_json::from_value(json!({
            "titel": "Neu",
            "rating": "3",
            "art": "DRUCKAUSGABE",
            "verlag": "HSKA_VERLAG",
            "preis": 20.0,
            "rabatt": 10.0,
            "lieferbar": true,
            "isbn": "978-0-00000-000-0",
            "javascript": true,
            "typescript": false
        }))
        .unwrap()
    }

    #[test]
    fn test_isbn_layouts() {
        assert!(is_valid_isbn("978-0-00000-000-0"));
        assert!(is_valid_isbn("0-00000-000-0"));
        assert!(is_valid_isbn("0-0070-0644-6"));
        assert!(!is_valid_isbn("9780000000000"));
        assert!(!is_valid_isbn("978-0-00000-000-0x"));
    }

    #[test]
    fn test_from_form_keywords_serialize_to_single_tag() {
        let record = Record::from_form(form()).unwrap();
        let value = serde_json::to_value(record.to_payload()).unwrap();

        assert_eq!(value["schlagwoerter"], json!(["JAVASCRIPT"]));
    }

    #[test]
    fn test_from_form_converts_rating_and_discount() {
        let record = Record::from_form(form()).unwrap();

        assert_eq!(record.rating, Some(3));
        assert!((record.rabatt - 0.1).abs() < f64::EPSILON);
        assert!(record.id().is_none());
        assert!(record.version().is_none());
    }

    #[test]
    fn test_from_form_without_discount() {
        let mut form = form();
        form.rabatt = None;
        form.rating = String::new();
        let record = Record::from_form(form).unwrap();

        assert_eq!(record.rabatt, 0.0);
        assert_eq!(record.rating, None);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut form = form();
        form.titel = "  ".to_string();
        form.isbn = "123".to_string();
        form.rating = "7".to_string();

        let errors = form.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["titel", "isbn", "rating"]);

        match Record::from_form(form) {
            Err(ClientError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
