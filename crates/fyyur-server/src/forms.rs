//! Submitted form bodies.
//!
//! Venue and artist forms carry a repeated `genres` key, which the plain
//! `Form<T>` struct mapping cannot express, so handlers extract the raw
//! `(key, value)` pairs and parse them here.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid number in {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid start time: {0:?}")]
    InvalidTimestamp(String),
}

/// Raw `application/x-www-form-urlencoded` pairs in submission order.
#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }
}

impl FormFields {
    fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn required(&self, key: &'static str) -> Result<String, FormError> {
        self.first(key)
            .map(|v| v.trim().to_string())
            .ok_or(FormError::MissingField(key))
    }

    /// Blank values are stored as NULL.
    pub fn optional(&self, key: &str) -> Option<String> {
        self.first(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }

    pub fn id(&self, key: &'static str) -> Result<i32, FormError> {
        let raw = self.required(key)?;
        raw.parse().map_err(|_| FormError::InvalidNumber {
            field: key,
            value: raw,
        })
    }

    /// Submitted `name`, if any. Used to word failure notices even when the
    /// rest of the form could not be parsed.
    pub fn name(&self) -> Option<String> {
        self.optional("name")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Vec<String>,
}

impl VenueForm {
    pub const FIELDS: &'static [&'static str] = &[
        "name",
        "city",
        "state",
        "address",
        "phone",
        "image_link",
        "facebook_link",
        "genres",
    ];

    pub fn parse(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            name: fields.required("name")?,
            city: fields.required("city")?,
            state: fields.required("state")?,
            address: fields.required("address")?,
            phone: fields.optional("phone"),
            image_link: fields.optional("image_link"),
            facebook_link: fields.optional("facebook_link"),
            genres: fields.all("genres"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Vec<String>,
}

impl ArtistForm {
    pub const FIELDS: &'static [&'static str] = &[
        "name",
        "city",
        "state",
        "phone",
        "image_link",
        "facebook_link",
        "genres",
    ];

    pub fn parse(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            name: fields.required("name")?,
            city: fields.required("city")?,
            state: fields.required("state")?,
            phone: fields.optional("phone"),
            image_link: fields.optional("image_link"),
            facebook_link: fields.optional("facebook_link"),
            genres: fields.all("genres"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowForm {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: NaiveDateTime,
}

impl ShowForm {
    pub const FIELDS: &'static [&'static str] = &["venue_id", "artist_id", "start_time"];

    pub fn parse(fields: &FormFields) -> Result<Self, FormError> {
        Ok(Self {
            venue_id: fields.id("venue_id")?,
            artist_id: fields.id("artist_id")?,
            start_time: parse_start_time(&fields.required("start_time")?)?,
        })
    }
}

const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a show start time. Offsets are normalised to UTC; naive values are
/// taken as UTC already.
pub fn parse_start_time(raw: &str) -> Result<NaiveDateTime, FormError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| FormError::InvalidTimestamp(raw.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: Option<String>,
}

impl SearchForm {
    pub fn term(&self) -> &str {
        self.search_term.as_deref().unwrap_or("")
    }
}
