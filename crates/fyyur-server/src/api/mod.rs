pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::notice::Notice;

/// A page document: which view to render, the data it needs, and an
/// optional one-shot notice.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub page: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub data: T,
}

impl<T> Page<T> {
    pub fn new(page: &'static str, data: T) -> Self {
        Self {
            page,
            notice: None,
            data,
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

impl Page<()> {
    /// Writes fall through to the home page with their notice.
    pub fn home(notice: Notice) -> Self {
        Page::new("home", ()).with_notice(notice)
    }
}

/// Serializes as `{}`; the data of a page whose read failed.
#[derive(Debug, Default, Serialize)]
pub struct EmptyData {}

#[derive(Debug, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct SearchPage<T> {
    pub results: SearchResults<T>,
    pub search_term: String,
}

impl<T> SearchPage<T> {
    pub fn new(data: Vec<T>, search_term: &str) -> Self {
        Self {
            results: SearchResults {
                count: data.len(),
                data,
            },
            search_term: search_term.to_string(),
        }
    }
}

/// Blank create form: field names and, where relevant, the genre choices.
#[derive(Debug, Serialize)]
pub struct FormPage {
    pub fields: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre_choices: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RedirectTarget {
    pub location: String,
}

/// 303 to `location`, carrying the notice the next page should show.
pub fn see_other(location: String, notice: Notice) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, location.clone())],
        Json(Page::new("redirect", RedirectTarget { location }).with_notice(notice)),
    )
        .into_response()
}

pub fn format_start_time(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
