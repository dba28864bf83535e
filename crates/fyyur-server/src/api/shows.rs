use axum::{extract::State, Form, Json};
use fyyur_db::AppState;
use serde::Serialize;
use std::sync::Arc;

use super::{format_start_time, FormPage, Page};
use crate::forms::{FormFields, ShowForm};
use crate::notice::Notice;
use crate::store::{self, shows::ShowListing};

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub venue_id: i32,
    pub venue_name: Option<String>,
    pub artist_id: i32,
    pub artist_name: Option<String>,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<ShowListing> for ShowResponse {
    fn from(l: ShowListing) -> Self {
        Self {
            venue_id: l.show.venue_id,
            venue_name: l.venue.map(|v| v.name),
            artist_id: l.show.artist_id,
            artist_name: l.artist.as_ref().map(|a| a.name.clone()),
            artist_image_link: l.artist.and_then(|a| a.image_link),
            start_time: format_start_time(l.show.show_date),
        }
    }
}

/// GET /shows
pub async fn list_shows(State(state): State<Arc<AppState>>) -> Json<Page<Vec<ShowResponse>>> {
    let shows = match store::shows::list(&state.db).await {
        Ok(listings) => listings.into_iter().map(ShowResponse::from).collect(),
        Err(e) => {
            tracing::error!(error = %e, "failed to load shows");
            Vec::new()
        }
    };
    Json(Page::new("shows", shows))
}

/// GET /shows/create
pub async fn create_show_form() -> Json<Page<FormPage>> {
    Json(Page::new(
        "new_show",
        FormPage {
            fields: ShowForm::FIELDS,
            genre_choices: None,
        },
    ))
}

/// POST /shows/create
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Json<Page<()>> {
    let fields = FormFields::from(pairs);
    let result = match ShowForm::parse(&fields) {
        Ok(form) => store::shows::create(&state.db, form).await,
        Err(e) => Err(e.into()),
    };

    let notice = match result {
        Ok(_) => Notice::listed("Show"),
        Err(e) => {
            tracing::error!(error = %e, "show could not be listed");
            Notice::listing_failed("Show")
        }
    };
    Json(Page::home(notice))
}
