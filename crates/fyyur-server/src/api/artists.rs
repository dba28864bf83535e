use axum::{
    extract::{Path, State},
    response::Response,
    Form, Json,
};
use fyyur_db::entities::artist;
use fyyur_db::AppState;
use serde::Serialize;
use std::sync::Arc;

use super::{format_start_time, see_other, FormPage, Page, SearchPage};
use crate::error::ApiError;
use crate::forms::{ArtistForm, FormFields, SearchForm};
use crate::notice::{self, Notice};
use crate::store::{self, artists::ArtistShow};

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
}

impl From<artist::Model> for ArtistResponse {
    fn from(a: artist::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            city: a.city,
            state: a.state,
            phone: a.phone,
            image_link: a.image_link,
            facebook_link: a.facebook_link,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ArtistShowResponse {
    pub venue_id: i32,
    pub venue_name: Option<String>,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

impl From<ArtistShow> for ArtistShowResponse {
    fn from((show, venue): ArtistShow) -> Self {
        Self {
            venue_id: show.venue_id,
            venue_name: venue.as_ref().map(|v| v.name.clone()),
            venue_image_link: venue.and_then(|v| v.image_link),
            start_time: format_start_time(show.show_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    #[serde(flatten)]
    pub artist: ArtistResponse,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: String,
    pub past_shows: Vec<ArtistShowResponse>,
    pub upcoming_shows: Vec<ArtistShowResponse>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ArtistEditResponse {
    pub artist: ArtistResponse,
    pub genres: Vec<String>,
    pub genre_choices: Vec<String>,
}

/// GET /artists
pub async fn list_artists(State(state): State<Arc<AppState>>) -> Json<Page<Vec<ArtistSummary>>> {
    let artists = match store::artists::list(&state.db).await {
        Ok(artists) => artists
            .into_iter()
            .map(|a| ArtistSummary {
                id: a.id,
                name: a.name,
            })
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "failed to load artists");
            Vec::new()
        }
    };
    Json(Page::new("artists", artists))
}

/// POST /artists/search
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Json<Page<SearchPage<ArtistResponse>>> {
    let term = form.term();
    let hits = match store::artists::search(&state.db, term).await {
        Ok(hits) => hits.into_iter().map(ArtistResponse::from).collect(),
        Err(e) => {
            tracing::error!(error = %e, search_term = term, "artist search failed");
            Vec::new()
        }
    };
    Json(Page::new("search_artists", SearchPage::new(hits, term)))
}

/// GET /artists/:id
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Page<ArtistDetailResponse>>, ApiError> {
    let detail = store::artists::detail(&state.db, id, store::now())
        .await
        .map_err(|e| ApiError::for_page("show_artist", e))?;

    let past_shows: Vec<ArtistShowResponse> =
        detail.past_shows.into_iter().map(Into::into).collect();
    let upcoming_shows: Vec<ArtistShowResponse> =
        detail.upcoming_shows.into_iter().map(Into::into).collect();

    Ok(Json(Page::new(
        "show_artist",
        ArtistDetailResponse {
            website: detail.artist.facebook_link.clone(),
            artist: ArtistResponse::from(detail.artist),
            genres: detail.genres,
            seeking_venue: state.seeking.artist_seeking_venue,
            seeking_description: state.seeking.artist_seeking_description.clone(),
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        },
    )))
}

/// GET /artists/create
pub async fn create_artist_form(State(state): State<Arc<AppState>>) -> Json<Page<FormPage>> {
    let genre_choices = store::genres::choices(&state.db)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load genre choices");
            Vec::new()
        });
    Json(Page::new(
        "new_artist",
        FormPage {
            fields: ArtistForm::FIELDS,
            genre_choices: Some(genre_choices),
        },
    ))
}

/// POST /artists/create
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Json<Page<()>> {
    let fields = FormFields::from(pairs);
    let result = match ArtistForm::parse(&fields) {
        Ok(form) => store::artists::create(&state.db, form).await,
        Err(e) => Err(e.into()),
    };

    let notice = match result {
        Ok(artist) => Notice::listed(&notice::subject("Artist", Some(&artist.name))),
        Err(e) => {
            tracing::error!(error = %e, "artist could not be listed");
            Notice::listing_failed(&notice::subject("Artist", fields.name().as_deref()))
        }
    };
    Json(Page::home(notice))
}

/// GET /artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Page<ArtistEditResponse>>, ApiError> {
    let edit = store::artists::for_edit(&state.db, id)
        .await
        .map_err(|e| ApiError::for_page("edit_artist", e))?;
    Ok(Json(Page::new(
        "edit_artist",
        ArtistEditResponse {
            artist: edit.artist.into(),
            genres: edit.genres,
            genre_choices: edit.genre_choices,
        },
    )))
}

/// POST /artists/:id/edit
pub async fn edit_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let fields = FormFields::from(pairs);
    let result = match ArtistForm::parse(&fields) {
        Ok(form) => store::artists::update(&state.db, id, form).await,
        Err(e) => Err(e.into()),
    };

    let notice = match result {
        Ok(artist) => Notice::updated(&notice::subject("Artist", Some(&artist.name))),
        Err(e) => {
            tracing::error!(artist_id = id, error = %e, "artist could not be updated");
            Notice::update_failed(&notice::subject("Artist", fields.name().as_deref()))
        }
    };
    see_other(format!("/artists/{id}"), notice)
}

/// POST /artists/:id
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Json<Page<()>> {
    let notice = match store::artists::delete(&state.db, id).await {
        Ok(()) => Notice::deleted("artist"),
        Err(e) => {
            tracing::error!(artist_id = id, error = %e, "artist could not be deleted");
            Notice::delete_failed("artist")
        }
    };
    Json(Page::home(notice))
}
