use axum::{
    extract::{Path, State},
    response::Response,
    Form, Json,
};
use fyyur_db::entities::venue;
use fyyur_db::AppState;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::{format_start_time, see_other, FormPage, Page, SearchPage};
use crate::error::ApiError;
use crate::forms::{FormFields, SearchForm, VenueForm};
use crate::notice::{self, Notice};
use crate::store::{self, venues::VenueShow};

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
}

impl From<venue::Model> for VenueResponse {
    fn from(v: venue::Model) -> Self {
        Self {
            id: v.id,
            name: v.name,
            city: v.city,
            state: v.state,
            address: v.address,
            phone: v.phone,
            image_link: v.image_link,
            facebook_link: v.facebook_link,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CityGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// Group venues by city, groups in first-seen order and venues in input
/// order. A group's `state` comes from the last venue added to it; venues
/// of one city are assumed to share a state and this is not checked.
pub fn group_by_city(venues: Vec<venue::Model>, upcoming: &HashMap<i32, i64>) -> Vec<CityGroup> {
    let mut groups: Vec<CityGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for v in venues {
        let summary = VenueSummary {
            id: v.id,
            num_upcoming_shows: upcoming.get(&v.id).copied().unwrap_or(0),
            name: v.name,
        };
        match index.get(&v.city) {
            Some(&i) => {
                let group = &mut groups[i];
                group.state = v.state;
                group.venues.push(summary);
            }
            None => {
                index.insert(v.city.clone(), groups.len());
                groups.push(CityGroup {
                    city: v.city,
                    state: v.state,
                    venues: vec![summary],
                });
            }
        }
    }
    groups
}

#[derive(Debug, Serialize)]
pub struct VenueShowResponse {
    pub artist_id: i32,
    pub artist_name: Option<String>,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

impl From<VenueShow> for VenueShowResponse {
    fn from((show, artist): VenueShow) -> Self {
        Self {
            artist_id: show.artist_id,
            artist_name: artist.as_ref().map(|a| a.name.clone()),
            artist_image_link: artist.and_then(|a| a.image_link),
            start_time: format_start_time(show.show_date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: VenueResponse,
    pub genres: Vec<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: String,
    pub past_shows: Vec<VenueShowResponse>,
    pub upcoming_shows: Vec<VenueShowResponse>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Serialize)]
pub struct VenueEditResponse {
    pub venue: VenueResponse,
    pub genres: Vec<String>,
    pub genre_choices: Vec<String>,
}

/// GET /venues
pub async fn list_venues(State(state): State<Arc<AppState>>) -> Json<Page<Vec<CityGroup>>> {
    let areas = match store::venues::list_with_upcoming_counts(&state.db, store::now()).await {
        Ok((venues, upcoming)) => group_by_city(venues, &upcoming),
        Err(e) => {
            tracing::error!(error = %e, "failed to load venues");
            Vec::new()
        }
    };
    Json(Page::new("venues", areas))
}

/// POST /venues/search
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Json<Page<SearchPage<VenueResponse>>> {
    let term = form.term();
    let hits = match store::venues::search(&state.db, term).await {
        Ok(hits) => hits.into_iter().map(VenueResponse::from).collect(),
        Err(e) => {
            tracing::error!(error = %e, search_term = term, "venue search failed");
            Vec::new()
        }
    };
    Json(Page::new("search_venues", SearchPage::new(hits, term)))
}

/// GET /venues/:id
pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Page<VenueDetailResponse>>, ApiError> {
    let detail = store::venues::detail(&state.db, id, store::now())
        .await
        .map_err(|e| ApiError::for_page("show_venue", e))?;

    let past_shows: Vec<VenueShowResponse> =
        detail.past_shows.into_iter().map(Into::into).collect();
    let upcoming_shows: Vec<VenueShowResponse> =
        detail.upcoming_shows.into_iter().map(Into::into).collect();

    Ok(Json(Page::new(
        "show_venue",
        VenueDetailResponse {
            website: detail.venue.facebook_link.clone(),
            venue: VenueResponse::from(detail.venue),
            genres: detail.genres,
            seeking_talent: state.seeking.venue_seeking_talent,
            seeking_description: state.seeking.venue_seeking_description.clone(),
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        },
    )))
}

/// GET /venues/create
pub async fn create_venue_form(State(state): State<Arc<AppState>>) -> Json<Page<FormPage>> {
    let genre_choices = store::genres::choices(&state.db)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to load genre choices");
            Vec::new()
        });
    Json(Page::new(
        "new_venue",
        FormPage {
            fields: VenueForm::FIELDS,
            genre_choices: Some(genre_choices),
        },
    ))
}

/// POST /venues/create
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Json<Page<()>> {
    let fields = FormFields::from(pairs);
    let result = match VenueForm::parse(&fields) {
        Ok(form) => store::venues::create(&state.db, form).await,
        Err(e) => Err(e.into()),
    };

    let notice = match result {
        Ok(venue) => Notice::listed(&notice::subject("Venue", Some(&venue.name))),
        Err(e) => {
            tracing::error!(error = %e, "venue could not be listed");
            Notice::listing_failed(&notice::subject("Venue", fields.name().as_deref()))
        }
    };
    Json(Page::home(notice))
}

/// GET /venues/:id/edit
pub async fn edit_venue_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Page<VenueEditResponse>>, ApiError> {
    let edit = store::venues::for_edit(&state.db, id)
        .await
        .map_err(|e| ApiError::for_page("edit_venue", e))?;
    Ok(Json(Page::new(
        "edit_venue",
        VenueEditResponse {
            venue: edit.venue.into(),
            genres: edit.genres,
            genre_choices: edit.genre_choices,
        },
    )))
}

/// POST /venues/:id/edit
///
/// Always redirects to the venue page; the notice says whether the update
/// went through.
pub async fn edit_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let fields = FormFields::from(pairs);
    let result = match VenueForm::parse(&fields) {
        Ok(form) => store::venues::update(&state.db, id, form).await,
        Err(e) => Err(e.into()),
    };

    let notice = match result {
        Ok(venue) => Notice::updated(&notice::subject("Venue", Some(&venue.name))),
        Err(e) => {
            tracing::error!(venue_id = id, error = %e, "venue could not be updated");
            Notice::update_failed(&notice::subject("Venue", fields.name().as_deref()))
        }
    };
    see_other(format!("/venues/{id}"), notice)
}

/// POST /venues/:id
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Json<Page<()>> {
    let notice = match store::venues::delete(&state.db, id).await {
        Ok(()) => Notice::deleted("venue"),
        Err(e) => {
            tracing::error!(venue_id = id, error = %e, "venue could not be deleted");
            Notice::delete_failed("venue")
        }
    };
    Json(Page::home(notice))
}
