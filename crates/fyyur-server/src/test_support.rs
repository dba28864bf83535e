//! Fixtures for tests: an in-memory SQLite database with the real
//! migrations applied, plus helpers that insert rows through the store.

use chrono::{Duration, NaiveDateTime};
use fyyur_db::entities::{artist, genre, show, venue};
use fyyur_db::{AppState, SeekingDefaults};
use fyyur_migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use std::sync::Arc;

use crate::forms::{ArtistForm, ShowForm, VenueForm};
use crate::store;

/// In-memory database with no tables, so every query fails.
pub async fn unmigrated_db() -> DatabaseConnection {
    // one pooled connection, kept open: every new SQLite memory connection
    // would otherwise get its own empty database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    Database::connect(opt).await.unwrap()
}

pub async fn test_db() -> DatabaseConnection {
    let db = unmigrated_db().await;
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    Arc::new(AppState {
        db,
        seeking: SeekingDefaults::default(),
    })
}

pub fn days_from_now(days: i64) -> NaiveDateTime {
    store::now() + Duration::days(days)
}

pub fn venue_form(name: &str, city: &str, state: &str) -> VenueForm {
    VenueForm {
        name: name.into(),
        city: city.into(),
        state: state.into(),
        address: "1015 Folsom Street".into(),
        phone: None,
        image_link: None,
        facebook_link: None,
        genres: Vec::new(),
    }
}

pub fn artist_form(name: &str) -> ArtistForm {
    ArtistForm {
        name: name.into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        phone: None,
        image_link: Some(format!("https://img.example.com/{}.jpg", name.len())),
        facebook_link: None,
        genres: Vec::new(),
    }
}

pub async fn venue(db: &DatabaseConnection, name: &str, city: &str, state: &str) -> venue::Model {
    store::venues::create(db, venue_form(name, city, state))
        .await
        .unwrap()
}

pub async fn artist(db: &DatabaseConnection, name: &str) -> artist::Model {
    store::artists::create(db, artist_form(name)).await.unwrap()
}

/// Genres are never created by the store, so tests insert extra ones directly.
pub async fn genre(db: &DatabaseConnection, name: &str) -> genre::Model {
    genre::ActiveModel {
        name: Set(name.into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn show(
    db: &DatabaseConnection,
    venue_id: i32,
    artist_id: i32,
    start_time: NaiveDateTime,
) -> show::Model {
    store::shows::create(
        db,
        ShowForm {
            venue_id,
            artist_id,
            start_time,
        },
    )
    .await
    .unwrap()
}
