use chrono::NaiveDateTime;
use fyyur_db::entities::{artist, genre, show, venue};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

use super::{contains_ignore_case, genres, unit_of_work};
use crate::error::StoreError;
use crate::forms::ArtistForm;

/// Show by an artist, with the hosting venue if the row still exists.
pub type ArtistShow = (show::Model, Option<venue::Model>);

#[derive(Debug)]
pub struct ArtistDetail {
    pub artist: artist::Model,
    pub genres: Vec<String>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows: Vec<ArtistShow>,
}

async fn find<C: ConnectionTrait>(conn: &C, id: i32) -> Result<artist::Model, StoreError> {
    artist::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound {
            entity: "artist",
            id,
        })
}

async fn genre_names<C: ConnectionTrait>(
    conn: &C,
    artist: &artist::Model,
) -> Result<Vec<String>, StoreError> {
    Ok(artist
        .find_related(genre::Entity)
        .order_by_asc(genre::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect())
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<artist::Model>, StoreError> {
    unit_of_work(db, |txn| {
        Box::pin(async move {
            Ok(artist::Entity::find()
                .order_by_asc(artist::Column::Id)
                .all(txn)
                .await?)
        })
    })
    .await
}

pub async fn search(db: &DatabaseConnection, term: &str) -> Result<Vec<artist::Model>, StoreError> {
    let filter = contains_ignore_case(db.get_database_backend(), artist::Column::Name, term);
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            Ok(artist::Entity::find()
                .filter(filter)
                .order_by_asc(artist::Column::Id)
                .all(txn)
                .await?)
        })
    })
    .await
}

pub async fn detail(
    db: &DatabaseConnection,
    id: i32,
    now: NaiveDateTime,
) -> Result<ArtistDetail, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let artist = find(txn, id).await?;
            let genres = genre_names(txn, &artist).await?;

            let upcoming_shows = show::Entity::find()
                .filter(show::Column::ArtistId.eq(id))
                .filter(show::Column::ShowDate.gte(now))
                .order_by_asc(show::Column::ShowDate)
                .find_also_related(venue::Entity)
                .all(txn)
                .await?;

            let past_shows = show::Entity::find()
                .filter(show::Column::ArtistId.eq(id))
                .filter(show::Column::ShowDate.lt(now))
                .order_by_desc(show::Column::ShowDate)
                .find_also_related(venue::Entity)
                .all(txn)
                .await?;

            Ok(ArtistDetail {
                artist,
                genres,
                upcoming_shows,
                past_shows,
            })
        })
    })
    .await
}

/// Current values for pre-filling the edit form.
#[derive(Debug)]
pub struct ArtistEdit {
    pub artist: artist::Model,
    pub genres: Vec<String>,
    pub genre_choices: Vec<String>,
}

pub async fn for_edit(db: &DatabaseConnection, id: i32) -> Result<ArtistEdit, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let artist = find(txn, id).await?;
            let genres = genre_names(txn, &artist).await?;
            let genre_choices = genres::all(txn).await?.into_iter().map(|g| g.name).collect();
            Ok(ArtistEdit {
                artist,
                genres,
                genre_choices,
            })
        })
    })
    .await
}

pub async fn create(db: &DatabaseConnection, form: ArtistForm) -> Result<artist::Model, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let created = artist::ActiveModel {
                name: Set(form.name),
                city: Set(form.city),
                state: Set(form.state),
                phone: Set(form.phone),
                image_link: Set(form.image_link),
                facebook_link: Set(form.facebook_link),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            let resolved = genres::resolve(txn, &form.genres).await?;
            genres::set_artist(txn, created.id, &resolved).await?;
            tracing::info!(artist_id = created.id, genres = resolved.len(), "artist created");
            Ok(created)
        })
    })
    .await
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    form: ArtistForm,
) -> Result<artist::Model, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let mut active: artist::ActiveModel = find(txn, id).await?.into();
            active.name = Set(form.name);
            active.city = Set(form.city);
            active.state = Set(form.state);
            active.phone = Set(form.phone);
            active.image_link = Set(form.image_link);
            active.facebook_link = Set(form.facebook_link);
            let updated = active.update(txn).await?;

            let resolved = genres::resolve(txn, &form.genres).await?;
            genres::set_artist(txn, id, &resolved).await?;
            tracing::info!(artist_id = id, genres = resolved.len(), "artist updated");
            Ok(updated)
        })
    })
    .await
}

/// Same order as a venue delete: shows, genre links, then the row.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            find(txn, id).await?;

            let shows = show::Entity::delete_many()
                .filter(show::Column::ArtistId.eq(id))
                .exec(txn)
                .await?
                .rows_affected;
            let links = genres::clear_artist(txn, id).await?;
            artist::Entity::delete_by_id(id).exec(txn).await?;

            tracing::info!(artist_id = id, shows, links, "artist deleted");
            Ok(())
        })
    })
    .await
}
