use chrono::NaiveDateTime;
use fyyur_db::entities::{artist, genre, show, venue};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

use super::{contains_ignore_case, genres, unit_of_work};
use crate::error::StoreError;
use crate::forms::VenueForm;

/// Show at a venue, with the performing artist if the row still exists.
pub type VenueShow = (show::Model, Option<artist::Model>);

#[derive(Debug)]
pub struct VenueDetail {
    pub venue: venue::Model,
    pub genres: Vec<String>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows: Vec<VenueShow>,
}

async fn find<C: ConnectionTrait>(conn: &C, id: i32) -> Result<venue::Model, StoreError> {
    venue::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound { entity: "venue", id })
}

async fn genre_names<C: ConnectionTrait>(
    conn: &C,
    venue: &venue::Model,
) -> Result<Vec<String>, StoreError> {
    Ok(venue
        .find_related(genre::Entity)
        .order_by_asc(genre::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect())
}

/// All venues in id order, plus the number of upcoming shows per venue id.
/// Venues with no upcoming show are absent from the map.
pub async fn list_with_upcoming_counts(
    db: &DatabaseConnection,
    now: NaiveDateTime,
) -> Result<(Vec<venue::Model>, HashMap<i32, i64>), StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let venues = venue::Entity::find()
                .order_by_asc(venue::Column::Id)
                .all(txn)
                .await?;

            let counts: Vec<(i32, i64)> = show::Entity::find()
                .select_only()
                .column(show::Column::VenueId)
                .column_as(show::Column::Id.count(), "upcoming")
                .filter(show::Column::ShowDate.gte(now))
                .group_by(show::Column::VenueId)
                .into_tuple()
                .all(txn)
                .await?;

            Ok((venues, counts.into_iter().collect()))
        })
    })
    .await
}

pub async fn search(db: &DatabaseConnection, term: &str) -> Result<Vec<venue::Model>, StoreError> {
    let filter = contains_ignore_case(db.get_database_backend(), venue::Column::Name, term);
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            Ok(venue::Entity::find()
                .filter(filter)
                .order_by_asc(venue::Column::Id)
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
) -> Result<VenueDetail, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let venue = find(txn, id).await?;
            let genres = genre_names(txn, &venue).await?;

            let upcoming_shows = show::Entity::find()
                .filter(show::Column::VenueId.eq(id))
                .filter(show::Column::ShowDate.gte(now))
                .order_by_asc(show::Column::ShowDate)
                .find_also_related(artist::Entity)
                .all(txn)
                .await?;

            let past_shows = show::Entity::find()
                .filter(show::Column::VenueId.eq(id))
                .filter(show::Column::ShowDate.lt(now))
                .order_by_desc(show::Column::ShowDate)
                .find_also_related(artist::Entity)
                .all(txn)
                .await?;

            Ok(VenueDetail {
                venue,
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
pub struct VenueEdit {
    pub venue: venue::Model,
    pub genres: Vec<String>,
    pub genre_choices: Vec<String>,
}

pub async fn for_edit(db: &DatabaseConnection, id: i32) -> Result<VenueEdit, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let venue = find(txn, id).await?;
            let genres = genre_names(txn, &venue).await?;
            let genre_choices = genres::all(txn).await?.into_iter().map(|g| g.name).collect();
            Ok(VenueEdit {
                venue,
                genres,
                genre_choices,
            })
        })
    })
    .await
}

pub async fn create(db: &DatabaseConnection, form: VenueForm) -> Result<venue::Model, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let created = venue::ActiveModel {
                name: Set(form.name),
                city: Set(form.city),
                state: Set(form.state),
                address: Set(form.address),
                phone: Set(form.phone),
                image_link: Set(form.image_link),
                facebook_link: Set(form.facebook_link),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            let resolved = genres::resolve(txn, &form.genres).await?;
            genres::set_venue(txn, created.id, &resolved).await?;
            tracing::info!(venue_id = created.id, genres = resolved.len(), "venue created");
            Ok(created)
        })
    })
    .await
}

/// Overwrite every field and the whole genre list.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    form: VenueForm,
) -> Result<venue::Model, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let mut active: venue::ActiveModel = find(txn, id).await?.into();
            active.name = Set(form.name);
            active.city = Set(form.city);
            active.state = Set(form.state);
            active.address = Set(form.address);
            active.phone = Set(form.phone);
            active.image_link = Set(form.image_link);
            active.facebook_link = Set(form.facebook_link);
            let updated = active.update(txn).await?;

            let resolved = genres::resolve(txn, &form.genres).await?;
            genres::set_venue(txn, id, &resolved).await?;
            tracing::info!(venue_id = id, genres = resolved.len(), "venue updated");
            Ok(updated)
        })
    })
    .await
}

/// Shows first, then genre links, then the venue row.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            find(txn, id).await?;

            let shows = show::Entity::delete_many()
                .filter(show::Column::VenueId.eq(id))
                .exec(txn)
                .await?
                .rows_affected;
            let links = genres::clear_venue(txn, id).await?;
            venue::Entity::delete_by_id(id).exec(txn).await?;

            tracing::info!(venue_id = id, shows, links, "venue deleted");
            Ok(())
        })
    })
    .await
}
