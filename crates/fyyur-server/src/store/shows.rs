use fyyur_db::entities::{artist, show, venue};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::{BTreeSet, HashMap};

use super::unit_of_work;
use crate::error::StoreError;
use crate::forms::ShowForm;

/// A show joined to its venue and artist rows.
#[derive(Debug, Clone)]
pub struct ShowListing {
    pub show: show::Model,
    pub venue: Option<venue::Model>,
    pub artist: Option<artist::Model>,
}

/// Every show, past and future, in id order.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<ShowListing>, StoreError> {
    unit_of_work(db, |txn| {
        Box::pin(async move {
            let shows = show::Entity::find()
                .order_by_asc(show::Column::Id)
                .all(txn)
                .await?;
            if shows.is_empty() {
                return Ok(Vec::new());
            }

            let venue_ids: BTreeSet<i32> = shows.iter().map(|s| s.venue_id).collect();
            let artist_ids: BTreeSet<i32> = shows.iter().map(|s| s.artist_id).collect();

            let venues: HashMap<i32, venue::Model> = venue::Entity::find()
                .filter(venue::Column::Id.is_in(venue_ids))
                .all(txn)
                .await?
                .into_iter()
                .map(|v| (v.id, v))
                .collect();
            let artists: HashMap<i32, artist::Model> = artist::Entity::find()
                .filter(artist::Column::Id.is_in(artist_ids))
                .all(txn)
                .await?
                .into_iter()
                .map(|a| (a.id, a))
                .collect();

            Ok(shows
                .into_iter()
                .map(|show| ShowListing {
                    venue: venues.get(&show.venue_id).cloned(),
                    artist: artists.get(&show.artist_id).cloned(),
                    show,
                })
                .collect())
        })
    })
    .await
}

/// Insert a show. The venue and artist ids are not checked up front; an
/// unknown id is rejected by the foreign keys and nothing is persisted.
pub async fn create(db: &DatabaseConnection, form: ShowForm) -> Result<show::Model, StoreError> {
    unit_of_work(db, move |txn| {
        Box::pin(async move {
            let created = show::ActiveModel {
                venue_id: Set(form.venue_id),
                artist_id: Set(form.artist_id),
                show_date: Set(form.start_time),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            tracing::info!(
                show_id = created.id,
                venue_id = created.venue_id,
                artist_id = created.artist_id,
                "show created"
            );
            Ok(created)
        })
    })
    .await
}
