use fyyur_db::entities::{artist_genre, genre, venue_genre};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::HashSet;

use super::unit_of_work;
use crate::error::StoreError;

/// Genre names offered by the create forms.
pub async fn choices(db: &DatabaseConnection) -> Result<Vec<String>, StoreError> {
    unit_of_work(db, |txn| {
        Box::pin(async move { Ok(all(txn).await?.into_iter().map(|g| g.name).collect()) })
    })
    .await
}

/// Every genre, in id order. Used for form choices.
pub async fn all<C: ConnectionTrait>(conn: &C) -> Result<Vec<genre::Model>, DbErr> {
    genre::Entity::find()
        .order_by_asc(genre::Column::Id)
        .all(conn)
        .await
}

/// Resolve submitted genre names to existing rows with one query.
///
/// Names without a matching row are dropped. Repeated names, and rows that
/// share a name, collapse to the lowest id.
pub async fn resolve<C: ConnectionTrait>(
    conn: &C,
    names: &[String],
) -> Result<Vec<genre::Model>, DbErr> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let rows = genre::Entity::find()
        .filter(genre::Column::Name.is_in(names.iter().cloned()))
        .order_by_asc(genre::Column::Id)
        .all(conn)
        .await?;
    Ok(first_per_name(rows))
}

fn first_per_name(rows: Vec<genre::Model>) -> Vec<genre::Model> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|g| seen.insert(g.name.clone()))
        .collect()
}

pub async fn clear_venue<C: ConnectionTrait>(conn: &C, venue_id: i32) -> Result<u64, DbErr> {
    let res = venue_genre::Entity::delete_many()
        .filter(venue_genre::Column::VenueId.eq(venue_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn clear_artist<C: ConnectionTrait>(conn: &C, artist_id: i32) -> Result<u64, DbErr> {
    let res = artist_genre::Entity::delete_many()
        .filter(artist_genre::Column::ArtistId.eq(artist_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

/// Replace the venue's whole association list with `genres`.
pub async fn set_venue<C: ConnectionTrait>(
    conn: &C,
    venue_id: i32,
    genres: &[genre::Model],
) -> Result<(), DbErr> {
    clear_venue(conn, venue_id).await?;
    if genres.is_empty() {
        return Ok(());
    }
    let links = genres.iter().map(|g| venue_genre::ActiveModel {
        venue_id: sea_orm::Set(venue_id),
        genre_id: sea_orm::Set(g.id),
    });
    venue_genre::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Replace the artist's whole association list with `genres`.
pub async fn set_artist<C: ConnectionTrait>(
    conn: &C,
    artist_id: i32,
    genres: &[genre::Model],
) -> Result<(), DbErr> {
    clear_artist(conn, artist_id).await?;
    if genres.is_empty() {
        return Ok(());
    }
    let links = genres.iter().map(|g| artist_genre::ActiveModel {
        artist_id: sea_orm::Set(artist_id),
        genre_id: sea_orm::Set(g.id),
    });
    artist_genre::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn g(id: i32, name: &str) -> genre::Model {
        genre::Model {
            id,
            name: name.into(),
        }
    }

    #[test]
    fn test_first_per_name_keeps_lowest_id() {
        let rows = vec![g(1, "Jazz"), g(4, "Blues"), g(9, "Jazz")];
        let kept = first_per_name(rows);
        assert_eq!(kept, vec![g(1, "Jazz"), g(4, "Blues")]);
    }

    #[tokio::test]
    async fn test_resolve_drops_unknown_names() {
        let db = test_support::test_db().await;
        let names = vec![
            "Jazz".to_string(),
            "Unknown-Genre".to_string(),
            "Jazz".to_string(),
        ];
        let resolved = resolve(&db, &names).await.unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "Jazz");
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let db = test_support::test_db().await;
        let resolved = resolve(&db, &["jazz".to_string()]).await.unwrap();
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn test_choices_list_seeded_genres() {
        let db = test_support::test_db().await;
        let names = choices(&db).await.unwrap();
        assert_eq!(names.len(), fyyur_migration::DEFAULT_GENRES.len());
        assert_eq!(names[0], "Alternative");
    }
}
