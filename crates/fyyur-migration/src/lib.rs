pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_genres;
mod m20240101_000002_create_venues;
mod m20240101_000003_create_artists;
mod m20240101_000004_create_shows;
mod m20240101_000005_create_venue_genres;
mod m20240101_000006_create_artist_genres;
mod m20240101_000007_seed_genres;

pub use m20240101_000007_seed_genres::DEFAULT_GENRES;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_genres::Migration),
            Box::new(m20240101_000002_create_venues::Migration),
            Box::new(m20240101_000003_create_artists::Migration),
            Box::new(m20240101_000004_create_shows::Migration),
            Box::new(m20240101_000005_create_venue_genres::Migration),
            Box::new(m20240101_000006_create_artist_genres::Migration),
            Box::new(m20240101_000007_seed_genres::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{
        ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement,
    };

    async fn memory_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::connect(opt).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrations_apply_and_seed_genres() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();

        let backend = db.get_database_backend();
        let row = db
            .query_one(Statement::from_string(
                backend,
                r#"SELECT COUNT(*) AS n FROM "Genre""#,
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n as usize, DEFAULT_GENRES.len());
    }

    #[tokio::test]
    async fn test_migrations_roll_back_cleanly() {
        let db = memory_db().await;
        Migrator::up(&db, None).await.unwrap();
        Migrator::down(&db, None).await.unwrap();

        let manager = SchemaManager::new(&db);
        assert!(!manager.has_table("Venue").await.unwrap());
        assert!(!manager.has_table("venue_genres").await.unwrap());
    }
}
