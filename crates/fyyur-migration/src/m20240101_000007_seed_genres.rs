use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_genres::Genre;

/// Genre tags offered by the venue and artist forms. Writes never create
/// genres, so these rows have to exist before anything can be tagged.
pub const DEFAULT_GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(Genre::Table).columns([Genre::Name]);
        for name in DEFAULT_GENRES {
            insert.values_panic([(*name).into()]);
        }
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Genre::Table)
            .and_where(Expr::col(Genre::Name).is_in(DEFAULT_GENRES.iter().copied()))
            .to_owned();
        manager.exec_stmt(delete).await
    }
}
