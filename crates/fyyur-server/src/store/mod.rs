//! Data access. Every public operation here is one unit of work: it opens a
//! transaction on the pool, runs to completion inside it, and commits, or
//! rolls back on the first error. The pooled connection is released when
//! the transaction ends on either path.

pub mod artists;
pub mod genres;
pub mod shows;
pub mod venues;

use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbBackend, TransactionTrait};
use std::future::Future;
use std::pin::Pin;

use crate::error::StoreError;

/// Current time as stored in `show_date` (naive UTC).
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub(crate) async fn unit_of_work<F, T>(db: &DatabaseConnection, work: F) -> Result<T, StoreError>
where
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'c>>
        + Send,
    T: Send,
{
    db.transaction::<F, T, StoreError>(work)
        .await
        .map_err(StoreError::from)
}

/// Case-insensitive substring match. LIKE wildcards in `term` match
/// literally; an empty term matches every row.
///
/// Postgres uses `ILIKE`. Elsewhere both sides go through `LOWER`, which on
/// SQLite folds ASCII letters only.
pub(crate) fn contains_ignore_case(
    backend: DbBackend,
    col: impl IntoColumnRef,
    term: &str,
) -> SimpleExpr {
    match backend {
        DbBackend::Postgres => Expr::col(col).ilike(like_pattern(term)),
        _ => Expr::expr(Func::lower(Expr::col(col))).like(like_pattern(&term.to_lowercase())),
    }
}

fn like_pattern(term: &str) -> LikeExpr {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}
