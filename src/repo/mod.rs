//! Persistence for meals, reviews and snacks.
//!
//! Handlers only see [`KitchenRepo`]; the backend is picked from the
//! database URL at startup.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::reviews::stats::{self, MealStats, SuggestionCount};

mod postgres;
mod sqlite;
mod types;

pub use types::{CommentedReview, Meal, NewMeal, NewReview, Review, Snack};

#[async_trait]
pub trait KitchenRepo: Send + Sync {
    /// All meals, newest date first.
    async fn list_meals(&self) -> anyhow::Result<Vec<Meal>>;
    async fn get_meal(&self, id: i64) -> anyhow::Result<Option<Meal>>;
    async fn insert_meal(&self, meal: &NewMeal) -> anyhow::Result<Meal>;
    async fn update_meal_qr(&self, id: i64, qr_code: &str) -> anyhow::Result<()>;
    /// Returns the number of deleted rows (0 or 1).
    async fn delete_meal(&self, id: i64) -> anyhow::Result<u64>;

    async fn insert_review(&self, review: &NewReview) -> anyhow::Result<Review>;
    async fn list_reviews(&self) -> anyhow::Result<Vec<Review>>;
    async fn delete_reviews_by_meal_id(&self, meal_id: i64) -> anyhow::Result<u64>;
    /// Reviews with a non-empty comment, newest meal date first.
    async fn list_commented_reviews(&self) -> anyhow::Result<Vec<CommentedReview>>;
    async fn delete_review_by_id(&self, id: i64) -> anyhow::Result<u64>;
    async fn delete_reviews_by_ids(&self, ids: &[i64]) -> anyhow::Result<u64>;

    async fn insert_snack(&self, suggestion: &str) -> anyhow::Result<Snack>;
    /// All snacks, newest first.
    async fn list_snacks(&self) -> anyhow::Result<Vec<Snack>>;
    async fn delete_snack_by_id(&self, id: i64) -> anyhow::Result<u64>;

    async fn meal_stats(&self) -> anyhow::Result<HashMap<i64, MealStats>> {
        let reviews = self.list_reviews().await?;
        Ok(stats::meal_stats(&reviews))
    }

    async fn rank_suggestions(&self) -> anyhow::Result<Vec<SuggestionCount>> {
        let reviews = self.list_reviews().await?;
        Ok(stats::rank_suggestions(&reviews))
    }

    /// Deletes every review whose suggestion matches `suggestion` under the
    /// same case fold [`stats::rank_suggestions`] groups by.
    async fn delete_reviews_by_suggestion(&self, suggestion: &str) -> anyhow::Result<u64> {
        let reviews = self.list_reviews().await?;
        let ids = stats::reviews_matching_suggestion(&reviews, suggestion);
        if ids.is_empty() {
            return Ok(0);
        }
        self.delete_reviews_by_ids(&ids).await
    }
}

/// Connects to `database_url`, applies the matching migrations and returns
/// the repository for that backend.
pub async fn connect(database_url: &str) -> anyhow::Result<Arc<dyn KitchenRepo>> {
    if database_url.starts_with("sqlite:") {
        // Orphaned reviews are allowed on sqlite, so no FK enforcement.
        let options = SqliteConnectOptions::from_str(database_url)
            .context("parse sqlite url")?
            .create_if_missing(true)
            .foreign_keys(false);

        // An in-memory database disappears with its last connection, so
        // keep exactly one open for the life of the pool.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("connect to sqlite")?;
        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .context("run sqlite migrations")?;
        tracing::info!("using sqlite store");
        Ok(Arc::new(sqlite::SqliteRepo::new(pool)))
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations/postgres")
            .run(&pool)
            .await
            .context("run postgres migrations")?;
        tracing::info!("using postgres store");
        Ok(Arc::new(postgres::PgRepo::new(pool)))
    }
}
