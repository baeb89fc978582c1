use anyhow::Context;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::types::{CommentedReview, Meal, NewMeal, NewReview, Review, Snack};
use super::KitchenRepo;

/// Single-file store for local runs; also backs the in-memory test state.
#[derive(Clone)]
pub struct SqliteRepo {
    db: SqlitePool,
}

impl SqliteRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KitchenRepo for SqliteRepo {
    async fn list_meals(&self) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            "SELECT id, name, type, date, qr_code FROM meals ORDER BY date DESC, id DESC",
        )
        .fetch_all(&self.db)
        .await
        .context("list meals")?;
        Ok(rows)
    }

    async fn get_meal(&self, id: i64) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            "SELECT id, name, type, date, qr_code FROM meals WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get meal")?;
        Ok(row)
    }

    async fn insert_meal(&self, meal: &NewMeal) -> anyhow::Result<Meal> {
        let row = sqlx::query_as::<_, Meal>(
            "INSERT INTO meals (name, type, date) VALUES (?, ?, ?)
             RETURNING id, name, type, date, qr_code",
        )
        .bind(&meal.name)
        .bind(&meal.meal_type)
        .bind(&meal.date)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(row)
    }

    async fn update_meal_qr(&self, id: i64, qr_code: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE meals SET qr_code = ? WHERE id = ?")
            .bind(qr_code)
            .bind(id)
            .execute(&self.db)
            .await
            .context("update meal qr_code")?;
        Ok(())
    }

    async fn delete_meal(&self, id: i64) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM meals WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(res.rows_affected())
    }

    async fn insert_review(&self, review: &NewReview) -> anyhow::Result<Review> {
        let row = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (meal_id, rating, comment, suggestion) VALUES (?, ?, ?, ?)
             RETURNING id, meal_id, rating, comment, suggestion",
        )
        .bind(review.meal_id)
        .bind(review.rating)
        .bind(review.comment.as_deref())
        .bind(review.suggestion.as_deref())
        .fetch_one(&self.db)
        .await
        .context("insert review")?;
        Ok(row)
    }

    async fn list_reviews(&self) -> anyhow::Result<Vec<Review>> {
        let rows = sqlx::query_as::<_, Review>(
            "SELECT id, meal_id, rating, comment, suggestion FROM reviews ORDER BY id",
        )
        .fetch_all(&self.db)
        .await
        .context("list reviews")?;
        Ok(rows)
    }

    async fn delete_reviews_by_meal_id(&self, meal_id: i64) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM reviews WHERE meal_id = ?")
            .bind(meal_id)
            .execute(&self.db)
            .await
            .context("delete reviews by meal")?;
        Ok(res.rows_affected())
    }

    async fn list_commented_reviews(&self) -> anyhow::Result<Vec<CommentedReview>> {
        let rows = sqlx::query_as::<_, CommentedReview>(
            "SELECT r.id, r.comment, m.name AS meal_name, m.date AS meal_date
               FROM reviews r
               JOIN meals m ON m.id = r.meal_id
              WHERE r.comment IS NOT NULL AND r.comment <> ''
              ORDER BY m.date DESC, r.id ASC",
        )
        .fetch_all(&self.db)
        .await
        .context("list commented reviews")?;
        Ok(rows)
    }

    async fn delete_review_by_id(&self, id: i64) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete review")?;
        Ok(res.rows_affected())
    }

    async fn delete_reviews_by_ids(&self, ids: &[i64]) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM reviews WHERE id IN (");
        let mut list = qb.separated(", ");
        for id in ids {
            list.push_bind(*id);
        }
        qb.push(")");
        let res = qb
            .build()
            .execute(&self.db)
            .await
            .context("delete reviews by id")?;
        Ok(res.rows_affected())
    }

    async fn insert_snack(&self, suggestion: &str) -> anyhow::Result<Snack> {
        let row = sqlx::query_as::<_, Snack>(
            "INSERT INTO snacks (suggestion) VALUES (?) RETURNING id, suggestion, created_at",
        )
        .bind(suggestion)
        .fetch_one(&self.db)
        .await
        .context("insert snack")?;
        Ok(row)
    }

    async fn list_snacks(&self) -> anyhow::Result<Vec<Snack>> {
        let rows = sqlx::query_as::<_, Snack>(
            "SELECT id, suggestion, created_at FROM snacks ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.db)
        .await
        .context("list snacks")?;
        Ok(rows)
    }

    async fn delete_snack_by_id(&self, id: i64) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM snacks WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete snack")?;
        Ok(res.rows_affected())
    }
}
