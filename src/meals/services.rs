use anyhow::Context;
use tracing::{debug, info};

use crate::{
    meals::dto::MealListItem,
    qr,
    repo::{Meal, NewMeal},
    state::AppState,
};

/// Inserts the meal, writes its QR image, then records the image key.
///
/// The steps are not atomic: if the image cannot be written the meal stays
/// in the store without a `qr_code` and the error is returned.
pub async fn create_meal_with_qr(st: &AppState, new_meal: NewMeal) -> anyhow::Result<Meal> {
    let mut meal = st.repo.insert_meal(&new_meal).await?;

    let url = qr::meal_form_url(&st.config.public_base_url, meal.id);
    let png = qr::render_png(&url)?;
    let key = qr::meal_qr_filename(&meal.name, &meal.date);
    st.storage
        .put_object(&key, png, "image/png")
        .await
        .with_context(|| format!("store qr image {}", key))?;

    st.repo.update_meal_qr(meal.id, &key).await?;
    info!(meal_id = meal.id, qr_code = %key, %url, "meal created");
    meal.qr_code = Some(key);
    Ok(meal)
}

/// Removes the meal, all of its reviews and its QR image. Returns `false`
/// when there was no such meal.
pub async fn delete_meal_with_qr(st: &AppState, meal_id: i64) -> anyhow::Result<bool> {
    let Some(meal) = st.repo.get_meal(meal_id).await? else {
        debug!(meal_id, "delete of unknown meal ignored");
        return Ok(false);
    };

    if let Some(key) = meal.qr_code.as_deref() {
        st.storage
            .delete_object(key)
            .await
            .with_context(|| format!("delete qr image {}", key))?;
    }
    let reviews = st.repo.delete_reviews_by_meal_id(meal_id).await?;
    st.repo.delete_meal(meal_id).await?;

    info!(meal_id, reviews_deleted = reviews, "meal deleted");
    Ok(true)
}

/// Meals for the home page with their stats and a browser-loadable QR url.
pub async fn list_meals_with_stats(st: &AppState) -> anyhow::Result<Vec<MealListItem>> {
    let meals = st.repo.list_meals().await?;
    let mut stats = st.repo.meal_stats().await?;

    let mut items = Vec::with_capacity(meals.len());
    for meal in meals {
        let qr_url = match meal.qr_code.as_deref() {
            Some(key) => Some(st.storage.public_url(key).await?),
            None => None,
        };
        items.push(MealListItem {
            stats: stats.remove(&meal.id),
            qr_url,
            meal,
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::NewReview;

    fn soup() -> NewMeal {
        NewMeal {
            name: "Spicy Chicken!".into(),
            meal_type: "Dinner".into(),
            date: "2024-05-01".into(),
        }
    }

    #[tokio::test]
    async fn create_writes_qr_and_records_key() {
        let (state, storage) = AppState::fake().await;

        let meal = create_meal_with_qr(&state, soup()).await.unwrap();
        assert_eq!(meal.qr_code.as_deref(), Some("qr_spicy_chicken_2024-05-01.png"));

        let stored = state.repo.get_meal(meal.id).await.unwrap().unwrap();
        assert_eq!(stored.qr_code, meal.qr_code);

        let png = storage.get("qr_spicy_chicken_2024-05-01.png").expect("qr written");
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[tokio::test]
    async fn delete_removes_meal_reviews_and_qr() {
        let (state, storage) = AppState::fake().await;
        let meal = create_meal_with_qr(&state, soup()).await.unwrap();
        let other = create_meal_with_qr(
            &state,
            NewMeal {
                name: "Rice".into(),
                meal_type: "Lunch".into(),
                date: "2024-05-02".into(),
            },
        )
        .await
        .unwrap();
        for (meal_id, rating) in [(meal.id, 4), (meal.id, 2), (other.id, 5)] {
            state
                .repo
                .insert_review(&NewReview {
                    meal_id,
                    rating: Some(rating),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        assert!(delete_meal_with_qr(&state, meal.id).await.unwrap());

        assert!(state.repo.get_meal(meal.id).await.unwrap().is_none());
        let reviews = state.repo.list_reviews().await.unwrap();
        assert!(reviews.iter().all(|r| r.meal_id == other.id));
        assert_eq!(storage.keys(), ["qr_rice_2024-05-02.png"]);
    }

    #[tokio::test]
    async fn delete_of_unknown_meal_is_noop() {
        let (state, _) = AppState::fake().await;
        assert!(!delete_meal_with_qr(&state, 77).await.unwrap());
    }

    #[tokio::test]
    async fn list_attaches_stats_and_urls() {
        let (state, _) = AppState::fake().await;
        let meal = create_meal_with_qr(&state, soup()).await.unwrap();
        let bare = state
            .repo
            .insert_meal(&NewMeal {
                name: "Toast".into(),
                meal_type: "Breakfast".into(),
                date: "2024-04-01".into(),
            })
            .await
            .unwrap();
        state
            .repo
            .insert_review(&NewReview {
                meal_id: meal.id,
                rating: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();

        let items = list_meals_with_stats(&state).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].meal.id, meal.id);
        assert_eq!(items[0].stats.map(|s| s.review_count), Some(1));
        assert_eq!(
            items[0].qr_url.as_deref(),
            Some("https://fake.local/qr_spicy_chicken_2024-05-01.png")
        );
        assert_eq!(items[1].meal.id, bare.id);
        assert!(items[1].stats.is_none());
        assert!(items[1].qr_url.is_none());
    }
}
