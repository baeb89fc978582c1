//! Aggregates computed from review rows. Nothing here is stored.

use std::collections::HashMap;

use serde::Serialize;

use crate::repo::{CommentedReview, Review};

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MealStats {
    pub average_rating: f64,
    pub review_count: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SuggestionCount {
    pub suggestion: String, // lowercased
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    pub id: i64,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub meal_name: String,
    pub comments: Vec<CommentEntry>,
}

/// Average rating and rated-review count per meal.
///
/// Reviews without a rating are skipped, so a meal that only has unrated
/// reviews does not appear in the result at all.
pub fn meal_stats(reviews: &[Review]) -> HashMap<i64, MealStats> {
    let mut sums: HashMap<i64, (i64, i64)> = HashMap::new();
    for review in reviews {
        if let Some(rating) = review.rating {
            let entry = sums.entry(review.meal_id).or_default();
            entry.0 += i64::from(rating);
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(meal_id, (sum, count))| {
            (
                meal_id,
                MealStats {
                    average_rating: rounded_mean(sum, count),
                    review_count: count,
                },
            )
        })
        .collect()
}

/// `sum / count` rounded to two decimals, half away from zero.
///
/// Done on integer hundredths so 0.125 rounds to 0.13 instead of whatever
/// the nearest double happens to be.
fn rounded_mean(sum: i64, count: i64) -> f64 {
    debug_assert!(count > 0);
    let scaled = sum * 100;
    let hundredths = (scaled.abs() * 2 + count) / (2 * count);
    let hundredths = if scaled < 0 { -hundredths } else { hundredths };
    hundredths as f64 / 100.0
}

/// Case fold shared by ranking and deletion, so a ranked row always
/// deletes every review counted in it.
pub fn suggestion_key(suggestion: &str) -> String {
    suggestion.to_lowercase()
}

/// Ids of the reviews whose suggestion folds to the same key as `target`.
pub fn reviews_matching_suggestion(reviews: &[Review], target: &str) -> Vec<i64> {
    let key = suggestion_key(target);
    reviews
        .iter()
        .filter(|r| r.suggestion.as_deref().map(suggestion_key).as_deref() == Some(key.as_str()))
        .map(|r| r.id)
        .collect()
}

/// Suggestions grouped case-insensitively, most frequent first.
///
/// Ties are ordered by the suggestion text.
pub fn rank_suggestions(reviews: &[Review]) -> Vec<SuggestionCount> {
    let mut counts: HashMap<String, i64> = HashMap::new();
    for suggestion in reviews.iter().filter_map(|r| r.suggestion.as_deref()) {
        if suggestion.is_empty() {
            continue;
        }
        *counts.entry(suggestion_key(suggestion)).or_default() += 1;
    }

    let mut ranked: Vec<SuggestionCount> = counts
        .into_iter()
        .map(|(suggestion, count)| SuggestionCount { suggestion, count })
        .collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.suggestion.cmp(&b.suggestion))
    });
    ranked
}

/// Groups commented reviews by meal name, keeping the order in which each
/// name first shows up. Meals sharing a name share a group.
pub fn group_comments(rows: Vec<CommentedReview>) -> Vec<CommentGroup> {
    let mut groups: Vec<CommentGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.meal_name.clone()).or_insert_with(|| {
            groups.push(CommentGroup {
                meal_name: row.meal_name.clone(),
                comments: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].comments.push(CommentEntry {
            id: row.id,
            comment: row.comment,
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(id: i64, meal_id: i64, rating: Option<i32>) -> Review {
        Review {
            id,
            meal_id,
            rating,
            comment: None,
            suggestion: None,
        }
    }

    fn suggested(id: i64, suggestion: Option<&str>) -> Review {
        Review {
            id,
            meal_id: 1,
            rating: None,
            comment: None,
            suggestion: suggestion.map(str::to_string),
        }
    }

    #[test]
    fn averages_only_rated_reviews() {
        let reviews = vec![
            rated(1, 7, Some(5)),
            rated(2, 7, Some(4)),
            rated(3, 7, None),
            rated(4, 8, Some(3)),
        ];
        let stats = meal_stats(&reviews);
        assert_eq!(
            stats[&7],
            MealStats {
                average_rating: 4.5,
                review_count: 2
            }
        );
        assert_eq!(stats[&8].average_rating, 3.0);
        assert_eq!(stats[&8].review_count, 1);
    }

    #[test]
    fn meals_without_ratings_are_absent() {
        let reviews = vec![rated(1, 7, None), rated(2, 7, None)];
        assert!(meal_stats(&reviews).is_empty());
        assert!(meal_stats(&[]).is_empty());
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let thirds = vec![rated(1, 1, Some(3)), rated(2, 1, Some(3)), rated(3, 1, Some(4))];
        assert_eq!(meal_stats(&thirds)[&1].average_rating, 3.33);

        let two_thirds = vec![rated(1, 1, Some(1)), rated(2, 1, Some(2)), rated(3, 1, Some(2))];
        assert_eq!(meal_stats(&two_thirds)[&1].average_rating, 1.67);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(rounded_mean(1, 8), 0.13); // 0.125
        assert_eq!(rounded_mean(-1, 8), -0.13);
        assert_eq!(rounded_mean(9, 2), 4.5);
    }

    #[test]
    fn suggestions_group_case_insensitively() {
        let reviews = vec![
            suggested(1, Some("Pizza")),
            suggested(2, Some("pizza")),
            suggested(3, Some("Tacos")),
        ];
        let ranked = rank_suggestions(&reviews);
        assert_eq!(
            ranked,
            vec![
                SuggestionCount {
                    suggestion: "pizza".into(),
                    count: 2
                },
                SuggestionCount {
                    suggestion: "tacos".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn empty_and_missing_suggestions_are_ignored() {
        let reviews = vec![suggested(1, None), suggested(2, Some("")), suggested(3, Some("Soup"))];
        let ranked = rank_suggestions(&reviews);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].suggestion, "soup");
    }

    #[test]
    fn ranking_ties_are_alphabetical() {
        let reviews = vec![
            suggested(1, Some("waffles")),
            suggested(2, Some("Bagels")),
            suggested(3, Some("curry")),
            suggested(4, Some("Curry")),
        ];
        let names: Vec<_> = rank_suggestions(&reviews)
            .into_iter()
            .map(|s| s.suggestion)
            .collect();
        assert_eq!(names, ["curry", "bagels", "waffles"]);
    }

    #[test]
    fn comments_group_by_meal_name_in_input_order() {
        let row = |id: i64, name: &str, comment: &str| CommentedReview {
            id,
            comment: comment.into(),
            meal_name: name.into(),
            meal_date: "2024-05-01".into(),
        };
        let groups = group_comments(vec![
            row(3, "Curry", "spicy"),
            row(1, "Stew", "cold"),
            row(4, "Curry", "great"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].meal_name, "Curry");
        assert_eq!(
            groups[0].comments.iter().map(|c| c.id).collect::<Vec<_>>(),
            [3, 4]
        );
        assert_eq!(groups[1].meal_name, "Stew");
    }

    #[test]
    fn matching_uses_the_same_fold_as_ranking() {
        let reviews = vec![
            suggested(1, Some("Éclair")),
            suggested(2, Some("éclair")),
            suggested(3, Some("ÉCLAIRS")),
            suggested(4, None),
        ];
        let ranked = rank_suggestions(&reviews);
        assert_eq!(ranked[0].suggestion, "éclair");
        assert_eq!(ranked[0].count, 2);
        assert_eq!(reviews_matching_suggestion(&reviews, &ranked[0].suggestion), [1, 2]);
        assert_eq!(reviews_matching_suggestion(&reviews, "ÉCLAIR"), [1, 2]);
        assert!(reviews_matching_suggestion(&reviews, "tart").is_empty());
    }
}
