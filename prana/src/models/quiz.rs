use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score used for any dimension missing from a submission.
pub const DEFAULT_DIMENSION_SCORE: i32 = 50;
pub const MIN_DIMENSION_SCORE: i32 = 0;
pub const MAX_DIMENSION_SCORE: i32 = 100;

/// Rejects any submitted score outside 0..=100.
pub fn validate_quiz_responses(responses: &HashMap<String, i32>) -> Result<(), String> {
    let mut out_of_range: Vec<&str> = responses
        .iter()
        .filter(|(_, score)| !(MIN_DIMENSION_SCORE..=MAX_DIMENSION_SCORE).contains(*score))
        .map(|(key, _)| key.as_str())
        .collect();

    if out_of_range.is_empty() {
        return Ok(());
    }

    out_of_range.sort_unstable();
    Err(format!(
        "Quiz scores must be between {MIN_DIMENSION_SCORE} and {MAX_DIMENSION_SCORE}: {}",
        out_of_range.join(", ")
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizResponse {
    pub id: String,
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub stress: i32,
    pub anxiety: i32,
    pub motivation: i32,
    pub mindfulness: i32,
    pub appetite_indicator: i32,
    pub sleep_quality: i32,
    pub total_score: i32,
    pub responses: HashMap<String, i32>,
}

impl QuizResponse {
    /// Scores a raw submission keyed by dimension name.
    pub fn score(user_id: i64, responses: HashMap<String, i32>, date: DateTime<Utc>) -> Self {
        let get = |key: &str| {
            responses
                .get(key)
                .copied()
                .unwrap_or(DEFAULT_DIMENSION_SCORE)
        };

        let stress = get("stress");
        let anxiety = get("anxiety");
        let motivation = get("motivation");
        let mindfulness = get("mindfulness");
        let appetite_indicator = get("appetite");
        let sleep_quality = get("sleep");

        let sum: i64 = [stress, anxiety, motivation, mindfulness, appetite_indicator, sleep_quality]
            .into_iter()
            .map(i64::from)
            .sum();
        // The mean of six i32 values always fits back into i32.
        let total_score = i32::try_from(sum.div_euclid(6)).unwrap_or(i32::MAX);

        Self {
            id: nanoid::nanoid!(),
            user_id,
            date,
            stress,
            anxiety,
            motivation,
            mindfulness,
            appetite_indicator,
            sleep_quality,
            total_score,
            responses,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub scale: String,
    pub category: String,
}

const QUESTIONS: [(&str, &str); 6] = [
    ("stress", "How stressed do you feel today?"),
    ("anxiety", "Rate your anxiety level"),
    ("motivation", "How motivated are you today?"),
    ("mindfulness", "How mindful/present do you feel?"),
    ("appetite", "How is your appetite?"),
    ("sleep", "How was your sleep quality last night?"),
];

pub fn quiz_questions() -> Vec<QuizQuestion> {
    QUESTIONS
        .iter()
        .map(|(id, question)| QuizQuestion {
            id: id.to_string(),
            question: question.to_string(),
            scale: "1-10".to_string(),
            category: id.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dimensions_default_to_fifty() {
        let quiz = QuizResponse::score(1, HashMap::new(), Utc::now());
        assert_eq!(quiz.stress, 50);
        assert_eq!(quiz.sleep_quality, 50);
        assert_eq!(quiz.total_score, 50);
    }

    #[test]
    fn test_total_is_floored_mean() {
        let responses = HashMap::from([
            ("stress".to_string(), 90),
            ("anxiety".to_string(), 61),
            ("motivation".to_string(), 30),
        ]);
        let quiz = QuizResponse::score(1, responses, Utc::now());
        // (90 + 61 + 30 + 50 + 50 + 50) / 6 = 55.16
        assert_eq!(quiz.total_score, 55);
        assert_eq!(quiz.motivation, 30);
    }

    #[test]
    fn test_extreme_scores_do_not_overflow() {
        let responses = HashMap::from([
            ("stress".to_string(), i32::MAX),
            ("anxiety".to_string(), i32::MAX),
            ("motivation".to_string(), i32::MAX),
            ("mindfulness".to_string(), i32::MAX),
            ("appetite".to_string(), i32::MAX),
            ("sleep".to_string(), i32::MAX),
        ]);
        let quiz = QuizResponse::score(1, responses, Utc::now());
        assert_eq!(quiz.total_score, i32::MAX);

        let responses = HashMap::from([("stress".to_string(), i32::MIN)]);
        let quiz = QuizResponse::score(1, responses, Utc::now());
        assert_eq!(
            i64::from(quiz.total_score),
            (i64::from(i32::MIN) + 250).div_euclid(6)
        );
    }

    #[test]
    fn test_validate_quiz_responses() {
        let in_range = HashMap::from([("stress".to_string(), 0), ("sleep".to_string(), 100)]);
        assert!(validate_quiz_responses(&in_range).is_ok());

        let out_of_range = HashMap::from([
            ("stress".to_string(), i32::MAX),
            ("anxiety".to_string(), -1),
            ("motivation".to_string(), 40),
        ]);
        let message = validate_quiz_responses(&out_of_range).unwrap_err();
        assert!(message.ends_with("anxiety, stress"));
    }

    #[test]
    fn test_six_fixed_questions() {
        let questions = quiz_questions();
        assert_eq!(questions.len(), 6);
        assert_eq!(questions[0].id, "stress");
        assert_eq!(questions[5].category, "sleep");
    }
}
