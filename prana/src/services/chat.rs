//! Conversational wellness coach. Uses the configured LLM when one is
//! available and within the user's daily budget; otherwise answers from a
//! small set of keyword-matched replies.

use chrono::NaiveDate;

use crate::error::{PranaError, Result};
use crate::llm::prompts::coach_system_prompt;
use crate::llm::{CompletionOptions, LlmProvider};
use crate::models::{ChatMessage, ChatReply, ChatRole, ReplySource, User};
use crate::services::fairness::{FairnessService, OPENAI_API};

pub const NO_LLM_GREETING: &str =
    "I'm a wellness coach focused on Sattvic nutrition and yoga. How can I help you today?";

pub const SERVICE_TROUBLE_REPLY: &str = "I'm here to help with your wellness journey! However, I'm experiencing some technical difficulties with the AI service. You can still use the other features like check-ins, nutrition planning, and yoga recommendations. Please try again later or contact support if the issue persists.";

const YOGA_WORDS: [&str; 5] = ["yoga", "pose", "practice", "stretch", "meditation"];
const FOOD_WORDS: [&str; 7] = ["food", "meal", "nutrition", "eat", "diet", "recipe", "ingredient"];
const WELLNESS_WORDS: [&str; 6] = ["wellness", "health", "feel", "energy", "tired", "sleep"];

pub struct ChatService {
    llm: LlmProvider,
    fairness: FairnessService,
}

impl ChatService {
    pub fn new(llm: LlmProvider, fairness: FairnessService) -> Self {
        Self { llm, fairness }
    }

    pub async fn reply(&self, user: &User, messages: &[ChatMessage], today: NaiveDate) -> Result<ChatReply> {
        if !self.llm.is_available() {
            return Ok(ChatReply::fallback(NO_LLM_GREETING));
        }

        let query = messages
            .last()
            .map(|message| message.content.as_str())
            .unwrap_or_default();

        if messages.is_empty() {
            return Ok(ChatReply::fallback(fallback_reply(query, user)));
        }

        let quota = self.fairness.check_quota(OPENAI_API, user.id, today).await?;
        if !quota.allowed {
            return Ok(ChatReply::fallback(fallback_reply(query, user)));
        }

        let system_prompt = coach_system_prompt(user);
        let options = CompletionOptions {
            temperature: Some(0.7),
            max_tokens: Some(500),
        };

        match self.llm.chat(Some(&system_prompt), messages, Some(&options)).await {
            Ok(message) => {
                self.fairness.record_call(OPENAI_API, user.id, today).await?;
                Ok(ChatReply {
                    role: ChatRole::Assistant,
                    message,
                    source: ReplySource::Llm,
                })
            }
            Err(error) => {
                tracing::warn!(user_id = user.id, error = %error, "Chat completion failed, using fallback reply");
                Ok(ChatReply::fallback(reply_for_error(&error, query, user)))
            }
        }
    }
}

/// Quota problems get a topical answer; a missing model gets an apology.
fn reply_for_error(error: &PranaError, query: &str, user: &User) -> String {
    let message = error.to_string().to_lowercase();
    let exhausted = ["quota", "429", "billing", "rate limit"]
        .iter()
        .any(|word| message.contains(word));
    let missing_model = ["model", "404", "not found"]
        .iter()
        .any(|word| message.contains(word));

    if !exhausted && missing_model {
        SERVICE_TROUBLE_REPLY.to_string()
    } else {
        fallback_reply(query, user)
    }
}

fn mentions(query: &str, words: &[&str]) -> bool {
    words.iter().any(|word| query.contains(word))
}

/// Canned coaching answer picked by keywords in the user's last message.
pub fn fallback_reply(query: &str, user: &User) -> String {
    let query = query.to_lowercase();
    let experience = user.yoga_experience;

    if mentions(&query, &YOGA_WORDS) {
        if query.contains("beginner") || query.contains("start") {
            return format!("Great question! For beginners, I recommend starting with gentle yoga poses like Child's Pose (Balasana), Mountain Pose (Tadasana), and Cat-Cow stretches. Since you're at the {experience} level, you might enjoy a 15-20 minute morning routine focusing on flexibility and breathing. Would you like me to suggest a specific yoga plan for today?");
        }
        if query.contains("stress") || query.contains("relax") {
            return "For stress relief, I recommend restorative yoga poses like Legs Up the Wall, Child's Pose, and Corpse Pose (Savasana). Combine this with deep breathing exercises - try alternate nostril breathing (Nadi Shodhana) for 5 minutes. A gentle 20-30 minute evening practice can work wonders for relaxation.".to_string();
        }
        return format!("Yoga is wonderful for overall wellness! Based on your {experience} experience level, I'd suggest focusing on poses that align with your goals. For flexibility, try forward folds and twists. For strength, incorporate Warrior poses and Plank. Would you like specific recommendations?");
    }

    if mentions(&query, &FOOD_WORDS) {
        if query.contains("sattvic") || query.contains("yoga") {
            return "Sattvic nutrition focuses on fresh, light, plant-based foods that promote clarity and energy. Great options include: fresh fruits, vegetables, whole grains (brown rice, oats), legumes (lentils, mung beans), nuts, seeds, and dairy products like ghee and fresh milk. Avoid processed foods, onions, garlic, and overly spicy foods. Would you like a specific meal plan?".to_string();
        }
        if query.contains("breakfast") {
            return "A Sattvic breakfast could include: oatmeal with fresh fruits and honey, fresh fruit salad, or a smoothie with banana, dates, and nuts. These provide sustained energy without heaviness.".to_string();
        }
        if query.contains("lunch") {
            return "For lunch, consider: brown rice with dal (lentils), steamed vegetables, fresh salad, and roti (whole wheat flatbread). This combination provides protein, fiber, and essential nutrients.".to_string();
        }
        if query.contains("dinner") {
            return "A light Sattvic dinner might include: vegetable soup, steamed vegetables, or a simple khichdi (rice and lentils). Keep dinner light and early (ideally 2-3 hours before sleep) for better digestion.".to_string();
        }
        let diet = user.dietary_preferences.join(", ");
        let goals = user.goals.join(", ");
        return format!("Based on your dietary preferences ({diet}), I can help you plan nutritious, Sattvic meals. Focus on fresh, whole foods that align with your goals: {goals}. Would you like specific recipe suggestions?");
    }

    if mentions(&query, &WELLNESS_WORDS) {
        return "Wellness is a holistic journey! Combine daily yoga practice (even 15-20 minutes), Sattvic nutrition, adequate sleep (7-8 hours), and mindfulness. Start with small, consistent habits - perhaps a morning yoga routine and mindful eating. How can I help you create a personalized wellness plan?".to_string();
    }

    let name = &user.name;
    format!("Namaste {name}! I'm here to help with your wellness journey. I can assist with:\n\n• Yoga practice recommendations based on your {experience} level\n• Sattvic nutrition and meal planning\n• Wellness tips and guidance\n• Stress management through yoga and nutrition\n\nWhat would you like to explore today? Feel free to ask about specific yoga poses, meal ideas, or wellness practices!")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::{ApiLimit, LlmConfig, QuotaConfig};
    use crate::db::test_support::test_backend;
    use crate::db::DatabaseBackend;
    use crate::models::{NewUser, YogaExperience};

    async fn registered(db: &std::sync::Arc<dyn DatabaseBackend>) -> User {
        db.create_user(&NewUser {
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            yoga_experience: YogaExperience::Intermediate,
            dietary_preferences: vec!["vegetarian".to_string()],
            goals: vec!["calm".to_string()],
            ..Default::default()
        })
        .await
        .unwrap()
    }

    fn llm_at(server: &MockServer) -> LlmProvider {
        LlmProvider::new(Some(&LlmConfig {
            model: "openai/gpt-4o-mini".to_string(),
            api_key: Some("sk-test".to_string()),
            base_url: Some(server.uri()),
            timeout_secs: 5,
            max_retries: 0,
        }))
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    fn sample_user() -> User {
        User {
            id: 1,
            email: "asha@example.com".to_string(),
            name: "Asha".to_string(),
            age: None,
            gender: None,
            yoga_experience: YogaExperience::Beginner,
            dietary_preferences: vec!["vegan".to_string()],
            allergies: vec![],
            goals: vec!["sleep".to_string()],
            activity_level: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fallback_reply_follows_keywords() {
        let user = sample_user();

        assert!(fallback_reply("How do I START with yoga?", &user).contains("at the beginner level"));
        assert!(fallback_reply("yoga to relax", &user).starts_with("For stress relief"));
        assert!(fallback_reply("what to eat for breakfast", &user).starts_with("A Sattvic breakfast"));
        assert!(fallback_reply("a meal idea", &user).contains("preferences (vegan)"));
        assert!(fallback_reply("I feel tired", &user).starts_with("Wellness is a holistic journey"));
        assert!(fallback_reply("hello", &user).starts_with("Namaste Asha!"));
    }

    #[test]
    fn test_error_replies() {
        let user = sample_user();

        let missing = PranaError::Llm("LLM API error: The model `gpt-9` does not exist".to_string());
        assert_eq!(reply_for_error(&missing, "yoga", &user), SERVICE_TROUBLE_REPLY);

        let limited = PranaError::Llm("LLM rate limit exceeded".to_string());
        assert!(reply_for_error(&limited, "yoga", &user).starts_with("Yoga is wonderful"));
    }

    #[tokio::test]
    async fn test_without_llm_greets() {
        let (_dir, db) = test_backend().await;
        let user = registered(&db).await;
        let service = ChatService::new(
            LlmProvider::new(None),
            FairnessService::new(db.clone(), QuotaConfig::default()),
        );

        let reply = service
            .reply(&user, &[ChatMessage::user("hi")], Utc::now().date_naive())
            .await
            .unwrap();

        assert_eq!(reply.message, NO_LLM_GREETING);
        assert_eq!(reply.source, ReplySource::Fallback);
        assert_eq!(reply.role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn test_llm_reply_is_counted() {
        let (_dir, db) = test_backend().await;
        let user = registered(&db).await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Try Nadi Shodhana.")))
            .expect(1)
            .mount(&server)
            .await;

        let service = ChatService::new(
            llm_at(&server),
            FairnessService::new(db.clone(), QuotaConfig::default()),
        );
        let today = Utc::now().date_naive();

        let reply = service
            .reply(&user, &[ChatMessage::user("I can't switch off at night")], today)
            .await
            .unwrap();

        assert_eq!(reply.message, "Try Nadi Shodhana.");
        assert_eq!(reply.source, ReplySource::Llm);
        assert_eq!(db.api_calls(OPENAI_API, user.id, today).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_model_apologizes() {
        let (_dir, db) = test_backend().await;
        let user = registered(&db).await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {
                    "message": "The model `gpt-4o-mini` does not exist",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "model_not_found"
                }
            })))
            .mount(&server)
            .await;

        let service = ChatService::new(
            llm_at(&server),
            FairnessService::new(db.clone(), QuotaConfig::default()),
        );
        let today = Utc::now().date_naive();

        let reply = service
            .reply(&user, &[ChatMessage::user("yoga please")], today)
            .await
            .unwrap();

        assert_eq!(reply.message, SERVICE_TROUBLE_REPLY);
        assert_eq!(db.api_calls(OPENAI_API, user.id, today).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_spent_budget_answers_without_llm() {
        let (_dir, db) = test_backend().await;
        let user = registered(&db).await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
            .expect(0)
            .mount(&server)
            .await;

        let mut quota = QuotaConfig::default();
        quota.openai = ApiLimit {
            daily: 100,
            per_user_daily: 1,
        };
        let service = ChatService::new(llm_at(&server), FairnessService::new(db.clone(), quota));
        let today = Utc::now().date_naive();
        db.increment_api_calls(OPENAI_API, user.id, today).await.unwrap();

        let reply = service
            .reply(&user, &[ChatMessage::user("dinner ideas for my diet")], today)
            .await
            .unwrap();

        assert!(reply.message.starts_with("A light Sattvic dinner"));
        assert_eq!(reply.source, ReplySource::Fallback);
    }
}
