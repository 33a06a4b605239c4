pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::test_support::test_state;

    const KEY: &str = "test-key";

    async fn test_app() -> (tempfile::TempDir, Router) {
        let (dir, state) = test_state(vec![KEY.to_string()]).await;
        (dir, create_router(state))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {KEY}"));
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn create_user(app: &Router, email: &str) -> i64 {
        let (status, json) = send(
            app,
            "POST",
            "/api/v1/users",
            Some(json!({ "email": email, "name": "Asha", "yoga_experience": "intermediate" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_protected_route_requires_auth() {
        let (_dir, app) = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"email":"a@b.co","name":"A"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unauthorized");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (_dir, app) = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["database"]["status"], "ok");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_quiz_questions_are_public() {
        let (_dir, app) = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/quiz/questions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["meta"]["total"], 6);
    }

    #[tokio::test]
    async fn test_openapi_json_is_public_and_valid() {
        let (_dir, app) = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let version = json["openapi"]
            .as_str()
            .expect("openapi field should be a string");
        assert!(version.starts_with('3'), "got: {version}");
        assert!(json["paths"]["/api/v1/users/{user_id}/checkins"].is_object());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (_dir, app) = test_app().await;
        create_user(&app, "asha@example.com").await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({ "email": "asha@example.com", "name": "Other" })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn test_invalid_user_payloads_are_rejected() {
        let (_dir, app) = test_app().await;

        let (status, json) = send(
            &app,
            "POST",
            "/api/v1/users",
            Some(json!({ "email": "not-an-email", "name": "Asha" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_request");

        let (status, json) = send(&app, "POST", "/api/v1/users", Some(json!({ "name": "Asha" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "Missing required field: email");
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (_dir, app) = test_app().await;

        let (status, json) = send(&app, "GET", "/api/v1/users/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");

        let (status, _) = send(&app, "POST", "/api/v1/users/999/checkins", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        for uri in ["/api/v1/users/999/traces", "/api/v1/users/999/traces/today"] {
            let (status, json) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(json["error"]["message"], "User 999 not found");
        }
    }

    #[tokio::test]
    async fn test_update_user_changes_only_given_fields() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, json) = send(
            &app,
            "PATCH",
            &format!("/api/v1/users/{id}"),
            Some(json!({ "goals": ["sleep better"] })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["goals"], json!(["sleep better"]));
        assert_eq!(json["data"]["name"], "Asha");
    }

    #[tokio::test]
    async fn test_out_of_range_checkin_is_rejected() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/checkins"),
            Some(json!({ "energy": 11 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_request");

        let (_, json) = send(&app, "GET", &format!("/api/v1/users/{id}/checkins"), None).await;
        assert_eq!(json["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_out_of_range_quiz_is_rejected() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/quiz"),
            Some(json!({ "responses": { "stress": 2147483647, "anxiety": 1 } })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "invalid_request");

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/quiz"),
            Some(json!({ "responses": { "stress": 100, "anxiety": 0 } })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["total_score"], (100 + 0 + 50 * 4) / 6);
    }

    #[tokio::test]
    async fn test_checkin_reasons_and_plans() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/checkins"),
            Some(json!({
                "mood_score": 4,
                "energy": 3,
                "appetite": 5,
                "sleep_hours": 6,
                "adherence": 40,
                "ingredients": "rice, moong dal, spinach"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let data = &json["data"];
        assert!(data["checkin_id"].is_string());
        assert!(data["reasoning"]["explanation"].is_string());
        assert!(data["reasoning"]["rules_triggered"].is_array());
        assert!(!data["plans"]["nutrition"].as_array().unwrap().is_empty());
        // No YouTube key: the session still gets the fallback video.
        assert!(data["plans"]["yoga"]["youtube_url"]
            .as_str()
            .unwrap()
            .starts_with("https://www.youtube.com/watch?v="));

        let (_, traces) = send(&app, "GET", &format!("/api/v1/users/{id}/traces"), None).await;
        assert_eq!(traces["meta"]["total"], 1);
        assert_eq!(traces["data"][0]["agent_name"], "ReasonerAgent");

        let (_, today) = send(&app, "GET", &format!("/api/v1/users/{id}/yoga/plans/today"), None).await;
        assert_eq!(today["data"]["user_id"], id);
    }

    #[tokio::test]
    async fn test_every_reason_call_appends_a_trace() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        for _ in 0..2 {
            let (status, json) = send(&app, "POST", &format!("/api/v1/users/{id}/reason"), None).await;
            assert_eq!(status, StatusCode::OK);
            assert!(json["data"]["confidence"].is_number());
        }

        let (_, traces) = send(&app, "GET", &format!("/api/v1/users/{id}/traces/today"), None).await;
        assert_eq!(traces["meta"]["total"], 2);
    }

    #[tokio::test]
    async fn test_memories_round_trip_through_api() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/memories"),
            Some(json!({ "memory_type": "liked_meal", "content": { "meal": "khichdi" } })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["memory_type"], "liked_meal");

        let (_, list) = send(&app, "GET", &format!("/api/v1/users/{id}/memories"), None).await;
        assert_eq!(list["data"][0]["content"]["meal"], "khichdi");
    }

    #[tokio::test]
    async fn test_recipe_falls_back_without_llm() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/nutrition/recipe"),
            Some(json!({ "ingredients": ["oats", "banana"], "meal_type": "breakfast" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["source"], "fallback");
        assert_eq!(json["data"]["focus"], "balanced_sattvic");
    }

    #[tokio::test]
    async fn test_yoga_quota_returns_rate_limited() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;
        let body = json!({ "session_type": "recovery", "duration_minutes": 20 });

        let mut last = StatusCode::OK;
        for _ in 0..11 {
            let (status, _) = send(&app, "POST", &format!("/api/v1/users/{id}/yoga/plan"), Some(body.clone())).await;
            last = status;
        }
        assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/v1/admin/fairness/youtube?user_ids={id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total_calls"], 10);
    }

    #[tokio::test]
    async fn test_weekly_report_on_empty_history() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, json) = send(&app, "GET", &format!("/api/v1/users/{id}/reports/weekly"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"].is_object());
    }

    #[tokio::test]
    async fn test_dashboard_reflects_checkin() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/checkins"),
            Some(json!({ "adherence": 60, "ingredients": "rice, moong dal, spinach" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = send(&app, "GET", &format!("/api/v1/users/{id}/dashboard/overview"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["yoga"]["streak"], 1);
        assert_eq!(json["data"]["wellness"]["adherence_avg"], 60.0);

        let (status, json) = send(&app, "GET", &format!("/api/v1/users/{id}/dashboard/trends?days=7"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["adherence"][0]["value"], 60.0);
        assert!(!json["data"]["protein"].as_array().unwrap().is_empty());

        let (status, json) = send(&app, "GET", &format!("/api/v1/users/{id}/dashboard/top-items"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!json["data"]["top_meals"].as_array().unwrap().is_empty());
        assert_eq!(json["data"]["recent_videos"].as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "GET", "/api/v1/users/999/dashboard/overview", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_without_llm_greets() {
        let (_dir, app) = test_app().await;
        let id = create_user(&app, "asha@example.com").await;

        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/chat"),
            Some(json!({ "messages": [{ "role": "user", "content": "What should I eat tonight?" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["role"], "assistant");
        assert_eq!(json["data"]["source"], "fallback");
        assert_eq!(
            json["data"]["message"],
            "I'm a wellness coach focused on Sattvic nutrition and yoga. How can I help you today?"
        );

        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/v1/users/{id}/chat"),
            Some(json!({ "messages": [{ "role": "user", "content": "" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/api/v1/users/999/chat", Some(json!({ "messages": [] }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
