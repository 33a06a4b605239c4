use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prana API",
        version = "1.0.0",
        description = "Wellness coaching backend. Daily check-ins drive an explainable reasoning pipeline that plans meals and yoga sessions.",
    ),
    paths(
        handlers::health::health_check,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::checkins::submit_checkin,
        handlers::checkins::list_checkins,
        handlers::quiz::list_questions,
        handlers::quiz::submit_quiz,
        handlers::quiz::list_quizzes,
        handlers::reasoning::reason,
        handlers::reasoning::list_traces,
        handlers::reasoning::today_traces,
        handlers::memories::create_memory,
        handlers::memories::list_memories,
        handlers::nutrition::lookup_nutrients,
        handlers::nutrition::generate_recipe,
        handlers::nutrition::create_plan,
        handlers::nutrition::list_plans,
        handlers::nutrition::today_plans,
        handlers::yoga::create_plan,
        handlers::yoga::weekly_plan,
        handlers::yoga::list_plans,
        handlers::yoga::today_plan,
        handlers::reports::weekly_report,
        handlers::reports::monthly_report,
        handlers::dashboard::overview,
        handlers::dashboard::trends,
        handlers::dashboard::top_items,
        handlers::chat::chat,
        handlers::admin::fairness_report,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Requests
        models::NewUser,
        models::UserUpdate,
        models::NewCheckIn,
        dto::SubmitQuizRequest,
        dto::CreateMemoryRequest,
        dto::NutrientLookupRequest,
        dto::RecipeRequest,
        dto::NutritionPlanRequest,
        dto::YogaPlanRequest,
        dto::ChatRequest,
        models::ChatMessage,
        models::ChatRole,
        // Records
        models::User,
        models::CheckIn,
        models::QuizResponse,
        models::QuizQuestion,
        models::Memory,
        models::DecisionTrace,
        models::MlPrediction,
        models::NutritionPlan,
        models::YogaPlan,
        // Reasoning
        models::ReasoningOutcome,
        models::RecommendationPlan,
        models::TriggeredRule,
        models::RetrievedMemory,
        // Nutrition and yoga
        models::NutrientLookup,
        models::Nutrients,
        models::GeneratedRecipe,
        models::VideoResult,
        // Reports
        models::WeeklyReport,
        models::MonthlyReport,
        // Dashboard
        models::DashboardOverview,
        models::DashboardTrends,
        models::TopItems,
        // Chat
        models::ChatReply,
        models::ReplySource,
        // Services
        services::CheckInResult,
        services::GeneratedPlans,
        services::FairnessReport,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::LlmStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "users", description = "User profiles"),
        (name = "checkins", description = "Daily check-ins and the plans they trigger"),
        (name = "quiz", description = "Wellness quiz"),
        (name = "reasoning", description = "Reasoning pipeline and decision traces"),
        (name = "memories", description = "User memories consulted during reasoning"),
        (name = "nutrition", description = "Nutrient lookup, recipes and meal plans"),
        (name = "yoga", description = "Yoga sessions and weekly plans"),
        (name = "reports", description = "Weekly and monthly summaries"),
        (name = "dashboard", description = "Progress overview, chart series and favourite items"),
        (name = "chat", description = "Conversational wellness coach"),
        (name = "admin", description = "Administrative operations (auth required)"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
