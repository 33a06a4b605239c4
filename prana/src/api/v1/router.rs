use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let user = Router::new()
        .route(
            "/",
            get(handlers::users::get_user).patch(handlers::users::update_user),
        )
        .route(
            "/checkins",
            get(handlers::checkins::list_checkins).post(handlers::checkins::submit_checkin),
        )
        .route(
            "/quiz",
            get(handlers::quiz::list_quizzes).post(handlers::quiz::submit_quiz),
        )
        .route("/reason", post(handlers::reasoning::reason))
        .route("/traces", get(handlers::reasoning::list_traces))
        .route("/traces/today", get(handlers::reasoning::today_traces))
        .route(
            "/memories",
            get(handlers::memories::list_memories).post(handlers::memories::create_memory),
        )
        .route("/nutrition/lookup", post(handlers::nutrition::lookup_nutrients))
        .route("/nutrition/recipe", post(handlers::nutrition::generate_recipe))
        .route(
            "/nutrition/plans",
            get(handlers::nutrition::list_plans).post(handlers::nutrition::create_plan),
        )
        .route("/nutrition/plans/today", get(handlers::nutrition::today_plans))
        .route("/yoga/plan", post(handlers::yoga::create_plan))
        .route("/yoga/weekly", post(handlers::yoga::weekly_plan))
        .route("/yoga/plans", get(handlers::yoga::list_plans))
        .route("/yoga/plans/today", get(handlers::yoga::today_plan))
        .route("/reports/weekly", get(handlers::reports::weekly_report))
        .route("/reports/monthly", get(handlers::reports::monthly_report))
        .route("/dashboard/overview", get(handlers::dashboard::overview))
        .route("/dashboard/trends", get(handlers::dashboard::trends))
        .route("/dashboard/top-items", get(handlers::dashboard::top_items))
        .route("/chat", post(handlers::chat::chat));

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .route("/quiz/questions", get(handlers::quiz::list_questions))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .route("/users", post(handlers::users::create_user))
        .nest("/users/{user_id}", user)
        .route(
            "/admin/fairness/{api}",
            get(handlers::admin::fairness_report),
        )
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
