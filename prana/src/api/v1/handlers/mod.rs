pub mod admin;
pub mod chat;
pub mod checkins;
pub mod dashboard;
pub(crate) mod health;
pub mod memories;
pub mod nutrition;
pub mod quiz;
pub mod reasoning;
pub mod reports;
pub mod users;
pub mod yoga;

pub use health::health_check;

use crate::api::AppState;
use crate::error::{PranaError, Result};
use crate::models::User;

pub(crate) async fn require_user(state: &AppState, user_id: i64) -> Result<User> {
    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| PranaError::NotFound(format!("User {user_id} not found")))
}
