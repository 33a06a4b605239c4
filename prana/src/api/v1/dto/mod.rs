//! v1 API request types.
//!
//! Domain records from `src/models/` are returned directly; only request
//! shapes that have no domain counterpart live here.

pub mod admin;
pub mod chat;
pub mod common;
pub mod dashboard;
pub mod memories;
pub mod nutrition;
pub mod quiz;
pub mod yoga;

pub use admin::*;
pub use chat::*;
pub use common::*;
pub use dashboard::*;
pub use memories::*;
pub use nutrition::*;
pub use quiz::*;
pub use yoga::*;
