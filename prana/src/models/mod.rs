mod chat;
mod checkin;
mod dashboard;
mod memory;
mod plans;
mod quiz;
mod quota;
mod report;
mod trace;
mod user;
mod wellness;

pub use chat::*;
pub use checkin::*;
pub use dashboard::*;
pub use memory::*;
pub use plans::*;
pub use quiz::*;
pub use quota::*;
pub use report::*;
pub use trace::*;
pub use user::*;
pub use wellness::*;
