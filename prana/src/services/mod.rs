pub mod chat;
mod checkin;
pub mod dashboard;
pub mod fairness;
pub mod nutrition;
mod reasoner;
pub mod report;
pub mod yoga;

pub use chat::ChatService;
pub use checkin::{distribute_ingredients, CheckInResult, CheckInService, GeneratedPlans};
pub use dashboard::DashboardService;
pub use fairness::{FairnessReport, FairnessService};
pub use nutrition::NutritionService;
pub use reasoner::Reasoner;
pub use report::ReportService;
pub use yoga::YogaService;
