//! Third-party HTTP collaborators. Every request carries a bounded timeout.

pub mod usda;
pub mod youtube;

pub use usda::UsdaClient;
pub use youtube::YoutubeClient;
