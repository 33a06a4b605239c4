pub mod api;
pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod models;
pub mod reasoning;
pub mod services;
