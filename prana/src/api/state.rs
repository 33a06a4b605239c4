use std::sync::Arc;

use crate::clients::{UsdaClient, YoutubeClient};
use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::error::Result;
use crate::llm::LlmProvider;
use crate::services::{
    ChatService, CheckInService, DashboardService, FairnessService, NutritionService, Reasoner,
    ReportService, YogaService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub llm: LlmProvider,
    pub reasoner: Arc<Reasoner>,
    pub checkins: Arc<CheckInService>,
    pub nutrition: Arc<NutritionService>,
    pub yoga: Arc<YogaService>,
    pub reports: Arc<ReportService>,
    pub dashboard: Arc<DashboardService>,
    pub chat: Arc<ChatService>,
    pub fairness: FairnessService,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>, llm: LlmProvider) -> Result<Self> {
        let config = Arc::new(config);

        let usda = UsdaClient::new(&config.integrations)?;
        let youtube = YoutubeClient::new(&config.integrations)?;

        let reasoner = Arc::new(Reasoner::new(db.clone(), &config.reasoning));
        let nutrition = Arc::new(NutritionService::new(db.clone(), usda, llm.clone()));
        let yoga = Arc::new(YogaService::new(db.clone(), youtube));
        let reports = Arc::new(ReportService::new(db.clone()));
        let dashboard = Arc::new(DashboardService::new(db.clone()));
        let fairness = FairnessService::new(db.clone(), config.quota.clone());
        let chat = Arc::new(ChatService::new(llm.clone(), fairness.clone()));
        let checkins = Arc::new(CheckInService::new(
            db.clone(),
            reasoner.clone(),
            nutrition.clone(),
            yoga.clone(),
            fairness.clone(),
        ));

        Ok(Self {
            config,
            db,
            llm,
            reasoner,
            checkins,
            nutrition,
            yoga,
            reports,
            dashboard,
            chat,
            fairness,
        })
    }
}
