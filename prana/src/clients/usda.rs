//! USDA FoodData Central nutrient lookup.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lru::LruCache;
use reqwest::Client;
use serde::Deserialize;

use crate::config::IntegrationsConfig;
use crate::error::{PranaError, Result};
use crate::models::{NutrientLookup, Nutrients};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<Food>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Food {
    description: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodNutrient {
    #[serde(default)]
    nutrient_name: String,
    #[serde(default)]
    value: f64,
}

#[derive(Clone)]
pub struct UsdaClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    cache: Arc<Mutex<LruCache<String, NutrientLookup>>>,
}

impl UsdaClient {
    pub fn new(config: &IntegrationsConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PranaError::Internal(format!("Failed to create USDA HTTP client: {e}")))?;

        let capacity = NonZeroUsize::new(config.nutrient_cache_size).unwrap_or(NonZeroUsize::MIN);

        Ok(Self {
            http,
            base_url: config.usda_base_url.trim_end_matches('/').to_string(),
            api_key: config.usda_api_key.clone(),
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        })
    }

    /// Looks up one ingredient. Never fails: transport errors, non-200
    /// responses and empty results come back as an unsuccessful lookup.
    pub async fn lookup(&self, ingredient: &str) -> NutrientLookup {
        let key = ingredient.trim().to_lowercase();

        if let Some(hit) = self.cached(&key) {
            tracing::debug!(ingredient, "Nutrient cache hit");
            return hit;
        }

        let Some(api_key) = self.api_key.as_deref() else {
            return NutrientLookup::failed(ingredient, "USDA API key not configured");
        };

        match self.search(api_key, ingredient).await {
            Ok(Some(lookup)) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.put(key, lookup.clone());
                }
                lookup
            }
            Ok(None) => NutrientLookup::failed(ingredient, "No data found"),
            Err(error) => {
                tracing::warn!(ingredient, error = %error, "USDA lookup failed");
                NutrientLookup::failed(ingredient, error.to_string())
            }
        }
    }

    fn cached(&self, key: &str) -> Option<NutrientLookup> {
        self.cache.lock().ok()?.get(key).cloned()
    }

    async fn search(&self, api_key: &str, ingredient: &str) -> Result<Option<NutrientLookup>> {
        let url = format!("{}/foods/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", api_key), ("query", ingredient), ("pageSize", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PranaError::Internal(format!("USDA returned {status}")));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.foods.into_iter().next().map(|food| {
            let name = food.description.unwrap_or_else(|| ingredient.to_string());
            NutrientLookup::found(ingredient, name, collect_nutrients(&food.food_nutrients))
        }))
    }
}

/// Maps FoodData Central nutrient names onto the tracked nutrients. Later
/// entries matching the same nutrient overwrite earlier ones.
fn collect_nutrients(entries: &[FoodNutrient]) -> Nutrients {
    let mut nutrients = Nutrients::default();

    for entry in entries {
        let name = entry.nutrient_name.to_lowercase();
        let slot = if name.contains("energy") || name.contains("calories") {
            &mut nutrients.calories
        } else if name.contains("protein") {
            &mut nutrients.protein
        } else if name.contains("fiber") {
            &mut nutrients.fiber
        } else if name.contains("calcium") {
            &mut nutrients.calcium
        } else if name.contains("iron") {
            &mut nutrients.iron
        } else if name.contains("magnesium") {
            &mut nutrients.magnesium
        } else {
            continue;
        };
        *slot = entry.value;
    }

    nutrients
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> UsdaClient {
        UsdaClient::new(&IntegrationsConfig {
            usda_api_key: Some("test-key".to_string()),
            usda_base_url: server.uri(),
            timeout_secs: 1,
            ..Default::default()
        })
        .unwrap()
    }

    fn lentil_body() -> serde_json::Value {
        json!({
            "foods": [{
                "description": "Lentils, raw",
                "foodNutrients": [
                    {"nutrientName": "Protein", "value": 24.6},
                    {"nutrientName": "Energy", "value": 352.0},
                    {"nutrientName": "Fiber, total dietary", "value": 10.7},
                    {"nutrientName": "Magnesium, Mg", "value": 47.0},
                    {"nutrientName": "Sodium, Na", "value": 6.0}
                ]
            }]
        })
    }

    #[tokio::test]
    async fn test_lookup_maps_nutrients() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .and(query_param("query", "lentils"))
            .and(query_param("pageSize", "1"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(lentil_body()))
            .mount(&server)
            .await;

        let lookup = client_for(&server).lookup("lentils").await;

        assert!(lookup.success);
        assert_eq!(lookup.food_name.as_deref(), Some("Lentils, raw"));
        let nutrients = lookup.nutrients.unwrap();
        assert_eq!(nutrients.calories, 352.0);
        assert_eq!(nutrients.protein, 24.6);
        assert_eq!(nutrients.fiber, 10.7);
        assert_eq!(nutrients.magnesium, 47.0);
        assert_eq!(nutrients.iron, 0.0);
    }

    #[tokio::test]
    async fn test_successful_lookups_are_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/foods/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(lentil_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.lookup("Lentils").await.success);
        assert!(client.lookup(" lentils ").await.success);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foods": []})))
            .mount(&server)
            .await;

        let lookup = client_for(&server).lookup("unobtainium").await;
        assert!(!lookup.success);
        assert_eq!(lookup.error.as_deref(), Some("No data found"));
    }

    #[tokio::test]
    async fn test_server_error_becomes_failed_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let lookup = client_for(&server).lookup("rice").await;
        assert!(!lookup.success);
        assert!(lookup.nutrients.is_none());
    }

    #[tokio::test]
    async fn test_timeout_becomes_failed_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(lentil_body())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let lookup = client_for(&server).lookup("lentils").await;
        assert!(!lookup.success);
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        let client = UsdaClient::new(&IntegrationsConfig::default()).unwrap();
        let lookup = client.lookup("rice").await;
        assert!(!lookup.success);
        assert_eq!(lookup.error.as_deref(), Some("USDA API key not configured"));
    }
}
