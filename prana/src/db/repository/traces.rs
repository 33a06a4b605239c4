use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{DecisionTrace, MlPrediction};

use super::{from_db_time, to_db_time};

pub struct TraceRepository;

const TRACE_COLUMNS: &str = "id, user_id, date, agent_name, triggered_rules, memory_retrieved, \
                             plan_chosen, tools_called, explanation";

const PREDICTION_COLUMNS: &str =
    "id, user_id, date, energy_trend, appetite_trend, input_features, confidence";

impl TraceRepository {
    /// Inserts the trace and its prediction in one transaction.
    pub async fn record(
        conn: &Connection,
        trace: &DecisionTrace,
        prediction: &MlPrediction,
    ) -> Result<()> {
        let triggered_rules = serde_json::to_string(&trace.triggered_rules)?;
        let memory_retrieved = serde_json::to_string(&trace.memory_retrieved)?;
        let plan_chosen = serde_json::to_string(&trace.plan_chosen)?;
        let tools_called = serde_json::to_string(&trace.tools_called)?;
        let input_features = serde_json::to_string(&prediction.input_features)?;

        let tx = conn.transaction().await?;

        tx.execute(
            r#"
            INSERT INTO decision_traces (
                id, user_id, date, agent_name, triggered_rules, memory_retrieved,
                plan_chosen, tools_called, explanation
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                trace.id.clone(),
                trace.user_id,
                to_db_time(&trace.date),
                trace.agent_name.clone(),
                triggered_rules,
                memory_retrieved,
                plan_chosen,
                tools_called,
                trace.explanation.clone(),
            ],
        )
        .await?;

        tx.execute(
            r#"
            INSERT INTO ml_predictions (
                id, user_id, date, energy_trend, appetite_trend, input_features, confidence
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                prediction.id.clone(),
                prediction.user_id,
                to_db_time(&prediction.date),
                prediction.energy_trend.to_string(),
                prediction.appetite_trend.to_string(),
                input_features,
                prediction.confidence,
            ],
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn recent(conn: &Connection, user_id: i64, limit: u32) -> Result<Vec<DecisionTrace>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {TRACE_COLUMNS} FROM decision_traces WHERE user_id = ?1 \
                     ORDER BY date DESC, rowid DESC LIMIT ?2"
                ),
                params![user_id, limit as i64],
            )
            .await?;
        Self::collect_traces(rows).await
    }

    /// Newest first.
    pub async fn since(
        conn: &Connection,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<DecisionTrace>> {
        let rows = conn
            .query(
                &format!(
                    "SELECT {TRACE_COLUMNS} FROM decision_traces WHERE user_id = ?1 AND date >= ?2 \
                     ORDER BY date DESC, rowid DESC"
                ),
                params![user_id, to_db_time(&since)],
            )
            .await?;
        Self::collect_traces(rows).await
    }

    pub async fn recent_predictions(
        conn: &Connection,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<MlPrediction>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {PREDICTION_COLUMNS} FROM ml_predictions WHERE user_id = ?1 \
                     ORDER BY date DESC, rowid DESC LIMIT ?2"
                ),
                params![user_id, limit as i64],
            )
            .await?;

        let mut predictions = Vec::new();
        while let Some(row) = rows.next().await? {
            predictions.push(Self::row_to_prediction(&row)?);
        }
        Ok(predictions)
    }

    async fn collect_traces(mut rows: libsql::Rows) -> Result<Vec<DecisionTrace>> {
        let mut traces = Vec::new();
        while let Some(row) = rows.next().await? {
            traces.push(Self::row_to_trace(&row)?);
        }
        Ok(traces)
    }

    fn row_to_trace(row: &libsql::Row) -> Result<DecisionTrace> {
        Ok(DecisionTrace {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: from_db_time(&row.get::<String>(2)?),
            agent_name: row.get(3)?,
            triggered_rules: serde_json::from_str(&row.get::<String>(4)?)?,
            memory_retrieved: serde_json::from_str(&row.get::<String>(5)?)?,
            plan_chosen: serde_json::from_str(&row.get::<String>(6)?)?,
            tools_called: serde_json::from_str(&row.get::<String>(7)?)?,
            explanation: row.get(8)?,
        })
    }

    fn row_to_prediction(row: &libsql::Row) -> Result<MlPrediction> {
        Ok(MlPrediction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: from_db_time(&row.get::<String>(2)?),
            energy_trend: row
                .get::<String>(3)?
                .parse()
                .map_err(crate::error::PranaError::Internal)?,
            appetite_trend: row
                .get::<String>(4)?
                .parse()
                .map_err(crate::error::PranaError::Internal)?,
            input_features: serde_json::from_str(&row.get::<String>(5)?)?,
            confidence: row.get(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::setup_test_db;
    use crate::models::{
        AppetiteTrend, EnergyTrend, FeatureSnapshot, RecommendationPlan, ToolsCalled,
        TrendPrediction, REASONER_AGENT_NAME,
    };

    fn trace(user_id: i64) -> DecisionTrace {
        DecisionTrace {
            id: nanoid::nanoid!(),
            user_id,
            date: Utc::now(),
            agent_name: REASONER_AGENT_NAME.to_string(),
            triggered_rules: vec![],
            memory_retrieved: vec![],
            plan_chosen: RecommendationPlan::default(),
            tools_called: ToolsCalled { ml_predictor: true },
            explanation: "No special rules triggered.".to_string(),
        }
    }

    fn prediction(user_id: i64) -> MlPrediction {
        MlPrediction::new(
            user_id,
            Utc::now(),
            FeatureSnapshot::default(),
            TrendPrediction {
                energy_trend: EnergyTrend::Medium,
                appetite_trend: AppetiteTrend::Normal,
                confidence: 0.75,
            },
        )
    }

    #[tokio::test]
    async fn test_record_round_trips_trace_and_prediction() {
        let (_dir, conn) = setup_test_db().await;
        let t = trace(1);
        let p = prediction(1);

        TraceRepository::record(&conn, &t, &p).await.unwrap();

        let traces = TraceRepository::recent(&conn, 1, 10).await.unwrap();
        assert_eq!(traces.len(), 1);
        assert_eq!(traces[0].plan_chosen, RecommendationPlan::default());
        assert!(traces[0].tools_called.ml_predictor);

        let predictions = TraceRepository::recent_predictions(&conn, 1, 10).await.unwrap();
        assert_eq!(predictions[0].energy_trend, EnergyTrend::Medium);
        assert_eq!(predictions[0].input_features, FeatureSnapshot::default());
    }

    #[tokio::test]
    async fn test_failed_prediction_insert_leaves_no_trace() {
        let (_dir, conn) = setup_test_db().await;
        let p = prediction(1);
        TraceRepository::record(&conn, &trace(1), &p).await.unwrap();

        // Reusing the prediction id violates its primary key.
        let orphan = trace(1);
        let result = TraceRepository::record(&conn, &orphan, &p).await;
        assert!(result.is_err());

        let traces = TraceRepository::recent(&conn, 1, 10).await.unwrap();
        assert_eq!(traces.len(), 1);
        assert_ne!(traces[0].id, orphan.id);
    }
}
