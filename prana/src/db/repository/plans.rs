use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::{PranaError, Result};
use crate::models::{NutritionPlan, YogaPlan};

use super::{from_db_time, to_db_time};

pub struct PlanRepository;

const NUTRITION_COLUMNS: &str = "id, user_id, date, meal_type, recipe_name, ingredients, \
                                 nutrients, recipe_instructions, meal_simplicity_index, \
                                 sattvic_score, created_by_agent";

const YOGA_COLUMNS: &str = "id, user_id, date, session_type, duration_minutes, youtube_video_id, \
                            youtube_title, youtube_url, description, created_by_agent";

impl PlanRepository {
    pub async fn create_nutrition(conn: &Connection, plan: &NutritionPlan) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO nutrition_plans ({NUTRITION_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                plan.id.clone(),
                plan.user_id,
                to_db_time(&plan.date),
                plan.meal_type.to_string(),
                plan.recipe_name.clone(),
                serde_json::to_string(&plan.ingredients)?,
                serde_json::to_string(&plan.nutrients)?,
                plan.recipe_instructions.clone(),
                plan.meal_simplicity_index,
                plan.sattvic_score,
                plan.created_by_agent.clone(),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn recent_nutrition(
        conn: &Connection,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<NutritionPlan>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {NUTRITION_COLUMNS} FROM nutrition_plans WHERE user_id = ?1 \
                     ORDER BY date DESC, rowid DESC LIMIT ?2"
                ),
                params![user_id, limit as i64],
            )
            .await?;

        let mut plans = Vec::new();
        while let Some(row) = rows.next().await? {
            plans.push(Self::row_to_nutrition(&row)?);
        }
        Ok(plans)
    }

    pub async fn nutrition_since(
        conn: &Connection,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<NutritionPlan>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {NUTRITION_COLUMNS} FROM nutrition_plans WHERE user_id = ?1 \
                     AND date >= ?2 ORDER BY date ASC, rowid ASC"
                ),
                params![user_id, to_db_time(&since)],
            )
            .await?;

        let mut plans = Vec::new();
        while let Some(row) = rows.next().await? {
            plans.push(Self::row_to_nutrition(&row)?);
        }
        Ok(plans)
    }

    pub async fn create_yoga(conn: &Connection, plan: &YogaPlan) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO yoga_plans ({YOGA_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                plan.id.clone(),
                plan.user_id,
                to_db_time(&plan.date),
                plan.session_type.to_string(),
                plan.duration_minutes as i64,
                plan.youtube_video_id.clone(),
                plan.youtube_title.clone(),
                plan.youtube_url.clone(),
                plan.description.clone(),
                plan.created_by_agent.clone(),
            ],
        )
        .await?;
        Ok(())
    }

    pub async fn recent_yoga(conn: &Connection, user_id: i64, limit: u32) -> Result<Vec<YogaPlan>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {YOGA_COLUMNS} FROM yoga_plans WHERE user_id = ?1 \
                     ORDER BY date DESC, rowid DESC LIMIT ?2"
                ),
                params![user_id, limit as i64],
            )
            .await?;

        let mut plans = Vec::new();
        while let Some(row) = rows.next().await? {
            plans.push(Self::row_to_yoga(&row)?);
        }
        Ok(plans)
    }

    pub async fn yoga_since(
        conn: &Connection,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Vec<YogaPlan>> {
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {YOGA_COLUMNS} FROM yoga_plans WHERE user_id = ?1 \
                     AND date >= ?2 ORDER BY date ASC, rowid ASC"
                ),
                params![user_id, to_db_time(&since)],
            )
            .await?;

        let mut plans = Vec::new();
        while let Some(row) = rows.next().await? {
            plans.push(Self::row_to_yoga(&row)?);
        }
        Ok(plans)
    }

    fn row_to_nutrition(row: &libsql::Row) -> Result<NutritionPlan> {
        Ok(NutritionPlan {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: from_db_time(&row.get::<String>(2)?),
            meal_type: row
                .get::<String>(3)?
                .parse()
                .map_err(PranaError::Internal)?,
            recipe_name: row.get(4)?,
            ingredients: serde_json::from_str(&row.get::<String>(5)?).unwrap_or_default(),
            nutrients: serde_json::from_str(&row.get::<String>(6)?).unwrap_or_default(),
            recipe_instructions: row.get(7)?,
            meal_simplicity_index: row.get(8)?,
            sattvic_score: row.get(9)?,
            created_by_agent: row.get(10)?,
        })
    }

    fn row_to_yoga(row: &libsql::Row) -> Result<YogaPlan> {
        Ok(YogaPlan {
            id: row.get(0)?,
            user_id: row.get(1)?,
            date: from_db_time(&row.get::<String>(2)?),
            session_type: row
                .get::<String>(3)?
                .parse()
                .map_err(PranaError::Internal)?,
            duration_minutes: row.get::<i64>(4)?.max(0) as u32,
            youtube_video_id: row.get(5)?,
            youtube_title: row.get(6)?,
            youtube_url: row.get(7)?,
            description: row.get(8)?,
            created_by_agent: row.get(9)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::setup_test_db;
    use crate::models::{MealType, Nutrients, SessionType, YOGA_AGENT_NAME};
    use chrono::Duration;

    #[tokio::test]
    async fn test_nutrition_plan_round_trip() {
        let (_dir, conn) = setup_test_db().await;
        let plan = NutritionPlan {
            id: nanoid::nanoid!(),
            user_id: 2,
            date: Utc::now(),
            meal_type: MealType::Lunch,
            recipe_name: "Sattvic Lunch with rice".to_string(),
            ingredients: vec!["rice".to_string()],
            nutrients: Nutrients {
                calories: 300.0,
                ..Default::default()
            },
            recipe_instructions: "Cook gently".to_string(),
            meal_simplicity_index: 8.0,
            sattvic_score: 7.5,
            created_by_agent: "NutritionAgent".to_string(),
        };

        PlanRepository::create_nutrition(&conn, &plan).await.unwrap();

        let fetched = PlanRepository::recent_nutrition(&conn, 2, 10).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].meal_type, MealType::Lunch);
        assert_eq!(fetched[0].nutrients.calories, 300.0);
    }

    #[tokio::test]
    async fn test_yoga_since_excludes_older_plans() {
        let (_dir, conn) = setup_test_db().await;
        let now = Utc::now();

        for (days_ago, session_type) in [(9, SessionType::Strength), (1, SessionType::Recovery)] {
            let plan = YogaPlan {
                id: nanoid::nanoid!(),
                user_id: 2,
                date: now - Duration::days(days_ago),
                session_type,
                duration_minutes: 20,
                youtube_video_id: "abc".to_string(),
                youtube_title: "Flow".to_string(),
                youtube_url: "https://www.youtube.com/watch?v=abc".to_string(),
                description: "A flow".to_string(),
                created_by_agent: YOGA_AGENT_NAME.to_string(),
            };
            PlanRepository::create_yoga(&conn, &plan).await.unwrap();
        }

        let recent = PlanRepository::yoga_since(&conn, 2, now - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].session_type, SessionType::Recovery);
    }
}
