use libsql::Connection;

use crate::error::Result;

/// Tables in dependency order; `reset_schema` drops them in reverse.
const TABLES: [&str; 9] = [
    "users",
    "checkins",
    "quiz_responses",
    "memories",
    "decision_traces",
    "ml_predictions",
    "nutrition_plans",
    "yoga_plans",
    "api_usage",
];

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            age INTEGER,
            gender TEXT,
            yoga_experience TEXT NOT NULL DEFAULT 'beginner',
            dietary_preferences TEXT NOT NULL DEFAULT '[]',
            allergies TEXT NOT NULL DEFAULT '[]',
            goals TEXT NOT NULL DEFAULT '[]',
            activity_level TEXT,
            created_at TEXT NOT NULL
        );

        -- Daily self-reports; measured columns stay NULL when not reported
        CREATE TABLE IF NOT EXISTS checkins (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            mood TEXT,
            mood_score INTEGER,
            appetite REAL,
            energy REAL,
            sleep_hours REAL,
            adherence REAL,
            ingredients TEXT,
            notes TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_checkins_user_date ON checkins(user_id, date);

        CREATE TABLE IF NOT EXISTS quiz_responses (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            stress INTEGER NOT NULL,
            anxiety INTEGER NOT NULL,
            motivation INTEGER NOT NULL,
            mindfulness INTEGER NOT NULL,
            appetite_indicator INTEGER NOT NULL,
            sleep_quality INTEGER NOT NULL,
            total_score INTEGER NOT NULL,
            responses TEXT NOT NULL DEFAULT '{}',
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_quiz_responses_user_date ON quiz_responses(user_id, date);

        CREATE TABLE IF NOT EXISTS memories (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            memory_type TEXT NOT NULL,
            content TEXT NOT NULL DEFAULT '{}',
            created_at TEXT NOT NULL,
            last_accessed TEXT,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_memories_user_accessed ON memories(user_id, last_accessed);

        -- Append-only audit log of reasoning runs
        CREATE TABLE IF NOT EXISTS decision_traces (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            agent_name TEXT NOT NULL,
            triggered_rules TEXT NOT NULL DEFAULT '[]',
            memory_retrieved TEXT NOT NULL DEFAULT '[]',
            plan_chosen TEXT NOT NULL,
            tools_called TEXT NOT NULL DEFAULT '{}',
            explanation TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_decision_traces_user_date ON decision_traces(user_id, date);

        CREATE TABLE IF NOT EXISTS ml_predictions (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            energy_trend TEXT NOT NULL,
            appetite_trend TEXT NOT NULL,
            input_features TEXT NOT NULL,
            confidence REAL NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_ml_predictions_user_date ON ml_predictions(user_id, date);

        CREATE TABLE IF NOT EXISTS nutrition_plans (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            meal_type TEXT NOT NULL,
            recipe_name TEXT NOT NULL,
            ingredients TEXT NOT NULL DEFAULT '[]',
            nutrients TEXT NOT NULL DEFAULT '{}',
            recipe_instructions TEXT NOT NULL,
            meal_simplicity_index REAL NOT NULL,
            sattvic_score REAL NOT NULL,
            created_by_agent TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_nutrition_plans_user_date ON nutrition_plans(user_id, date);

        CREATE TABLE IF NOT EXISTS yoga_plans (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            session_type TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            youtube_video_id TEXT NOT NULL,
            youtube_title TEXT NOT NULL,
            youtube_url TEXT NOT NULL,
            description TEXT NOT NULL,
            created_by_agent TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_yoga_plans_user_date ON yoga_plans(user_id, date);

        -- Third-party call counters, one row per (api, user, UTC day)
        CREATE TABLE IF NOT EXISTS api_usage (
            api_name TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            day TEXT NOT NULL,
            calls INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (api_name, user_id, day)
        );
        "#,
    )
    .await?;

    Ok(())
}

/// Drops every table this service owns. Data is gone afterwards.
pub async fn reset_schema(conn: &Connection) -> Result<()> {
    for table in TABLES.iter().rev() {
        conn.execute(&format!("DROP TABLE IF EXISTS {table}"), ())
            .await?;
        tracing::debug!(table, "Dropped table");
    }
    Ok(())
}
