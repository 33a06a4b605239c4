use chrono::Utc;
use libsql::{params, Connection};

use crate::error::{PranaError, Result};
use crate::models::{NewUser, User};

use super::{from_db_time, to_db_time};

pub struct UserRepository;

const USER_COLUMNS: &str = "id, email, name, age, gender, yoga_experience, dietary_preferences, \
                            allergies, goals, activity_level, created_at";

impl UserRepository {
    pub async fn create(conn: &Connection, user: &NewUser) -> Result<User> {
        if Self::get_by_email(conn, &user.email).await?.is_some() {
            return Err(PranaError::Conflict(format!(
                "Email already registered: {}",
                user.email
            )));
        }

        let created_at = Utc::now();
        conn.execute(
            r#"
            INSERT INTO users (
                email, name, age, gender, yoga_experience, dietary_preferences,
                allergies, goals, activity_level, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                user.email.clone(),
                user.name.clone(),
                user.age,
                user.gender.clone(),
                user.yoga_experience.to_string(),
                serde_json::to_string(&user.dietary_preferences)?,
                serde_json::to_string(&user.allergies)?,
                serde_json::to_string(&user.goals)?,
                user.activity_level.clone(),
                to_db_time(&created_at),
            ],
        )
        .await?;

        Ok(User {
            id: conn.last_insert_rowid(),
            email: user.email.clone(),
            name: user.name.clone(),
            age: user.age,
            gender: user.gender.clone(),
            yoga_experience: user.yoga_experience,
            dietary_preferences: user.dietary_preferences.clone(),
            allergies: user.allergies.clone(),
            goals: user.goals.clone(),
            activity_level: user.activity_level.clone(),
            created_at,
        })
    }

    pub async fn get_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn get_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn update(conn: &Connection, user: &User) -> Result<()> {
        let affected = conn
            .execute(
                r#"
                UPDATE users SET
                    name = ?2, age = ?3, gender = ?4, yoga_experience = ?5,
                    dietary_preferences = ?6, allergies = ?7, goals = ?8, activity_level = ?9
                WHERE id = ?1
                "#,
                params![
                    user.id,
                    user.name.clone(),
                    user.age,
                    user.gender.clone(),
                    user.yoga_experience.to_string(),
                    serde_json::to_string(&user.dietary_preferences)?,
                    serde_json::to_string(&user.allergies)?,
                    serde_json::to_string(&user.goals)?,
                    user.activity_level.clone(),
                ],
            )
            .await?;

        if affected == 0 {
            return Err(PranaError::NotFound(format!("User {}", user.id)));
        }
        Ok(())
    }

    fn row_to_user(row: &libsql::Row) -> Result<User> {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            age: row.get(3)?,
            gender: row.get(4)?,
            yoga_experience: row.get::<String>(5)?.parse().unwrap_or_default(),
            dietary_preferences: serde_json::from_str(&row.get::<String>(6)?).unwrap_or_default(),
            allergies: serde_json::from_str(&row.get::<String>(7)?).unwrap_or_default(),
            goals: serde_json::from_str(&row.get::<String>(8)?).unwrap_or_default(),
            activity_level: row.get(9)?,
            created_at: from_db_time(&row.get::<String>(10)?),
        })
    }
}
