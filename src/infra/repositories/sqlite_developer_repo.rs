use crate::domain::{models::developer::DeveloperProfile, ports::DeveloperRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteDeveloperRepo {
    pool: SqlitePool,
}

impl SqliteDeveloperRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeveloperRepository for SqliteDeveloperRepo {
    async fn create(&self, profile: &DeveloperProfile) -> Result<DeveloperProfile, AppError> {
        sqlx::query_as::<_, DeveloperProfile>(
            "INSERT INTO developers (id, user_id, display_name, headline, bio, skills, hourly_rate, wallet_address, avatar_url, availability_json, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&profile.id).bind(&profile.user_id).bind(&profile.display_name).bind(&profile.headline)
            .bind(&profile.bio).bind(&profile.skills).bind(profile.hourly_rate).bind(&profile.wallet_address)
            .bind(&profile.avatar_url).bind(&profile.availability_json).bind(profile.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<DeveloperProfile>, AppError> {
        sqlx::query_as::<_, DeveloperProfile>("SELECT * FROM developers WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_user(&self, user_id: &str) -> Result<Option<DeveloperProfile>, AppError> {
        sqlx::query_as::<_, DeveloperProfile>("SELECT * FROM developers WHERE user_id = ?").bind(user_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<DeveloperProfile>, AppError> {
        sqlx::query_as::<_, DeveloperProfile>("SELECT * FROM developers ORDER BY created_at ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, profile: &DeveloperProfile) -> Result<DeveloperProfile, AppError> {
        sqlx::query_as::<_, DeveloperProfile>(
            "UPDATE developers SET display_name=?, headline=?, bio=?, skills=?, hourly_rate=?, wallet_address=?, avatar_url=?, availability_json=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&profile.display_name).bind(&profile.headline).bind(&profile.bio).bind(&profile.skills)
            .bind(profile.hourly_rate).bind(&profile.wallet_address).bind(&profile.avatar_url).bind(&profile.availability_json)
            .bind(&profile.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM developers WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Developer not found".into())); }
        Ok(())
    }
}
