use crate::domain::{models::developer::DeveloperProfile, ports::DeveloperRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresDeveloperRepo {
    pool: PgPool,
}

impl PostgresDeveloperRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeveloperRepository for PostgresDeveloperRepo {
    async fn create(&self, profile: &DeveloperProfile) -> Result<DeveloperProfile, AppError> {
        sqlx::query_as::<_, DeveloperProfile>(
            "INSERT INTO developers (id, user_id, display_name, headline, bio, skills, hourly_rate, wallet_address, avatar_url, availability_json, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING *"
        )
            .bind(&profile.id).bind(&profile.user_id).bind(&profile.display_name).bind(&profile.headline)
            .bind(&profile.bio).bind(&profile.skills).bind(profile.hourly_rate).bind(&profile.wallet_address)
            .bind(&profile.avatar_url).bind(&profile.availability_json).bind(profile.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<DeveloperProfile>, AppError> {
        sqlx::query_as::<_, DeveloperProfile>("SELECT * FROM developers WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_user(&self, user_id: &str) -> Result<Option<DeveloperProfile>, AppError> {
        sqlx::query_as::<_, DeveloperProfile>("SELECT * FROM developers WHERE user_id = $1").bind(user_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<DeveloperProfile>, AppError> {
        sqlx::query_as::<_, DeveloperProfile>("SELECT * FROM developers ORDER BY created_at ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, profile: &DeveloperProfile) -> Result<DeveloperProfile, AppError> {
        sqlx::query_as::<_, DeveloperProfile>(
            "UPDATE developers SET display_name=$1, headline=$2, bio=$3, skills=$4, hourly_rate=$5, wallet_address=$6, avatar_url=$7, availability_json=$8
             WHERE id=$9
             RETURNING *"
        )
            .bind(&profile.display_name).bind(&profile.headline).bind(&profile.bio).bind(&profile.skills)
            .bind(profile.hourly_rate).bind(&profile.wallet_address).bind(&profile.avatar_url).bind(&profile.availability_json)
            .bind(&profile.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM developers WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Developer not found".into())); }
        Ok(())
    }
}
