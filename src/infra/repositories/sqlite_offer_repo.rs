use crate::domain::models::offer::Offer;
use crate::domain::ports::OfferRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteOfferRepo {
    pool: SqlitePool,
}

impl SqliteOfferRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfferRepository for SqliteOfferRepo {
    async fn create(&self, offer: &Offer) -> Result<Offer, AppError> {
        sqlx::query_as::<_, Offer>(
            "INSERT INTO offers (id, code, offer_type, value, active, usage_limit, used_count, valid_until)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&offer.id).bind(&offer.code).bind(offer.offer_type).bind(offer.value)
            .bind(offer.active).bind(offer.usage_limit).bind(offer.used_count).bind(offer.valid_until)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Offer>, AppError> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
