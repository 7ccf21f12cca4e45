use std::time::Duration;

use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{CollectionName, Database},
    errors::AppResult,
    models::domain::RevokedToken,
    repositories::is_duplicate_key,
};

#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    async fn revoke(&self, token: RevokedToken) -> AppResult<()>;
    async fn is_revoked(&self, token_hash: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoRevokedTokenRepository {
    collection: Collection<RevokedToken>,
}

impl MongoRevokedTokenRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(CollectionName::RevokedTokens);
        Self { collection }
    }
}

#[async_trait]
impl RevokedTokenRepository for MongoRevokedTokenRepository {
    async fn revoke(&self, token: RevokedToken) -> AppResult<()> {
        match self.collection.insert_one(&token).await {
            Ok(_) => Ok(()),
            // Logging out twice with the same token is not an error.
            Err(e) if is_duplicate_key(&e) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn is_revoked(&self, token_hash: &str) -> AppResult<bool> {
        let token = self
            .collection
            .find_one(doc! { "token_hash": token_hash })
            .await?;
        Ok(token.is_some())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let token_hash_model = IndexModel::builder()
            .keys(doc! { "token_hash": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(token_hash_model).await?;
        log::info!("Created unique index on revoked_tokens.token_hash");

        let expires_at_model = IndexModel::builder()
            .keys(doc! { "expires_at": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(0))
                    .build(),
            )
            .build();
        self.collection.create_index(expires_at_model).await?;
        log::info!("Created TTL index on revoked_tokens.expires_at");

        Ok(())
    }
}
