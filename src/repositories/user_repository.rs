use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{CollectionName, Database},
    errors::{AppError, AppResult},
    models::domain::User,
    repositories::is_duplicate_key,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>>;
    async fn link_google_id(&self, id: &str, google_id: &str) -> AppResult<()>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(CollectionName::Users);
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        match self.collection.insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "User with email '{}' already exists",
                user.email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "email": email }).await?;
        Ok(user)
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "google_id": google_id })
            .await?;
        Ok(user)
    }

    async fn link_google_id(&self, id: &str, google_id: &str) -> AppResult<()> {
        let result = self
            .collection
            .update_one(doc! { "id": id }, doc! { "$set": { "google_id": google_id } })
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!("User with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        let google_id_index = IndexModel::builder()
            .keys(doc! { "google_id": 1 })
            .options(IndexOptions::builder().unique(true).sparse(true).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(email_index).await?;
        self.collection.create_index(google_id_index).await?;
        log::info!("Created indexes for users collection");

        Ok(())
    }
}
