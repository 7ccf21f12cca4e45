use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{CollectionName, Database},
    errors::{AppError, AppResult},
    models::domain::Quiz,
    repositories::is_duplicate_key,
};

#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_share_code(&self, share_code: &str) -> AppResult<Option<Quiz>>;
    async fn share_code_exists(&self, share_code: &str) -> AppResult<bool>;
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Quiz>>;
    /// Newest first.
    async fn list_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Quiz>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(CollectionName::Quizzes);
        Self { collection }
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        match self.collection.insert_one(&quiz).await {
            Ok(_) => Ok(quiz),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadyExists(format!(
                "Quiz with share code '{}' already exists",
                quiz.share_code
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_share_code(&self, share_code: &str) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! { "share_code": share_code })
            .await?;
        Ok(quiz)
    }

    async fn share_code_exists(&self, share_code: &str) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "share_code": share_code })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Quiz>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let quizzes = self
            .collection
            .find(doc! { "id": { "$in": ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn list_by_teacher(&self, teacher_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self
            .collection
            .find(doc! { "teacher_id": teacher_id })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(quizzes)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let share_code_index = IndexModel::builder()
            .keys(doc! { "share_code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("share_code_unique".to_string())
                    .build(),
            )
            .build();

        let teacher_index = IndexModel::builder()
            .keys(doc! { "teacher_id": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("teacher_created".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(share_code_index).await?;
        self.collection.create_index(teacher_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}
