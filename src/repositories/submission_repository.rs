use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{CollectionName, Database},
    errors::{AppError, AppResult},
    models::domain::{Submission, UserRole},
    repositories::is_duplicate_key,
};

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Fails with `AlreadySubmitted` when a student row for the same quiz and
    /// student is already stored.
    async fn create(&self, submission: Submission) -> AppResult<Submission>;
    async fn has_submitted(&self, quiz_id: &str, student_id: &str) -> AppResult<bool>;
    async fn count_by_quiz(&self, quiz_id: &str) -> AppResult<u64>;
    /// Newest first.
    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Submission>>;
    /// Newest first.
    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<Submission>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<Submission>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(CollectionName::Submissions);
        Self { collection }
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn create(&self, submission: Submission) -> AppResult<Submission> {
        match self.collection.insert_one(&submission).await {
            Ok(_) => Ok(submission),
            Err(e) if is_duplicate_key(&e) => Err(AppError::AlreadySubmitted),
            Err(e) => Err(e.into()),
        }
    }

    async fn has_submitted(&self, quiz_id: &str, student_id: &str) -> AppResult<bool> {
        let submission = self
            .collection
            .find_one(doc! {
                "quiz_id": quiz_id,
                "student_id": student_id
            })
            .await?;
        Ok(submission.is_some())
    }

    async fn count_by_quiz(&self, quiz_id: &str) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "quiz_id": quiz_id })
            .await?;
        Ok(count)
    }

    async fn list_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Submission>> {
        let submissions = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(submissions)
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<Submission>> {
        let submissions = self
            .collection
            .find(doc! { "student_id": student_id })
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(submissions)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for submissions collection");

        // Teachers may resubmit, so uniqueness only covers student rows.
        let quiz_student_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1, "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("quiz_student_once".to_string())
                    .unique(true)
                    .partial_filter_expression(doc! { "role": UserRole::Student.as_str() })
                    .build(),
            )
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "submitted_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("student_submitted".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(quiz_student_index).await?;
        self.collection.create_index(student_index).await?;

        log::info!("Successfully created indexes for submissions collection");
        Ok(())
    }
}
