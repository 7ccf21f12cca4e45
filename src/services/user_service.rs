use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::password::{hash_password_async, verify_password_async},
    errors::{AppError, AppResult},
    models::{
        domain::{User, UserRole},
        dto::request::{LoginRequest, RegisterRequest},
    },
    repositories::UserRepository,
    services::google_oauth::GoogleProfile,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        if request.has_missing_fields() {
            return Err(AppError::BadRequest("All fields are required".to_string()));
        }

        let role: UserRole = request
            .role
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid role".to_string()))?;

        request.validate()?;

        let email = normalize_email(&request.email);
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::BadRequest("Email already registered".to_string()));
        }

        let password_hash = hash_password_async(request.password.clone()).await?;
        let user = User::new(request.name.trim(), &email, &password_hash, role);

        // A concurrent registration can still win the unique index.
        let user = match self.repository.create(user).await {
            Err(AppError::AlreadyExists(_)) => {
                return Err(AppError::BadRequest("Email already registered".to_string()))
            }
            other => other?,
        };

        log::info!("Registered {} {}", user.role, user.id);
        Ok(user)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<User> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .repository
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(invalid)?;

        let password_hash = match user.password_hash.as_deref() {
            Some(hash) => hash,
            None => return Err(AppError::BadRequest("Please login with Google".to_string())),
        };

        if let Some(role) = request.role.as_deref().filter(|r| !r.trim().is_empty()) {
            if role.trim() != user.role.as_str() {
                return Err(AppError::Unauthorized(format!(
                    "Please login as {}",
                    user.role
                )));
            }
        }

        if !verify_password_async(request.password, password_hash.to_string()).await? {
            return Err(invalid());
        }

        Ok(user)
    }

    pub async fn get_user(&self, id: &str) -> AppResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }

    /// Signs in a Google profile: by Google id first, then by linking an
    /// existing account with the same email, else a new student account.
    /// The last two need an email Google has verified.
    pub async fn login_with_google(&self, profile: GoogleProfile) -> AppResult<User> {
        if let Some(user) = self.repository.find_by_google_id(&profile.id).await? {
            return Ok(user);
        }

        if !profile.email_verified {
            log::warn!("Rejected Google account {} with unverified email", profile.id);
            return Err(AppError::Unauthorized(
                "Google email address is not verified".to_string(),
            ));
        }

        let email = normalize_email(&profile.email);
        if let Some(mut user) = self.repository.find_by_email(&email).await? {
            self.repository.link_google_id(&user.id, &profile.id).await?;
            log::info!("Linked Google account to user {}", user.id);
            user.google_id = Some(profile.id);
            return Ok(user);
        }

        let user = self
            .repository
            .create(User::from_google(&profile.id, profile.name.trim(), &email))
            .await?;
        log::info!("Created student {} from Google sign-in", user.id);
        Ok(user)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
