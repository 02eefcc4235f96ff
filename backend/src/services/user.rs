//! User service for registration, login and profile management
//!
//! - Password hashing/verification runs on the blocking thread pool
//! - The JWT service is passed by reference (pre-computed keys)
//! - Input is validated before any query runs

use crate::auth::{JwtService, PasswordService};
use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{CreateUser, UpdateUser, UserRepository};
use chrono::{DateTime, Utc};
use job_tracker_shared::validation;
use job_tracker_shared::{AccessToken, AuthError, RegisterRequest, UpdateUserRequest, User, UserPublic};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::{info, warn};

/// Usernames are case-insensitive and stored lowercase
pub fn normalize_username(username: &str) -> String {
    username.to_lowercase()
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    ///
    /// Fails with `Conflict` if the username or the email is already taken,
    /// either by the pre-checks or by the unique indexes on insert.
    pub async fn register(pool: &PgPool, req: RegisterRequest) -> Result<UserPublic, ApiError> {
        let password = req.password.expose_secret();
        validation::validate_registration(&req.full_name, &req.email, &req.username, password)?;

        let username = normalize_username(&req.username);

        if UserRepository::username_exists(pool, &username, None)
            .await
            .map_err(ApiError::Internal)?
        {
            metrics::counter!("auth_register_total", "outcome" => "conflict").increment(1);
            return Err(ApiError::Conflict("Username already exists".to_string()));
        }

        if UserRepository::email_exists(pool, &req.email, None)
            .await
            .map_err(ApiError::Internal)?
        {
            metrics::counter!("auth_register_total", "outcome" => "conflict").increment(1);
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        // Hash password on blocking thread pool (CPU-intensive)
        let hashed_password = PasswordService::hash_async(password.clone())
            .await
            .map_err(ApiError::Internal)?;

        let input = CreateUser {
            full_name: req.full_name,
            email: req.email,
            username,
            hashed_password,
        };

        let user = UserRepository::create(pool, input).await.map_err(|e| {
            if is_unique_violation(&e) {
                // Lost a race with a concurrent registration
                metrics::counter!("auth_register_total", "outcome" => "conflict").increment(1);
                ApiError::Conflict("Username or email already exists".to_string())
            } else {
                ApiError::Internal(e)
            }
        })?;

        metrics::counter!("auth_register_total", "outcome" => "success").increment(1);
        info!(username = %user.username, "User registered");

        Ok(UserPublic::from(User::from(user)))
    }

    /// Login with username and password
    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, ApiError> {
        Self::login_at(pool, jwt_service, username, password, Utc::now()).await
    }

    /// Login with an explicit issue time
    pub async fn login_at(
        pool: &PgPool,
        jwt_service: &JwtService,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, ApiError> {
        let username = normalize_username(username);

        let Some(user) = UserRepository::find_by_username(pool, &username)
            .await
            .map_err(ApiError::Internal)?
        else {
            // Same argon2 cost as a wrong password
            PasswordService::verify_dummy_async(password.to_string())
                .await
                .map_err(ApiError::Internal)?;
            metrics::counter!("auth_login_total", "outcome" => "failure").increment(1);
            return Err(AuthError::InvalidCredentials.into());
        };

        // Verify password on blocking thread pool (CPU-intensive)
        let valid = PasswordService::verify_async(password.to_string(), user.hashed_password)
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            metrics::counter!("auth_login_total", "outcome" => "failure").increment(1);
            warn!(username = %username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = jwt_service
            .issue(&user.username, now)
            .map_err(ApiError::Internal)?;

        metrics::counter!("auth_login_total", "outcome" => "success").increment(1);
        info!(username = %user.username, "User logged in");

        Ok(AccessToken::bearer(access_token))
    }

    /// Get the public profile of `username`
    pub async fn get_profile(pool: &PgPool, username: &str) -> Result<UserPublic, ApiError> {
        let user = UserRepository::find_by_username(pool, username)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserPublic::from(User::from(user)))
    }

    /// Apply a partial update to the profile of `username`
    pub async fn update_profile(
        pool: &PgPool,
        username: &str,
        req: UpdateUserRequest,
    ) -> Result<UserPublic, ApiError> {
        validation::validate_user_update(&req)?;

        let current = UserRepository::find_by_username(pool, username)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let new_username = req.username.as_deref().map(normalize_username);

        if let Some(new_username) = &new_username {
            if UserRepository::username_exists(pool, new_username, Some(current.id))
                .await
                .map_err(ApiError::Internal)?
            {
                return Err(ApiError::Conflict("Username already exists".to_string()));
            }
        }

        if let Some(email) = &req.email {
            if UserRepository::email_exists(pool, email, Some(current.id))
                .await
                .map_err(ApiError::Internal)?
            {
                return Err(ApiError::Conflict("Email already registered".to_string()));
            }
        }

        let updates = UpdateUser {
            full_name: req.full_name,
            email: req.email,
            username: new_username,
        };

        let user = UserRepository::update(pool, &current.username, updates)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict("Username or email already exists".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if user.username != current.username {
            info!(from = %current.username, to = %user.username, "Username changed");
        }

        Ok(UserPublic::from(User::from(user)))
    }
}
