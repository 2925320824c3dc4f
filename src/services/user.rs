use uuid::Uuid;

use crate::{
    auth::{hash_password, issue_token, verify_password},
    config::AppConfig,
    error::{ApiError, ApiResult},
    models::{
        ApiMessage, AuthResponse, DEFAULT_PROFILE_PICTURE, LoginRequest, NewUser, ResponseStatus,
        Role, SignupRequest, UpdateProfileRequest, User, UserProfile,
    },
    repository::Repository,
    validation::{ValidationError, validate_profile_update, validate_signup},
};

fn user_not_found() -> ApiError {
    ApiError::NotFound("user not found".to_string())
}

/// Issues a fresh credential and remembers it on the user record.
async fn start_session(
    repo: &dyn Repository,
    config: &AppConfig,
    user: &User,
    message: &str,
) -> ApiResult<AuthResponse> {
    let token = issue_token(user, config)?;
    repo.set_auth_token(user.id, &token).await?;
    Ok(AuthResponse {
        status: ResponseStatus::Success,
        message: message.to_string(),
        token,
        user: UserProfile::from(user),
    })
}

/// signup
///
/// Validates every field, rejects a taken username or email, stores the argon2 hash and
/// returns a signed credential. The role is always `user`.
#[tracing::instrument(skip(repo, config, payload), fields(username = %payload.username))]
pub async fn signup(
    repo: &dyn Repository,
    config: &AppConfig,
    payload: SignupRequest,
) -> ApiResult<AuthResponse> {
    validate_signup(&payload)?;

    if repo.find_user_by_username(&payload.username).await?.is_some() {
        return Err(ValidationError::new("username", "is already taken").into());
    }
    if repo.find_user_by_email(&payload.email).await?.is_some() {
        return Err(ValidationError::new("email", "is already registered").into());
    }

    let password_hash = hash_password(&payload.password)?;
    let user = repo
        .create_user(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            description: payload.description.unwrap_or_default(),
            profile_picture: payload
                .profile_picture
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.to_string()),
            role: Role::User,
            gender: payload.gender,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user signed up");
    start_session(repo, config, &user, "user has been signed up").await
}

/// Unknown email and wrong password are indistinguishable to the caller.
#[tracing::instrument(skip(repo, config, payload))]
pub async fn login(
    repo: &dyn Repository,
    config: &AppConfig,
    payload: LoginRequest,
) -> ApiResult<AuthResponse> {
    let Some(user) = repo.find_user_by_email(&payload.email).await? else {
        tracing::debug!("login for unknown email");
        return Err(ApiError::Unauthorized);
    };
    if !verify_password(&payload.password, &user.password_hash) {
        tracing::warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Unauthorized);
    }

    start_session(repo, config, &user, "user has been logged in").await
}

pub async fn get_profile(repo: &dyn Repository, username: &str) -> ApiResult<UserProfile> {
    repo.find_user_by_username(username)
        .await?
        .map(|user| UserProfile::from(&user))
        .ok_or_else(user_not_found)
}

pub async fn get_me(repo: &dyn Repository, user_id: Uuid) -> ApiResult<UserProfile> {
    repo.get_user(user_id)
        .await?
        .map(|user| UserProfile::from(&user))
        .ok_or_else(user_not_found)
}

#[tracing::instrument(skip(repo, changes))]
pub async fn update_profile(
    repo: &dyn Repository,
    user_id: Uuid,
    changes: UpdateProfileRequest,
) -> ApiResult<UserProfile> {
    validate_profile_update(&changes)?;
    repo.update_profile(user_id, changes)
        .await?
        .map(|user| UserProfile::from(&user))
        .ok_or_else(user_not_found)
}

/// follow
///
/// Adds `target_id` to the requester's followings and the requester to the target's
/// followers, as one store operation.
#[tracing::instrument(skip(repo))]
pub async fn follow(
    repo: &dyn Repository,
    requester_id: Uuid,
    target_id: Uuid,
) -> ApiResult<ApiMessage> {
    if requester_id == target_id {
        return Err(ValidationError::new("id", "you cannot follow yourself").into());
    }
    if repo.get_user(target_id).await?.is_none() {
        return Err(user_not_found());
    }

    if !repo.add_follow(requester_id, target_id).await? {
        return Err(ApiError::Forbidden("you already follow this user".to_string()));
    }
    tracing::info!("user followed");
    Ok(ApiMessage::success("user has been followed"))
}

#[tracing::instrument(skip(repo))]
pub async fn unfollow(
    repo: &dyn Repository,
    requester_id: Uuid,
    target_id: Uuid,
) -> ApiResult<ApiMessage> {
    if requester_id == target_id {
        return Err(ValidationError::new("id", "you cannot unfollow yourself").into());
    }
    if repo.get_user(target_id).await?.is_none() {
        return Err(user_not_found());
    }

    if !repo.remove_follow(requester_id, target_id).await? {
        return Err(ApiError::Forbidden("you don't follow this user".to_string()));
    }
    tracing::info!("user unfollowed");
    Ok(ApiMessage::success("user has been unfollowed"))
}
