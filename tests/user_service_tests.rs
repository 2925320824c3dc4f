use axum::http::StatusCode;
use social_api::{
    ApiError, AppConfig,
    models::{
        DEFAULT_PROFILE_PICTURE, LoginRequest, Role, SignupRequest, UpdateProfileRequest,
    },
    repository::{FailPoint, MemoryRepository, Repository},
    services::user,
};
use tokio::test;
use uuid::Uuid;

fn signup_request(username: &str) -> SignupRequest {
    SignupRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "correct-horse".to_string(),
        ..SignupRequest::default()
    }
}

async fn signed_up(repo: &MemoryRepository, username: &str) -> Uuid {
    user::signup(repo, &AppConfig::default(), signup_request(username))
        .await
        .expect("signup")
        .user
        .id
}

// --- signup / login ---

#[test]
async fn test_signup_issues_token_and_plain_user_role() {
    let repo = MemoryRepository::new();
    let response = user::signup(&repo, &AppConfig::default(), signup_request("newbie"))
        .await
        .unwrap();

    assert_eq!(response.message, "user has been signed up");
    assert!(!response.token.is_empty());
    assert_eq!(response.user.role, Role::User);
    assert_eq!(response.user.profile_picture, DEFAULT_PROFILE_PICTURE);

    let stored = repo.get_user(response.user.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "correct-horse");
    assert_eq!(stored.auth_token.as_deref(), Some(response.token.as_str()));
}

#[test]
async fn test_signup_rejects_duplicate_username() {
    let repo = MemoryRepository::new();
    signed_up(&repo, "taken").await;

    let mut duplicate = signup_request("taken");
    duplicate.email = "other@example.com".to_string();
    let err = user::signup(&repo, &AppConfig::default(), duplicate)
        .await
        .unwrap_err();

    match err {
        ApiError::Validation(e) => assert_eq!(e.field, "username"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
async fn test_signup_rejects_invalid_fields() {
    let repo = MemoryRepository::new();
    let config = AppConfig::default();

    let mut short_name = signup_request("ab");
    short_name.email = "ab@example.com".to_string();
    let err = user::signup(&repo, &config, short_name).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let mut bad_email = signup_request("valid_name");
    bad_email.email = "not-an-email".to_string();
    let err = user::signup(&repo, &config, bad_email).await.unwrap_err();
    assert!(err.to_string().starts_with("email:"));

    let mut weak = signup_request("valid_name");
    weak.password = "12345".to_string();
    let err = user::signup(&repo, &config, weak).await.unwrap_err();
    assert!(err.to_string().starts_with("password:"));
}

#[test]
async fn test_login_with_right_and_wrong_password() {
    let repo = MemoryRepository::new();
    let config = AppConfig::default();
    signed_up(&repo, "returning").await;

    let ok = user::login(
        &repo,
        &config,
        LoginRequest {
            email: "returning@example.com".to_string(),
            password: "correct-horse".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(ok.message, "user has been logged in");

    let err = user::login(
        &repo,
        &config,
        LoginRequest {
            email: "returning@example.com".to_string(),
            password: "battery-staple".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    let err = user::login(
        &repo,
        &config,
        LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "correct-horse".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

// --- profiles ---

#[test]
async fn test_update_profile_validates_description() {
    let repo = MemoryRepository::new();
    let id = signed_up(&repo, "describer").await;

    let updated = user::update_profile(
        &repo,
        id,
        UpdateProfileRequest {
            description: Some("short bio".to_string()),
            ..UpdateProfileRequest::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.description, "short bio");

    let err = user::update_profile(
        &repo,
        id,
        UpdateProfileRequest {
            description: Some("x".repeat(51)),
            ..UpdateProfileRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(user::get_me(&repo, id).await.unwrap().description, "short bio");
}

#[test]
async fn test_update_profile_store_failure_is_500() {
    let repo = MemoryRepository::new();
    let id = signed_up(&repo, "unlucky").await;
    repo.fail_on(FailPoint::UpdateUser).await;

    let err = user::update_profile(
        &repo,
        id,
        UpdateProfileRequest {
            description: Some("never saved".to_string()),
            ..UpdateProfileRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.to_string().contains("UpdateUser"));

    repo.clear_failures().await;
    assert_eq!(user::get_me(&repo, id).await.unwrap().description, "");
}

#[test]
async fn test_login_fails_when_session_cannot_be_stored() {
    let repo = MemoryRepository::new();
    signed_up(&repo, "sessionless").await;
    repo.fail_on(FailPoint::UpdateUser).await;

    let err = user::login(
        &repo,
        &AppConfig::default(),
        LoginRequest {
            email: "sessionless@example.com".to_string(),
            password: "correct-horse".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
async fn test_get_profile_unknown_is_not_found() {
    let repo = MemoryRepository::new();
    let err = user::get_profile(&repo, "ghost").await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

// --- follow / unfollow ---

#[test]
async fn test_follow_updates_both_sides_and_rejects_repeat() {
    let repo = MemoryRepository::new();
    let fan = signed_up(&repo, "fan").await;
    let star = signed_up(&repo, "star").await;

    let message = user::follow(&repo, fan, star).await.unwrap();
    assert_eq!(message.message, "user has been followed");
    assert!(user::get_me(&repo, fan).await.unwrap().followings.contains(&star));
    assert!(user::get_me(&repo, star).await.unwrap().followers.contains(&fan));

    let err = user::follow(&repo, fan, star).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(err.to_string(), "you already follow this user");
}

#[test]
async fn test_unfollow_requires_existing_edge() {
    let repo = MemoryRepository::new();
    let fan = signed_up(&repo, "fan").await;
    let star = signed_up(&repo, "star").await;

    let err = user::unfollow(&repo, fan, star).await.unwrap_err();
    assert_eq!(err.to_string(), "you don't follow this user");

    user::follow(&repo, fan, star).await.unwrap();
    user::unfollow(&repo, fan, star).await.unwrap();
    assert!(user::get_me(&repo, star).await.unwrap().followers.is_empty());
}

#[test]
async fn test_follow_self_and_missing_user() {
    let repo = MemoryRepository::new();
    let me = signed_up(&repo, "narcissus").await;

    let err = user::follow(&repo, me, me).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let err = user::follow(&repo, me, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[test]
async fn test_follow_store_failure_is_500_and_leaves_no_edge() {
    let repo = MemoryRepository::new();
    let fan = signed_up(&repo, "fan").await;
    let star = signed_up(&repo, "star").await;
    repo.fail_on(FailPoint::Follow).await;

    let err = user::follow(&repo, fan, star).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    repo.clear_failures().await;
    assert!(user::get_me(&repo, fan).await.unwrap().followings.is_empty());
    assert!(user::get_me(&repo, star).await.unwrap().followers.is_empty());
}

#[test]
async fn test_unfollow_store_failure_keeps_the_edge() {
    let repo = MemoryRepository::new();
    let fan = signed_up(&repo, "fan").await;
    let star = signed_up(&repo, "star").await;
    user::follow(&repo, fan, star).await.unwrap();
    repo.fail_on(FailPoint::Follow).await;

    let err = user::unfollow(&repo, fan, star).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    repo.clear_failures().await;
    assert!(user::get_me(&repo, star).await.unwrap().followers.contains(&fan));
}
