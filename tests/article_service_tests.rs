use axum::http::StatusCode;
use social_api::{
    ApiError,
    models::{
        CreateArticleRequest, DEFAULT_PROFILE_PICTURE, NewUser, Role, UpdateArticleRequest, User,
    },
    repository::{FailPoint, MemoryRepository, Repository},
    services::{article, comment},
};
use tokio::test;
use uuid::Uuid;

// --- Test Data Helpers ---

async fn seed_user(repo: &MemoryRepository, username: &str, role: Role) -> User {
    repo.create_user(NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "not-a-real-hash".to_string(),
        description: String::new(),
        profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
        role,
        gender: None,
    })
    .await
    .expect("seed user")
}

fn article_request(title: &str) -> CreateArticleRequest {
    CreateArticleRequest {
        title: title.to_string(),
        description: format!("body of {title}"),
        ..CreateArticleRequest::default()
    }
}

/// Creates an article through the store and returns its id.
async fn seed_article(repo: &MemoryRepository, owner: Uuid, title: &str) -> Uuid {
    repo.create_article(owner, article_request(title))
        .await
        .expect("seed article")
        .id
}

// --- createArticle ---

#[test]
async fn test_create_article_from_legacy_payload() {
    let repo = MemoryRepository::new();
    let owner = Uuid::from_u128(12345);

    let payload: CreateArticleRequest = serde_json::from_value(serde_json::json!({
        "title": "Test Article",
        "content": "This is a test"
    }))
    .unwrap();

    let message = article::create_article(&repo, owner, payload).await.unwrap();
    assert_eq!(message.message, "article has been created");

    let stored = repo.get_articles_by_owners(&[owner]).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Test Article");
    assert_eq!(stored[0].description, "This is a test");
    assert_eq!(stored[0].user_id, owner);
    assert!(stored[0].likes.is_empty());
    assert!(stored[0].comments.is_empty());
}

#[test]
async fn test_create_article_store_failure_is_500() {
    let repo = MemoryRepository::new();
    repo.fail_on(FailPoint::CreateArticle).await;

    let err = article::create_article(&repo, Uuid::new_v4(), article_request("x"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.to_string().contains("CreateArticle"));
}

// --- updateArticle ---

#[test]
async fn test_update_by_owner_applies_changes() {
    let repo = MemoryRepository::new();
    let owner = Uuid::new_v4();
    let id = seed_article(&repo, owner, "Before").await;

    let changes = UpdateArticleRequest {
        title: Some("After".to_string()),
        tags: Some(vec!["rust".to_string()]),
        ..UpdateArticleRequest::default()
    };
    let message = article::update_article(&repo, owner, id, changes).await.unwrap();
    assert_eq!(message.message, "article has been updated");

    let stored = repo.get_article(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "After");
    assert_eq!(stored.tags, vec!["rust".to_string()]);
    // Untouched fields survive a partial update.
    assert_eq!(stored.description, "body of Before");
    assert_eq!(stored.user_id, owner);
}

#[test]
async fn test_update_by_non_owner_is_unauthorized_and_leaves_article_untouched() {
    let repo = MemoryRepository::new();
    let owner = Uuid::new_v4();
    let id = seed_article(&repo, owner, "Original").await;
    let before = repo.get_article(id).await.unwrap().unwrap();

    let changes = UpdateArticleRequest {
        title: Some("Hijacked".to_string()),
        ..UpdateArticleRequest::default()
    };
    let err = article::update_article(&repo, Uuid::new_v4(), id, changes)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(err.to_string(), "you are not authorized");
    assert_eq!(repo.get_article(id).await.unwrap().unwrap(), before);
}

#[test]
async fn test_update_missing_article_is_not_found() {
    let repo = MemoryRepository::new();
    let err = article::update_article(
        &repo,
        Uuid::new_v4(),
        Uuid::new_v4(),
        UpdateArticleRequest::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

// --- deleteArticle ---

#[test]
async fn test_delete_by_stranger_is_unauthorized() {
    let repo = MemoryRepository::new();
    let owner = Uuid::new_v4();
    let id = seed_article(&repo, owner, "Keep me").await;

    let err = article::delete_article(&repo, Uuid::new_v4(), Role::User, id)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert!(repo.get_article(id).await.unwrap().is_some());
}

#[test]
async fn test_admin_delete_cascades_to_comments() {
    let repo = MemoryRepository::new();
    let owner = seed_user(&repo, "owner", Role::User).await;
    let admin = seed_user(&repo, "admin", Role::Admin).await;
    let reader = seed_user(&repo, "reader", Role::User).await;

    let doomed = seed_article(&repo, owner.id, "Doomed").await;
    let survivor = seed_article(&repo, owner.id, "Survivor").await;
    for text in ["first", "second"] {
        comment::add_comment(&repo, reader.id, doomed, text.to_string())
            .await
            .unwrap();
    }
    comment::add_comment(&repo, reader.id, survivor, "stays".to_string())
        .await
        .unwrap();

    let message = article::delete_article(&repo, admin.id, admin.role, doomed)
        .await
        .unwrap();
    assert_eq!(message.message, "article has been deleted");

    assert!(repo.get_article(doomed).await.unwrap().is_none());
    assert!(repo.get_comments_by_article(doomed).await.unwrap().is_empty());
    assert_eq!(repo.get_comments_by_article(survivor).await.unwrap().len(), 1);
}

#[test]
async fn test_delete_by_owner_succeeds() {
    let repo = MemoryRepository::new();
    let owner = Uuid::new_v4();
    let id = seed_article(&repo, owner, "Mine").await;

    article::delete_article(&repo, owner, Role::User, id)
        .await
        .unwrap();
    assert!(repo.get_article(id).await.unwrap().is_none());
}

#[test]
async fn test_comment_cleanup_failure_surfaces_after_article_is_gone() {
    let repo = MemoryRepository::new();
    let owner = Uuid::new_v4();
    let id = seed_article(&repo, owner, "Half deleted").await;
    comment::add_comment(&repo, owner, id, "orphan".to_string())
        .await
        .unwrap();

    repo.fail_on(FailPoint::DeleteComments).await;
    let err = article::delete_article(&repo, owner, Role::User, id)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(repo.get_article(id).await.unwrap().is_none());

    repo.clear_failures().await;
    assert_eq!(repo.get_comments_by_article(id).await.unwrap().len(), 1);
}

// --- getArticle / getArticlesUser ---

#[test]
async fn test_get_article_resolves_comments_in_order() {
    let repo = MemoryRepository::new();
    let owner = Uuid::new_v4();
    let id = seed_article(&repo, owner, "Discussed").await;
    for text in ["one", "two", "three"] {
        comment::add_comment(&repo, owner, id, text.to_string())
            .await
            .unwrap();
    }

    let detail = article::get_article(&repo, id).await.unwrap();
    let texts: Vec<&str> = detail.comments.iter().map(|c| c.description.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
    assert_eq!(detail.user, owner);
}

#[test]
async fn test_get_missing_article_is_not_found() {
    let repo = MemoryRepository::new();
    let err = article::get_article(&repo, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
async fn test_get_articles_user_returns_only_that_users_articles() {
    let repo = MemoryRepository::new();
    let alice = seed_user(&repo, "alice", Role::User).await;
    let bob = seed_user(&repo, "bob", Role::User).await;
    seed_article(&repo, alice.id, "Alice 1").await;
    seed_article(&repo, bob.id, "Bob 1").await;
    seed_article(&repo, alice.id, "Alice 2").await;

    let response = article::get_articles_user(&repo, "alice").await.unwrap();
    assert_eq!(response.articles.len(), 2);
    assert!(response.articles.iter().all(|a| a.user_id == alice.id));
}

#[test]
async fn test_get_articles_user_unknown_username_is_500() {
    let repo = MemoryRepository::new();
    let err = article::get_articles_user(&repo, "ghost").await.unwrap_err();

    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.to_string().contains("ghost"));
}

// --- getTimeline ---

#[test]
async fn test_timeline_is_empty_when_following_nobody() {
    let repo = MemoryRepository::new();
    let loner = seed_user(&repo, "loner", Role::User).await;
    seed_article(&repo, loner.id, "Talking to myself").await;

    let timeline = article::get_timeline(&repo, loner.id).await.unwrap();
    assert!(timeline.articles.is_empty());
}

#[test]
async fn test_timeline_is_newest_first_with_authors_populated() {
    let repo = MemoryRepository::new();
    let reader = seed_user(&repo, "reader", Role::User).await;
    let bob = seed_user(&repo, "bob", Role::User).await;
    let carol = seed_user(&repo, "carol", Role::User).await;
    let stranger = seed_user(&repo, "stranger", Role::User).await;
    repo.add_follow(reader.id, bob.id).await.unwrap();
    repo.add_follow(reader.id, carol.id).await.unwrap();

    seed_article(&repo, bob.id, "first").await;
    seed_article(&repo, carol.id, "second").await;
    seed_article(&repo, stranger.id, "unfollowed").await;
    seed_article(&repo, reader.id, "own").await;
    seed_article(&repo, bob.id, "third").await;

    let timeline = article::get_timeline(&repo, reader.id).await.unwrap();
    let titles: Vec<&str> = timeline.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    let first = &timeline.articles[0];
    assert_eq!(first.user.id, bob.id);
    assert_eq!(first.user.username, "bob");
    assert_eq!(first.user.profile_picture, DEFAULT_PROFILE_PICTURE);
}

// --- likeUnlike ---

#[test]
async fn test_like_twice_restores_the_original_like_set() {
    let repo = MemoryRepository::new();
    let id = seed_article(&repo, Uuid::new_v4(), "Likeable").await;
    let fan = Uuid::new_v4();
    let original = repo.get_article(id).await.unwrap().unwrap().likes;

    let first = article::like_unlike(&repo, fan, id).await.unwrap();
    assert_eq!(first.message(), "the article has been liked");
    assert!(repo.get_article(id).await.unwrap().unwrap().likes.contains(&fan));

    let second = article::like_unlike(&repo, fan, id).await.unwrap();
    assert_eq!(second.message(), "the article has been disliked");
    assert_eq!(repo.get_article(id).await.unwrap().unwrap().likes, original);
}

#[test]
async fn test_concurrent_likes_never_duplicate() {
    let repo = MemoryRepository::new();
    let id = seed_article(&repo, Uuid::new_v4(), "Popular").await;
    let fan = Uuid::new_v4();

    // Both toggles may read the article before either writes.
    let (first, second) = tokio::join!(
        article::like_unlike(&repo, fan, id),
        article::like_unlike(&repo, fan, id),
    );
    first.unwrap();
    second.unwrap();

    let likes = repo.get_article(id).await.unwrap().unwrap().likes;
    assert!(likes.len() <= 1);
    assert!(likes.iter().all(|liker| *liker == fan));
}

#[test]
async fn test_like_missing_article_is_not_found() {
    let repo = MemoryRepository::new();
    let err = article::like_unlike(&repo, Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[test]
async fn test_like_store_failure_is_500() {
    let repo = MemoryRepository::new();
    let id = seed_article(&repo, Uuid::new_v4(), "Fragile").await;
    repo.fail_on(FailPoint::ToggleLike).await;

    let err = article::like_unlike(&repo, Uuid::new_v4(), id).await.unwrap_err();
    assert!(matches!(err, ApiError::Persistence(_)));
}
