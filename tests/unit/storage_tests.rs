// ===========================
// tests/unit/storage_tests.rs
// ===========================
//! Unit tests for the repository implementations
use identity_core::{
    ByEmail, Claim, FlatFileRepository, InMemoryRepository, Repository, RepositoryError, User,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_staged_writes_are_invisible_until_commit() {
    let repo = InMemoryRepository::<User>::new();
    let user = User::new("jo.bloggs@capita.co.uk");

    repo.insert(user.clone()).await.unwrap();
    assert!(repo.find_by_id(user.id()).await.unwrap().is_none());
    assert!(repo.list_all().await.unwrap().is_empty());

    assert_eq!(repo.commit().await.unwrap(), 1);
    assert_eq!(repo.find_by_id(user.id()).await.unwrap(), Some(user));
}

#[tokio::test]
async fn test_failed_commit_applies_nothing() {
    let repo = InMemoryRepository::<User>::new();
    let existing = User::new("a@capita.co.uk");
    repo.insert(existing.clone()).await.unwrap();
    repo.commit().await.unwrap();

    repo.insert(User::new("b@capita.co.uk")).await.unwrap();
    repo.insert(existing.clone()).await.unwrap();
    assert!(matches!(
        repo.commit().await.unwrap_err(),
        RepositoryError::AlreadyExists(id) if id == existing.id()
    ));
    assert_eq!(repo.list_all().await.unwrap(), vec![existing]);
}

#[tokio::test]
async fn test_delete_through_entity() {
    let repo = InMemoryRepository::<User>::new();
    let user = User::new("jo.bloggs@capita.co.uk");
    repo.insert(user.clone()).await.unwrap();
    repo.commit().await.unwrap();

    repo.delete(&user).await.unwrap();
    repo.commit().await.unwrap();
    assert!(repo
        .find_first_matching(&ByEmail::new("jo.bloggs@capita.co.uk"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_model_metadata() {
    let users = InMemoryRepository::<User>::new();
    let metadata = users.list_model_metadata().await.unwrap();
    assert!(metadata.contains(&"users.email".to_string()));
    assert!(metadata.contains(&"users.security_stamp".to_string()));

    let claims = InMemoryRepository::<Claim>::new();
    assert_eq!(
        claims.list_model_metadata().await.unwrap(),
        [
            "claims.id",
            "claims.user_id",
            "claims.claim_type",
            "claims.claim_value",
            "claims.application_id"
        ]
    );
}

#[tokio::test]
async fn test_flat_file_closure_lookup() {
    let temp_dir = TempDir::new().unwrap();
    let repo = FlatFileRepository::<User>::new(temp_dir.path()).unwrap();

    let mut confirmed = User::new("b@capita.co.uk");
    confirmed.email_confirmed = true;
    repo.insert(User::new("a@capita.co.uk")).await.unwrap();
    repo.insert(confirmed.clone()).await.unwrap();
    assert_eq!(repo.commit().await.unwrap(), 2);

    let found = repo
        .find_first_matching(&|u: &User| u.email_confirmed)
        .await
        .unwrap();
    assert_eq!(found, Some(confirmed));
    assert_eq!(repo.list_all().await.unwrap().len(), 2);
}
