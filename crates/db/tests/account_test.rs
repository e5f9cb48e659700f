//! Integration tests for users, memberships, refresh tokens and seeding.

mod common;

use chrono::{Duration, Utc};
use shootlogix_core::auth::{Role, verify_password};
use shootlogix_db::repositories::{MembershipError, MembershipRepository};
use shootlogix_db::{RefreshTokenRepository, UserRepository, seed_default_accounts};

use common::{create_production, test_db};

#[tokio::test]
async fn test_user_create_and_find() {
    let db = test_db().await;
    let repo = UserRepository::new(db.clone());

    let user = repo
        .create("CAPTAIN", "$argon2id$test_hash", false)
        .await
        .unwrap();
    assert_eq!(user.nickname, "CAPTAIN");
    assert!(!user.is_admin);

    let found = repo.find_by_nickname("CAPTAIN").await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert!(repo.nickname_exists("CAPTAIN").await.unwrap());
    assert!(!repo.nickname_exists("captain2").await.unwrap());
}

#[tokio::test]
async fn test_user_update_password_and_delete() {
    let db = test_db().await;
    let repo = UserRepository::new(db.clone());
    let user = repo.create("DOCK", "old", false).await.unwrap();

    assert!(repo.update_password(user.id, "new").await.unwrap());
    assert_eq!(
        repo.find_by_id(user.id).await.unwrap().unwrap().password_hash,
        "new"
    );
    assert!(!repo.update_password(9999, "x").await.unwrap());

    assert!(repo.delete(user.id).await.unwrap());
    assert!(!repo.delete(user.id).await.unwrap());
}

#[tokio::test]
async fn test_membership_lifecycle() {
    let db = test_db().await;
    let production_id = create_production(&db, "ISLAND").await;
    let user = UserRepository::new(db.clone())
        .create("SKIPPER", "hash", false)
        .await
        .unwrap();
    let repo = MembershipRepository::new(db.clone());

    repo.add(user.id, production_id, Role::Transpo).await.unwrap();
    assert!(matches!(
        repo.add(user.id, production_id, Role::Reader).await,
        Err(MembershipError::AlreadyMember)
    ));
    assert_eq!(
        repo.role_for(user.id, production_id).await.unwrap(),
        Some(Role::Transpo)
    );

    repo.update_role(user.id, production_id, Role::Unit)
        .await
        .unwrap();
    let members = repo.list_for_production(production_id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, "UNIT");

    repo.remove(user.id, production_id).await.unwrap();
    assert!(matches!(
        repo.remove(user.id, production_id).await,
        Err(MembershipError::NotFound)
    ));
    assert_eq!(repo.role_for(user.id, production_id).await.unwrap(), None);
}

#[tokio::test]
async fn test_admin_sees_every_production() {
    let db = test_db().await;
    let first = create_production(&db, "ALPHA").await;
    create_production(&db, "BRAVO").await;
    let users = UserRepository::new(db.clone());
    let admin = users.create("BOSS", "hash", true).await.unwrap();
    let reader = users.create("GUEST", "hash", false).await.unwrap();
    let repo = MembershipRepository::new(db.clone());
    repo.add(admin.id, first, Role::Unit).await.unwrap();
    repo.add(reader.id, first, Role::Reader).await.unwrap();

    let admin_view = repo.memberships_for(admin.id, true).await.unwrap();
    assert_eq!(admin_view.len(), 2);
    assert_eq!(admin_view[0].production_name, "ALPHA");
    assert_eq!(admin_view[0].role, "UNIT");
    assert_eq!(admin_view[1].role, "ADMIN");

    let reader_view = repo.memberships_for(reader.id, false).await.unwrap();
    assert_eq!(reader_view.len(), 1);
    assert_eq!(reader_view[0].role, "READER");
}

#[tokio::test]
async fn test_refresh_token_is_stored_hashed() {
    let db = test_db().await;
    let user = UserRepository::new(db.clone())
        .create("TENDER", "hash", false)
        .await
        .unwrap();
    let repo = RefreshTokenRepository::new(db.clone());

    let token = repo
        .create(user.id, Utc::now() + Duration::days(30))
        .await
        .unwrap();
    let stored = repo.find_by_token(&token).await.unwrap().unwrap();
    assert_ne!(stored.token_hash, token);
    assert_eq!(stored.token_hash, RefreshTokenRepository::hash_token(&token));
    assert_eq!(stored.user_id, user.id);

    assert!(repo.delete_by_token(&token).await.unwrap());
    assert!(repo.find_by_token(&token).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_expired_tokens() {
    let db = test_db().await;
    let user = UserRepository::new(db.clone())
        .create("SWIMMER", "hash", false)
        .await
        .unwrap();
    let repo = RefreshTokenRepository::new(db.clone());

    let expired = repo
        .create(user.id, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();
    let live = repo
        .create(user.id, Utc::now() + Duration::days(1))
        .await
        .unwrap();

    assert_eq!(repo.delete_expired().await.unwrap(), 1);
    assert!(repo.find_by_token(&expired).await.unwrap().is_none());
    assert!(repo.find_by_token(&live).await.unwrap().is_some());
}

#[tokio::test]
async fn test_seed_default_accounts_is_idempotent() {
    let db = test_db().await;

    let first = seed_default_accounts(&db).await.unwrap();
    assert!(first.production_created);
    assert_eq!(first.users_created, 4);
    assert_eq!(first.memberships_created, 4);

    let second = seed_default_accounts(&db).await.unwrap();
    assert!(!second.production_created);
    assert_eq!(second.users_created, 0);
    assert_eq!(second.memberships_created, 0);

    let users = UserRepository::new(db.clone());
    let admin = users.find_by_nickname("ADMIN").await.unwrap().unwrap();
    assert!(admin.is_admin);
    assert!(verify_password("@dm1NKL", &admin.password_hash).unwrap());

    let transport = users.find_by_nickname("TRANSPORT").await.unwrap().unwrap();
    let memberships = MembershipRepository::new(db.clone())
        .memberships_for(transport.id, false)
        .await
        .unwrap();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].production_name, "KLAS7");
    assert_eq!(memberships[0].role, "TRANSPO");
}
