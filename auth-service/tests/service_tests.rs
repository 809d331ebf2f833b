mod common;

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use auth::TokenProvider;
use auth_service::domain::user::ports::AuthServicePort;
use auth_service::domain::user::ports::RevocationStore;
use auth_service::domain::user::service::LOGOUT_MARKER;
use auth_service::user::errors::UserError;
use common::TestService;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_has_single_winner() {
    let test = TestService::new();

    for round in 0..10 {
        let username = format!("user{}", round);
        let first = {
            let service = Arc::clone(&test.service);
            let username = username.clone();
            tokio::spawn(async move { service.register(username, "pass1".to_string()).await })
        };
        let second = {
            let service = Arc::clone(&test.service);
            let username = username.clone();
            tokio::spawn(async move { service.register(username, "pass2".to_string()).await })
        };

        let results = [first.await.unwrap(), second.await.unwrap()];

        let successes = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(UserError::UsernameConflict(_))))
            .count();
        assert_eq!((successes, conflicts), (1, 1), "round {}", round);
    }
}

#[tokio::test]
async fn test_login_token_has_configured_lifetime() {
    let test = TestService::new();
    test.service
        .register("alice".to_string(), "pass1".to_string())
        .await
        .unwrap();

    let token = test.service.login("alice", "pass1").await.unwrap();

    assert!(test.authenticator.validate_token(&token));
    let remaining = test.authenticator.remaining_lifetime(&token).unwrap();
    assert!(remaining <= Duration::from_secs(3600));
    assert!(remaining > Duration::from_secs(3590));
}

#[tokio::test]
async fn test_login_miss_costs_a_password_verification() {
    let test = TestService::new();
    test.service
        .register("alice".to_string(), "pass1".to_string())
        .await
        .unwrap();

    // Warm up the throwaway hash so only the verification is timed.
    let _ = test.service.login("nobody", "pass1").await;

    let started = Instant::now();
    let wrong_password = test.service.login("alice", "wrong").await.unwrap_err();
    let known_cost = started.elapsed();

    let started = Instant::now();
    let unknown_user = test.service.login("nobody", "pass1").await.unwrap_err();
    let unknown_cost = started.elapsed();

    let started = Instant::now();
    let too_short = test.service.login("bob", "pass1").await.unwrap_err();
    let too_short_cost = started.elapsed();

    assert_eq!(wrong_password, UserError::AuthenticationFailed);
    assert_eq!(unknown_user, UserError::AuthenticationFailed);
    assert_eq!(too_short, UserError::AuthenticationFailed);
    assert!(unknown_cost * 4 >= known_cost, "{:?} vs {:?}", unknown_cost, known_cost);
    assert!(too_short_cost * 4 >= known_cost, "{:?} vs {:?}", too_short_cost, known_cost);
}

#[tokio::test]
async fn test_logout_is_idempotent_and_bounded() {
    let test = TestService::new();
    test.service
        .register("alice".to_string(), "pass1".to_string())
        .await
        .unwrap();
    let token = test.service.login("alice", "pass1").await.unwrap();
    let original = test.authenticator.remaining_lifetime(&token).unwrap();

    test.service.logout(&token).await.expect("First logout failed");
    let first_ttl = test.revocation_store.ttl(&token).await.unwrap();
    assert!(first_ttl <= original);

    tokio::time::sleep(Duration::from_millis(20)).await;

    test.service.logout(&token).await.expect("Second logout failed");
    let second_ttl = test.revocation_store.ttl(&token).await.unwrap();
    assert!(second_ttl <= original);
    assert!(second_ttl <= first_ttl);

    assert_eq!(
        test.revocation_store.get(&token).await.as_deref(),
        Some(LOGOUT_MARKER)
    );
    assert!(test.revocation_store.exists(&token).await.unwrap());
    assert_eq!(
        test.service.authenticate(&token).await.unwrap_err(),
        UserError::AuthenticationFailed
    );
}

#[tokio::test]
async fn test_logout_of_garbage_creates_nothing() {
    let test = TestService::new();

    for garbage in ["", "garbage", "eyJhbGciOiJIUzI1NiJ9.e30.sig"] {
        assert!(test.service.logout(garbage).await.is_ok());
    }

    assert!(test.revocation_store.is_empty().await);
}

#[tokio::test]
async fn test_token_expires_after_window() {
    let test = TestService::with_validity(chrono::Duration::seconds(2));
    test.service
        .register("alice".to_string(), "pass1".to_string())
        .await
        .unwrap();

    let token = test.service.login("alice", "pass1").await.unwrap();
    assert!(test.authenticator.validate_token(&token));

    // exp has second granularity, so the window ends within two seconds of issuance.
    tokio::time::sleep(Duration::from_millis(2100)).await;

    assert!(!test.authenticator.validate_token(&token));
    assert!(test.authenticator.remaining_lifetime(&token).is_none());

    assert!(test.service.logout(&token).await.is_ok());
    assert!(test.revocation_store.is_empty().await);
    assert_eq!(
        test.service.authenticate(&token).await.unwrap_err(),
        UserError::AuthenticationFailed
    );
}

#[tokio::test]
async fn test_token_from_foreign_key_is_rejected() {
    let test = TestService::new();
    test.service
        .register("alice".to_string(), "pass1".to_string())
        .await
        .unwrap();

    let foreign = TokenProvider::new(
        auth::TokenConfig::new(
            b"a-completely-different-secret-of-32-bytes".to_vec(),
            chrono::Duration::hours(1),
        )
        .unwrap(),
    )
    .issue("alice")
    .unwrap();

    assert_eq!(
        test.service.authenticate(&foreign).await.unwrap_err(),
        UserError::AuthenticationFailed
    );
    assert!(test.service.logout(&foreign).await.is_ok());
    assert!(test.revocation_store.is_empty().await);
}

#[tokio::test]
async fn test_register_login_logout_end_to_end() {
    let test = TestService::new();

    let user = test
        .service
        .register("alice".to_string(), "pass1".to_string())
        .await
        .expect("Registration failed");
    assert_ne!(user.password_hash, "pass1");

    let token = test.service.login("alice", "pass1").await.expect("Login failed");
    let authenticated = test.service.authenticate(&token).await.unwrap();
    assert_eq!(authenticated.id, user.id);

    test.service.logout(&token).await.expect("Logout failed");

    assert!(test.revocation_store.exists(&token).await.unwrap());
    assert!(test.service.authenticate(&token).await.is_err());
}
