use std::sync::Arc;

use stockroom_auth::blacklist::TokenBlacklist;
use stockroom_auth::token::validate_token;
use stockroom_domain::role::Role;

use stockroom_inventory::error::InventoryError;
use stockroom_inventory::usecase::user::{
    GetCurrentUserUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshTokenUseCase,
    RegisterUserInput, RegisterUserUseCase,
};

use crate::helpers::InMemoryStore;

const TEST_SECRET: &str = "integration-test-secret";

fn register_input(username: &str, role: Role) -> RegisterUserInput {
    RegisterUserInput {
        username: username.to_owned(),
        password: "correct horse battery staple".to_owned(),
        role,
        email: Some(format!("{username}@example.com")),
        full_name: None,
    }
}

struct AuthFixture {
    store: InMemoryStore,
    blacklist: Arc<TokenBlacklist>,
}

impl AuthFixture {
    fn new() -> Self {
        Self {
            store: InMemoryStore::new(),
            blacklist: Arc::new(TokenBlacklist::new()),
        }
    }

    fn register(&self) -> RegisterUserUseCase<crate::helpers::StoreUserRepo> {
        RegisterUserUseCase {
            repo: self.store.user_repo(),
            jwt_secret: TEST_SECRET.to_owned(),
            token_ttl_secs: 3600,
            blacklist: Arc::clone(&self.blacklist),
        }
    }

    fn login(&self) -> LoginUseCase<crate::helpers::StoreUserRepo> {
        LoginUseCase {
            repo: self.store.user_repo(),
            jwt_secret: TEST_SECRET.to_owned(),
            token_ttl_secs: 3600,
            blacklist: Arc::clone(&self.blacklist),
        }
    }

    fn refresh(&self) -> RefreshTokenUseCase<crate::helpers::StoreUserRepo> {
        RefreshTokenUseCase {
            repo: self.store.user_repo(),
            jwt_secret: TEST_SECRET.to_owned(),
            token_ttl_secs: 3600,
            blacklist: Arc::clone(&self.blacklist),
        }
    }
}

#[tokio::test]
async fn should_run_the_full_session_lifecycle() {
    let fixture = AuthFixture::new();

    // Register issues a token carrying the username and role.
    let registered = fixture
        .register()
        .execute(register_input("alice", Role::User))
        .await
        .unwrap();
    let info = validate_token(&registered.token, TEST_SECRET).unwrap();
    assert_eq!(info.username, "alice");
    assert_eq!(info.role, Role::User);

    // Login supersedes the registration token.
    let session = fixture
        .login()
        .execute(LoginInput {
            username: "alice".into(),
            password: "correct horse battery staple".into(),
        })
        .await
        .unwrap();
    assert!(fixture.blacklist.is_revoked(&registered.token));
    assert!(!fixture.blacklist.is_revoked(&session.token));

    // Refresh supersedes the login token.
    let refreshed = fixture.refresh().execute("alice").await.unwrap();
    assert!(fixture.blacklist.is_revoked(&session.token));
    assert!(!fixture.blacklist.is_revoked(&refreshed.token));

    // /me resolves the account behind the session.
    let me = GetCurrentUserUseCase {
        repo: fixture.store.user_repo(),
    }
    .execute("alice")
    .await
    .unwrap();
    assert_eq!(me.username, "alice");
    assert!(me.enabled);

    // Logout revokes everything.
    LogoutUseCase {
        blacklist: Arc::clone(&fixture.blacklist),
    }
    .execute("alice", &refreshed.token);
    assert!(fixture.blacklist.is_revoked(&refreshed.token));
    assert_eq!(fixture.blacklist.active_token("alice"), None);
}

#[tokio::test]
async fn should_reject_duplicate_registration() {
    let fixture = AuthFixture::new();
    fixture
        .register()
        .execute(register_input("alice", Role::User))
        .await
        .unwrap();

    let err = fixture
        .register()
        .execute(register_input("alice", Role::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::UsernameAlreadyExists));
}

#[tokio::test]
async fn should_reject_bad_credentials_and_disabled_accounts() {
    let fixture = AuthFixture::new();
    fixture
        .register()
        .execute(register_input("alice", Role::User))
        .await
        .unwrap();

    let err = fixture
        .login()
        .execute(LoginInput {
            username: "alice".into(),
            password: "nope".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::InvalidCredentials));

    fixture.store.user_repo().disable("alice");
    let err = fixture
        .login()
        .execute(LoginInput {
            username: "alice".into(),
            password: "correct horse battery staple".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::UserDisabled));

    let err = fixture.refresh().execute("alice").await.unwrap_err();
    assert!(matches!(err, InventoryError::UserDisabled));
}

#[tokio::test]
async fn should_never_store_the_plaintext_password() {
    let fixture = AuthFixture::new();
    let session = fixture
        .register()
        .execute(register_input("alice", Role::User))
        .await
        .unwrap();

    assert_ne!(session.user.password_hash, "correct horse battery staple");
    assert!(session.user.password_hash.starts_with("$argon2"));
}
