use paywall_domain::models::User;
use paywall_domain::store::UserDirectory;
use paywall_identity::IdentityError;
use paywall_identity::service::{check_session, clear_session, login, logout};
use paywall_kernel::server::{ApiError, Session};
use std::fmt;

#[derive(Debug)]
struct Offline;

impl fmt::Display for Offline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("directory offline")
    }
}

impl std::error::Error for Offline {}

/// Fixed set of users; `offline` makes every lookup fail.
struct Directory {
    users: Vec<User>,
    offline: bool,
}

impl Directory {
    fn new() -> Self {
        Self {
            users: vec![
                User { id: 1, username: "zoe".to_owned() },
                User { id: 2, username: "maya".to_owned() },
            ],
            offline: false,
        }
    }
}

impl UserDirectory for Directory {
    type Error = Offline;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, Offline> {
        if self.offline {
            return Err(Offline);
        }
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, Offline> {
        if self.offline {
            return Err(Offline);
        }
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}

#[tokio::test]
async fn login_binds_the_user() {
    let directory = Directory::new();
    let session = Session::default();

    let user = login(&directory, &session, "zoe").await.unwrap();
    assert_eq!(user, User { id: 1, username: "zoe".to_owned() });
    assert_eq!(session.user_id(), Some(1));
    assert_eq!(check_session(&directory, &session).await.unwrap(), user);
}

#[tokio::test]
async fn unknown_username_leaves_the_session_untouched() {
    let directory = Directory::new();
    let session = Session::default();

    let err = login(&directory, &session, "nobody").await.unwrap_err();
    assert!(matches!(err, IdentityError::UserNotFound { .. }));
    assert!(!session.is_modified());
}

#[tokio::test]
async fn check_without_login_is_unauthenticated() {
    let directory = Directory::new();
    let err = check_session(&directory, &Session::default()).await.unwrap_err();
    assert!(matches!(err, IdentityError::Unauthenticated { .. }));
}

#[tokio::test]
async fn stale_user_id_is_not_found() {
    let directory = Directory::new();
    let session = Session::default();
    session.set_user_id(42);

    let err = check_session(&directory, &session).await.unwrap_err();
    assert!(matches!(err, IdentityError::UserNotFound { .. }));
}

#[tokio::test]
async fn zero_user_id_is_unauthenticated() {
    let directory = Directory::new();
    let session = Session::default();
    session.set_user_id(0);

    let err = check_session(&directory, &session).await.unwrap_err();
    assert!(matches!(err, IdentityError::Unauthenticated { .. }));
}

#[tokio::test]
async fn logout_keeps_page_views() {
    let directory = Directory::new();
    let session = Session::default();
    login(&directory, &session, "maya").await.unwrap();
    session.set_page_views(2);

    logout(&session);
    logout(&session);

    assert!(session.user_id().is_none());
    assert_eq!(session.page_views(), 2);
}

#[tokio::test]
async fn clear_drops_user_and_counter() {
    let directory = Directory::new();
    let session = Session::default();
    login(&directory, &session, "zoe").await.unwrap();
    session.set_page_views(4);

    clear_session(&session);

    assert!(session.user_id().is_none());
    assert_eq!(session.page_views(), 0);
}

#[tokio::test]
async fn directory_failures_become_internal_errors() {
    let directory = Directory { offline: true, ..Directory::new() };
    let session = Session::default();

    let err = login(&directory, &session, "zoe").await.unwrap_err();
    assert!(matches!(err, IdentityError::Store { .. }));
    assert!(err.to_string().contains("directory offline"));

    let api: ApiError = err.into();
    assert!(matches!(api, ApiError::Internal { .. }));
}

#[test]
fn identity_errors_map_to_http_outcomes() {
    let not_found: ApiError = IdentityError::UserNotFound { context: None }.into();
    assert!(matches!(not_found, ApiError::NotFound { ref message, .. } if message == "User not found"));

    let anonymous: ApiError = IdentityError::Unauthenticated { context: None }.into();
    assert!(matches!(anonymous, ApiError::Unauthenticated { .. }));
}
