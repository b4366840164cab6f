use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
        repo::UserStore,
        repo_types::NewUser,
        MIN_PASSWORD_LEN,
    },
    error::AuthError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails are compared case-insensitively and without surrounding spaces.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks run in order; the first failure is the one reported.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), AuthError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    if !is_valid_email(&req.email) {
        return Err(AuthError::InvalidEmail);
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    match req.confirm_password.as_deref() {
        Some(confirm) if !confirm.is_empty() && confirm != req.password => {
            Err(AuthError::PasswordMismatch)
        }
        _ => Ok(()),
    }
}

pub async fn register(
    store: &dyn UserStore,
    mut req: RegisterRequest,
) -> Result<PublicUser, AuthError> {
    req.email = normalize_email(&req.email);

    if let Err(e) = validate_registration(&req) {
        warn!(email = %req.email, reason = %e, "registration rejected");
        return Err(e);
    }

    if store.find_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(AuthError::EmailTaken);
    }

    let password_hash = hash_password_blocking(req.password).await?;
    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    // A concurrent insert of the same email still surfaces as EmailTaken via
    // the unique constraint.
    let user = store
        .create(NewUser {
            email: req.email,
            password_hash,
            name,
        })
        .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user.into())
}

pub async fn login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    mut req: LoginRequest,
) -> Result<(String, PublicUser), AuthError> {
    req.email = normalize_email(&req.email);

    if req.email.is_empty() || req.password.is_empty() {
        warn!("login without credentials");
        return Err(AuthError::MissingCredentials);
    }

    let Some(user) = store.find_by_email(&req.email).await? else {
        warn!(email = %req.email, "login unknown email");
        return Err(AuthError::UnknownUser);
    };

    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        warn!(email = %req.email, user_id = user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok((token, user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::MemoryUserStore;
    use crate::config::JwtConfig;

    fn req(email: &str, password: &str, confirm: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.map(Into::into),
            name: None,
        }
    }

    fn keys() -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: "service-test".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes: 5,
        })
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("traveler@jeju.kr"));
        assert!(is_valid_email("a.b+c@mail.co.uk"));
        assert!(!is_valid_email("traveler"));
        assert!(!is_valid_email("traveler@jeju"));
        assert!(!is_valid_email("two words@jeju.kr"));
        assert!(!is_valid_email("a@@b.com"));
    }

    #[test]
    fn first_failing_rule_wins() {
        // Missing password beats the malformed email.
        assert!(matches!(
            validate_registration(&req("nope", "", None)),
            Err(AuthError::MissingCredentials)
        ));
        // Malformed email beats the short password.
        assert!(matches!(
            validate_registration(&req("nope", "123", None)),
            Err(AuthError::InvalidEmail)
        ));
        // Short password beats the mismatch.
        assert!(matches!(
            validate_registration(&req("a@b.co", "12345", Some("54321"))),
            Err(AuthError::PasswordTooShort)
        ));
        assert!(matches!(
            validate_registration(&req("a@b.co", "123456", Some("654321"))),
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[test]
    fn confirmation_is_optional() {
        assert!(validate_registration(&req("a@b.co", "123456", None)).is_ok());
        assert!(validate_registration(&req("a@b.co", "123456", Some(""))).is_ok());
        assert!(validate_registration(&req("a@b.co", "123456", Some("123456"))).is_ok());
    }

    #[test]
    fn password_length_counts_characters() {
        assert!(validate_registration(&req("a@b.co", "여행가자요", None)).is_err());
        assert!(validate_registration(&req("a@b.co", "여행가자요!", None)).is_ok());
    }

    #[tokio::test]
    async fn register_normalizes_email_and_blank_name() {
        let store = MemoryUserStore::new();
        let user = register(
            &store,
            RegisterRequest {
                name: Some("   ".into()),
                ..req("  Mina@Trip.IO ", "secret1", None)
            },
        )
        .await
        .unwrap();
        assert_eq!(user.email, "mina@trip.io");
        assert_eq!(user.name, None);
    }

    #[tokio::test]
    async fn register_rejects_existing_email_in_any_case() {
        let store = MemoryUserStore::new();
        register(&store, req("mina@trip.io", "secret1", None))
            .await
            .unwrap();
        let err = register(&store, req("MINA@trip.io", "secret2", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn login_distinguishes_unknown_user_from_bad_password() {
        let store = MemoryUserStore::new();
        let keys = keys();
        register(&store, req("mina@trip.io", "secret1", None))
            .await
            .unwrap();

        let unknown = login(
            &store,
            &keys,
            LoginRequest {
                email: "ghost@trip.io".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(unknown, AuthError::UnknownUser));

        let wrong = login(
            &store,
            &keys,
            LoginRequest {
                email: "mina@trip.io".into(),
                password: "secret2".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_issues_token_for_user() {
        let store = MemoryUserStore::new();
        let keys = keys();
        let registered = register(&store, req("mina@trip.io", "secret1", None))
            .await
            .unwrap();

        let (token, user) = login(
            &store,
            &keys,
            LoginRequest {
                email: "mina@trip.io".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(user.id, registered.id);
        assert_eq!(keys.verify(&token).unwrap().sub, registered.id);
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let store = MemoryUserStore::new();
        let err = login(&store, &keys(), LoginRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }
}
