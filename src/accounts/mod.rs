//! Account registration, login and profile updates.
//!
//! `AccountService` owns every write to the password column: plaintext
//! passwords are hashed here and never stored or returned.

mod error;
pub mod validation;

pub use error::{AccountError, Field};

use std::sync::Arc;
use tracing::{info, warn};

use crate::crypto::{self, issue_token, ClaimSet, TokenSource};
use crate::db::{
    now_timestamp, AccountStore, AuthResponse, FieldUpdate, LoginRequest, NewUser,
    RegisterRequest, User, UserPatch, UserResponse, DEFAULT_ROLE,
};
use validation::{is_strong_password, is_valid_email, is_valid_phone, non_blank, normalize_dob};

/// Well-formed Argon2id hash with the default cost parameters that no
/// password matches. Verified against when the identifier is unknown so both
/// failure paths pay for one Argon2 run.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$ZXpidWlsZC1ub21hdGNoIQ$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Validate, hash and persist a new account.
    ///
    /// All validation runs before anything is written.
    pub async fn register_account(&self, req: &RegisterRequest) -> Result<User, AccountError> {
        let email = non_blank(req.email.as_deref()).ok_or(AccountError::MissingField(Field::Email))?;
        let password = req
            .password
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(AccountError::MissingField(Field::Password))?;
        let fullname =
            non_blank(req.fullname.as_deref()).ok_or(AccountError::MissingField(Field::Fullname))?;

        if !is_valid_email(email) {
            return Err(AccountError::InvalidFormat(Field::Email));
        }
        if !is_strong_password(password) {
            return Err(AccountError::WeakPassword);
        }

        let phone = non_blank(req.phone.as_deref());
        if let Some(phone) = phone {
            if !is_valid_phone(phone) {
                return Err(AccountError::InvalidFormat(Field::Phone));
            }
        }

        let dob = match non_blank(req.dob.as_deref()) {
            Some(dob) => Some(normalize_dob(dob).ok_or(AccountError::InvalidFormat(Field::Dob))?),
            None => None,
        };

        if self.store.email_exists(email).await? {
            return Err(AccountError::DuplicateEmail);
        }

        let password_hash = hash_blocking(password.to_string()).await?;

        // A concurrent registration may take the email after the check above
        let user = match self
            .store
            .insert_user(NewUser {
                username: email.to_string(),
                fullname: fullname.to_string(),
                email: email.to_string(),
                password_hash,
                phone: phone.map(String::from),
                dob,
                address: non_blank(req.address.as_deref()).map(String::from),
                role: DEFAULT_ROLE.to_string(),
                created_at: now_timestamp(),
            })
            .await
        {
            Ok(user) => user,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(AccountError::DuplicateEmail);
            }
            Err(e) => return Err(e.into()),
        };

        info!("Registered account {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Register and issue a token tagged as a registration response
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, AccountError> {
        let user = self.register_account(req).await?;
        auth_response(user, TokenSource::Register)
    }

    /// Check an identifier (email, phone or username) and password.
    ///
    /// An unknown identifier and a wrong password fail identically.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<User, AccountError> {
        let identifier = identifier.trim();
        let user = match self.store.find_by_identifier(identifier).await? {
            Some(user) => user,
            None => {
                verify_blocking(password.to_string(), DUMMY_PASSWORD_HASH.to_string()).await?;
                warn!("Failed login: unknown identifier");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !verify_blocking(password.to_string(), user.password.clone()).await? {
            warn!("Failed login for account {}", user.id);
            return Err(AccountError::InvalidCredentials);
        }

        info!("Account {} logged in", user.id);
        Ok(user)
    }

    /// Authenticate and issue a token tagged as a login response
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, AccountError> {
        let user = self
            .authenticate(
                req.identifier.as_deref().unwrap_or_default(),
                req.password.as_deref().unwrap_or_default(),
            )
            .await?;
        auth_response(user, TokenSource::Login)
    }

    /// Apply a partial profile update.
    ///
    /// Fields are handled in the order fullname, phone, dob, address and each
    /// change is persisted on its own, so a failure leaves earlier fields
    /// updated.
    pub async fn patch(&self, id: i64, patch: UserPatch) -> Result<UserResponse, AccountError> {
        let mut user = self.store.get_user(id).await?.ok_or(AccountError::NotFound)?;

        // A blank fullname keeps the previous value
        if let FieldUpdate::Set(fullname) = &patch.fullname {
            if let Some(fullname) = non_blank(Some(fullname.as_str())) {
                user.fullname = fullname.to_string();
                self.store.save_user(&user).await?;
            }
        }

        match &patch.phone {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Clear => {
                user.phone = None;
                self.store.save_user(&user).await?;
            }
            FieldUpdate::Set(phone) => {
                let phone = phone.trim();
                if !is_valid_phone(phone) {
                    return Err(AccountError::InvalidFormat(Field::Phone));
                }
                user.phone = Some(phone.to_string());
                self.store.save_user(&user).await?;
            }
        }

        match &patch.dob {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Clear => {
                user.dob = None;
                self.store.save_user(&user).await?;
            }
            FieldUpdate::Set(dob) => {
                let dob = normalize_dob(dob.trim()).ok_or(AccountError::InvalidFormat(Field::Dob))?;
                user.dob = Some(dob);
                self.store.save_user(&user).await?;
            }
        }

        match &patch.address {
            FieldUpdate::Unchanged => {}
            FieldUpdate::Clear => {
                user.address = None;
                self.store.save_user(&user).await?;
            }
            FieldUpdate::Set(address) => {
                user.address = Some(address.trim().to_string());
                self.store.save_user(&user).await?;
            }
        }

        Ok(user.into())
    }

    pub async fn get(&self, id: i64) -> Result<UserResponse, AccountError> {
        self.store
            .get_user(id)
            .await?
            .map(UserResponse::from)
            .ok_or(AccountError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>, AccountError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn delete(&self, id: i64) -> Result<(), AccountError> {
        if self.store.delete_user(id).await? {
            info!("Deleted account {}", id);
            Ok(())
        } else {
            Err(AccountError::NotFound)
        }
    }
}

fn auth_response(user: User, source: TokenSource) -> Result<AuthResponse, AccountError> {
    let claims = ClaimSet::new(user.id, &user.fullname, &user.email, &user.role, source);
    let token = issue_token(&claims)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Hashing and verification run on the blocking pool
async fn hash_blocking(password: String) -> Result<String, AccountError> {
    tokio::task::spawn_blocking(move || crypto::hash_password(&password))
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))?
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AccountError> {
    tokio::task::spawn_blocking(move || crypto::verify_password(&password, &hash))
        .await
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::decode_token;
    use crate::db::{test_pool, SqliteStore};

    async fn service() -> (AccountService, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::new(test_pool().await));
        (AccountService::new(store.clone()), store)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            fullname: Some("Nguyen A".to_string()),
            email: Some("a@test.com".to_string()),
            password: Some("abc123".to_string()),
            phone: Some("0912345678".to_string()),
            dob: Some("1990-01-01".to_string()),
            address: None,
        }
    }

    fn patch(json: &str) -> UserPatch {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_register_success() {
        let (service, store) = service().await;
        let response = service.register(&register_request()).await.unwrap();

        assert_eq!(response.user.fullname, "Nguyen A");
        assert_eq!(response.user.dob.as_deref(), Some("1990-01-01"));
        assert_eq!(response.user.role, "User");

        let claims = decode_token(&response.token).unwrap();
        assert_eq!(claims.user_id, response.user.id);
        assert_eq!(claims.source, TokenSource::Register);

        let stored = store.get_user(response.user.id).await.unwrap().unwrap();
        assert_ne!(stored.password, "abc123");
        assert!(crypto::verify_password("abc123", &stored.password));
        assert_eq!(stored.username.as_deref(), Some("a@test.com"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, store) = service().await;
        service.register(&register_request()).await.unwrap();

        let err = service.register(&register_request()).await.unwrap_err();
        assert!(matches!(err, AccountError::DuplicateEmail));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_missing_fields_in_order() {
        let (service, _) = service().await;

        let err = service
            .register(&RegisterRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::MissingField(Field::Email)));

        let mut req = register_request();
        req.password = Some("   ".to_string());
        req.fullname = None;
        let err = service.register(&req).await.unwrap_err();
        assert!(matches!(err, AccountError::MissingField(Field::Password)));

        let mut req = register_request();
        req.fullname = Some(" ".to_string());
        let err = service.register(&req).await.unwrap_err();
        assert!(matches!(err, AccountError::MissingField(Field::Fullname)));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let (service, store) = service().await;

        for weak in ["ab1", "abcdefg", "1234567"] {
            let mut req = register_request();
            req.password = Some(weak.to_string());
            let err = service.register(&req).await.unwrap_err();
            assert!(matches!(err, AccountError::WeakPassword), "{}", weak);
        }

        let mut req = register_request();
        req.email = Some("not-an-email".to_string());
        let err = service.register(&req).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidFormat(Field::Email)));

        let mut req = register_request();
        req.phone = Some("+84912345678".to_string());
        let err = service.register(&req).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidFormat(Field::Phone)));

        let mut req = register_request();
        req.dob = Some("1990-13-45".to_string());
        let err = service.register(&req).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidFormat(Field::Dob)));

        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_alternate_dob_formats() {
        let (service, _) = service().await;

        let mut req = register_request();
        req.dob = Some("15/08/1995".to_string());
        let user = service.register_account(&req).await.unwrap();
        assert_eq!(user.dob.as_deref(), Some("1995-08-15"));

        let mut req = register_request();
        req.email = Some("b@test.com".to_string());
        req.dob = Some("12/31/1999".to_string());
        let user = service.register_account(&req).await.unwrap();
        assert_eq!(user.dob.as_deref(), Some("1999-12-31"));
    }

    #[tokio::test]
    async fn test_login_by_any_identifier() {
        let (service, _) = service().await;
        service.register(&register_request()).await.unwrap();

        for identifier in ["a@test.com", " 0912345678 "] {
            let response = service
                .login(&LoginRequest {
                    identifier: Some(identifier.to_string()),
                    password: Some("abc123".to_string()),
                })
                .await
                .unwrap();
            let claims = decode_token(&response.token).unwrap();
            assert_eq!(claims.source, TokenSource::Login);
            assert_eq!(claims.email, "a@test.com");
        }
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (service, store) = service().await;
        service.register(&register_request()).await.unwrap();

        let wrong_password = service
            .authenticate("a@test.com", "wrongpass")
            .await
            .unwrap_err();
        let unknown = service
            .authenticate("nobody@test.com", "abc123")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AccountError::InvalidCredentials));
        assert!(matches!(unknown, AccountError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown.to_string());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_patch_blank_values() {
        let (service, _) = service().await;
        let id = service.register_account(&register_request()).await.unwrap().id;

        let user = service.patch(id, patch(r#"{"phone": ""}"#)).await.unwrap();
        assert_eq!(user.phone, None);
        assert_eq!(user.dob.as_deref(), Some("1990-01-01"));

        let user = service.patch(id, patch(r#"{"fullname": ""}"#)).await.unwrap();
        assert_eq!(user.fullname, "Nguyen A");

        let user = service
            .patch(id, patch(r#"{"address": "12 Le Loi", "dob": null}"#))
            .await
            .unwrap();
        assert_eq!(user.address.as_deref(), Some("12 Le Loi"));
        assert_eq!(user.dob, None);
    }

    #[tokio::test]
    async fn test_patch_validates_phone() {
        let (service, _) = service().await;
        let id = service.register_account(&register_request()).await.unwrap().id;

        let err = service
            .patch(id, patch(r#"{"phone": "12345"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidFormat(Field::Phone)));
        assert_eq!(
            service.get(id).await.unwrap().phone.as_deref(),
            Some("0912345678")
        );
    }

    #[tokio::test]
    async fn test_patch_is_not_atomic() {
        let (service, _) = service().await;
        let id = service.register_account(&register_request()).await.unwrap().id;

        let err = service
            .patch(id, patch(r#"{"phone": "0987654321", "dob": "not a date"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidFormat(Field::Dob)));

        let user = service.get(id).await.unwrap();
        assert_eq!(user.phone.as_deref(), Some("0987654321"));
        assert_eq!(user.dob.as_deref(), Some("1990-01-01"));
    }

    #[tokio::test]
    async fn test_unknown_account() {
        let (service, _) = service().await;
        assert!(matches!(
            service.patch(99, UserPatch::default()).await,
            Err(AccountError::NotFound)
        ));
        assert!(matches!(service.get(99).await, Err(AccountError::NotFound)));
        assert!(matches!(service.delete(99).await, Err(AccountError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let (service, _) = service().await;
        let id = service.register_account(&register_request()).await.unwrap().id;
        assert_eq!(service.list().await.unwrap().len(), 1);

        service.delete(id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_duplicate_registration() {
        let (service, store) = service().await;
        let req = register_request();

        let (first, second) = tokio::join!(service.register(&req), service.register(&req));
        let results = [first, second];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AccountError::DuplicateEmail))));
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[test]
    fn test_dummy_hash_matches_default_cost() {
        use argon2::password_hash::PasswordHash;

        let fresh = crypto::hash_password("abc123").unwrap();
        let fresh = PasswordHash::new(&fresh).unwrap();
        let dummy = PasswordHash::new(DUMMY_PASSWORD_HASH).unwrap();

        assert_eq!(dummy.algorithm, fresh.algorithm);
        assert_eq!(dummy.params.to_string(), fresh.params.to_string());
        assert!(!crypto::verify_password("abc123", DUMMY_PASSWORD_HASH));
        assert!(!crypto::verify_password("", DUMMY_PASSWORD_HASH));
    }

    #[tokio::test]
    async fn test_unknown_identifier_pays_for_verification() {
        use std::time::{Duration, Instant};

        let (service, _) = service().await;
        service.register(&register_request()).await.unwrap();

        let mut known = Duration::ZERO;
        let mut unknown = Duration::ZERO;
        for _ in 0..3 {
            let start = Instant::now();
            let _ = service.authenticate("a@test.com", "wrongpass1").await;
            known += start.elapsed();

            let start = Instant::now();
            let _ = service.authenticate("nobody@test.com", "wrongpass1").await;
            unknown += start.elapsed();
        }

        assert!(
            unknown * 4 >= known,
            "unknown identifier took {:?}, known took {:?}",
            unknown,
            known
        );
    }
}
