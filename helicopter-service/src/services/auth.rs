use std::sync::Arc;

use crate::{
    dtos::auth::{LoginRequest, RegisterRequest, TokenResponse},
    models::{NewUser, User},
    services::{metrics, IdentityStore, JwtService, ServiceError},
    utils::{dummy_password_hash, hash_password, verify_password, Password, PasswordHashString},
};

/// Registration, login and bearer-token authentication.
#[derive(Clone)]
pub struct AuthService {
    identities: Arc<dyn IdentityStore>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(identities: Arc<dyn IdentityStore>, jwt: JwtService) -> Self {
        Self { identities, jwt }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<TokenResponse, ServiceError> {
        let email = normalize_email(&req.email);

        if self.identities.find_by_email(&email).await?.is_some() {
            metrics::record_registration("conflict");
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        let password = Password::new(req.password);
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
            .map_err(|e| {
                ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e))
            })?;

        let name = req
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let user = self
            .identities
            .insert(NewUser {
                email,
                password_hash: password_hash.into_string(),
                name,
            })
            .await
            .inspect_err(|e| {
                if matches!(e, ServiceError::EmailAlreadyRegistered) {
                    metrics::record_registration("conflict");
                }
            })?;

        tracing::info!(user_id = user.id, "User registered");
        metrics::record_registration("success");

        self.issue_token(&user)
    }

    /// Unknown email and wrong password fail the same way, and both pay for
    /// one password verification.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, ServiceError> {
        let email = normalize_email(&req.email);

        let user = self.identities.find_by_email(&email).await?;
        let stored_hash = match &user {
            Some(user) => PasswordHashString::new(user.password_hash.clone()),
            None => dummy_password_hash().clone(),
        };

        let password = Password::new(req.password);
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| {
                    ServiceError::Internal(anyhow::anyhow!("Verification task failed: {}", e))
                })?;

        let user = match user {
            Some(user) if verified => user,
            Some(user) => {
                tracing::info!(user_id = user.id, "Login rejected: wrong password");
                metrics::record_login("bad_credentials");
                return Err(ServiceError::BadCredentials);
            }
            None => {
                metrics::record_login("bad_credentials");
                return Err(ServiceError::BadCredentials);
            }
        };

        tracing::info!(user_id = user.id, "User logged in");
        metrics::record_login("success");

        self.issue_token(&user)
    }

    /// Resolve a bearer token to the live identity it names.
    pub async fn authenticate(&self, token: &str) -> Result<User, ServiceError> {
        let claims = self.jwt.validate_access_token(token).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            ServiceError::Unauthorized("Invalid or expired token".to_string())
        })?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| ServiceError::Unauthorized("Invalid or expired token".to_string()))?;

        let user = self.identities.find_by_id(user_id).await.map_err(|e| {
            tracing::error!(error = %e, user_id, "Identity lookup failed during authentication");
            ServiceError::Unauthorized("Unable to authenticate".to_string())
        })?;

        user.ok_or_else(|| ServiceError::Unauthorized("User no longer exists".to_string()))
    }

    fn issue_token(&self, user: &User) -> Result<TokenResponse, ServiceError> {
        let access_token = self.jwt.generate_access_token(user.id, &user.email)?;
        Ok(TokenResponse::bearer(
            access_token,
            self.jwt.access_token_expiry_seconds(),
        ))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::services::MockIdentityStore;
    use secrecy::SecretString;

    fn service() -> (AuthService, Arc<MockIdentityStore>) {
        let store = Arc::new(MockIdentityStore::new());
        let jwt = JwtService::new(&JwtConfig {
            secret: SecretString::new("unit-test-secret-unit-test-secret".to_string()),
            access_token_expiry_minutes: 60,
        })
        .unwrap();
        (AuthService::new(store.clone(), jwt), store)
    }

    fn register_req(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: Some("Alice".to_string()),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn register_issues_token_for_new_identity() {
        let (service, store) = service();

        let token = service
            .register(register_req("a@x.com", "password123"))
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let user = service.authenticate(&token.access_token).await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_ne!(user.password_hash, "password123");
        assert_eq!(store.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (service, _) = service();
        service
            .register(register_req("a@x.com", "password123"))
            .await
            .unwrap();

        let err = service
            .register(register_req("A@X.com ", "another-password"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EmailAlreadyRegistered));
    }

    #[tokio::test]
    async fn login_with_correct_password() {
        let (service, _) = service();
        service
            .register(register_req("a@x.com", "password123"))
            .await
            .unwrap();

        let token = service
            .login(login_req("a@x.com", "password123"))
            .await
            .unwrap();
        let user = service.authenticate(&token.access_token).await.unwrap();
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_identically() {
        let (service, _) = service();
        service
            .register(register_req("a@x.com", "password123"))
            .await
            .unwrap();

        let wrong = service
            .login(login_req("a@x.com", "wrong-password"))
            .await
            .unwrap_err();
        let unknown = service
            .login(login_req("b@x.com", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(wrong, ServiceError::BadCredentials));
        assert!(matches!(unknown, ServiceError::BadCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn unknown_email_costs_a_password_verification() {
        let (service, _) = service();
        service
            .register(register_req("a@x.com", "password123"))
            .await
            .unwrap();
        // Build the dummy hash up front so its one-off cost is not timed
        dummy_password_hash();

        let mut wrong = std::time::Duration::ZERO;
        let mut unknown = std::time::Duration::ZERO;
        for _ in 0..3 {
            let started = std::time::Instant::now();
            let _ = service.login(login_req("a@x.com", "wrong-password")).await;
            wrong += started.elapsed();

            let started = std::time::Instant::now();
            let _ = service.login(login_req("nobody@x.com", "wrong-password")).await;
            unknown += started.elapsed();
        }

        assert!(
            unknown * 4 >= wrong,
            "unknown email took {:?}, wrong password took {:?}",
            unknown,
            wrong
        );
    }

    #[tokio::test]
    async fn authenticate_rejects_garbage_token() {
        let (service, _) = service();
        let err = service.authenticate("garbage").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn authenticate_rejects_token_for_missing_identity() {
        let (service, _) = service();
        let token = service.jwt.generate_access_token(999, "ghost@x.com").unwrap();

        let err = service.authenticate(&token).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn authenticate_fails_closed_on_store_error() {
        let (service, store) = service();
        let token = service
            .register(register_req("a@x.com", "password123"))
            .await
            .unwrap();

        store.set_failing(true);
        let err = service.authenticate(&token.access_token).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
