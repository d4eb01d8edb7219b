//! Sign-in collaborator.
//!
//! The dashboard only needs an authenticated [`UserIdentity`]. Code
//! verification sits behind [`Authenticator`]; there is no real verification
//! backend yet, so the binary wires in the [`AcceptAnyCode`] double.

use crate::error::AuthError;
use crate::types::UserIdentity;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Check a two-factor code for `identity`.
    async fn verify_code(&self, identity: &UserIdentity, code: &str) -> Result<bool, AuthError>;
}

/// Test double accepting every non-empty code after a simulated delay.
#[derive(Debug, Clone)]
pub struct AcceptAnyCode {
    delay: Duration,
}

impl AcceptAnyCode {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for AcceptAnyCode {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl Authenticator for AcceptAnyCode {
    async fn verify_code(&self, identity: &UserIdentity, code: &str) -> Result<bool, AuthError> {
        if code.trim().is_empty() {
            return Err(AuthError::EmptyCode);
        }
        tokio::time::sleep(self.delay).await;
        tracing::info!("Verifying 2FA for {}. Auto-accepting.", identity);
        Ok(true)
    }
}

/// The signed-in user, if any. An absent identity suppresses every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<UserIdentity>,
}

impl Session {
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Verify `code` and, on success, sign `identity` in.
    pub async fn sign_in(
        &mut self,
        authenticator: &dyn Authenticator,
        identity: UserIdentity,
        code: &str,
    ) -> Result<bool, AuthError> {
        let verified = authenticator.verify_code(&identity, code).await?;
        if verified {
            self.identity = Some(identity);
        }
        Ok(verified)
    }

    /// Sign in an identity that was verified elsewhere (e.g. a background job).
    pub fn accept(&mut self, identity: UserIdentity) {
        self.identity = Some(identity);
    }

    pub fn sign_out(&mut self) {
        if let Some(identity) = self.identity.take() {
            tracing::info!("Signed out {}", identity);
        }
    }
}
