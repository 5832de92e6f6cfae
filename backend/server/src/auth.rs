//! # Sign-in
//!
//! Authentication itself is delegated to an external OAuth identity provider.
//! The backend only owns three small pieces of it:
//!
//! - Provider credentials, required at startup (see [`crate::config`])
//! - The decision whether a provider's account/profile pair may sign in
//! - A session flag for callers that track logged-in state
//!
//! ## Policy
//! - `google` exposes `email_verified`, so sign-in is allowed only when it is `true`
//! - Any other provider is allowed, they get their own verification upstream
use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

pub const VERIFIED_EMAIL_PROVIDER: &str = "google";

#[derive(Debug)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct Account {
    pub provider: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Profile {
    pub email_verified: Option<bool>,
}

#[derive(Deserialize)]
pub struct SignInRequest {
    pub account: Account,
    #[serde(default)]
    pub profile: Profile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInDecision {
    pub allowed: bool,
}

pub fn allow_sign_in(account: &Account, profile: &Profile) -> bool {
    if account.provider == VERIFIED_EMAIL_PROVIDER {
        return profile.email_verified == Some(true);
    }

    true
}

/// State holder for the frontend session flag: whether the user is logged in.
#[derive(Debug, Default)]
pub struct AuthFlag {
    authenticated: AtomicBool,
}

impl AuthFlag {
    pub fn authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    pub fn login(&self) {
        self.authenticated.store(true, Ordering::Release);
    }

    pub fn log_out(&self) {
        self.authenticated.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(provider: &str) -> Account {
        Account {
            provider: provider.to_string(),
        }
    }

    #[test]
    fn test_google_requires_verified_email() {
        let google = account("google");

        assert!(allow_sign_in(
            &google,
            &Profile {
                email_verified: Some(true)
            }
        ));
        assert!(!allow_sign_in(
            &google,
            &Profile {
                email_verified: Some(false)
            }
        ));
        assert!(!allow_sign_in(&google, &Profile::default()));
    }

    #[test]
    fn test_other_providers_allowed() {
        assert!(allow_sign_in(&account("github"), &Profile::default()));
        assert!(allow_sign_in(
            &account("github"),
            &Profile {
                email_verified: Some(false)
            }
        ));
    }

    #[test]
    fn test_provider_match_is_exact() {
        assert!(allow_sign_in(&account("Google"), &Profile::default()));
    }

    #[test]
    fn test_sign_in_request_without_profile() {
        let request: SignInRequest =
            serde_json::from_str(r#"{"account": {"provider": "google"}}"#).unwrap();

        assert!(!allow_sign_in(&request.account, &request.profile));
    }

    #[test]
    fn test_auth_flag() {
        let flag = AuthFlag::default();
        assert!(!flag.authenticated());

        flag.login();
        assert!(flag.authenticated());

        flag.login();
        assert!(flag.authenticated());

        flag.log_out();
        assert!(!flag.authenticated());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = ProviderCredentials {
            client_id: "client".to_string(),
            client_secret: SecretString::from("hunter2".to_string()),
        };

        assert!(!format!("{credentials:?}").contains("hunter2"));
    }
}
