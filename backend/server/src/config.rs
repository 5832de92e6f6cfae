use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use secrecy::SecretString;
use tracing::{info, warn};

use crate::{auth::ProviderCredentials, error::ConfigError};

pub const PORT: &str = "RUST_PORT";
pub const DATASET_PATH: &str = "DATASET_PATH";
pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";

const DEFAULT_PORT: &str = "3000";

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub dataset_path: Option<PathBuf>,
    pub google: ProviderCredentials,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(var, read_secret)
    }

    /// Optional keys come from `env` only. Credentials fall back to `secrets`.
    pub fn from_lookup<E, S>(env: E, secrets: S) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
        S: Fn(&str) -> Option<String>,
    {
        let credential = |key: &str| env(key).or_else(|| secrets(key));

        Ok(Self {
            port: try_load(&env, PORT, DEFAULT_PORT)?,
            dataset_path: env(DATASET_PATH).map(PathBuf::from),
            google: ProviderCredentials {
                client_id: require(&credential, GOOGLE_CLIENT_ID)?,
                client_secret: SecretString::from(require(&credential, GOOGLE_CLIENT_SECRET)?),
            },
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("{secret_name} not in environment or {path}: {e}");
        })
        .ok()
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
        })
}

fn require<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingCredential(key))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key| map.get(key).cloned()
    }

    fn no_secrets(_: &str) -> Option<String> {
        None
    }

    const CREDENTIALS: [(&str, &str); 2] = [
        (GOOGLE_CLIENT_ID, "client-id"),
        (GOOGLE_CLIENT_SECRET, "client-secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&CREDENTIALS), no_secrets).unwrap();

        assert_eq!(config.port, 3000);
        assert!(config.dataset_path.is_none());
        assert_eq!(config.google.client_id, "client-id");
        assert_eq!(config.google.client_secret.expose_secret(), "client-secret");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(
            lookup(&[
                CREDENTIALS[0],
                CREDENTIALS[1],
                (PORT, "8080"),
                (DATASET_PATH, "/data/database.json"),
            ]),
            no_secrets,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.dataset_path,
            Some(PathBuf::from("/data/database.json"))
        );
    }

    #[test]
    fn test_invalid_port() {
        let result = Config::from_lookup(
            lookup(&[CREDENTIALS[0], CREDENTIALS[1], (PORT, "not-a-port")]),
            no_secrets,
        );

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: PORT, .. })
        ));
    }

    #[test]
    fn test_missing_client_id() {
        let result = Config::from_lookup(lookup(&[CREDENTIALS[1]]), no_secrets);

        assert!(matches!(
            result,
            Err(ConfigError::MissingCredential(GOOGLE_CLIENT_ID))
        ));
    }

    #[test]
    fn test_missing_client_secret() {
        let result = Config::from_lookup(lookup(&[CREDENTIALS[0]]), no_secrets);

        assert!(matches!(
            result,
            Err(ConfigError::MissingCredential(GOOGLE_CLIENT_SECRET))
        ));
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let result = Config::from_lookup(
            lookup(&[CREDENTIALS[0], (GOOGLE_CLIENT_SECRET, "  ")]),
            no_secrets,
        );

        assert!(matches!(
            result,
            Err(ConfigError::MissingCredential(GOOGLE_CLIENT_SECRET))
        ));
    }

    #[test]
    fn test_credentials_fall_back_to_secrets() {
        let config =
            Config::from_lookup(lookup(&[CREDENTIALS[0]]), lookup(&[CREDENTIALS[1]])).unwrap();

        assert_eq!(config.google.client_id, "client-id");
        assert_eq!(config.google.client_secret.expose_secret(), "client-secret");
    }

    #[test]
    fn test_environment_wins_over_secrets() {
        let config = Config::from_lookup(
            lookup(&CREDENTIALS),
            lookup(&[(GOOGLE_CLIENT_ID, "from-secret")]),
        )
        .unwrap();

        assert_eq!(config.google.client_id, "client-id");
    }

    #[test]
    fn test_optional_keys_skip_secrets() {
        let secrets = |key: &str| -> Option<String> {
            assert!(key != PORT && key != DATASET_PATH, "{key} read from secrets");
            None
        };

        let config = Config::from_lookup(lookup(&CREDENTIALS), secrets).unwrap();

        assert_eq!(config.port, 3000);
        assert!(config.dataset_path.is_none());
    }
}
