use std::{path::Path, str::FromStr};

use tokio::fs;
use tracing::Level;

use crate::utilities::errors::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_address: String,
    pub tracing_level: Level,

    // DATABASE
    pub database_url: String,

    // JWT
    pub jwt_secret_key: String,
    pub access_token_expire_in_minutes: i64,

    // ENRICHMENT PROVIDERS
    pub location_iq_api_key: String,
    pub unsplash_access_key: String,
}

impl Config {
    pub async fn init() -> Result<Self, AppError> {
        let server_address = get_config_value(
            "server_address",
            Some("SERVER_ADDRESS"),
            Some("0.0.0.0:8000".to_string()),
        )
        .await?
        .ok_or_else(|| AppError::EnvironmentVariableNotSetError("SERVER_ADDRESS".to_string()))?;

        let tracing_level =
            get_config_value("tracing_level", Some("TRACING_LEVEL"), Some(Level::INFO))
                .await?
                .ok_or_else(|| {
                    AppError::EnvironmentVariableNotSetError("TRACING_LEVEL".to_string())
                })?;

        let database_url = get_config_value("database_url", Some("DATABASE_URL"), None)
            .await?
            .ok_or_else(|| AppError::EnvironmentVariableNotSetError("DATABASE_URL".to_string()))?;

        let jwt_secret_key = get_config_value("secret_key", Some("SECRET_KEY"), None)
            .await?
            .ok_or_else(|| AppError::EnvironmentVariableNotSetError("SECRET_KEY".to_string()))?;

        let access_token_expire_in_minutes = get_config_value(
            "access_token_expire_in_minutes",
            Some("ACCESS_TOKEN_EXPIRE_IN_MINUTES"),
            Some(40),
        )
        .await?
        .ok_or_else(|| {
            AppError::EnvironmentVariableNotSetError("ACCESS_TOKEN_EXPIRE_IN_MINUTES".to_string())
        })?;

        let location_iq_api_key =
            get_config_value("location_iq_api_key", Some("LOCATION_IQ_API_KEY"), None)
                .await?
                .ok_or_else(|| {
                    AppError::EnvironmentVariableNotSetError("LOCATION_IQ_API_KEY".to_string())
                })?;

        let unsplash_access_key =
            get_config_value("unsplash_access_key", Some("UNSPLASH_ACCESS_KEY"), None)
                .await?
                .ok_or_else(|| {
                    AppError::EnvironmentVariableNotSetError("UNSPLASH_ACCESS_KEY".to_string())
                })?;

        Ok(Config {
            server_address,
            tracing_level,
            database_url,
            jwt_secret_key,
            access_token_expire_in_minutes,
            location_iq_api_key,
            unsplash_access_key,
        })
    }
}

/// Try to resolve a config value from Docker secrets, then an env var.
/// - `secret_name` → filename inside `/run/secrets/`
/// - `env_name` → optional environment variable key
///
/// Returns parsed `T` if found and successfully parsed, otherwise the
/// fallback.
pub async fn get_config_value<T>(
    secret_name: &str,
    env_name: Option<&str>,
    fallback: Option<T>,
) -> Result<Option<T>, AppError>
where
    T: FromStr,
{
    // 1. Docker secrets
    let docker_secret = Path::new("/run/secrets").join(secret_name);
    if docker_secret.exists() {
        match fs::read_to_string(&docker_secret).await {
            Ok(content) => {
                if let Ok(parsed) = T::from_str(content.trim()) {
                    return Ok(Some(parsed));
                }
            }
            Err(e) => {
                return Err(AppError::FileReadError(format!(
                    "Failed to read docker secret at {0}, {e}",
                    docker_secret.display()
                )));
            }
        }
    }

    // 2. Env var
    if let Some(env_key) = env_name
        && let Ok(val) = std::env::var(env_key)
        && let Ok(parsed) = T::from_str(val.trim())
    {
        return Ok(Some(parsed));
    }

    // 3. Final fallback
    Ok(fallback)
}
