use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::court::CourtType;
use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "court_app.toml";
pub const ENV_PREFIX: &str = "COURT_APP_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub portal: PortalConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("court_data.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub pdf_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            pdf_dir: PathBuf::from("static").join("pdfs"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    pub high_court_url: String,
    pub district_court_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Skip network access and serve an empty portal page.
    pub offline: bool,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            high_court_url: "https://hcservices.ecourts.gov.in/hcservices/main.php".to_string(),
            district_court_url: "https://services.ecourts.gov.in/ecourtindia_v6/".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 30,
            offline: false,
        }
    }
}

impl PortalConfig {
    pub fn url_for(&self, court: CourtType) -> &str {
        match court {
            CourtType::HighCourt => &self.high_court_url,
            CourtType::DistrictCourt => &self.district_court_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `court_app.toml` if present, then `COURT_APP_*` variables
    /// (`COURT_APP_SERVER__PORT=8080`). A `.env` file is read first.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment(Path::new(CONFIG_FILE)))
    }

    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("portal.high_court_url", &self.portal.high_court_url),
            ("portal.district_court_url", &self.portal.district_court_url),
        ] {
            url::Url::parse(value).map_err(|e| {
                AppError::ValidationError(format!("{} is not a valid URL: {}", key, e))
            })?;
        }
        if self.portal.timeout_secs == 0 {
            return Err(AppError::ValidationError(
                "portal.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.pdf_dir, PathBuf::from("static/pdfs"));
        assert!(!config.portal.offline);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "court_app.toml",
                r#"
                [server]
                port = 8080

                [portal]
                offline = true
                "#,
            )?;
            jail.set_env("COURT_APP_SERVER__HOST", "0.0.0.0");

            let config =
                AppConfig::from_figment(AppConfig::figment(Path::new("court_app.toml")))
                    .map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.host, "0.0.0.0");
            assert!(config.portal.offline);
            assert_eq!(config.database.path, PathBuf::from("court_data.db"));
            Ok(())
        });
    }

    #[test]
    fn test_rejects_bad_portal_url() {
        Jail::expect_with(|jail| {
            jail.set_env("COURT_APP_PORTAL__HIGH_COURT_URL", "not a url");
            let result = AppConfig::from_figment(AppConfig::figment(Path::new("missing.toml")));
            assert!(matches!(result, Err(AppError::ValidationError(_))));
            Ok(())
        });
    }
}
