use clap::Parser;
use std::path::PathBuf;

/// Deena - login and registration portal
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Host address to bind to
    #[arg(long, env = "DEENA_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "DEENA_PORT", default_value = "3000")]
    pub port: String,

    /// Data directory for the session database
    #[arg(long, env = "DEENA_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Base URL for the application
    #[arg(long, env = "DEENA_BASE_URL")]
    pub base_url: Option<String>,

    /// Root URL of the remote authentication API
    #[arg(long, env = "DEENA_AUTH_API_URL", default_value = "http://127.0.0.1:8000")]
    pub auth_api_url: String,

    /// Days of inactivity after which a session expires
    #[arg(long, env = "DEENA_SESSION_DAYS", default_value = "7")]
    pub session_days: i64,

    /// Static files directory
    #[arg(long, env = "DEENA_STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,
}

impl Config {
    /// Get the base URL, defaulting to http://host:port if not set
    pub fn get_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }

    /// Get the session database URL
    pub fn get_database_url(&self) -> String {
        let db_path = self.data_dir.join("deena.db");
        format!("sqlite:{}", db_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse_from(["deena"]);
        assert_eq!(config.get_base_url(), "http://127.0.0.1:3000");
        assert_eq!(config.get_database_url(), "sqlite:./data/deena.db");
        assert_eq!(config.auth_api_url, "http://127.0.0.1:8000");
        assert_eq!(config.session_days, 7);
    }

    #[test]
    fn test_explicit_base_url_wins() {
        let config = Config::parse_from([
            "deena",
            "--base-url",
            "https://portal.example",
            "--data-dir",
            "/var/lib/deena",
        ]);
        assert_eq!(config.get_base_url(), "https://portal.example");
        assert_eq!(config.get_database_url(), "sqlite:/var/lib/deena/deena.db");
    }
}
