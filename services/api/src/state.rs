use db::Db;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub data_dir: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Settings {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();

        let cfg = config::Config::builder()
            .add_source(
                // no separator: DATA_DIR must stay a single `data_dir` key
                config::Environment::default().try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize::<Settings>()
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or("data"))
    }

    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| "0.0.0.0".into())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(3001)
    }
}
