use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub query_log: bool,

    #[serde(default = "default_query_log_dir")]
    pub query_log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            query_log: false,
            query_log_dir: default_query_log_dir(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_query_log_dir() -> String {
    "logs".to_string()
}
