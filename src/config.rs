use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the backend API; `/recommendations` is appended to it
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Show delete controls and allow the `delete` command
    #[serde(default = "default_enable_delete")]
    pub enable_delete: bool,

    /// Image shown for recommendations without an image URL
    #[serde(default = "default_avatar_url")]
    pub default_avatar_url: String,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_enable_delete() -> bool {
    true
}

pub fn default_avatar_url() -> String {
    "https://res.cloudinary.com/dxfqf6fgv/image/upload/v1746967371/orig_sxg7yl.svg".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert!(config.enable_delete);
        assert_eq!(config.default_avatar_url, default_avatar_url());
    }

    #[test]
    fn test_overrides_from_env() {
        let vars = vec![
            ("API_BASE_URL".to_string(), "https://admin.example.com/api".to_string()),
            ("ENABLE_DELETE".to_string(), "false".to_string()),
        ];
        let config = Config::from_vars(vars).unwrap();
        assert_eq!(config.api_base_url, "https://admin.example.com/api");
        assert!(!config.enable_delete);
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        let vars = vec![("ENABLE_DELETE".to_string(), "sometimes".to_string())];
        assert!(Config::from_vars(vars).is_err());
    }
}
