// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Answer service endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub ask_path: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            ask_path: "/pdf/ask".to_string(),
            timeout_secs: 60,
            user_agent: format!("evidence-console/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Query defaults. The top-k bounds are advisory and never enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_top_k: u32,
    pub min_top_k: u32,
    pub max_top_k: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_k: 10,
            min_top_k: 1,
            max_top_k: 50,
        }
    }
}

/// Main configuration for evidence-console
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub query: QueryConfig,
}

const DEFAULT_TEMPLATE: &str = include_str!("../config-templates/default.toml");

impl Config {
    /// Load configuration from config.toml file
    /// First tries to load from system config directory, falls back to embedded template
    pub fn load() -> Result<Self> {
        let config_path = crate::storage::get_system_config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))
        } else {
            let config = Self::parse(DEFAULT_TEMPLATE)?;

            if let Some(parent) = config_path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&config_path, DEFAULT_TEMPLATE)?;

            Ok(config)
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command line overrides
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.service.base_url = base_url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_matches_defaults() {
        let config = Config::parse(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.ask_path, "/pdf/ask");
        assert_eq!(config.service.timeout_secs, 60);
        assert_eq!(config.service.user_agent, ServiceConfig::default().user_agent);
        assert!(config.service.user_agent.ends_with(env!("CARGO_PKG_VERSION")));
        assert_eq!(config.query, QueryConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
[service]
base_url = "http://rag.internal:9000"
"#,
        )
        .unwrap();

        assert_eq!(config.service.base_url, "http://rag.internal:9000");
        assert_eq!(config.service.ask_path, "/pdf/ask");
        assert_eq!(config.query.default_top_k, 10);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        assert!(Config::parse("[query]\ndefault_top_k = \"ten\"").is_err());
    }

    #[test]
    fn test_base_url_override() {
        let config = Config::default().with_base_url(Some("http://10.0.0.5:8000".to_string()));
        assert_eq!(config.service.base_url, "http://10.0.0.5:8000");

        let config = Config::default().with_base_url(Some("  ".to_string()));
        assert_eq!(config.service.base_url, "http://localhost:8000");

        let config = Config::default().with_base_url(None);
        assert_eq!(config.service.base_url, "http://localhost:8000");
    }
}
