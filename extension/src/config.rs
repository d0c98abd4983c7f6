use anyhow::{Context, Result};
use serde::Deserialize;

const BUNDLED: &str = include_str!("../extension.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    pub log_level: String,
    pub content: ContentConfig,
    pub dashboard: DashboardConfig,
    pub badge: BadgeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub compose_selector: String,
    pub container_class: String,
    pub generation_delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Extension-relative page opened on first install and from the popup
    pub page: String,
    pub status_dismiss_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub update_text: String,
    pub update_color: String,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            content: ContentConfig::default(),
            dashboard: DashboardConfig::default(),
            badge: BadgeConfig::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            compose_selector: ".Am.Al.editable".to_string(),
            container_class: "email-assistant-container".to_string(),
            generation_delay_ms: 1500,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page: "dashboard.html".to_string(),
            status_dismiss_ms: 3000,
        }
    }
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            update_text: "!".to_string(),
            update_color: "#FF0000".to_string(),
        }
    }
}

impl ExtensionConfig {
    /// Config compiled into the binary from `extension.toml`
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED).context("Failed to load bundled extension.toml")
    }

    /// Bundled config, or defaults when it does not parse
    pub fn load_or_default() -> Self {
        match Self::bundled() {
            Ok(config) => config,
            Err(e) => {
                log::error!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.log_level
            .parse::<log::Level>()
            .map_err(|_| anyhow::anyhow!("Invalid log_level: {}", self.log_level))?;

        if self.content.compose_selector.trim().is_empty() {
            anyhow::bail!("content.compose_selector must not be empty");
        }

        let class = &self.content.container_class;
        if class.is_empty() || class.contains(char::is_whitespace) {
            anyhow::bail!(
                "content.container_class must be a single class name, got '{}'",
                class
            );
        }

        if self.dashboard.page.trim().is_empty() {
            anyhow::bail!("dashboard.page must not be empty");
        }

        let color = &self.badge.update_color;
        let hex_ok = color.starts_with('#')
            && matches!(color.len(), 4 | 7)
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !hex_ok {
            anyhow::bail!(
                "badge.update_color must be a #rgb or #rrggbb color, got '{}'",
                color
            );
        }

        Ok(())
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
