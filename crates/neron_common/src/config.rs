//! Neron Configuration System
//!
//! Voice, timing, decoration, contact delivery and special-case replies.
//! Config file: ~/.config/neron/config.toml or /etc/neron/config.toml

use anyhow::{Context, Result};
use neron_shared::{Decoration, OverrideRule, OverrideTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "NERON_CONFIG";

/// Speech parameters handed to the synthesizer with every utterance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP 47 language tag
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Voice name to prefer over language matching
    pub preferred_voice: Option<String>,
    /// External TTS program (e.g. "espeak-ng"); unset means silent pacing
    pub command: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            lang: "ru-RU".to_string(),
            rate: 0.95,
            pitch: 1.1,
            volume: 1.0,
            preferred_voice: None,
            command: None,
        }
    }
}

/// Fixed delays of the avatar lifecycle, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub thinking_ms: u64,
    pub click_thinking_min_ms: u64,
    pub click_thinking_max_ms: u64,
    pub greeting_delay_ms: u64,
    pub silent_ms: u64,
    pub lip_sync_interval_ms: u64,
    pub text_visible_ms: u64,
    pub halo_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            thinking_ms: 800,
            click_thinking_min_ms: 1000,
            click_thinking_max_ms: 1500,
            greeting_delay_ms: 1500,
            silent_ms: 300,
            lip_sync_interval_ms: 100,
            text_visible_ms: 5000,
            halo_ms: 1600,
        }
    }
}

impl TimingConfig {
    pub fn thinking(&self) -> Duration {
        Duration::from_millis(self.thinking_ms)
    }

    pub fn greeting_delay(&self) -> Duration {
        Duration::from_millis(self.greeting_delay_ms)
    }

    pub fn silent(&self) -> Duration {
        Duration::from_millis(self.silent_ms)
    }

    /// Never zero: a zero period would spin the lip-sync task.
    pub fn lip_sync_interval(&self) -> Duration {
        Duration::from_millis(self.lip_sync_interval_ms.max(1))
    }

    pub fn text_visible(&self) -> Duration {
        Duration::from_millis(self.text_visible_ms)
    }

    pub fn halo(&self) -> Duration {
        Duration::from_millis(self.halo_ms)
    }

    /// Click thinking window as an ordered (min, max) pair.
    pub fn click_thinking_range(&self) -> (u64, u64) {
        let (a, b) = (self.click_thinking_min_ms, self.click_thinking_max_ms);
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// EmailJS REST credentials. All three ids are required to send.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub endpoint: String,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            endpoint: "https://api.emailjs.com".to_string(),
        }
    }
}

impl EmailJsConfig {
    pub fn is_complete(&self) -> bool {
        !self.service_id.trim().is_empty()
            && !self.template_id.trim().is_empty()
            && !self.public_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormspreeConfig {
    pub form_id: String,
    #[serde(default = "default_formspree_endpoint")]
    pub endpoint: String,
}

fn default_formspree_endpoint() -> String {
    "https://formspree.io".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactConfig {
    pub to_email: String,
    pub emailjs: EmailJsConfig,
    pub formspree: Option<FormspreeConfig>,
    /// Request timeout for delivery transports
    pub timeout_secs: u64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            to_email: "djarikdevo@tutamail.com".to_string(),
            emailjs: EmailJsConfig::default(),
            formspree: None,
            timeout_secs: 10,
        }
    }
}

/// Special-case reply settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OverridesConfig {
    /// Keep the built-in special cases in front of the custom ones
    pub builtin: bool,
    pub rules: Vec<OverrideRule>,
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            rules: Vec::new(),
        }
    }
}

impl OverridesConfig {
    /// Build the ordered override table: built-ins first, then custom rules.
    pub fn table(&self) -> Result<OverrideTable> {
        let mut table = if self.builtin {
            OverrideTable::builtin()
        } else {
            OverrideTable::empty()
        };
        for rule in &self.rules {
            table
                .push(rule.clone())
                .with_context(|| format!("Invalid override rule '{}'", rule.name))?;
        }
        Ok(table)
    }
}

/// Main Neron configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NeronConfig {
    /// Fixed RNG seed for reproducible sessions
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub voice: VoiceConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub decoration: Decoration,

    #[serde(default)]
    pub contact: ContactConfig,

    #[serde(default)]
    pub overrides: OverridesConfig,
}

impl NeronConfig {
    /// Get default user config path: ~/.config/neron/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("neron").join("config.toml"))
    }

    /// Get system config path: /etc/neron/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/neron/config.toml")
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. Explicit path (command line)
    /// 2. $NERON_CONFIG
    /// 3. User config (~/.config/neron/config.toml)
    /// 4. System config (/etc/neron/config.toml)
    /// 5. Defaults
    ///
    /// Environment credentials are applied on top in every case.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match Self::discover(explicit) {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Path that `load` would read, if any.
    pub fn discover(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Some(user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Some(system_path);
        }

        None
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: NeronConfig = toml::from_str(contents)?;
        // Fail early on bad override rules rather than mid-conversation
        config.overrides.table()?;
        Ok(config)
    }

    /// EmailJS credentials from the environment win over the file.
    pub fn apply_env(&mut self) {
        let vars = [
            ("NERON_EMAILJS_SERVICE", &mut self.contact.emailjs.service_id),
            ("NERON_EMAILJS_TEMPLATE", &mut self.contact.emailjs.template_id),
            ("NERON_EMAILJS_KEY", &mut self.contact.emailjs.public_key),
        ];
        for (name, slot) in vars {
            if let Ok(value) = std::env::var(name) {
                *slot = value.trim().to_string();
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
