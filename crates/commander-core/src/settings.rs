//! Startup configuration: the named links the assistant hands out and the
//! timing constants of the chat dialog and the reflex trainer.

use std::path::Path;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Links supplied once at startup and never changed afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(into)]
pub struct SocialLinks {
    /// `mailto:` address shown on the contact button.
    pub email: String,
    /// Professional network profile.
    pub linkedin: String,
    /// Source code host profile.
    pub github: String,
    /// Job board profile.
    pub naukri: String,
    /// Social media profile.
    pub instagram: String,
    /// Path of the downloadable resume document.
    pub resume: String,
}

impl Default for SocialLinks {
    fn default() -> Self {
        Self {
            email: "mailto:jaydeveloper010@gmail.com".to_string(),
            linkedin: "https://www.linkedin.com/in/somala-ajay-8a806b213/".to_string(),
            github: "https://github.com/Ajaysomala".to_string(),
            naukri: "https://www.naukri.com/".to_string(),
            instagram: "https://www.instagram.com/_jay__official____/?hl=en".to_string(),
            resume: "/Somala-Ajay-Resume.pdf".to_string(),
        }
    }
}

impl SocialLinks {
    fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("email", self.email.as_str()),
            ("linkedin", self.linkedin.as_str()),
            ("github", self.github.as_str()),
            ("naukri", self.naukri.as_str()),
            ("instagram", self.instagram.as_str()),
            ("resume", self.resume.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(default)]
pub struct TimingSettings {
    /// Lower bound of the simulated "thinking" delay before a reply.
    pub thinking_min_ms: u64,
    /// Upper bound of the simulated "thinking" delay before a reply.
    pub thinking_max_ms: u64,
    /// Fixed delay used for quick prompts.
    pub quick_reply_ms: u64,
    /// Delay between a navigation and the dialog closing.
    pub close_dialog_ms: u64,
    /// Length of one reflex round.
    pub round_seconds: u32,
    /// Period of the round countdown.
    pub tick_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            thinking_min_ms: 600,
            thinking_max_ms: 1400,
            quick_reply_ms: 400,
            close_dialog_ms: 400,
            round_seconds: 20,
            tick_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[serde(default)]
pub struct Settings {
    pub links: SocialLinks,
    pub timing: TimingSettings,
}

impl Settings {
    /// Reads settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&raw).map_err(|source| CoreError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        if timing.thinking_min_ms > timing.thinking_max_ms {
            return Err(CoreError::InvalidSettings(format!(
                "thinking_min_ms ({}) exceeds thinking_max_ms ({})",
                timing.thinking_min_ms, timing.thinking_max_ms
            )));
        }
        if timing.round_seconds == 0 {
            return Err(CoreError::InvalidSettings(
                "round_seconds must be positive".to_string(),
            ));
        }
        if timing.tick_ms == 0 {
            return Err(CoreError::InvalidSettings("tick_ms must be positive".to_string()));
        }
        if let Some((name, _)) = self
            .links
            .named()
            .into_iter()
            .find(|(_, link)| link.trim().is_empty())
        {
            return Err(CoreError::InvalidSettings(format!("link `{name}` is empty")));
        }
        Ok(())
    }
}
