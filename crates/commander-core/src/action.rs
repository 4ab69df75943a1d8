use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

/// Anchored sections of the portfolio page. Displays as the page anchor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[strum(to_string = "#about")]
    About,
    #[strum(to_string = "#projects")]
    Projects,
    #[strum(to_string = "#certs")]
    Certifications,
    #[strum(to_string = "#game")]
    Game,
}

impl Section {
    pub fn anchor(self) -> &'static str {
        self.into()
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Projects => "Projects",
            Section::Certifications => "Certifications",
            Section::Game => "Mini Game",
        }
    }
}

/// The single host action a turn may trigger once its reply is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SideEffect {
    /// Open a link in a new browsing context.
    OpenLink { url: String },
    /// Switch the visible section. The hosting dialog closes afterward.
    Navigate { section: Section },
}

impl SideEffect {
    pub fn closes_dialog(&self) -> bool {
        matches!(self, SideEffect::Navigate { .. })
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideEffect::OpenLink { url } => write!(f, "open {url}"),
            SideEffect::Navigate { section } => write!(f, "navigate to {section}"),
        }
    }
}
