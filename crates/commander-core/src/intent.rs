//! Scripted intent matching.
//!
//! Input is lowercased and tested against an ordered table of keyword
//! patterns. The first rule that matches decides both the reply and the side
//! effect, so the order of [`Intent::priority`] is part of the contract: an
//! input mentioning both "resume" and "github" is a resume request.

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::action::{Section, SideEffect};
use crate::error::{CoreError, Result};
use crate::settings::SocialLinks;

/// Variants are declared in matching priority, highest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    Resume,
    Code,
    #[serde(rename = "linkedin")]
    #[strum(serialize = "linkedin")]
    LinkedIn,
    JobBoard,
    Social,
    MailWhisperer,
    MiniGame,
    Help,
    Greeting,
    Thanks,
    /// No rule matched.
    Fallback,
}

impl Intent {
    /// Matchable intents, highest priority first.
    pub fn priority() -> impl Iterator<Item = Intent> {
        Intent::iter().filter(|intent| *intent != Intent::Fallback)
    }

    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Keyword pattern tested against lowercased input. `None` for the
    /// fallback, which is never matched directly.
    fn pattern(self) -> Option<&'static str> {
        let pattern = match self {
            Intent::Resume => "(resume|cv|pdf)",
            Intent::Code => "(github|repo|code)",
            Intent::LinkedIn => "(linkedin|profile)",
            Intent::JobBoard => "(naukri)",
            Intent::Social => "(instagram|insta)",
            Intent::MailWhisperer => "(mail whisperer|mail|email)",
            Intent::MiniGame => "(game|play|mini game|click)",
            Intent::Help => "(help|what can you do)",
            Intent::Greeting => r"\b(hi|hello|hey|yo)\b",
            Intent::Thanks => "thank",
            Intent::Fallback => return None,
        };
        Some(pattern)
    }

    /// The configured link this intent hands out, if any.
    pub fn link(self, links: &SocialLinks) -> Option<&str> {
        match self {
            Intent::Resume => Some(links.resume.as_str()),
            Intent::Code => Some(links.github.as_str()),
            Intent::LinkedIn => Some(links.linkedin.as_str()),
            Intent::JobBoard => Some(links.naukri.as_str()),
            Intent::Social => Some(links.instagram.as_str()),
            _ => None,
        }
    }

    /// Reply text. Depends only on the intent and the configured links.
    pub fn reply(self, links: &SocialLinks) -> String {
        match self {
            Intent::Resume => format!("You can download the resume here: {}", links.resume),
            Intent::Code => format!("Open my GitHub: {}", links.github),
            Intent::LinkedIn => format!("LinkedIn profile: {}", links.linkedin),
            Intent::JobBoard => format!("Naukri: {}", links.naukri),
            Intent::Social => format!("Instagram: {}", links.instagram),
            Intent::MailWhisperer => "Mail Whisperer: An email summarizer (Python + Flask). \
                It fetches messages, summarizes important points using simple NLP, \
                and can read them aloud."
                .to_string(),
            Intent::MiniGame => "Want to play the Click Trainer? Open the Mini Game section \
                from the nav or say 'start game' and I'll jump you there."
                .to_string(),
            Intent::Help => "I can share quick links (resume, GitHub, LinkedIn, Naukri, \
                Instagram), give short summaries of projects, and point you to the \
                mini-game. Try asking 'open resume' or 'tell me about Mail Whisperer'."
                .to_string(),
            Intent::Greeting => "Hello! How can I help you today?".to_string(),
            Intent::Thanks => "You're welcome, Commander.".to_string(),
            Intent::Fallback => "I can help with links, project summaries, and opening the \
                mini-game. Try 'show resume', 'open GitHub' or 'tell me about Mail Whisperer'."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntentRule {
    pub intent: Intent,
    pub pattern: Regex,
}

impl IntentRule {
    pub fn new(intent: Intent, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| CoreError::Pattern {
            intent: intent.label(),
            source,
        })?;
        Ok(Self { intent, pattern })
    }

    pub fn matches(&self, normalized: &str) -> bool {
        self.pattern.is_match(normalized)
    }
}

/// Ordered rule list evaluated top to bottom, first match wins.
#[derive(Debug, Clone)]
pub struct IntentTable {
    rules: Vec<IntentRule>,
}

impl IntentTable {
    pub fn standard() -> Result<Self> {
        let rules = Intent::priority()
            .filter_map(|intent| intent.pattern().map(|pattern| (intent, pattern)))
            .map(|(intent, pattern)| IntentRule::new(intent, pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Classifies already-lowercased text.
    pub fn classify(&self, normalized: &str) -> Intent {
        self.rules
            .iter()
            .find(|rule| rule.matches(normalized))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Fallback)
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }
}

/// One answered user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Trimmed user text.
    pub input: String,
    pub intent: Intent,
    pub reply: String,
    pub effect: Option<SideEffect>,
}

/// Maps free text to exactly one reply and at most one side effect.
#[derive(Debug, Clone)]
pub struct Responder {
    table: IntentTable,
    launch: Regex,
    links: SocialLinks,
}

impl Responder {
    pub fn new(links: SocialLinks) -> Result<Self> {
        let launch = Regex::new("(start game|play|mini game|click trainer)").map_err(|source| {
            CoreError::Pattern { intent: Intent::MiniGame.label(), source }
        })?;
        Ok(Self { table: IntentTable::standard()?, launch, links })
    }

    pub fn links(&self) -> &SocialLinks {
        &self.links
    }

    /// Answers one message. Returns `None` when the input is blank after
    /// trimming.
    pub fn respond(&self, input: &str) -> Option<Turn> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let normalized = input.to_lowercase();
        let intent = self.table.classify(&normalized);
        let effect = self.effect_for(intent, &normalized);
        tracing::debug!(%intent, has_effect = effect.is_some(), "classified input");

        Some(Turn {
            input: input.to_string(),
            intent,
            reply: intent.reply(&self.links),
            effect,
        })
    }

    fn effect_for(&self, intent: Intent, normalized: &str) -> Option<SideEffect> {
        if intent == Intent::MiniGame {
            // A bare mention of the game only earns the invitation.
            return self
                .launch
                .is_match(normalized)
                .then_some(SideEffect::Navigate { section: Section::Game });
        }
        intent
            .link(&self.links)
            .map(|url| SideEffect::OpenLink { url: url.to_string() })
    }
}
