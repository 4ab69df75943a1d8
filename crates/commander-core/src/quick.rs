use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Canned prompts offered as buttons under the chat input. Parses from the
/// short command name, ignoring ASCII case, and displays as the submitted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum QuickPrompt {
    #[strum(to_string = "Show resume", serialize = "resume")]
    ShowResume,
    #[strum(to_string = "Open GitHub", serialize = "github")]
    OpenGithub,
    #[strum(to_string = "Start game", serialize = "game")]
    StartGame,
}

impl QuickPrompt {
    /// Text submitted on the user's behalf.
    pub fn text(self) -> &'static str {
        self.into()
    }

    /// Short command name used by the terminal dialog.
    pub fn command(self) -> &'static str {
        match self {
            QuickPrompt::ShowResume => "resume",
            QuickPrompt::OpenGithub => "github",
            QuickPrompt::StartGame => "game",
        }
    }
}
