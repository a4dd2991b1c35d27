use serde::{Deserialize, Serialize};

/// Navigation command recognized in a spoken or typed phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Next,
    Previous,
    ToggleTimer,
    Exit,
}

/// Phrase fragments per command, in priority order
const RULES: &[(&[&str], Command)] = &[
    (&["next"], Command::Next),
    (&["previous", "back"], Command::Previous),
    (&["start timer"], Command::ToggleTimer),
    (&["exit", "finish"], Command::Exit),
];

impl Command {
    /// Interpret free text; the first rule with a matching fragment wins
    pub fn interpret(input: &str) -> Option<Self> {
        let input = input.to_lowercase();

        RULES
            .iter()
            .find(|(fragments, _)| fragments.iter().any(|f| input.contains(f)))
            .map(|(_, command)| *command)
    }
}
