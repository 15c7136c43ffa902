//! Timed input scripts that stand in for a keyboard and dashboard.
//!
//! A script is a TOML document with a list of `[[step]]` tables. Each step
//! fires once the session clock reaches `at` seconds:
//!
//! ```toml
//! [[step]]
//! at = 0.5
//! action = "press"
//! key = "KeyW"
//!
//! [[step]]
//! at = 2.0
//! action = "use_ability"
//! name = "dendritic_lightning"
//! ```

use std::{collections::VecDeque, fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use synaptic_wars_core::Command;
use synaptic_wars_system_session::HeldKeys;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Action {
    Press { key: String },
    Release { key: String },
    UseAbility { name: String },
    SetEegMode { mode: String },
    EndGame,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
struct Step {
    at: f32,
    #[serde(flatten)]
    action: Action,
}

#[derive(Debug, Default, Deserialize)]
struct ScriptFile {
    #[serde(default)]
    step: Vec<Step>,
}

/// Replays a timed list of key changes and commands.
#[derive(Debug, Default)]
pub(crate) struct Script {
    steps: VecDeque<Step>,
    keys: HeldKeys,
}

impl Script {
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let file: ScriptFile = toml::from_str(contents).context("malformed input script")?;
        let mut steps = file.step;
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self {
            steps: steps.into(),
            keys: HeldKeys::new(),
        })
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid input script {}", path.display()))
    }

    /// Fires every step due at `now`, updating held keys and queueing commands.
    pub(crate) fn advance(&mut self, now: Duration, out_commands: &mut Vec<Command>) {
        let now = now.as_secs_f32();
        while self.steps.front().is_some_and(|step| step.at <= now) {
            let Some(step) = self.steps.pop_front() else {
                break;
            };
            match step.action {
                Action::Press { key } => self.keys.press(key),
                Action::Release { key } => self.keys.release(&key),
                Action::UseAbility { name } => out_commands.push(Command::UseAbility { name }),
                Action::SetEegMode { mode } => out_commands.push(Command::SetEegMode { mode }),
                Action::EndGame => out_commands.push(Command::EndGame),
            }
        }
    }

    pub(crate) fn keys(&self) -> &HeldKeys {
        &self.keys
    }
}
