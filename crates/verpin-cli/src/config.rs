use dialoguer::Input;
use std::io::{stdin, IsTerminal};
use std::path::PathBuf;

/// Where the project directory comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectSource {
    CurrentDir,
    Given(PathBuf),
    Prompt,
}

/// Asks the operator for a project directory.
pub trait PathPrompter {
    fn project_path(&self) -> Result<PathBuf, String>;
}

/// Interactive prompt on the controlling terminal.
pub struct TerminalPrompter;

impl PathPrompter for TerminalPrompter {
    fn project_path(&self) -> Result<PathBuf, String> {
        if !stdin().is_terminal() {
            return Err("--path without a value needs a TTY (pass --path <DIR>)".to_owned());
        }
        let answer: String = Input::new()
            .with_prompt("Please enter the project path")
            .default(".".to_owned())
            .interact_text()
            .map_err(|e| format!("prompt failed: {e}"))?;
        Ok(expand_tilde(answer.trim()))
    }
}

/// Settings for one run, fixed at start-up and passed to each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub project: PathBuf,
    pub json: bool,
}

impl RunConfig {
    pub fn resolve(
        source: ProjectSource,
        json: bool,
        prompter: &dyn PathPrompter,
    ) -> Result<Self, String> {
        let project = match source {
            ProjectSource::CurrentDir => std::env::current_dir()
                .map_err(|e| format!("cannot determine current directory: {e}"))?,
            ProjectSource::Given(path) => path,
            ProjectSource::Prompt => prompter.project_path()?,
        };
        Ok(Self { project, json })
    }

    /// Progress output only makes sense for humans on a terminal.
    pub fn show_progress(&self) -> bool {
        !self.json && std::io::stderr().is_terminal()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
