pub mod help;
pub mod pin;
pub mod version;

use indicatif::{ProgressBar, ProgressStyle};
use verpin_core::ProgressReporter;
use verpin_schema::{DeclaredDependency, InstalledVersion};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_PROJECT_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

/// Terminal progress bar for dependency resolution. Draws to stderr.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new(visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "dependencies syncing [{bar:30.cyan/blue}] {pos}/{len} {msg}",
            )
            .expect("valid template")
            .progress_chars("=> "),
        );
        Self { bar }
    }
}

impl ProgressReporter for BarReporter {
    fn start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, dependency: &DeclaredDependency, version: &InstalledVersion) {
        self.bar.set_message(format!("{}@{version}", dependency.name));
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn abandon(&self) {
        self.bar.abandon();
    }
}
