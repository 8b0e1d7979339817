mod commands;
mod config;

use clap::{ArgGroup, Parser};
use commands::{EXIT_FAILURE, EXIT_MANIFEST_ERROR, EXIT_PROJECT_ERROR};
use config::{ProjectSource, RunConfig, TerminalPrompter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "verpin",
    about = "Pin package.json dependencies to the versions installed in node_modules",
    disable_help_flag = true,
    disable_version_flag = true,
    group(ArgGroup::new("intent").multiple(false).args(["help", "version", "path"]))
)]
struct Cli {
    /// Print the help document.
    #[arg(short, long, default_value_t = false)]
    help: bool,

    /// Print the version.
    #[arg(short = 'V', long, default_value_t = false)]
    version: bool,

    /// Project directory. Given without a value, prompt for it.
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    path: Option<Option<PathBuf>>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false)]
    trace: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Intent {
    Help,
    Version,
    Pin(ProjectSource),
}

impl Cli {
    fn intent(&self) -> Intent {
        if self.help {
            return Intent::Help;
        }
        if self.version {
            return Intent::Version;
        }
        match &self.path {
            None => Intent::Pin(ProjectSource::CurrentDir),
            Some(None) => Intent::Pin(ProjectSource::Prompt),
            Some(Some(dir)) => Intent::Pin(ProjectSource::Given(dir.clone())),
        }
    }
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    // Anything the parser rejects (unknown tokens, conflicting flags) falls
    // back to the help document and a clean exit.
    let Ok(cli) = Cli::try_parse() else {
        return exit_with(commands::help::run());
    };

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("VERPIN_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.intent() {
        Intent::Help => commands::help::run(),
        Intent::Version => commands::version::run(),
        Intent::Pin(source) => RunConfig::resolve(source, cli.json, &TerminalPrompter)
            .and_then(|config| commands::pin::run(&config)),
    };
    exit_with(result)
}

fn exit_with(result: Result<u8, String>) -> ExitCode {
    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(error_exit_code(&msg))
        }
    }
}

fn error_exit_code(msg: &str) -> u8 {
    if msg.starts_with("manifest error:")
        || msg.starts_with("failed to parse manifest")
        || msg.starts_with("failed to read manifest")
    {
        EXIT_MANIFEST_ERROR
    } else if msg.starts_with("project error:") {
        EXIT_PROJECT_ERROR
    } else {
        EXIT_FAILURE
    }
}
