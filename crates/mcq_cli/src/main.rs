use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mcq_tui::{
    init_file_logging, run_session, AnsiRenderer, EnvConfig, ProcessTerminal, RawInput, Termination,
};
use quiz_store::{load_session, YamlAnswerStore, EXPECTED_FORMAT};

/// Exit status after an interrupt, as a shell reports SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(
    name = "mcq",
    about = "Answer multiple choice questions from a YAML file in the terminal"
)]
#[command(version)]
struct Cli {
    /// YAML file with a `questions:` list; answers are written back into it
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = EnvConfig::from_env();
    if let Err(err) = init_file_logging(&config) {
        eprintln!("warning: cannot open log file: {err}");
    }

    match run(&cli.path, &config) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "mcq failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, config: &EnvConfig) -> Result<ExitCode> {
    println!("Parsing YAML questions from {}...", path.display());
    let session = match load_session(path) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("\nExpected YAML format:\n\n{EXPECTED_FORMAT}");
            return Ok(ExitCode::FAILURE);
        }
    };
    println!("Found {} question(s)", session.len());

    let mut input = RawInput::acquire(ProcessTerminal::new(), config.stdin_buffer_options())
        .context("failed to put the terminal into raw mode")?;
    let mut renderer = AnsiRenderer::new(io::stdout().lock(), !config.no_color);
    let mut store = YamlAnswerStore::new(path);

    let outcome = run_session(session, &mut input, &mut renderer, &mut store);

    if let Err(err) = renderer.finish() {
        tracing::warn!(error = %err, "failed to reset cursor");
    }
    drop(renderer);
    if let Err(err) = input.release() {
        tracing::warn!(error = %err, "failed to restore terminal mode");
        eprintln!("warning: failed to restore terminal mode: {err}");
    }

    if let Some(err) = &outcome.input_error {
        eprintln!("warning: input stopped early: {err}");
    }
    match &outcome.persisted {
        Ok(report) => println!(
            "Answers saved to {} ({} of {} answered)",
            path.display(),
            report.answered,
            report.total
        ),
        Err(err) => eprintln!("error: failed to save answers: {err}"),
    }

    Ok(match outcome.termination {
        Termination::Quit => ExitCode::SUCCESS,
        Termination::Interrupted => ExitCode::from(EXIT_INTERRUPTED),
    })
}
