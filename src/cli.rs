use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate, generate_to};

use crate::history::Window;

pub const DEFAULT_DATA_PATH: &str = "data/history/data.json";
pub const DEFAULT_CSV_PATH: &str = "data/output/history.csv";
pub const DEFAULT_HTML_PATH: &str = "data/output/report.html";

pub const DATA_HELP: &str =
    "Read the history feed from the given JSON file (the collector writes data/history/data.json).";
pub const FETCH_HELP: &str =
    "Download the history feed from the given URL instead of reading a local file.";
pub const WINDOW_HELP: &str =
    "History window to display and export: the last 30 or 60 days, or everything.";
pub const SAVE_CSV_HELP: &str = "Save the windowed history to the given CSV file (defaults to data/output/history.csv when no path is provided). Use --archive-csv to store a .gz instead.";
pub const SAVE_HTML_HELP: &str =
    "Save the HTML report to the given file (defaults to data/output/report.html when no path is provided).";
pub const ARCHIVE_CSV_HELP: &str =
    "Archive the saved CSV output into a .gz file (recommended for publishing).";

#[derive(Debug, Parser)]
#[command(
    name = "fangstat",
    about = "Summarize the daily Shanghai housing-market history: stat cards, trends, and an HTML report.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[arg(
        long,
        value_name = "FILE",
        default_value = DEFAULT_DATA_PATH,
        conflicts_with = "fetch",
        help = DATA_HELP
    )]
    pub data: PathBuf,
    #[arg(long, value_name = "URL", help = FETCH_HELP)]
    pub fetch: Option<String>,
    #[arg(long, value_enum, default_value_t = Window::Days30, help = WINDOW_HELP)]
    pub window: Window,
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_CSV_PATH,
        help = SAVE_CSV_HELP
    )]
    pub save_csv: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_HTML_PATH,
        help = SAVE_HTML_HELP
    )]
    pub save_html: Option<PathBuf>,
    #[arg(long, help = ARCHIVE_CSV_HELP)]
    pub archive_csv: bool,
    #[arg(
        long,
        help = "Print every row of the selected window instead of the abbreviated table."
    )]
    pub full_output: bool,
    #[arg(long, help = "Disable progress spinner output.")]
    pub no_progress: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate shell completion scripts, optionally installing them for the current user.
    Completions {
        #[arg(value_enum, help = "Shell to generate completions for.")]
        shell: Shell,
        #[arg(
            long,
            value_name = "DIR",
            help = "Directory to write the completion script to."
        )]
        output_dir: Option<PathBuf>,
        #[arg(
            long,
            help = "Install the completion script into the default location for the selected shell."
        )]
        install: bool,
    },
}

pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Completions {
            shell,
            output_dir,
            install,
        } => generate_completions(shell, output_dir, install),
    }
}

fn generate_completions(shell: Shell, output_dir: Option<PathBuf>, install: bool) -> Result<()> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    let target_dir = if let Some(dir) = output_dir {
        Some(dir)
    } else if install {
        Some(default_install_dir(shell)?)
    } else {
        None
    };

    if let Some(dir) = target_dir {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create completion directory {}", dir.display()))?;
        let path = generate_to(shell, &mut command, bin_name, &dir)
            .context("failed to write completion file")?;
        println!("Installed {shell:?} completions to {}", path.display());
    } else {
        let mut stdout = io::stdout().lock();
        generate(shell, &mut command, bin_name, &mut stdout);
        stdout
            .flush()
            .context("failed to flush completion output")?;
    }

    Ok(())
}

fn default_install_dir(shell: Shell) -> Result<PathBuf> {
    let home = std::env::var_os("HOME").ok_or_else(|| {
        anyhow!("HOME environment variable is not set; use --output-dir to specify a path")
    })?;
    let mut path = PathBuf::from(home);

    match shell {
        Shell::Bash => {
            path.push(".local/share/bash-completion/completions");
            Ok(path)
        }
        Shell::Elvish => {
            path.push(".elvish/lib/completions");
            Ok(path)
        }
        Shell::Fish => {
            path.push(".config/fish/completions");
            Ok(path)
        }
        Shell::PowerShell => {
            path.push(".local/share/powershell/Scripts");
            Ok(path)
        }
        Shell::Zsh => {
            path.push(".local/share/zsh/site-functions");
            Ok(path)
        }
        other => Err(anyhow!(
            "no default install location for {other:?}; specify --output-dir"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_flag_parses_the_closed_set() {
        let cli = Cli::parse_from(["fangstat", "--window", "60"]);
        assert_eq!(cli.window, Window::Days60);
        let cli = Cli::parse_from(["fangstat", "--window", "all"]);
        assert_eq!(cli.window, Window::All);
        assert!(Cli::try_parse_from(["fangstat", "--window", "45"]).is_err());
    }

    #[test]
    fn window_defaults_to_thirty_days() {
        let cli = Cli::parse_from(["fangstat"]);
        assert_eq!(cli.window, Window::Days30);
    }

    #[test]
    fn bare_save_flags_use_default_paths() {
        let cli = Cli::parse_from(["fangstat", "--save-csv", "--save-html"]);
        assert_eq!(cli.save_csv.unwrap(), PathBuf::from(DEFAULT_CSV_PATH));
        assert_eq!(cli.save_html.unwrap(), PathBuf::from(DEFAULT_HTML_PATH));
    }

    #[test]
    fn data_and_fetch_are_mutually_exclusive() {
        assert!(
            Cli::try_parse_from([
                "fangstat",
                "--data",
                "x.json",
                "--fetch",
                "https://example.com/data.json"
            ])
            .is_err()
        );
        // --fetch alone is fine; --data only conflicts when given explicitly.
        assert!(
            Cli::try_parse_from(["fangstat", "--fetch", "https://example.com/data.json"]).is_ok()
        );
    }
}
