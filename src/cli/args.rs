//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::RenderStyle;

/// Hierarchical headcount aggregation: composite departments that roll up their children
#[derive(Parser, Debug)]
#[command(name = "headcount")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding a local .headcount.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub chart_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a chart as a headcount report
    Report {
        /// Chart file (default: settings.default_chart)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Output style (default: settings.render.style)
        #[arg(short, long, value_enum)]
        style: Option<StyleArg>,
    },

    /// Print the total headcount of a chart or one unit
    Total {
        /// Chart file (default: settings.default_chart)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Unit name or label to total instead of the whole chart
        #[arg(short, long)]
        unit: Option<String>,
    },

    /// Validate a chart
    Check {
        /// Chart file (default: settings.default_chart)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Write a sample chart
    Init {
        /// Target chart file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Render the built-in reference chart
    Demo {
        /// Output style (default: settings.render.style)
        #[arg(short, long, value_enum)]
        style: Option<StyleArg>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleArg {
    /// Header, children, total; no indentation
    Flat,
    /// Indented tree with own and total counts
    Tree,
}

impl From<StyleArg> for RenderStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Flat => RenderStyle::Flat,
            StyleArg::Tree => RenderStyle::Tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_short_and_long_options_when_parsing_then_both_resolve() {
        let cli = Cli::parse_from(["headcount", "-vv", "report", "chart.toml", "-s", "tree"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Report { file, style }) => {
                assert_eq!(file, Some(PathBuf::from("chart.toml")));
                assert_eq!(style, Some(StyleArg::Tree));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["headcount", "total", "--unit", "Sales"]);
        match cli.command {
            Some(Commands::Total { file, unit }) => {
                assert!(file.is_none());
                assert_eq!(unit.as_deref(), Some("Sales"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
