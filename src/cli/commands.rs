//! Command dispatch

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::ChartService;
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, StyleArg};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Chart, RenderStyle, Unit};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Report { file, style }) => cmd_report(container, file.as_deref(), *style),
        Some(Commands::Total { file, unit }) => {
            cmd_total(container, file.as_deref(), unit.as_deref())
        }
        Some(Commands::Check { file }) => cmd_check(container, file.as_deref()),
        Some(Commands::Init { file, force }) => cmd_init(container, file, *force),
        Some(Commands::Demo { style }) => cmd_demo(container, *style),
        Some(Commands::Config { command }) => cmd_config(cli, container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `headcount --help`".into(),
        )),
    }
}

/// Explicit file wins over the configured default chart.
fn resolve_chart(file: Option<&Path>, settings: &Settings) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.default_chart.clone())
        .ok_or_else(|| {
            CliError::Usage("no chart file given and no default_chart configured".into())
        })
}

fn resolve_style(style: Option<StyleArg>, settings: &Settings) -> RenderStyle {
    style.map(RenderStyle::from).unwrap_or(settings.render.style)
}

fn write_stdout(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text).map_err(|e| InfraError::io("write to stdout", e))?;
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_report(
    container: &ServiceContainer,
    file: Option<&Path>,
    style: Option<StyleArg>,
) -> CliResult<()> {
    let settings = &container.settings;
    let path = resolve_chart(file, settings)?;
    let style = resolve_style(style, settings);
    debug!("report: {} as {:?}", path.display(), style);
    let text = container
        .chart_service
        .report(&path, &settings.render.format(), style)?;
    write_stdout(&text)
}

#[instrument(level = "debug", skip(container))]
fn cmd_total(container: &ServiceContainer, file: Option<&Path>, unit: Option<&str>) -> CliResult<()> {
    let path = resolve_chart(file, &container.settings)?;
    let total = container.chart_service.total(&path, unit)?;
    write_stdout(&total.to_string())
}

#[instrument(level = "debug", skip(container))]
fn cmd_check(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let path = resolve_chart(file, &container.settings)?;
    let chart: Chart = container.chart_service.load(&path)?;
    let units: usize = chart.roots.iter().map(|root| root.iter().count()).sum();
    let composites = chart
        .roots
        .iter()
        .flat_map(Unit::iter)
        .filter(|unit| unit.is_composite())
        .count();
    let total = chart.total().map_err(ApplicationError::from)?;
    output::success(&format!(
        "{}: {} units ({} composite), {} roots, total {}",
        path.display(),
        units,
        composites,
        chart.roots.len(),
        total
    ));
    for root in &chart.roots {
        output::detail(&format!(
            "{} ({}): {} total, depth {}",
            root.label(),
            root.kind(),
            root.total_count(),
            root.depth()
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_init(container: &ServiceContainer, file: &Path, force: bool) -> CliResult<()> {
    container.chart_service.init(file, force)?;
    output::action("Created", &file.display());
    Ok(())
}

fn cmd_demo(container: &ServiceContainer, style: Option<StyleArg>) -> CliResult<()> {
    let settings = &container.settings;
    let demo: Unit = ChartService::demo()?;
    let style = resolve_style(style, settings);
    write_stdout(&demo.render(&settings.render.format(), style))
}

fn cmd_config(cli: &Cli, container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("Effective configuration");
            write_stdout(&container.settings.to_toml()?)
        }
        ConfigCommands::Template => write_stdout(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::detail("global: no config directory available"),
            }
            let dir = cli
                .chart_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            output::action("local", &local_config_path(&dir).display());
            Ok(())
        }
    }
}
