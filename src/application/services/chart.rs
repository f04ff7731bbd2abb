//! Chart service
//!
//! Loads chart files, renders reports and computes totals.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Chart, ChartDefinition, Headcount, RenderStyle, ReportFormat, Unit};
use crate::infrastructure::traits::FileSystem;

/// Service for working with chart files.
pub struct ChartService {
    fs: Arc<dyn FileSystem>,
}

impl ChartService {
    /// Create a new chart service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read, parse and validate a chart file.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Chart> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::ChartNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read chart", path)?;
        let definition = ChartDefinition::parse(&content)?;
        let chart = Chart::from_definition(&definition)?;
        debug!("load: {} roots", chart.roots.len());
        Ok(chart)
    }

    /// Render a chart file. Multiple roots are separated by a blank line.
    pub fn report(
        &self,
        path: &Path,
        format: &ReportFormat,
        style: RenderStyle,
    ) -> ApplicationResult<String> {
        let chart = self.load(path)?;
        Ok(Self::render(&chart.roots, format, style))
    }

    pub fn render(roots: &[Unit], format: &ReportFormat, style: RenderStyle) -> String {
        roots
            .iter()
            .map(|root| root.render(format, style))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Total of the whole chart, or of one unit given by name or label.
    pub fn total(&self, path: &Path, unit: Option<&str>) -> ApplicationResult<Headcount> {
        let chart = self.load(path)?;
        let total = match unit {
            Some(key) => chart.unit_total(key)?,
            None => chart.total()?,
        };
        Ok(total)
    }

    /// Write the sample chart to `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn init(&self, path: &Path, force: bool) -> ApplicationResult<()> {
        if self.fs.exists(path) && !force {
            return Err(ApplicationError::ChartExists(path.to_path_buf()));
        }
        let content = ChartDefinition::sample().to_toml()?;
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, &content)
            .with_path_context("write chart", path)?;
        info!("wrote sample chart to {}", path.display());
        Ok(())
    }

    /// The reference hierarchy: Sales (300) and Development (500) under a
    /// parent department with 30 employees of its own.
    pub fn demo() -> ApplicationResult<Unit> {
        let parent = Unit::composite("Parent", Headcount::new(30))
            .with_child(Unit::leaf("Sales", Headcount::new(300)))?
            .with_child(Unit::leaf("Development", Headcount::new(500)))?;
        Ok(parent)
    }
}
