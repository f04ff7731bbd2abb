//! Rendering of unit hierarchies.
//!
//! The flat report is a header per composite, the children's reports in
//! attachment order, then a summary line. Nothing is indented.
//!
//! Both renderings recurse once per level, bounded by
//! [`MAX_DEPTH`](crate::domain::unit::MAX_DEPTH).

use std::fmt;

use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::unit::Unit;

/// Wording used when rendering reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormat {
    /// Appended to every unit label, e.g. "Sales Department"
    pub unit_suffix: String,
    /// Prefix of the composite summary line
    pub total_label: String,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            unit_suffix: "Department".into(),
            total_label: "Total Employees".into(),
        }
    }
}

impl ReportFormat {
    fn name(&self, unit: &Unit) -> String {
        if self.unit_suffix.is_empty() {
            unit.label().to_string()
        } else {
            format!("{} {}", unit.label(), self.unit_suffix)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    #[default]
    Flat,
    Tree,
}

impl Unit {
    /// Flat report lines.
    pub fn report(&self, format: &ReportFormat) -> Vec<String> {
        let mut lines = Vec::new();
        self.collect_report(format, &mut lines);
        lines
    }

    fn collect_report(&self, format: &ReportFormat, lines: &mut Vec<String>) {
        match self {
            Unit::Leaf(_) => {
                lines.push(format!("{}: {}", format.name(self), self.total_count()));
            }
            Unit::Composite(composite) => {
                lines.push(format.name(self));
                for child in composite.children() {
                    child.collect_report(format, lines);
                }
                lines.push(format!("{}: {}", format.total_label, self.total_count()));
            }
        }
    }

    /// Renders the hierarchy in the requested style.
    pub fn render(&self, format: &ReportFormat, style: RenderStyle) -> String {
        match style {
            RenderStyle::Flat => self.report(format).join("\n"),
            RenderStyle::Tree => self.to_tree(format).to_string().trim_end().to_string(),
        }
    }

    /// Indented tree with totals and own counts on every node.
    pub fn to_tree(&self, format: &ReportFormat) -> Tree<String> {
        let root = format!(
            "{}: {} (own {})",
            format.name(self),
            self.total_count(),
            self.own_count()
        );
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|child| child.to_tree(format))
            .collect();
        Tree::new(root).with_leaves(leaves)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&ReportFormat::default(), RenderStyle::Flat))
    }
}
