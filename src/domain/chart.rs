//! Chart definitions: named units with parent links, as written in TOML.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::builder::ChartBuilder;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::unit::{Headcount, Unit, UnitKind};

/// One `[[unit]]` table of a chart file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitDefinition {
    pub name: String,
    /// Report label, defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: UnitKind,
    /// Signed so negative input can be reported instead of failing to parse
    pub count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl UnitDefinition {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Parsed chart file. Declaration order is attachment order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDefinition {
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitDefinition>,
}

impl ChartDefinition {
    pub fn parse(content: &str) -> DomainResult<Self> {
        toml::from_str(content).map_err(|e| DomainError::InvalidChart {
            message: e.to_string(),
        })
    }

    pub fn to_toml(&self) -> DomainResult<String> {
        toml::to_string_pretty(self).map_err(|e| DomainError::InvalidChart {
            message: e.to_string(),
        })
    }

    /// The reference chart: Sales and Development rolled up under a parent
    /// department with a base headcount of 30.
    pub fn sample() -> Self {
        let unit = |name: &str, label: &str, kind, count, parent: Option<&str>| UnitDefinition {
            name: name.into(),
            label: Some(label.into()),
            kind,
            count,
            parent: parent.map(Into::into),
        };
        Self {
            units: vec![
                unit("parent", "Parent", UnitKind::Composite, 30, None),
                unit("sales", "Sales", UnitKind::Leaf, 300, Some("parent")),
                unit("development", "Development", UnitKind::Leaf, 500, Some("parent")),
            ],
        }
    }
}

/// Validated hierarchies built from a chart definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    pub roots: Vec<Unit>,
    /// Unit totals keyed by unique name
    totals: HashMap<String, Headcount>,
}

impl Chart {
    pub fn from_definition(definition: &ChartDefinition) -> DomainResult<Self> {
        let arena = ChartBuilder::new().build(definition)?;
        let totals = arena
            .totals()
            .map(|(name, total)| (name.to_string(), total))
            .collect();
        Ok(Self {
            roots: arena.to_units()?,
            totals,
        })
    }

    /// Sum of all root totals.
    pub fn total(&self) -> DomainResult<Headcount> {
        self.roots
            .iter()
            .try_fold(Headcount::ZERO, |acc, root| acc.checked_add(root.total_count()))
    }

    /// Units carrying `label`, roots in order, each searched pre-order.
    pub fn find_all(&self, label: &str) -> Vec<&Unit> {
        self.roots
            .iter()
            .flat_map(Unit::iter)
            .filter(|unit| unit.label() == label)
            .collect()
    }

    /// Total of a single unit.
    ///
    /// `key` is matched against unit names first, which are unique. Otherwise
    /// it must match exactly one label; a label shared by several units is
    /// `AmbiguousUnit`.
    pub fn unit_total(&self, key: &str) -> DomainResult<Headcount> {
        if let Some(&total) = self.totals.get(key) {
            return Ok(total);
        }
        match self.find_all(key).as_slice() {
            [] => Err(DomainError::UnknownUnit(key.to_string())),
            [unit] => Ok(unit.total_count()),
            several => Err(DomainError::AmbiguousUnit {
                label: key.to_string(),
                matches: several.len(),
            }),
        }
    }
}
