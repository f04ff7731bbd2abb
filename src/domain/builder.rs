//! Builds validated unit hierarchies from chart definitions.

use tracing::{debug, instrument};

use crate::domain::arena::{OrgArena, UnitData};
use crate::domain::chart::ChartDefinition;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::unit::Headcount;

/// Constructs an `OrgArena` from a chart definition.
#[derive(Debug, Default)]
pub struct ChartBuilder;

impl ChartBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Inserts every unit, then attaches them in declaration order.
    #[instrument(level = "debug", skip_all, fields(units = definition.units.len()))]
    pub fn build(&self, definition: &ChartDefinition) -> DomainResult<OrgArena> {
        let mut arena = OrgArena::new();

        for unit in &definition.units {
            let own_count = Headcount::try_from(unit.count).map_err(|_| {
                DomainError::InvalidArgument(format!(
                    "unit '{}': headcount must not be negative: {}",
                    unit.name, unit.count
                ))
            })?;
            arena.insert(UnitData {
                name: unit.name.clone(),
                label: unit.label().to_string(),
                kind: unit.kind,
                own_count,
            })?;
        }

        for unit in &definition.units {
            let Some(parent_name) = &unit.parent else {
                continue;
            };
            let parent = arena
                .lookup(parent_name)
                .ok_or_else(|| DomainError::UnknownUnit(parent_name.clone()))?;
            let child = arena
                .lookup(&unit.name)
                .ok_or_else(|| DomainError::UnknownUnit(unit.name.clone()))?;
            arena.attach(parent, child)?;
        }

        debug!(
            "built {} units, {} roots",
            arena.len(),
            arena.roots().len()
        );
        Ok(arena)
    }
}
