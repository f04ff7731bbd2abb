//! Domain layer: units, hierarchies and reports
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod chart;
pub mod error;
pub mod report;
pub mod unit;

pub use arena::{ArenaNode, OrgArena, UnitData};
pub use builder::ChartBuilder;
pub use chart::{Chart, ChartDefinition, UnitDefinition};
pub use error::{DomainError, DomainResult};
pub use report::{RenderStyle, ReportFormat};
pub use unit::{Composite, Headcount, Leaf, Unit, UnitKind};
