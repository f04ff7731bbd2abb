//! Hierarchical headcount aggregation.
//!
//! Organisational units are either leaves with a fixed headcount or
//! composites that roll up their children's totals on top of their own
//! base count.
//!
//! ```
//! use headcount::domain::{Headcount, ReportFormat, Unit};
//!
//! let parent = Unit::composite("Parent", Headcount::new(30))
//!     .with_child(Unit::leaf("Sales", Headcount::new(300)))?
//!     .with_child(Unit::leaf("Development", Headcount::new(500)))?;
//!
//! assert_eq!(parent.total_count(), Headcount::new(830));
//! assert_eq!(
//!     parent.report(&ReportFormat::default()).last().map(String::as_str),
//!     Some("Total Employees: 830")
//! );
//! # Ok::<(), headcount::domain::DomainError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
