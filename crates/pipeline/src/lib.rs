//! Data-cleaning command pipeline for cleansheet.
//!
//! The pipeline takes a table and an ordered sequence of cleaning commands
//! and applies each command in turn, recording a per-command outcome. A
//! command that fails validation is skipped, not fatal: later commands run
//! against the table produced by the last successful step, so one bad
//! command in a batch does not discard the effect of the others.
//!
//! # Examples
//!
//! ```
//! use cleansheet_core::Table;
//! use cleansheet_pipeline::{apply, CommandSpec};
//!
//! let table = Table::from_data(vec![
//!     vec!["name", "age"],
//!     vec!["  Bob ", "30"],
//! ]);
//!
//! let commands = vec![CommandSpec::new("trim").with_param("column", 0)];
//! let result = apply(table, &commands);
//!
//! assert!(result.outcomes[0].is_ok());
//! assert_eq!(result.table.cell(1, 0).as_str(), "Bob");
//! ```

mod command;
mod outcome;
mod pipeline;

pub use command::{Command, CommandError, CommandSpec, FilterOperator, TargetType};
pub use outcome::{CommandOutcome, OutcomeStatus, PipelineResult};
pub use pipeline::apply;
