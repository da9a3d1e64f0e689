//! Core data model for cleansheet.
//!
//! A [`Table`] is a row-major 2D grid of [`CellValue`]s representing a
//! spreadsheet-like dataset. Rows may be ragged; reads past the end of a
//! short row yield [`CellValue::Null`]. Row 0 is conventionally treated as
//! the header row by operations that care, but no schema is enforced.
//!
//! # Examples
//!
//! ```
//! use cleansheet_core::{CellValue, Table};
//!
//! let table = Table::from_data(vec![
//!     vec!["name", "age"],
//!     vec!["Alice", "30"],
//! ]);
//!
//! assert_eq!(table.row_count(), 2);
//! assert_eq!(table.width(), 2);
//! assert_eq!(table.cell(1, 0), &CellValue::String("Alice".to_string()));
//! assert_eq!(table.cell(1, 5), &CellValue::Null);
//! ```

mod cell;
mod table;

pub use cell::CellValue;
pub use table::{Row, Table};
