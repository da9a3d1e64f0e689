use crate::command::{Command, CommandError, CommandSpec, FilterOperator, TargetType};
use crate::outcome::{CommandOutcome, PipelineResult};
use cleansheet_core::{CellValue, Table};
use std::collections::HashSet;

/// Apply an ordered command sequence to a table.
///
/// Commands run strictly in the given order; each receives the table
/// produced by the previous step. A command that fails validation (bad
/// parameters, unknown kind, out-of-range column) is recorded as a failed
/// outcome and skipped, leaving the table from the previous step in place
/// for the commands after it.
///
/// The call itself cannot fail: per-command failures are data in the
/// outcome list, not errors.
#[must_use]
pub fn apply(table: Table, commands: &[CommandSpec]) -> PipelineResult {
    let mut table = table;
    let mut outcomes = Vec::with_capacity(commands.len());

    for spec in commands {
        let outcome = match Command::parse(spec) {
            Ok(command) => match execute(&mut table, &command) {
                Ok(affected) => CommandOutcome::ok(&spec.kind, affected),
                Err(err) => CommandOutcome::failed(&spec.kind, err.to_string()),
            },
            Err(err) => CommandOutcome::failed(&spec.kind, err.to_string()),
        };
        outcomes.push(outcome);
    }

    PipelineResult { table, outcomes }
}

/// Run one command, returning the affected-row count.
///
/// All validation against the table happens before any mutation, so a
/// failure leaves the table exactly as it was.
fn execute(table: &mut Table, command: &Command) -> Result<u64, CommandError> {
    match command {
        Command::Trim { column } => trim(table, *column),
        Command::RemoveEmptyRows => Ok(remove_empty_rows(table)),
        Command::Dedupe { columns } => dedupe(table, columns.as_deref()),
        Command::RenameColumn { column, new_name } => rename_column(table, *column, new_name),
        Command::Replace {
            column,
            pattern,
            replacement,
        } => replace(table, *column, pattern, replacement),
        Command::FilterRows {
            column,
            operator,
            value,
        } => filter_rows(table, *column, *operator, value),
        Command::CastType {
            column,
            target_type,
        } => cast_type(table, *column, *target_type),
    }
}

fn check_column(table: &Table, column: usize) -> Result<(), CommandError> {
    let width = table.width();
    if column >= width {
        return Err(CommandError::Validation(format!(
            "column {column} out of range (table has {width} columns)"
        )));
    }
    Ok(())
}

fn trim(table: &mut Table, column: usize) -> Result<u64, CommandError> {
    check_column(table, column)?;

    let mut affected = 0u64;
    for row in table.rows_mut() {
        if let Some(CellValue::String(s)) = row.get_mut(column) {
            if s.trim().len() != s.len() {
                let trimmed = s.trim().to_string();
                *s = trimmed;
                affected += 1;
            }
        }
    }
    Ok(affected)
}

fn remove_empty_rows(table: &mut Table) -> u64 {
    let rows = table.rows_mut();
    let before = rows.len();

    // Row 0 is the header and is never removed.
    let mut index = 0usize;
    rows.retain(|row| {
        let keep = index == 0 || !row.iter().all(CellValue::is_empty);
        index += 1;
        keep
    });

    (before - rows.len()) as u64
}

fn dedupe(table: &mut Table, columns: Option<&[usize]>) -> Result<u64, CommandError> {
    let indices: Vec<usize> = match columns {
        Some(cols) => {
            for &col in cols {
                check_column(table, col)?;
            }
            cols.to_vec()
        }
        None => (0..table.width()).collect(),
    };

    // The header row is kept as-is and does not participate in matching.
    let mut seen = HashSet::new();
    let mut removed = 0u64;
    let mut index = 0usize;
    table.rows_mut().retain(|row| {
        let first = index == 0;
        index += 1;
        if first {
            return true;
        }

        let mut key = String::new();
        for &col in &indices {
            key.push_str(&cell_key(row.get(col).unwrap_or(&CellValue::Null)));
            key.push('\x1f');
        }
        if seen.insert(key) {
            true
        } else {
            removed += 1;
            false
        }
    });

    Ok(removed)
}

/// Key used for dedupe comparisons. Null and the empty string collapse to
/// the same key; every other value carries a type tag so `1` and `"1"`
/// stay distinct.
fn cell_key(cell: &CellValue) -> String {
    match cell {
        CellValue::Null => String::new(),
        CellValue::String(s) if s.is_empty() => String::new(),
        CellValue::Bool(b) => format!("b:{b}"),
        CellValue::Int(i) => format!("i:{i}"),
        CellValue::Float(f) => format!("f:{f}"),
        CellValue::String(s) => format!("s:{s}"),
    }
}

fn rename_column(table: &mut Table, column: usize, new_name: &str) -> Result<u64, CommandError> {
    if table.is_empty() {
        return Err(CommandError::Validation(
            "cannot rename a column of an empty table".to_string(),
        ));
    }
    check_column(table, column)?;

    let header = &mut table.rows_mut()[0];
    if header.len() <= column {
        header.resize(column + 1, CellValue::Null);
    }
    header[column] = CellValue::String(new_name.to_string());
    Ok(1)
}

fn replace(
    table: &mut Table,
    column: usize,
    pattern: &str,
    replacement: &str,
) -> Result<u64, CommandError> {
    check_column(table, column)?;

    let mut affected = 0u64;
    for row in table.rows_mut() {
        if let Some(CellValue::String(s)) = row.get_mut(column) {
            if s.contains(pattern) {
                let replaced = s.replace(pattern, replacement);
                *s = replaced;
                affected += 1;
            }
        }
    }
    Ok(affected)
}

fn filter_rows(
    table: &mut Table,
    column: usize,
    operator: FilterOperator,
    value: &CellValue,
) -> Result<u64, CommandError> {
    check_column(table, column)?;

    let before = table.row_count();
    let mut index = 0usize;
    table.rows_mut().retain(|row| {
        let first = index == 0;
        index += 1;
        // The header row always survives filtering.
        first || cell_matches(row.get(column).unwrap_or(&CellValue::Null), operator, value)
    });

    Ok((before - table.row_count()) as u64)
}

/// Predicate for `filterRows`. Type-mismatched comparisons are a non-match,
/// never an error; numeric strings coerce for the ordering operators.
fn cell_matches(cell: &CellValue, operator: FilterOperator, value: &CellValue) -> bool {
    match operator {
        FilterOperator::Equals => cells_equal(cell, value),
        FilterOperator::Contains => {
            !cell.is_null() && cell.as_str().contains(&value.as_str())
        }
        FilterOperator::GreaterThan => match (cell.as_float(), value.as_float()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        },
        FilterOperator::LessThan => match (cell.as_float(), value.as_float()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        },
    }
}

fn cells_equal(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Int(i), CellValue::Float(f)) | (CellValue::Float(f), CellValue::Int(i)) => {
            *i as f64 == *f
        }
        _ => a == b,
    }
}

fn cast_type(
    table: &mut Table,
    column: usize,
    target: TargetType,
) -> Result<u64, CommandError> {
    check_column(table, column)?;

    let mut affected = 0u64;
    for row in table.rows_mut() {
        if let Some(cell) = row.get_mut(column) {
            let cast = cast_cell(cell, target);
            if cast != *cell {
                *cell = cast;
                affected += 1;
            }
        }
    }
    Ok(affected)
}

/// Coerce a cell to the target type; an uncoercible cell becomes null.
fn cast_cell(cell: &CellValue, target: TargetType) -> CellValue {
    match target {
        TargetType::Number => match cell {
            CellValue::Int(_) | CellValue::Float(_) | CellValue::Null => cell.clone(),
            CellValue::Bool(b) => CellValue::Int(i64::from(*b)),
            CellValue::String(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    CellValue::Int(i)
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    CellValue::Float(f)
                } else {
                    CellValue::Null
                }
            }
        },
        TargetType::Boolean => match cell.as_bool() {
            Some(b) => CellValue::Bool(b),
            None => CellValue::Null,
        },
        TargetType::String => match cell {
            CellValue::Null => CellValue::Null,
            _ => CellValue::String(cell.as_str()),
        },
    }
}
