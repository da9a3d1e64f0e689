use cleansheet_core::CellValue;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A cleaning command as received on the wire: a kind plus a free-form
/// parameter object.
///
/// Specs are validated into [`Command`]s by the pipeline; an unrecognized
/// kind or a malformed parameter set becomes a failed outcome for that
/// command, never an error for the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub kind: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl CommandSpec {
    /// Create a spec with no parameters
    #[must_use]
    pub fn new(kind: &str) -> Self {
        CommandSpec {
            kind: kind.to_string(),
            params: Map::new(),
        }
    }

    /// Add a parameter
    #[must_use]
    pub fn with_param<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

/// Comparison operators supported by `filterRows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    Contains,
    GreaterThan,
    LessThan,
}

/// Target types supported by `castType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Number,
    String,
    Boolean,
}

/// A validated cleaning command.
///
/// One variant per command kind, with parameters already checked for shape
/// and type. Column references are 0-based positional indices; range checks
/// against the actual table happen at execution time.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Trim {
        column: usize,
    },
    RemoveEmptyRows,
    Dedupe {
        columns: Option<Vec<usize>>,
    },
    RenameColumn {
        column: usize,
        new_name: String,
    },
    Replace {
        column: usize,
        pattern: String,
        replacement: String,
    },
    FilterRows {
        column: usize,
        operator: FilterOperator,
        value: CellValue,
    },
    CastType {
        column: usize,
        target_type: TargetType,
    },
}

/// Why a command could not be applied.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command kind: {0}")]
    UnknownKind(String),

    #[error("{0}")]
    Validation(String),
}

impl Command {
    /// Validate a wire spec into a typed command.
    pub fn parse(spec: &CommandSpec) -> Result<Command, CommandError> {
        match spec.kind.as_str() {
            "trim" => Ok(Command::Trim {
                column: column_param(spec, "column")?,
            }),
            "removeEmptyRows" => Ok(Command::RemoveEmptyRows),
            "dedupe" => Ok(Command::Dedupe {
                columns: columns_param(spec)?,
            }),
            "renameColumn" => Ok(Command::RenameColumn {
                column: column_param(spec, "column")?,
                new_name: string_param(spec, "newName")?,
            }),
            "replace" => {
                let pattern = string_param(spec, "pattern")?;
                if pattern.is_empty() {
                    return Err(CommandError::Validation(
                        "parameter 'pattern' must not be empty".to_string(),
                    ));
                }
                Ok(Command::Replace {
                    column: column_param(spec, "column")?,
                    pattern,
                    replacement: string_param(spec, "replacement")?,
                })
            }
            "filterRows" => Ok(Command::FilterRows {
                column: column_param(spec, "column")?,
                operator: operator_param(spec)?,
                value: cell_param(spec, "value")?,
            }),
            "castType" => Ok(Command::CastType {
                column: column_param(spec, "column")?,
                target_type: target_type_param(spec)?,
            }),
            other => Err(CommandError::UnknownKind(other.to_string())),
        }
    }
}

fn required<'a>(spec: &'a CommandSpec, key: &str) -> Result<&'a Value, CommandError> {
    spec.params
        .get(key)
        .ok_or_else(|| CommandError::Validation(format!("missing parameter '{key}'")))
}

fn column_param(spec: &CommandSpec, key: &str) -> Result<usize, CommandError> {
    match required(spec, key)? {
        Value::Number(n) => n
            .as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| non_negative_integer(key)),
        _ => Err(non_negative_integer(key)),
    }
}

fn non_negative_integer(key: &str) -> CommandError {
    CommandError::Validation(format!("parameter '{key}' must be a non-negative integer"))
}

fn string_param(spec: &CommandSpec, key: &str) -> Result<String, CommandError> {
    match required(spec, key)? {
        Value::String(s) => Ok(s.clone()),
        _ => Err(CommandError::Validation(format!(
            "parameter '{key}' must be a string"
        ))),
    }
}

/// Optional `columns` array for dedupe. Absent or empty means "all columns".
fn columns_param(spec: &CommandSpec) -> Result<Option<Vec<usize>>, CommandError> {
    let Some(value) = spec.params.get("columns") else {
        return Ok(None);
    };
    let Value::Array(items) = value else {
        return Err(CommandError::Validation(
            "parameter 'columns' must be an array of column indices".to_string(),
        ));
    };
    let mut columns = Vec::with_capacity(items.len());
    for item in items {
        match item.as_u64() {
            Some(v) => columns.push(v as usize),
            None => return Err(non_negative_integer("columns")),
        }
    }
    if columns.is_empty() {
        return Ok(None);
    }
    Ok(Some(columns))
}

fn operator_param(spec: &CommandSpec) -> Result<FilterOperator, CommandError> {
    let raw = string_param(spec, "operator")?;
    match raw.as_str() {
        "equals" => Ok(FilterOperator::Equals),
        "contains" => Ok(FilterOperator::Contains),
        "greaterThan" => Ok(FilterOperator::GreaterThan),
        "lessThan" => Ok(FilterOperator::LessThan),
        other => Err(CommandError::Validation(format!(
            "unknown operator '{other}'"
        ))),
    }
}

fn target_type_param(spec: &CommandSpec) -> Result<TargetType, CommandError> {
    let raw = string_param(spec, "targetType")?;
    match raw.as_str() {
        "number" => Ok(TargetType::Number),
        "string" => Ok(TargetType::String),
        "boolean" => Ok(TargetType::Boolean),
        other => Err(CommandError::Validation(format!(
            "unknown target type '{other}'"
        ))),
    }
}

fn cell_param(spec: &CommandSpec, key: &str) -> Result<CellValue, CommandError> {
    match required(spec, key)? {
        Value::Null => Ok(CellValue::Null),
        Value::Bool(b) => Ok(CellValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(CellValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(CellValue::Float(f))
            } else {
                Err(CommandError::Validation(format!(
                    "parameter '{key}' is not a representable number"
                )))
            }
        }
        Value::String(s) => Ok(CellValue::String(s.clone())),
        _ => Err(CommandError::Validation(format!(
            "parameter '{key}' must be a scalar value"
        ))),
    }
}
