//! File codec for cleansheet.
//!
//! Decodes uploaded CSV/XLSX bytes into a [`Table`] and encodes a table
//! back into bytes for download. Everything works on in-memory buffers;
//! no temporary files.

mod csv_codec;
mod xlsx;

use cleansheet_core::Table;
use thiserror::Error;

/// File formats understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Sniff the format from an uploaded filename.
    ///
    /// `.xls` uploads are read with the XLSX reader, matching what the
    /// upload form accepts.
    pub fn from_name(filename: &str) -> Result<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Ok(FileFormat::Xlsx)
        } else {
            Err(CodecError::UnsupportedFormat(filename.to_string()))
        }
    }

    /// Resolve a download format label (`csv`, `xlsx`).
    pub fn from_label(label: &str) -> Result<Self> {
        match label {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            other => Err(CodecError::UnsupportedFormat(other.to_string())),
        }
    }

    /// MIME type for download responses
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            FileFormat::Csv => "text/csv",
            FileFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Canonical file extension
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
        }
    }
}

/// Errors that can occur while decoding or encoding files
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Decode uploaded bytes into a table, sniffing the format from the
/// filename.
pub fn decode(bytes: &[u8], filename: &str) -> Result<Table> {
    match FileFormat::from_name(filename)? {
        FileFormat::Csv => csv_codec::decode(bytes),
        FileFormat::Xlsx => xlsx::decode(bytes),
    }
}

/// Encode a table into bytes in the requested format.
pub fn encode(table: &Table, format: FileFormat) -> Result<Vec<u8>> {
    match format {
        FileFormat::Csv => csv_codec::encode(table),
        FileFormat::Xlsx => xlsx::encode(table),
    }
}
