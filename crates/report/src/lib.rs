//! PDF report generation
//!
//! The lifecycle and storage layers hand over plain data (`ReportData`);
//! this crate turns it into finished PDF bytes. Layout varies by report
//! kind: inventories render a file table, the operations report renders the
//! access log. No business logic lives here.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip_depot_common::{OperationLogEntry, StoredObject};

mod pdf;

pub use pdf::render;

/// Report generation errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which data source feeds the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Inventory of the extracted bucket
    Extracted,
    /// Inventory of the completed bucket
    Completed,
    /// The access log, newest first
    Operations,
}

impl ReportKind {
    /// Parse the wire name used by the report endpoint
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "extracted" => Some(Self::Extracted),
            "completed" => Some(Self::Completed),
            "operations" => Some(Self::Operations),
            _ => None,
        }
    }
}

/// Data a report is rendered from
#[derive(Debug, Clone)]
pub enum ReportData {
    /// A bucket inventory
    Inventory {
        /// Heading printed on every page
        title: String,
        /// Files in listing order
        files: Vec<StoredObject>,
    },
    /// The operation log
    Operations {
        /// Entries, newest first
        entries: Vec<OperationLogEntry>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_kind_parse() {
        assert_eq!(ReportKind::parse("extracted"), Some(ReportKind::Extracted));
        assert_eq!(ReportKind::parse("completed"), Some(ReportKind::Completed));
        assert_eq!(
            ReportKind::parse("operations"),
            Some(ReportKind::Operations)
        );
        assert_eq!(ReportKind::parse("bogus"), None);
    }

    #[test]
    fn test_report_kind_wire_names() {
        let json = serde_json::to_string(&ReportKind::Operations).unwrap();
        assert_eq!(json, "\"operations\"");
    }
}
