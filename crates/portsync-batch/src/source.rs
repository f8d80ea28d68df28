//! Source file parsing.
//!
//! The input is a delimited file with a header row
//! (`PortNumber,PortName,Switch SerialNumber`, documented for humans
//! and discarded unchecked) followed by one row per port. Rows that
//! cannot be applied are captured in place so the caller can report
//! them without losing their position in the batch.

use csv::ReaderBuilder;
use portsync_core::{Error, Result};
use std::path::Path;
use tracing::debug;

/// One actionable row of the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRow {
    /// Port number on the target device, kept in its string form.
    pub port_number: String,
    /// Desired port name.
    pub name: String,
    /// Serial number of the target device.
    pub serial: String,
}

/// What a source line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// A well-formed row ready to apply.
    Row(PortRow),
    /// A row that cannot be applied, with the reason.
    Malformed(String),
}

/// One data row of the source file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// Line number in the source file (the header is line 1).
    pub line: u64,
    /// Parsed content of the line.
    pub kind: RowKind,
}

impl ParsedRow {
    /// The well-formed row, if this line had one.
    #[must_use]
    pub fn port_row(&self) -> Option<&PortRow> {
        match &self.kind {
            RowKind::Row(row) => Some(row),
            RowKind::Malformed(_) => None,
        }
    }
}

/// Parse the source file into an ordered list of rows.
///
/// The header row is discarded. Any line-ending convention is
/// accepted. Rows with fewer than three fields, or with an empty
/// port number, name or serial, come back as [`RowKind::Malformed`]
/// and do not interrupt parsing.
///
/// # Errors
///
/// Returns [`Error::SourceUnreadable`] if the file cannot be opened
/// or reading fails mid-file.
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<ParsedRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|err| Error::SourceUnreadable(format!("{}: {err}", path.display())))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // Header occupies line 1; data starts at line 2.
        let fallback_line = index as u64 + 2;
        match result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, |p| p.line());
                rows.push(ParsedRow {
                    line,
                    kind: parse_record(&record),
                });
            }
            Err(err) => {
                if let csv::ErrorKind::Io(io) = err.kind() {
                    return Err(Error::SourceUnreadable(format!(
                        "{}: {io}",
                        path.display()
                    )));
                }
                let line = err.position().map_or(fallback_line, csv::Position::line);
                rows.push(ParsedRow {
                    line,
                    kind: RowKind::Malformed(err.to_string()),
                });
            }
        }
    }

    debug!(path = %path.display(), rows = rows.len(), "Parsed source file");
    Ok(rows)
}

fn parse_record(record: &csv::StringRecord) -> RowKind {
    if record.len() < 3 {
        return RowKind::Malformed(format!(
            "expected 3 fields (port number, port name, serial), found {}",
            record.len()
        ));
    }

    let port_number = &record[0];
    let name = &record[1];
    let serial = &record[2];

    for (field, label) in [
        (port_number, "port number"),
        (name, "port name"),
        (serial, "serial"),
    ] {
        if field.is_empty() {
            return RowKind::Malformed(format!("empty {label} field"));
        }
    }

    RowKind::Row(PortRow {
        port_number: port_number.to_string(),
        name: name.to_string(),
        serial: serial.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_source(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "portsync-source-{}-{name}.csv",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn parses_rows_in_file_order() {
        let path = write_source(
            "order",
            b"PortNumber,PortName,Switch SerialNumber\n\
              1,Uplink-A,Q2XX-0000-0001\n\
              2,Desk-12,Q2XX-0000-0001\n",
        );

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].port_row().unwrap(),
            &PortRow {
                port_number: "1".to_string(),
                name: "Uplink-A".to_string(),
                serial: "Q2XX-0000-0001".to_string(),
            }
        );
        assert_eq!(rows[1].port_row().unwrap().name, "Desk-12");
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 3);
    }

    #[test]
    fn crlf_and_lf_parse_identically() {
        let lf = write_source(
            "lf",
            b"PortNumber,PortName,Switch SerialNumber\n1,Uplink-A,Q2XX-0000-0001\n",
        );
        let crlf = write_source(
            "crlf",
            b"PortNumber,PortName,Switch SerialNumber\r\n1,Uplink-A,Q2XX-0000-0001\r\n",
        );

        let lf_rows = read_rows(&lf).unwrap();
        let crlf_rows = read_rows(&crlf).unwrap();
        assert_eq!(lf_rows, crlf_rows);
    }

    #[test]
    fn header_is_never_data() {
        let path = write_source("header", b"PortNumber,PortName,Switch SerialNumber\n");
        let rows = read_rows(&path).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn short_row_is_malformed_and_parsing_continues() {
        let path = write_source(
            "short",
            b"PortNumber,PortName,Switch SerialNumber\n\
              1,Uplink-A,Q2XX-0000-0001\n\
              2,NoSerial\n\
              3,Desk-12,Q2XX-0000-0001\n",
        );

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].port_row().is_some());
        assert!(matches!(rows[1].kind, RowKind::Malformed(_)));
        assert!(rows[2].port_row().is_some());
    }

    #[test]
    fn empty_required_field_is_malformed() {
        let path = write_source(
            "empty-field",
            b"PortNumber,PortName,Switch SerialNumber\n1,,Q2XX-0000-0001\n",
        );

        let rows = read_rows(&path).unwrap();
        match &rows[0].kind {
            RowKind::Malformed(reason) => assert!(reason.contains("port name")),
            RowKind::Row(_) => panic!("empty name accepted"),
        }
    }

    #[test]
    fn extra_columns_are_ignored() {
        let path = write_source(
            "extra",
            b"PortNumber,PortName,Switch SerialNumber,Notes\n\
              1,Uplink-A,Q2XX-0000-0001,core uplink\n",
        );

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].port_row().unwrap().serial, "Q2XX-0000-0001");
    }

    #[test]
    fn quoted_names_keep_commas() {
        let path = write_source(
            "quoted",
            b"PortNumber,PortName,Switch SerialNumber\n\
              1,\"Rack 4, slot 2\",Q2XX-0000-0001\n",
        );

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].port_row().unwrap().name, "Rack 4, slot 2");
    }

    #[test]
    fn missing_file_is_source_unreadable() {
        let err = read_rows("/nonexistent/ports.csv").unwrap_err();
        assert!(matches!(err, Error::SourceUnreadable(_)));
        assert!(err.is_fatal());
    }
}
