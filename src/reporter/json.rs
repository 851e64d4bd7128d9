use super::Reporter;
use crate::report::ReportResult;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{self, Write};

/// JSON report with one-space indentation and explicit nulls.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn write(&self, out: &mut dyn Write, result: &ReportResult) -> io::Result<()> {
        let mut serializer =
            Serializer::with_formatter(&mut *out, PrettyFormatter::with_indent(b" "));
        result.serialize(&mut serializer).map_err(io::Error::other)?;
        writeln!(out)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}
