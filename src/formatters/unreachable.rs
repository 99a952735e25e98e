use std::io::Write;

use crate::core::{Analysis, AnalysisError};

/// Plain listing of unreachable declarations, one `<file>::<name>` per line.
pub struct UnreachableFormatter;

impl UnreachableFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_analysis(&self, analysis: &Analysis) -> Result<String, AnalysisError> {
        let mut output = String::new();
        for name in analysis.unreachable_names()? {
            output.push_str(&name);
            output.push('\n');
        }
        Ok(output)
    }

    pub fn write_to<W: Write>(&self, analysis: &Analysis, mut out: W) -> Result<(), AnalysisError> {
        let listing = self.format_analysis(analysis)?;
        out.write_all(listing.as_bytes())
            .map_err(|err| AnalysisError::io("<output>", err))
    }
}

impl Default for UnreachableFormatter {
    fn default() -> Self {
        Self::new()
    }
}
