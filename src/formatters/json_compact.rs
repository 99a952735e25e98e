use serde_json::{json, Value};

use crate::core::{Analysis, AnalysisError, Declaration};

/// Compact JSON report of one analysis run
pub struct JsonCompactFormatter {
    /// Leave out spans and kinds
    minimal: bool,
}

impl JsonCompactFormatter {
    pub fn new() -> Self {
        Self { minimal: false }
    }

    pub fn minimal() -> Self {
        Self { minimal: true }
    }

    pub fn format_analysis(&self, analysis: &Analysis) -> Result<String, AnalysisError> {
        let entrypoints = analysis
            .entrypoints
            .iter()
            .map(|declaration| self.declaration_json(analysis, declaration))
            .collect::<Result<Vec<_>, _>>()?;
        let unreachable = analysis
            .unreachable
            .iter()
            .map(|declaration| self.declaration_json(analysis, declaration))
            .collect::<Result<Vec<_>, _>>()?;

        let report = json!({
            "root": analysis.root.to_string_lossy(),
            "module": analysis.root_module,
            "nodes": analysis.graph.node_count(),
            "edges": analysis.graph.edge_count(),
            "entrypoints": entrypoints,
            "unreachable": unreachable,
        });
        Ok(serde_json::to_string(&report)?)
    }

    fn declaration_json(
        &self,
        analysis: &Analysis,
        declaration: &Declaration,
    ) -> Result<Value, AnalysisError> {
        let file = declaration.relative_path(&analysis.root)?;
        let mut value = json!({
            "f": file.to_string_lossy(),
            "n": declaration.name,
        });
        if !self.minimal {
            value["k"] = serde_json::to_value(declaration.kind)?;
            if let Some(span) = declaration.span {
                value["l"] = json!(span.start_line);
            }
        }
        Ok(value)
    }
}

impl Default for JsonCompactFormatter {
    fn default() -> Self {
        Self::new()
    }
}
