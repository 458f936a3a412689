//! Best-effort extraction of a structured invocation view from the raw
//! buffer. Pure and idempotent: callers re-run it on every chunk arrival and
//! may discard the result freely.

use crate::category::{Category, ToolTable};
use crate::scanner::{ScannedCall, Scanner, SYNTHETIC_PARAMETER};
use crate::types::{Parameter, ToolInvocation};

pub struct Extractor {
    scanner: Scanner,
    table: ToolTable,
}

impl Extractor {
    pub fn new(table: ToolTable) -> Self {
        Self {
            scanner: Scanner::new(),
            table,
        }
    }

    pub fn table(&self) -> &ToolTable {
        &self.table
    }

    /// Structured view of the first invocation in `buffer`, however
    /// truncated the markup still is. `None` means nothing to show yet.
    pub fn extract(&self, buffer: &str) -> Option<ToolInvocation> {
        let call = self.scanner.scan(buffer)?;
        Some(self.assemble(call))
    }

    /// Every completed invocation in `buffer`, in order of appearance.
    pub fn extract_all(&self, buffer: &str) -> Vec<ToolInvocation> {
        self.scanner
            .scan_all(buffer)
            .into_iter()
            .map(|call| self.assemble(call))
            .collect()
    }

    fn assemble(&self, call: ScannedCall) -> ToolInvocation {
        let category = self.table.classify(&call.name);
        let display_name = self.table.display_name_for(&call.name);

        let primary_parameter = self
            .table
            .primary_parameter_index(&call.name, &call.parameters)
            .map(|index| call.parameters[index].clone())
            .filter(|parameter| !parameter.value.trim().is_empty())
            .or_else(|| {
                // The chosen parameter was empty (or nothing qualified):
                // degrade to the marker-stripped interior so there is still
                // something to preview. Never for unknown tools.
                if category == Category::Unknown {
                    return None;
                }
                call.fallback_text
                    .as_ref()
                    .map(|text| Parameter::new(SYNTHETIC_PARAMETER, text.clone(), call.complete))
            });

        ToolInvocation {
            raw_name: call.name,
            display_name,
            category,
            parameters: call.parameters,
            primary_parameter,
            complete: call.complete,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ToolTable::builtin())
    }
}
