// file: src/models/input_row.rs
// description: one input row with the company to enrich and its trusted reference address
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputRow {
    /// Absent or blank marks the row as malformed.
    pub company_name: Option<String>,
    pub reference_address: Option<String>,
    pub reference_postal_code: Option<String>,
}

impl InputRow {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: Some(company_name.into()),
            ..Default::default()
        }
    }

    pub fn with_reference(
        mut self,
        address: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        self.reference_address = Some(address.into());
        self.reference_postal_code = Some(postal_code.into());
        self
    }

    pub fn company(&self) -> Option<&str> {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
