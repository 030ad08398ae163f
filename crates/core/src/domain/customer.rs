use serde::{Deserialize, Serialize};

/// Recipient details shown in the "prepared for" part of a quote document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Customer {
    /// `"name (company)"` when a company is present, otherwise the bare name.
    pub fn display_name(&self) -> String {
        match self.company.as_deref().map(str::trim).filter(|company| !company.is_empty()) {
            Some(company) if !self.name.trim().is_empty() => {
                format!("{} ({company})", self.name.trim())
            }
            Some(company) => company.to_string(),
            None => self.name.trim().to_string(),
        }
    }
}
