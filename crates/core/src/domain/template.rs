use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub String);

/// Optional table columns and totals rows. Every toggle missing from a
/// template record defaults to shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnToggles {
    pub show_sku: bool,
    pub show_quantity: bool,
    pub show_discount_column: bool,
    pub show_tax_summary: bool,
    pub show_shipping: bool,
}

impl Default for ColumnToggles {
    fn default() -> Self {
        Self {
            show_sku: true,
            show_quantity: true,
            show_discount_column: true,
            show_tax_summary: true,
            show_shipping: true,
        }
    }
}

/// Branding attributes as stored on a template. Anything left out is resolved
/// to a default at composition time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandingOverrides {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub text_color: Option<String>,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub footer_text: Option<String>,
    pub terms_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: ColumnToggles,
    #[serde(default)]
    pub branding: BrandingOverrides,
}

impl Template {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: TemplateId(id.into()),
            name: name.into(),
            columns: ColumnToggles::default(),
            branding: BrandingOverrides::default(),
        }
    }
}
