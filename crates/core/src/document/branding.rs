use serde::Serialize;

use crate::domain::template::Template;

pub const DEFAULT_PRIMARY_COLOR: &str = "#2563eb";
pub const DEFAULT_SECONDARY_COLOR: &str = "#64748b";
pub const DEFAULT_TEXT_COLOR: &str = "#111827";

/// Branding with every attribute resolved. Colors always have a value; text
/// attributes without a value are simply not shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Branding {
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub footer_text: Option<String>,
    pub terms_text: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            company_name: None,
            company_address: None,
            footer_text: None,
            terms_text: None,
        }
    }
}

/// Resolves each attribute on its own. A missing template, a missing
/// attribute, a blank value and a malformed color all fall back the same way.
pub fn resolve_branding(template: Option<&Template>) -> Branding {
    let Some(overrides) = template.map(|template| &template.branding) else {
        return Branding::default();
    };

    Branding {
        primary_color: color_or(overrides.primary_color.as_deref(), DEFAULT_PRIMARY_COLOR),
        secondary_color: color_or(overrides.secondary_color.as_deref(), DEFAULT_SECONDARY_COLOR),
        text_color: color_or(overrides.text_color.as_deref(), DEFAULT_TEXT_COLOR),
        company_name: non_blank(overrides.company_name.as_deref()),
        company_address: non_blank(overrides.company_address.as_deref()),
        footer_text: non_blank(overrides.footer_text.as_deref()),
        terms_text: non_blank(overrides.terms_text.as_deref()),
    }
}

fn color_or(value: Option<&str>, default: &str) -> String {
    value.map(str::trim).filter(|color| is_hex_color(color)).unwrap_or(default).to_string()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|text| !text.is_empty()).map(str::to_string)
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 6) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
    })
}
