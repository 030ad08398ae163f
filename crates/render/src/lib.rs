//! HTML rendering of composed quote documents.
//!
//! The renderer only reads a [`Document`]; every amount it prints was
//! computed by the pricing calculator and is formatted here, never derived.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use quoteforge_core::document::{Alignment, Cell, Document, TableBlock};
use rust_decimal::Decimal;
use serde::Serialize;
use tera::{Context, Tera, Value};
use thiserror::Error;
use tracing::info;

/// Name of the page layout every template set must provide.
pub const LAYOUT_TEMPLATE: &str = "quote.html.tera";

const EMBEDDED_LAYOUT: &str = include_str!("../templates/quote.html.tera");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
    #[error("template directory `{0}` has no `{LAYOUT_TEMPLATE}`")]
    MissingLayout(PathBuf),
    #[error("document has no `{0}` section")]
    MissingSection(&'static str),
}

/// Register the formatting filters used by quote templates.
///
/// - `money`: `amount | money(currency="USD")` gives `USD 1,234.50`
/// - `percent`: `rate | percent` gives `12.5%`
/// - `quantity`: `qty | quantity` drops trailing zeros
pub fn register_template_filters(tera: &mut Tera) {
    tera.register_filter("money", tera_money_filter);
    tera.register_filter("percent", tera_percent_filter);
    tera.register_filter("quantity", tera_quantity_filter);
}

#[derive(Clone, Debug)]
pub struct HtmlRenderer {
    tera: Tera,
}

impl HtmlRenderer {
    /// Renderer backed by the layout compiled into the binary.
    pub fn embedded() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(LAYOUT_TEMPLATE, EMBEDDED_LAYOUT)?;
        Ok(Self::with_tera(tera))
    }

    /// Renderer backed by `*.tera` files under `template_dir`, which must
    /// include a `quote.html.tera` layout.
    pub fn from_dir(template_dir: &Path) -> Result<Self, RenderError> {
        let tera = Tera::new(&format!("{}/**/*.tera", template_dir.display()))?;
        if !tera.get_template_names().any(|name| name == LAYOUT_TEMPLATE) {
            return Err(RenderError::MissingLayout(template_dir.to_path_buf()));
        }

        info!(
            event_name = "render.templates.loaded",
            template_dir = %template_dir.display(),
            "loaded quote templates from directory"
        );
        Ok(Self::with_tera(tera))
    }

    fn with_tera(mut tera: Tera) -> Self {
        tera.autoescape_on(vec![".html.tera", ".html"]);
        register_template_filters(&mut tera);
        Self { tera }
    }

    pub fn render(&self, document: &Document) -> Result<String, RenderError> {
        let context = document_context(document)?;
        let html = self.tera.render(LAYOUT_TEMPLATE, &context)?;

        info!(
            event_name = "render.document.completed",
            quote_id = %document.quote_id.0,
            bytes = html.len(),
            "quote document rendered to html"
        );
        Ok(html)
    }
}

#[derive(Serialize)]
struct RowView<'a> {
    cells: Vec<CellView<'a>>,
}

#[derive(Serialize)]
struct CellView<'a> {
    align: Alignment,
    content: &'a Cell,
}

fn document_context(document: &Document) -> Result<Context, RenderError> {
    let header = document.header().ok_or(RenderError::MissingSection("header"))?;
    let info_grid = document.info_grid().ok_or(RenderError::MissingSection("info_grid"))?;
    let table = document.table().ok_or(RenderError::MissingSection("table"))?;
    let totals = document.totals().ok_or(RenderError::MissingSection("totals"))?;
    let footer = document.footer().ok_or(RenderError::MissingSection("footer"))?;

    let mut context = Context::new();
    context.insert("currency", &document.currency);
    context.insert("header", header);
    context.insert("info_grid", info_grid);
    context.insert("table", table);
    context.insert("rows", &row_views(table));
    context.insert("totals", totals);
    context.insert("footer", footer);
    Ok(context)
}

fn row_views(table: &TableBlock) -> Vec<RowView<'_>> {
    table
        .rows
        .iter()
        .map(|row| RowView {
            cells: table
                .columns
                .iter()
                .zip(&row.cells)
                .map(|(column, content)| CellView { align: column.align, content })
                .collect(),
        })
        .collect()
}

/// `USD 1,234.50`. Amounts arrive already rounded to cents.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (position, digit) in whole.chars().enumerate() {
        if position > 0 && (whole.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    let currency = currency.trim();
    if currency.is_empty() {
        format!("{sign}{grouped}.{cents}")
    } else {
        format!("{sign}{currency} {grouped}.{cents}")
    }
}

fn decimal_arg(value: &Value, filter: &str) -> tera::Result<Decimal> {
    let parsed = match value {
        Value::String(raw) => Decimal::from_str(raw).ok(),
        Value::Number(number) => Decimal::from_str(&number.to_string()).ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        tera::Error::msg(format!("{filter} filter expects a decimal, got {value}"))
    })
}

fn tera_money_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let amount = decimal_arg(value, "money")?;
    let currency = args.get("currency").and_then(Value::as_str).unwrap_or_default();
    Ok(Value::String(format_money(amount, currency)))
}

fn tera_percent_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let rate = decimal_arg(value, "percent")?;
    Ok(Value::String(format!("{}%", rate.normalize())))
}

fn tera_quantity_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let quantity = decimal_arg(value, "quantity")?;
    Ok(Value::String(quantity.normalize().to_string()))
}
