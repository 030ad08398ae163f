//! Renderer-agnostic description of a quote document.
//!
//! A [`Document`] says what appears and in which order. It carries no
//! fonts, coordinates or pagination; PDF, HTML and email renderers all map
//! the same sections onto their own output.

pub mod branding;
pub mod columns;
pub mod composer;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::quote::QuoteId;

pub use self::branding::{resolve_branding, Branding};
pub use self::columns::{select_columns, Alignment, Column, ColumnKey};
pub use self::composer::{compose_document, DocumentComposer, StandardDocumentComposer};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    pub quote_id: QuoteId,
    pub currency: String,
    pub sections: Vec<Section>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Header(HeaderBlock),
    InfoGrid(InfoGrid),
    Table(TableBlock),
    Totals(TotalsBlock),
    Footer(FooterBlock),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderBlock {
    pub title: String,
    pub quote_number: Option<String>,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub text_color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InfoGrid {
    pub entries: Vec<InfoEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InfoEntry {
    pub label: String,
    pub value: String,
}

/// Header columns and body rows are produced from one column list, so
/// `rows[i].cells[j]` always belongs to `columns[j]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableBlock {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub line_index: usize,
    pub cells: Vec<Cell>,
}

/// Typed cell content. Numbers stay numbers so each renderer formats them
/// without re-deriving anything.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Empty,
    Text(String),
    /// Line name with the optional longer description underneath.
    Item { name: String, detail: Option<String> },
    Quantity(Decimal),
    Money(Decimal),
    Percent(Decimal),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TotalsBlock {
    pub rows: Vec<TotalsRow>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsRowKind {
    Subtotal,
    Discount,
    Tax,
    Shipping,
    Total,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TotalsRow {
    pub kind: TotalsRowKind,
    pub label: String,
    /// Always non-negative; `kind` tells a renderer whether it is subtracted.
    pub amount: Decimal,
    /// Layout hint for the row a renderer should set apart.
    pub emphasis: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterBlock {
    pub footer_text: Option<String>,
    pub terms_text: Option<String>,
    pub notes: Option<String>,
}

impl Document {
    pub fn header(&self) -> Option<&HeaderBlock> {
        self.sections.iter().find_map(|section| match section {
            Section::Header(header) => Some(header),
            _ => None,
        })
    }

    pub fn info_grid(&self) -> Option<&InfoGrid> {
        self.sections.iter().find_map(|section| match section {
            Section::InfoGrid(grid) => Some(grid),
            _ => None,
        })
    }

    pub fn table(&self) -> Option<&TableBlock> {
        self.sections.iter().find_map(|section| match section {
            Section::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn totals(&self) -> Option<&TotalsBlock> {
        self.sections.iter().find_map(|section| match section {
            Section::Totals(totals) => Some(totals),
            _ => None,
        })
    }

    pub fn footer(&self) -> Option<&FooterBlock> {
        self.sections.iter().find_map(|section| match section {
            Section::Footer(footer) => Some(footer),
            _ => None,
        })
    }
}
