use rust_decimal::Decimal;
use tracing::debug;

use super::branding::{resolve_branding, Branding};
use super::columns::select_columns;
use super::{
    Document, FooterBlock, HeaderBlock, InfoEntry, InfoGrid, Section, TableBlock, TableRow,
    TotalsBlock, TotalsRow, TotalsRowKind,
};
use crate::domain::template::{ColumnToggles, Template};
use crate::pricing::PricedQuote;

pub trait DocumentComposer: Send + Sync {
    fn compose(&self, quote: &PricedQuote, template: Option<&Template>) -> Document;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StandardDocumentComposer;

impl DocumentComposer for StandardDocumentComposer {
    fn compose(&self, quote: &PricedQuote, template: Option<&Template>) -> Document {
        compose_document(quote, template)
    }
}

/// Lays out a priced quote. Reads computed amounts only and never fails:
/// absent or partial templates resolve to defaults.
pub fn compose_document(quote: &PricedQuote, template: Option<&Template>) -> Document {
    let toggles = template.map(|template| template.columns).unwrap_or_default();
    let branding = resolve_branding(template);

    let sections = vec![
        Section::Header(header(quote, &branding)),
        Section::InfoGrid(info_grid(quote)),
        Section::Table(table(quote, &toggles)),
        Section::Totals(totals(quote, &toggles)),
        Section::Footer(footer(quote, &branding)),
    ];

    debug!(
        event_name = "document.composed",
        quote_id = %quote.quote().id.0,
        template_id = template.map(|template| template.id.0.as_str()).unwrap_or("default"),
        "quote document composed"
    );

    Document {
        quote_id: quote.quote().id.clone(),
        currency: quote.currency().to_string(),
        sections,
    }
}

fn header(quote: &PricedQuote, branding: &Branding) -> HeaderBlock {
    let source = quote.quote();
    HeaderBlock {
        title: source
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or("Quote")
            .to_string(),
        quote_number: source.quote_number.clone(),
        company_name: branding.company_name.clone(),
        company_address: branding.company_address.clone(),
        primary_color: branding.primary_color.clone(),
        secondary_color: branding.secondary_color.clone(),
        text_color: branding.text_color.clone(),
    }
}

fn info_grid(quote: &PricedQuote) -> InfoGrid {
    let source = quote.quote();
    let entry = |label: &str, value: String| InfoEntry { label: label.to_string(), value };

    let entries = [
        source.quote_number.clone().map(|number| entry("Quote #", number)),
        source.issued_on.map(|date| entry("Date", date.to_string())),
        source.valid_until.map(|date| entry("Valid Until", date.to_string())),
        source
            .customer
            .as_ref()
            .map(|customer| customer.display_name())
            .filter(|name| !name.is_empty())
            .map(|name| entry("Prepared For", name)),
        Some(entry("Currency", source.currency.clone())),
    ];

    InfoGrid { entries: entries.into_iter().flatten().collect() }
}

fn table(quote: &PricedQuote, toggles: &ColumnToggles) -> TableBlock {
    let columns = select_columns(toggles);
    let rows = quote
        .lines()
        .iter()
        .map(|line| TableRow {
            line_index: line.index(),
            cells: columns.iter().map(|column| column.key.cell(line)).collect(),
        })
        .collect();

    TableBlock { columns, rows }
}

fn totals(quote: &PricedQuote, toggles: &ColumnToggles) -> TotalsBlock {
    let totals = quote.totals();
    let row = |kind: TotalsRowKind, label: &str, amount: Decimal| TotalsRow {
        kind,
        label: label.to_string(),
        amount,
        emphasis: kind == TotalsRowKind::Total,
    };

    let mut rows = vec![row(TotalsRowKind::Subtotal, "Subtotal", totals.subtotal)];
    if totals.discount_amount > Decimal::ZERO {
        rows.push(row(TotalsRowKind::Discount, "Discount", totals.discount_amount));
    }
    if toggles.show_tax_summary && totals.tax_amount > Decimal::ZERO {
        rows.push(row(TotalsRowKind::Tax, "Tax", totals.tax_amount));
    }
    if toggles.show_shipping && totals.shipping_amount > Decimal::ZERO {
        rows.push(row(TotalsRowKind::Shipping, "Shipping", totals.shipping_amount));
    }
    rows.push(row(TotalsRowKind::Total, "Total", totals.total));

    TotalsBlock { rows }
}

fn footer(quote: &PricedQuote, branding: &Branding) -> FooterBlock {
    FooterBlock {
        footer_text: branding.footer_text.clone(),
        terms_text: branding.terms_text.clone(),
        notes: quote
            .quote()
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::compose_document;
    use crate::document::{Cell, ColumnKey, Section, TotalsRowKind};
    use crate::domain::customer::Customer;
    use crate::domain::quote::{LineItemInput, Quote};
    use crate::domain::template::Template;
    use crate::pricing::{price_quote, PricedQuote};

    fn priced(discount_percent: Decimal) -> PricedQuote {
        let mut quote = Quote::new("Q-doc");
        quote.quote_number = Some("Q-1001".to_string());
        quote.issued_on = NaiveDate::from_ymd_opt(2026, 3, 2);
        quote.customer = Some(Customer {
            name: "Dana Reyes".to_string(),
            company: Some("Northwind".to_string()),
            ..Customer::default()
        });
        quote.lines = vec![
            LineItemInput {
                name: "Implementation".to_string(),
                sku: Some("IMP-1".to_string()),
                quantity: Decimal::from(2),
                unit_price: Decimal::from(100),
                discount_percent: Decimal::from(10),
                is_taxable: true,
                tax_rate: Decimal::from(8),
                ..LineItemInput::blank()
            },
            LineItemInput {
                name: "Training".to_string(),
                quantity: Decimal::ONE,
                unit_price: Decimal::from(50),
                ..LineItemInput::blank()
            },
        ];
        quote.adjustments.discount_percent = discount_percent;
        quote.adjustments.shipping_amount = Decimal::from(10);
        price_quote(&quote).expect("valid quote")
    }

    fn totals_kinds(document: &crate::document::Document) -> Vec<TotalsRowKind> {
        document
            .totals()
            .expect("totals section")
            .rows
            .iter()
            .map(|row| row.kind)
            .collect()
    }

    #[test]
    fn sections_are_emitted_in_fixed_order() {
        let document = compose_document(&priced(Decimal::from(5)), None);
        let kinds = document
            .sections
            .iter()
            .map(|section| match section {
                Section::Header(_) => "header",
                Section::InfoGrid(_) => "info_grid",
                Section::Table(_) => "table",
                Section::Totals(_) => "totals",
                Section::Footer(_) => "footer",
            })
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["header", "info_grid", "table", "totals", "footer"]);
    }

    #[test]
    fn absent_template_shows_all_columns_and_default_branding() {
        let document = compose_document(&priced(Decimal::from(5)), None);
        let table = document.table().expect("table section");

        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.columns[0].key, ColumnKey::Sku);
        assert_eq!(document.header().expect("header").primary_color, "#2563eb");
        assert_eq!(document.header().expect("header").title, "Quote");
        assert_eq!(
            totals_kinds(&document),
            vec![
                TotalsRowKind::Subtotal,
                TotalsRowKind::Discount,
                TotalsRowKind::Tax,
                TotalsRowKind::Shipping,
                TotalsRowKind::Total,
            ]
        );
    }

    #[test]
    fn rows_align_with_header_columns() {
        let mut template = Template::new("lean", "Lean");
        template.columns.show_sku = false;
        template.columns.show_discount_column = false;

        let document = compose_document(&priced(Decimal::ZERO), Some(&template));
        let table = document.table().expect("table section");
        let keys = table.columns.iter().map(|column| column.key).collect::<Vec<_>>();

        assert_eq!(
            keys,
            vec![
                ColumnKey::Description,
                ColumnKey::Quantity,
                ColumnKey::UnitPrice,
                ColumnKey::Total,
            ]
        );
        for row in &table.rows {
            assert_eq!(row.cells.len(), table.columns.len());
        }
        assert_eq!(
            table.rows[0].cells,
            vec![
                Cell::Item { name: "Implementation".to_string(), detail: None },
                Cell::Quantity(Decimal::from(2)),
                Cell::Money(Decimal::from(100)),
                Cell::Money(Decimal::new(18_000, 2)),
            ]
        );
    }

    #[test]
    fn toggling_discount_column_off_and_on_restores_the_table() {
        let quote = priced(Decimal::from(5));
        let mut template = Template::new("toggle", "Toggle");

        let original = compose_document(&quote, Some(&template));
        template.columns.show_discount_column = false;
        let hidden = compose_document(&quote, Some(&template));
        template.columns.show_discount_column = true;
        let restored = compose_document(&quote, Some(&template));

        let hidden_table = hidden.table().expect("table section");
        assert!(hidden_table.columns.iter().all(|column| column.key != ColumnKey::Discount));
        assert!(hidden_table.rows.iter().all(|row| row.cells.len() == 5));
        assert_eq!(original.table(), restored.table());
    }

    #[test]
    fn zero_discount_has_no_discount_row_but_one_cent_does() {
        let zero = compose_document(&priced(Decimal::ZERO), None);
        assert!(!totals_kinds(&zero).contains(&TotalsRowKind::Discount));

        // 0.01 of discount: 10% of a 0.10 subtotal
        let mut quote = Quote::new("Q-cent");
        quote.lines.push(LineItemInput {
            quantity: Decimal::ONE,
            unit_price: Decimal::new(10, 2),
            ..LineItemInput::blank()
        });
        quote.adjustments.discount_percent = Decimal::from(10);
        let priced = price_quote(&quote).expect("valid quote");
        assert_eq!(priced.totals().discount_amount, Decimal::new(1, 2));

        let document = compose_document(&priced, None);
        let discount = document
            .totals()
            .expect("totals section")
            .rows
            .iter()
            .find(|row| row.kind == TotalsRowKind::Discount)
            .expect("discount row");
        assert_eq!(discount.amount, Decimal::new(1, 2));
    }

    #[test]
    fn tax_and_shipping_rows_follow_template_flags() {
        let mut template = Template::new("no-extras", "No extras");
        template.columns.show_tax_summary = false;
        template.columns.show_shipping = false;

        let document = compose_document(&priced(Decimal::from(5)), Some(&template));
        assert_eq!(
            totals_kinds(&document),
            vec![TotalsRowKind::Subtotal, TotalsRowKind::Discount, TotalsRowKind::Total]
        );
    }

    fn single_line_quote(tax_rate: Decimal, shipping_amount: Decimal) -> PricedQuote {
        let mut quote = Quote::new("Q-flags");
        quote.lines.push(LineItemInput {
            name: "Seats".to_string(),
            quantity: Decimal::from(3),
            unit_price: Decimal::from(20),
            is_taxable: true,
            tax_rate,
            ..LineItemInput::blank()
        });
        quote.adjustments.shipping_amount = shipping_amount;
        price_quote(&quote).expect("valid quote")
    }

    #[test]
    fn zero_tax_and_shipping_rows_are_omitted_even_when_shown() {
        let template = Template::new("standard", "Standard");
        assert!(template.columns.show_tax_summary && template.columns.show_shipping);

        let quote = single_line_quote(Decimal::ZERO, Decimal::ZERO);
        let expected = vec![TotalsRowKind::Subtotal, TotalsRowKind::Total];
        assert_eq!(totals_kinds(&compose_document(&quote, Some(&template))), expected);
        assert_eq!(totals_kinds(&compose_document(&quote, None)), expected);
    }

    #[test]
    fn one_cent_of_shipping_adds_a_shipping_row() {
        let document =
            compose_document(&single_line_quote(Decimal::ZERO, Decimal::new(1, 2)), None);
        let rows = &document.totals().expect("totals section").rows;

        assert_eq!(
            rows.iter().map(|row| row.kind).collect::<Vec<_>>(),
            vec![TotalsRowKind::Subtotal, TotalsRowKind::Shipping, TotalsRowKind::Total]
        );
        assert_eq!(rows[1].amount, Decimal::new(1, 2));
        assert_eq!(rows[2].amount, Decimal::new(6_001, 2));
    }

    #[test]
    fn description_cell_carries_name_and_detail() {
        let mut quote = Quote::new("Q-detail");
        quote.lines.push(LineItemInput {
            name: "Support plan".to_string(),
            description: Some("  Business hours, 12 months ".to_string()),
            quantity: Decimal::ONE,
            unit_price: Decimal::from(900),
            ..LineItemInput::blank()
        });
        quote.lines.push(LineItemInput {
            name: "Onboarding".to_string(),
            description: Some("   ".to_string()),
            quantity: Decimal::ONE,
            unit_price: Decimal::from(100),
            ..LineItemInput::blank()
        });
        let document = compose_document(&price_quote(&quote).expect("valid quote"), None);
        let table = document.table().expect("table section");
        let description = table
            .columns
            .iter()
            .position(|column| column.key == ColumnKey::Description)
            .expect("description column");

        assert_eq!(
            table.rows[0].cells[description],
            Cell::Item {
                name: "Support plan".to_string(),
                detail: Some("Business hours, 12 months".to_string()),
            }
        );
        assert_eq!(
            table.rows[1].cells[description],
            Cell::Item { name: "Onboarding".to_string(), detail: None }
        );
    }

    #[test]
    fn total_is_last_and_emphasised() {
        let document = compose_document(&priced(Decimal::from(5)), None);
        let rows = &document.totals().expect("totals section").rows;
        let last = rows.last().expect("total row");

        assert_eq!(last.kind, TotalsRowKind::Total);
        assert!(last.emphasis);
        assert_eq!(last.amount, Decimal::new(24_290, 2));
        assert_eq!(rows.iter().filter(|row| row.emphasis).count(), 1);
    }

    #[test]
    fn info_grid_lists_only_known_values() {
        let document = compose_document(&priced(Decimal::ZERO), None);
        let labels = document
            .info_grid()
            .expect("info grid")
            .entries
            .iter()
            .map(|entry| (entry.label.as_str(), entry.value.as_str()))
            .collect::<Vec<_>>();

        assert_eq!(
            labels,
            vec![
                ("Quote #", "Q-1001"),
                ("Date", "2026-03-02"),
                ("Prepared For", "Dana Reyes (Northwind)"),
                ("Currency", "USD"),
            ]
        );
    }

    #[test]
    fn missing_sku_renders_as_empty_cell() {
        let document = compose_document(&priced(Decimal::ZERO), None);
        let table = document.table().expect("table section");
        assert_eq!(table.rows[1].cells[0], Cell::Empty);
    }
}
