use serde::Serialize;

use super::Cell;
use crate::domain::template::ColumnToggles;
use crate::pricing::PricedLineItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    Sku,
    Description,
    Quantity,
    UnitPrice,
    Discount,
    Total,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: ColumnKey,
    pub label: String,
    pub align: Alignment,
}

impl ColumnKey {
    /// Canonical left-to-right order. Positions depend on the template flags
    /// only, never on line data.
    pub const CANONICAL_ORDER: [ColumnKey; 6] = [
        ColumnKey::Sku,
        ColumnKey::Description,
        ColumnKey::Quantity,
        ColumnKey::UnitPrice,
        ColumnKey::Discount,
        ColumnKey::Total,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sku => "SKU",
            Self::Description => "Description",
            Self::Quantity => "Qty",
            Self::UnitPrice => "Unit Price",
            Self::Discount => "Discount",
            Self::Total => "Total",
        }
    }

    pub fn align(self) -> Alignment {
        match self {
            Self::Sku | Self::Description => Alignment::Left,
            Self::Quantity | Self::UnitPrice | Self::Discount | Self::Total => Alignment::Right,
        }
    }

    fn is_shown(self, toggles: &ColumnToggles) -> bool {
        match self {
            Self::Sku => toggles.show_sku,
            Self::Quantity => toggles.show_quantity,
            Self::Discount => toggles.show_discount_column,
            Self::Description | Self::UnitPrice | Self::Total => true,
        }
    }

    /// Reads the already-priced value for this column.
    pub fn cell(self, line: &PricedLineItem) -> Cell {
        let input = line.input();
        match self {
            Self::Sku => match input.sku.as_deref().map(str::trim) {
                Some(sku) if !sku.is_empty() => Cell::Text(sku.to_string()),
                _ => Cell::Empty,
            },
            Self::Description => Cell::Item {
                name: input.name.clone(),
                detail: input
                    .description
                    .as_deref()
                    .map(str::trim)
                    .filter(|detail| !detail.is_empty())
                    .map(str::to_string),
            },
            Self::Quantity => Cell::Quantity(input.quantity),
            Self::UnitPrice => Cell::Money(input.unit_price),
            Self::Discount => Cell::Percent(input.discount_percent),
            Self::Total => Cell::Money(line.line_total()),
        }
    }
}

pub fn select_columns(toggles: &ColumnToggles) -> Vec<Column> {
    ColumnKey::CANONICAL_ORDER
        .into_iter()
        .filter(|key| key.is_shown(toggles))
        .map(|key| Column { key, label: key.label().to_string(), align: key.align() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{select_columns, ColumnKey};
    use crate::domain::template::ColumnToggles;

    fn keys(toggles: ColumnToggles) -> Vec<ColumnKey> {
        select_columns(&toggles).into_iter().map(|column| column.key).collect()
    }

    #[test]
    fn default_toggles_show_every_column_in_canonical_order() {
        assert_eq!(keys(ColumnToggles::default()), ColumnKey::CANONICAL_ORDER.to_vec());
    }

    #[test]
    fn required_columns_survive_all_toggles_off() {
        let toggles = ColumnToggles {
            show_sku: false,
            show_quantity: false,
            show_discount_column: false,
            show_tax_summary: false,
            show_shipping: false,
        };
        assert_eq!(
            keys(toggles),
            vec![ColumnKey::Description, ColumnKey::UnitPrice, ColumnKey::Total]
        );
    }

    #[test]
    fn sku_is_leftmost_when_shown() {
        let toggles = ColumnToggles { show_quantity: false, ..ColumnToggles::default() };
        let keys = keys(toggles);
        assert_eq!(keys.first(), Some(&ColumnKey::Sku));
        assert_eq!(keys.last(), Some(&ColumnKey::Total));
        assert!(!keys.contains(&ColumnKey::Quantity));
    }
}
