use thiserror::Error;

use crate::domain::product::{Product, ProductId};
use crate::domain::quote::LineItemInput;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("product `{0}` is not in the catalog")]
    UnknownProduct(String),
    #[error("product `{0}` is inactive and cannot be quoted")]
    InactiveProduct(String),
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Looks up a product that may be placed on a quote.
    pub fn select(&self, product_id: &ProductId) -> Result<&Product, CatalogError> {
        let product = self
            .find(product_id)
            .ok_or_else(|| CatalogError::UnknownProduct(product_id.0.clone()))?;
        ensure_active(product)?;
        Ok(product)
    }
}

/// Overwrites the catalog-owned fields of `line` with `product`'s values.
///
/// Quantity and discount stay as the user set them. The caller re-prices
/// afterwards through the same path as any manual edit.
pub fn apply_product(line: &mut LineItemInput, product: &Product) -> Result<(), CatalogError> {
    ensure_active(product)?;

    line.product_id = Some(product.id.clone());
    line.name = product.name.clone();
    line.sku = Some(product.sku.clone());
    line.unit_price = product.unit_price;
    line.is_taxable = product.is_taxable;
    line.tax_rate = product.tax_rate;
    if line.description.is_none() {
        line.description = product.description.clone();
    }
    Ok(())
}

/// A new row seeded from `product`: one unit, no discount.
pub fn line_from_product(product: &Product) -> Result<LineItemInput, CatalogError> {
    let mut line = LineItemInput::blank();
    apply_product(&mut line, product)?;
    Ok(line)
}

fn ensure_active(product: &Product) -> Result<(), CatalogError> {
    if product.active {
        Ok(())
    } else {
        Err(CatalogError::InactiveProduct(product.id.0.clone()))
    }
}
