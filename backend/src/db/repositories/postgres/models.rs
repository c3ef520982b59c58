use diesel::prelude::*;

use super::schema::products;
use crate::api::{NewProduct, Product, ProductChanges, ProductId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            name: row.name,
            price: row.price,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub price: f64,
}

impl From<&NewProduct> for NewProductRow {
    fn from(product: &NewProduct) -> Self {
        NewProductRow {
            name: product.name.clone(),
            price: product.price,
        }
    }
}

/// `None` fields are skipped by Diesel's `AsChangeset`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub struct ProductChangesRow {
    pub name: Option<String>,
    pub price: Option<f64>,
}

impl From<&ProductChanges> for ProductChangesRow {
    fn from(changes: &ProductChanges) -> Self {
        ProductChangesRow {
            name: changes.name.clone(),
            price: changes.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_into_product() {
        let product = Product::from(ProductRow {
            id: 7,
            name: "Widget".to_string(),
            price: 9.99,
        });
        assert_eq!(product.id, ProductId(7));
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9.99);
    }

    #[test]
    fn test_new_product_row() {
        let row = NewProductRow::from(&NewProduct {
            name: "Gadget".to_string(),
            price: 3.5,
        });
        assert_eq!(row.name, "Gadget");
        assert_eq!(row.price, 3.5);
    }

    #[test]
    fn test_changeset_keeps_absent_fields_unset() {
        let row = ProductChangesRow::from(&ProductChanges {
            name: None,
            price: Some(15.0),
        });
        assert_eq!(row.name, None);
        assert_eq!(row.price, Some(15.0));

        let row = ProductChangesRow::from(&ProductChanges {
            name: Some("Renamed".to_string()),
            price: None,
        });
        assert_eq!(row.name.as_deref(), Some("Renamed"));
        assert_eq!(row.price, None);
    }
}
