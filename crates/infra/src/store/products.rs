use sqlx::{Connection, QueryBuilder, Sqlite};
use tracing::instrument;

use ultimosalto_core::{DomainError, Money, ProductId};
use ultimosalto_products::{Category, NewProduct, Product};

use super::{INSERT_CHUNK, SqliteStore};
use crate::error::{StoreError, sqlx_err};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id_producto: i64,
    nombre: String,
    categoria: String,
    precio: f64,
    stock: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        const OP: &str = "list_products";
        let id = ProductId::new(row.id_producto).map_err(StoreError::domain(OP))?;
        let category = row.categoria.parse::<Category>().map_err(StoreError::domain(OP))?;
        let price = Money::from_decimal(row.precio).map_err(StoreError::domain(OP))?;
        let mut new = NewProduct::new(row.nombre, category, price).map_err(StoreError::domain(OP))?;
        new.stock = u32::try_from(row.stock).map_err(|_| StoreError::Domain {
            operation: OP,
            source: DomainError::validation(format!("negative stock: {}", row.stock)),
        })?;
        Ok(Product::from_new(id, new))
    }
}

impl SqliteStore {
    /// Insert the catalog in one transaction. Stock is left to its column default.
    #[instrument(skip(self, products), fields(count = products.len()), err)]
    pub async fn insert_products(&mut self, products: &[NewProduct]) -> Result<u64, StoreError> {
        let mut tx = self.conn.begin().await.map_err(sqlx_err("insert_products"))?;
        let mut inserted = 0;

        for chunk in products.chunks(INSERT_CHUNK) {
            let mut builder =
                QueryBuilder::<Sqlite>::new("INSERT INTO productos (nombre, categoria, precio) ");
            builder.push_values(chunk, |mut row, product| {
                row.push_bind(product.name.as_str())
                    .push_bind(product.category.label())
                    .push_bind(product.price.to_decimal());
            });

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(sqlx_err("insert_products"))?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(sqlx_err("insert_products"))?;
        tracing::info!(inserted, "products inserted");
        Ok(inserted)
    }

    /// The whole catalog, in id order.
    pub async fn list_products(&mut self) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT id_producto, nombre, categoria, precio, stock
            FROM productos
            ORDER BY id_producto
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(sqlx_err("list_products"))?;

        rows.into_iter().map(Product::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::memory_store;
    use ultimosalto_core::Entity;
    use ultimosalto_products::catalog;

    #[tokio::test]
    async fn catalog_round_trips_with_default_stock() {
        let mut store = memory_store().await;
        let catalog = catalog().unwrap();

        assert_eq!(store.insert_products(&catalog).await.unwrap(), 15);

        let stored = store.list_products().await.unwrap();
        assert_eq!(stored.len(), catalog.len());
        for (stored, expected) in stored.iter().zip(&catalog) {
            assert_eq!(stored.name(), expected.name);
            assert_eq!(stored.category(), expected.category);
            assert_eq!(stored.price(), expected.price);
            assert_eq!(stored.stock(), 0);
        }
        assert_eq!(stored[14].id().get(), 15);
    }

    #[tokio::test]
    async fn non_positive_price_violates_the_check_constraint() {
        let mut store = memory_store().await;
        let err = sqlx::query("INSERT INTO productos (nombre, categoria, precio) VALUES ('x', 'Accesorios', 0)")
            .execute(&mut store.conn)
            .await
            .map_err(sqlx_err("insert_products"))
            .unwrap_err();
        assert!(err.is_constraint(crate::error::ConstraintKind::Check), "got {err:?}");
    }
}
