use chrono::NaiveDate;
use sqlx::Connection;
use tracing::instrument;

use ultimosalto_core::{CustomerId, DomainError, Money, ProductId, SaleId, SaleLineItemId};
use ultimosalto_sales::{Coupon, NewSale, Sale, SaleLineItem};

use super::SqliteStore;
use crate::error::{StoreError, sqlx_err};

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id_venta: i64,
    id_cliente: i64,
    fecha_venta: NaiveDate,
    total_venta: f64,
    cupon_usado: Option<String>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = StoreError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        const OP: &str = "list_sales";
        let id = SaleId::new(row.id_venta).map_err(StoreError::domain(OP))?;
        let customer_id = CustomerId::new(row.id_cliente).map_err(StoreError::domain(OP))?;
        let total = Money::from_decimal(row.total_venta).map_err(StoreError::domain(OP))?;
        let coupon = row
            .cupon_usado
            .as_deref()
            .map(str::parse::<Coupon>)
            .transpose()
            .map_err(StoreError::domain(OP))?;
        Ok(Sale::new(id, customer_id, row.fecha_venta, total, coupon))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id_detalle: i64,
    id_venta: i64,
    id_producto: i64,
    cantidad: i64,
    precio_unitario: f64,
}

impl TryFrom<LineItemRow> for SaleLineItem {
    type Error = StoreError;

    fn try_from(row: LineItemRow) -> Result<Self, Self::Error> {
        const OP: &str = "list_line_items";
        let id = SaleLineItemId::new(row.id_detalle).map_err(StoreError::domain(OP))?;
        let sale_id = SaleId::new(row.id_venta).map_err(StoreError::domain(OP))?;
        let product_id = ProductId::new(row.id_producto).map_err(StoreError::domain(OP))?;
        let quantity = u32::try_from(row.cantidad).map_err(|_| StoreError::Domain {
            operation: OP,
            source: DomainError::validation(format!("quantity out of range: {}", row.cantidad)),
        })?;
        let unit_price = Money::from_decimal(row.precio_unitario).map_err(StoreError::domain(OP))?;
        Ok(SaleLineItem::new(id, sale_id, product_id, quantity, unit_price))
    }
}

impl SqliteStore {
    /// Insert every sale and its line items in one transaction.
    ///
    /// Each sale row is written first; its storage-assigned id then keys the
    /// line items. Returns the new sale ids in input order.
    #[instrument(skip(self, sales), fields(count = sales.len()), err)]
    pub async fn insert_sales(&mut self, sales: &[NewSale]) -> Result<Vec<SaleId>, StoreError> {
        let mut tx = self.conn.begin().await.map_err(sqlx_err("insert_sales"))?;
        let mut ids = Vec::with_capacity(sales.len());
        let mut line_count = 0usize;

        for sale in sales {
            let result = sqlx::query(
                r#"
                INSERT INTO ventas (id_cliente, fecha_venta, total_venta, cupon_usado)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(sale.customer_id().get())
            .bind(sale.sale_date())
            .bind(sale.total().to_decimal())
            .bind(sale.coupon().map(|c| c.code()))
            .execute(&mut *tx)
            .await
            .map_err(sqlx_err("insert_sales"))?;

            let sale_id =
                SaleId::new(result.last_insert_rowid()).map_err(StoreError::domain("insert_sales"))?;

            for line in sale.lines() {
                sqlx::query(
                    r#"
                    INSERT INTO detalle_ventas (id_venta, id_producto, cantidad, precio_unitario)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                )
                .bind(sale_id.get())
                .bind(line.product_id.get())
                .bind(i64::from(line.quantity))
                .bind(line.unit_price.to_decimal())
                .execute(&mut *tx)
                .await
                .map_err(sqlx_err("insert_line_items"))?;
            }

            line_count += sale.lines().len();
            ids.push(sale_id);
        }

        tx.commit().await.map_err(sqlx_err("insert_sales"))?;
        tracing::info!(sales = ids.len(), line_items = line_count, "sales inserted");
        Ok(ids)
    }

    /// All sales, in id order.
    pub async fn list_sales(&mut self) -> Result<Vec<Sale>, StoreError> {
        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id_venta, id_cliente, fecha_venta, total_venta, cupon_usado
            FROM ventas
            ORDER BY id_venta
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(sqlx_err("list_sales"))?;

        rows.into_iter().map(Sale::try_from).collect()
    }

    /// All line items, ordered by sale then line id.
    pub async fn list_line_items(&mut self) -> Result<Vec<SaleLineItem>, StoreError> {
        let rows: Vec<LineItemRow> = sqlx::query_as(
            r#"
            SELECT id_detalle, id_venta, id_producto, cantidad, precio_unitario
            FROM detalle_ventas
            ORDER BY id_venta, id_detalle
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(sqlx_err("list_line_items"))?;

        rows.into_iter().map(SaleLineItem::try_from).collect()
    }
}
