//! Read-only validation of a seeded database.
//!
//! Two age measures coexist on purpose: the sales generator uses whole
//! 365-day years, while the coupon cross-check here uses the day-fraction age
//! `(as_of - birth) / 365.25`. The integrity audit re-checks coupons with the
//! generator's measure, so it stays at zero for a correctly seeded store.

use core::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

use ultimosalto_core::Money;
use ultimosalto_sales::Coupon;

use crate::error::{StoreError, sqlx_err};
use crate::store::SqliteStore;

/// Structural checks that should all be zero after a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityAudit {
    /// Sales whose stored total differs from their line sum by more than 0.01.
    pub total_mismatches: u64,
    /// Coupon sales whose customer is 60 or younger in whole 365-day years.
    pub ineligible_coupons: u64,
    /// Sales with no line items or more than three.
    pub line_count_violations: u64,
}

impl IntegrityAudit {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub as_of: NaiveDate,
    pub customers: u64,
    pub products: u64,
    pub sales: u64,
    pub line_items: u64,
    pub coupons_applied: u64,
    /// Distinct coupon customers older than 60 by the day-fraction measure.
    pub coupon_customers_over_60: u64,
    pub revenue: Money,
    pub discounted_revenue: Money,
    pub audit: IntegrityAudit,
}

impl ValidationReport {
    /// Share of revenue that came from coupon sales, in percent.
    pub fn discount_rate(&self) -> f64 {
        if self.revenue.is_zero() {
            return 0.0;
        }
        self.discounted_revenue.cents() as f64 / self.revenue.cents() as f64 * 100.0
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "VALIDACIÓN Y ESTADÍSTICAS DE DATOS")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "✓ Clientes generados: {}", self.customers)?;
        writeln!(f, "✓ Productos en catálogo: {}", self.products)?;
        writeln!(f, "✓ Ventas registradas: {}", self.sales)?;
        writeln!(f, "✓ Líneas de detalle: {}", self.line_items)?;
        writeln!(f)?;
        writeln!(f, "✓ Cupones {} aplicados: {}", Coupon::UltimoSuspiro, self.coupons_applied)?;
        writeln!(
            f,
            "✓ Cupones validados (cliente > 60 años): {}",
            self.coupon_customers_over_60
        )?;
        writeln!(f)?;
        writeln!(f, "✓ Ingresos totales: {}", self.revenue)?;
        writeln!(f, "✓ Ventas con descuento: {}", self.discounted_revenue)?;
        writeln!(f, "✓ Tasa de descuento: {:.1}%", self.discount_rate())?;

        if !self.audit.is_clean() {
            writeln!(f)?;
            writeln!(f, "✗ Totales inconsistentes: {}", self.audit.total_mismatches)?;
            writeln!(f, "✗ Cupones sin elegibilidad: {}", self.audit.ineligible_coupons)?;
            writeln!(
                f,
                "✗ Ventas con líneas fuera de rango: {}",
                self.audit.line_count_violations
            )?;
        }
        write!(f, "{rule}")
    }
}

impl SqliteStore {
    async fn count(&mut self, operation: &'static str, sql: &str) -> Result<u64, StoreError> {
        let n: i64 = sqlx::query_scalar(sql)
            .fetch_one(&mut self.conn)
            .await
            .map_err(sqlx_err(operation))?;
        Ok(n.max(0) as u64)
    }

    async fn count_as_of(
        &mut self,
        operation: &'static str,
        sql: &str,
        as_of: NaiveDate,
    ) -> Result<u64, StoreError> {
        let n: i64 = sqlx::query_scalar(sql)
            .bind(as_of)
            .bind(Coupon::UltimoSuspiro.code())
            .fetch_one(&mut self.conn)
            .await
            .map_err(sqlx_err(operation))?;
        Ok(n.max(0) as u64)
    }

    /// Sum of `total_venta`, restricted to one coupon when given.
    async fn revenue(
        &mut self,
        operation: &'static str,
        coupon: Option<Coupon>,
    ) -> Result<Money, StoreError> {
        let sum: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_venta), 0.0) FROM ventas WHERE ?1 IS NULL OR cupon_usado = ?1",
        )
        .bind(coupon.map(|c| c.code()))
        .fetch_one(&mut self.conn)
        .await
        .map_err(sqlx_err(operation))?;
        Money::from_decimal(sum).map_err(StoreError::domain(operation))
    }

    /// Aggregate counts, revenue and integrity checks over the whole database.
    ///
    /// `as_of` is the reference date for customer ages.
    #[instrument(skip(self), err)]
    pub async fn collect_report(&mut self, as_of: NaiveDate) -> Result<ValidationReport, StoreError> {
        let customers = self.count("count_customers", "SELECT COUNT(*) FROM clientes").await?;
        let products = self.count("count_products", "SELECT COUNT(*) FROM productos").await?;
        let sales = self.count("count_sales", "SELECT COUNT(*) FROM ventas").await?;
        let line_items = self
            .count("count_line_items", "SELECT COUNT(*) FROM detalle_ventas")
            .await?;

        let coupons_applied: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM ventas WHERE cupon_usado = ?1")
                .bind(Coupon::UltimoSuspiro.code())
                .fetch_one(&mut self.conn)
                .await
                .map_err(sqlx_err("count_coupons"))?;

        let coupon_customers_over_60 = self
            .count_as_of(
                "cross_check_coupons",
                r#"
                SELECT COUNT(DISTINCT c.id_cliente)
                FROM ventas v
                JOIN clientes c ON c.id_cliente = v.id_cliente
                WHERE v.cupon_usado = ?2
                  AND (julianday(?1) - julianday(c.fecha_nacimiento)) / 365.25 > 60
                "#,
                as_of,
            )
            .await?;

        let revenue = self.revenue("total_revenue", None).await?;
        let discounted_revenue = self
            .revenue("discounted_revenue", Some(Coupon::UltimoSuspiro))
            .await?;

        let audit = self.audit(as_of).await?;
        if !audit.is_clean() {
            tracing::warn!(?audit, "integrity audit found problems");
        }

        Ok(ValidationReport {
            as_of,
            customers,
            products,
            sales,
            line_items,
            coupons_applied: coupons_applied.max(0) as u64,
            coupon_customers_over_60,
            revenue,
            discounted_revenue,
            audit,
        })
    }

    async fn audit(&mut self, as_of: NaiveDate) -> Result<IntegrityAudit, StoreError> {
        let total_mismatches = self
            .count(
                "audit_totals",
                r#"
                SELECT COUNT(*)
                FROM ventas v
                WHERE ABS(v.total_venta - COALESCE(
                    (SELECT SUM(d.cantidad * d.precio_unitario)
                     FROM detalle_ventas d
                     WHERE d.id_venta = v.id_venta), 0.0)) > 0.01
                "#,
            )
            .await?;

        let ineligible_coupons = self
            .count_as_of(
                "audit_coupons",
                r#"
                SELECT COUNT(*)
                FROM ventas v
                JOIN clientes c ON c.id_cliente = v.id_cliente
                WHERE v.cupon_usado = ?2
                  AND CAST((julianday(?1) - julianday(c.fecha_nacimiento)) / 365 AS INTEGER) <= 60
                "#,
                as_of,
            )
            .await?;

        let line_count_violations = self
            .count(
                "audit_line_counts",
                r#"
                SELECT COUNT(*)
                FROM ventas v
                WHERE (SELECT COUNT(*) FROM detalle_ventas d WHERE d.id_venta = v.id_venta)
                      NOT BETWEEN 1 AND 3
                "#,
            )
            .await?;

        Ok(IntegrityAudit {
            total_mismatches,
            ineligible_coupons,
            line_count_violations,
        })
    }
}
