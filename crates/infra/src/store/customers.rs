use chrono::NaiveDate;
use sqlx::{Connection, QueryBuilder, Sqlite};
use tracing::instrument;

use ultimosalto_core::CustomerId;
use ultimosalto_parties::{Customer, Gender, NewCustomer};

use super::{INSERT_CHUNK, SqliteStore};
use crate::error::{StoreError, sqlx_err};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id_cliente: i64,
    nombre: String,
    correo: String,
    fecha_nacimiento: NaiveDate,
    genero: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        const OP: &str = "list_customers";
        let id = CustomerId::new(row.id_cliente).map_err(StoreError::domain(OP))?;
        let gender = row.genero.parse::<Gender>().map_err(StoreError::domain(OP))?;
        let new = NewCustomer::new(row.nombre, row.correo, row.fecha_nacimiento, gender)
            .map_err(StoreError::domain(OP))?;
        Ok(Customer::from_new(id, new))
    }
}

impl SqliteStore {
    /// Insert the whole population in one transaction.
    ///
    /// A duplicate email aborts the batch with a unique-constraint error and
    /// nothing from it is kept.
    #[instrument(skip(self, customers), fields(count = customers.len()), err)]
    pub async fn insert_customers(&mut self, customers: &[NewCustomer]) -> Result<u64, StoreError> {
        let mut tx = self.conn.begin().await.map_err(sqlx_err("insert_customers"))?;
        let mut inserted = 0;

        for chunk in customers.chunks(INSERT_CHUNK) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO clientes (nombre, correo, fecha_nacimiento, genero) ",
            );
            builder.push_values(chunk, |mut row, customer| {
                row.push_bind(customer.name.as_str())
                    .push_bind(customer.email.as_str())
                    .push_bind(customer.birth_date)
                    .push_bind(customer.gender.code());
            });

            let result = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(sqlx_err("insert_customers"))?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(sqlx_err("insert_customers"))?;
        tracing::info!(inserted, "customers inserted");
        Ok(inserted)
    }

    /// All customers, in id order.
    pub async fn list_customers(&mut self) -> Result<Vec<Customer>, StoreError> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT id_cliente, nombre, correo, fecha_nacimiento, genero
            FROM clientes
            ORDER BY id_cliente
            "#,
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(sqlx_err("list_customers"))?;

        rows.into_iter().map(Customer::try_from).collect()
    }
}
