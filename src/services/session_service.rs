//! services/session_service.rs
//! Unidad de trabajo: una conexión del pool (pedida recién cuando hace
//! falta), transacciones explícitas, inserts y selects tipados.

use futures_util::future::BoxFuture;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, Postgres, Transaction};

use crate::errors::OrmError;
use crate::models::orm_model::{Model, Persist, Select, Value};
use crate::services::engine_service::Engine;

pub struct Session {
    engine: Engine,
    conn: Option<PoolConnection<Postgres>>,
}

impl Session {
    pub fn new(engine: Engine) -> Self {
        Session { engine, conn: None }
    }

    async fn connection(&mut self) -> Result<&mut PgConnection, OrmError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.engine.pool().acquire().await?,
        };
        Ok(&mut **self.conn.insert(conn))
    }

    /// Abre una transacción. Si se descarta sin `commit`, hace rollback.
    pub async fn begin(&mut self) -> Result<SessionTransaction<'_>, OrmError> {
        let conn = self.connection().await?;
        let tx = conn.begin().await?;
        Ok(SessionTransaction { tx })
    }

    /// Ejecuta el select y devuelve la primera instancia (si hay).
    pub async fn execute<M: Model>(&mut self, select: &Select<M>) -> Result<Option<M>, OrmError> {
        let sql = select.to_sql();
        let conn = self.connection().await?;
        let row = sqlx::query(&sql)
            .bind(select.id())
            .fetch_optional(conn)
            .await?;

        row.map(|row| M::from_row(&row, select.joined())).transpose()
    }

    /// Recarga explícitamente las columnas de la instancia (incluidos
    /// los defaults del servidor que no vinieron en el INSERT).
    pub async fn refresh<M: Model>(&mut self, instance: &mut M) -> Result<(), OrmError> {
        let select = Select::<M>::for_instance(instance)?;
        let fresh = self
            .execute(&select)
            .await?
            .ok_or(OrmError::Database(sqlx::Error::RowNotFound))?;
        instance.refresh_from(fresh);
        Ok(())
    }

    /// Devuelve la conexión al pool.
    pub fn close(mut self) {
        self.conn.take();
    }
}

pub struct SessionTransaction<'s> {
    tx: Transaction<'s, Postgres>,
}

impl SessionTransaction<'_> {
    /// Inserta la instancia de inmediato (flush), en cascada sobre las
    /// relaciones pendientes.
    pub async fn add(&mut self, instance: &mut dyn Persist) -> Result<(), OrmError> {
        insert(&mut *self.tx, instance).await
    }

    pub async fn commit(self) -> Result<(), OrmError> {
        self.tx.commit().await?;
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), OrmError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

/// Arma el INSERT de una tabla. Siempre trae la PK de vuelta; los
/// defaults del servidor solo si la tabla tiene `eager_defaults`.
pub fn insert_sql(instance: &dyn Persist) -> (String, Vec<Value>, Vec<&'static str>) {
    let table = instance.table();
    let (columns, values): (Vec<&str>, Vec<Value>) = instance.values().into_iter().unzip();

    let mut returning = vec!["id"];
    if table.eager_defaults {
        returning.extend(table.server_default_columns());
    }

    let sql = if columns.is_empty() {
        format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING {}",
            table.name,
            returning.join(", ")
        )
    } else {
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table.name,
            columns.join(", "),
            placeholders.join(", "),
            returning.join(", ")
        )
    };

    (sql, values, returning)
}

fn insert<'a>(
    conn: &'a mut PgConnection,
    instance: &'a mut dyn Persist,
) -> BoxFuture<'a, Result<(), OrmError>> {
    Box::pin(async move {
        if let Some(parent) = instance.pending_parent() {
            insert(&mut *conn, parent).await?;
        }
        instance.link_parent();

        let (sql, values, returning) = insert_sql(&*instance);
        let mut query = sqlx::query(&sql);
        for value in values {
            query = match value {
                Value::Int(v) => query.bind(v),
                Value::Text(v) => query.bind(v),
            };
        }

        let row = query.fetch_one(&mut *conn).await?;
        instance.apply_generated(&row, &returning)?;
        log::debug!(
            "INSERT en {} (returning: {})",
            instance.table().name,
            returning.join(", ")
        );
        Ok(())
    })
}
