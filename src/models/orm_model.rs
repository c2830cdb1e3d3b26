//! models/orm_model.rs
//! Contratos que implementan los modelos mapeados y el `Select` tipado
//! que la sesión sabe ejecutar.

use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::{Decode, Postgres, Row, Type};

use crate::errors::OrmError;
use crate::models::attribute_model::Attr;
use crate::models::schema_model::{Relationship, Table};

/// Valor a insertar en una columna.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(Option<i32>),
    Text(Option<String>),
}

/// Modelo que se puede leer desde la base.
pub trait Model: Sized + Send {
    const TABLE: &'static Table;
    const RELATIONSHIPS: &'static [Relationship] = &[];

    fn id(&self) -> &Attr<i32>;

    /// Construye la instancia desde una fila. Las relaciones que no
    /// están en `joined` quedan sin cargar.
    fn from_row(row: &PgRow, joined: &[&'static Relationship]) -> Result<Self, OrmError>;

    /// Copia las columnas de `fresh` sobre `self` (usado por refresh).
    fn refresh_from(&mut self, fresh: Self);

    fn relationship(name: &str) -> Result<&'static Relationship, OrmError> {
        Self::RELATIONSHIPS
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| OrmError::UnknownRelationship {
                model: Self::TABLE.model,
                relationship: name.to_string(),
            })
    }

    fn persisted_id(&self) -> Result<i32, OrmError> {
        self.id()
            .loaded()
            .copied()
            .ok_or(OrmError::NotPersisted {
                model: Self::TABLE.model,
            })
    }
}

/// Modelo que se puede insertar con `Session::add`.
pub trait Persist: Send {
    fn table(&self) -> &'static Table;

    /// Columnas con valor conocido del lado del cliente (sin PK ni
    /// defaults del servidor).
    fn values(&self) -> Vec<(&'static str, Value)>;

    /// Aplica lo que volvió en el `RETURNING` del INSERT.
    fn apply_generated(&mut self, row: &PgRow, fetched: &[&'static str])
        -> Result<(), OrmError>;

    fn is_persisted(&self) -> bool;

    /// Relación many-to-one pendiente de insertar antes que `self`.
    fn pending_parent(&mut self) -> Option<&mut dyn Persist> {
        None
    }

    /// Copia la PK del padre recién insertado a la FK local.
    fn link_parent(&mut self) {}
}

pub fn column_key(prefix: Option<&str>, column: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}__{column}"),
        None => column.to_string(),
    }
}

/// Lee una columna (con alias opcional) de la fila.
pub fn read_column<'r, T>(row: &'r PgRow, prefix: Option<&str>, column: &str) -> Result<T, OrmError>
where
    T: Decode<'r, Postgres> + Type<Postgres>,
{
    let key = column_key(prefix, column);
    Ok(row.try_get::<T, _>(key.as_str())?)
}

/// SELECT de una instancia por primary key, con joined loads opcionales.
pub struct Select<M: Model> {
    id: i32,
    joined: Vec<&'static Relationship>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for Select<M> {
    fn clone(&self) -> Self {
        Select {
            id: self.id,
            joined: self.joined.clone(),
            _model: PhantomData,
        }
    }
}

impl<M: Model> std::fmt::Debug for Select<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Select")
            .field("model", &M::TABLE.model)
            .field("id", &self.id)
            .field(
                "joined",
                &self.joined.iter().map(|r| r.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<M: Model> Select<M> {
    pub fn by_id(id: i32) -> Self {
        Select {
            id,
            joined: Vec::new(),
            _model: PhantomData,
        }
    }

    pub fn for_instance(instance: &M) -> Result<Self, OrmError> {
        Ok(Self::by_id(instance.persisted_id()?))
    }

    /// Pide cargar la relación con un LEFT OUTER JOIN en el mismo query.
    pub fn joined_load(mut self, relationship: &str) -> Result<Self, OrmError> {
        let relationship = M::relationship(relationship)?;
        if !self.joined.iter().any(|r| r.name == relationship.name) {
            self.joined.push(relationship);
        }
        Ok(self)
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn joined(&self) -> &[&'static Relationship] {
        &self.joined
    }

    pub fn to_sql(&self) -> String {
        let table = M::TABLE;
        let mut columns: Vec<String> = table
            .column_names()
            .map(|c| format!("t0.{c} AS {c}"))
            .collect();
        let mut joins = String::new();

        for relationship in &self.joined {
            let alias = relationship.name;
            columns.extend(
                relationship
                    .target
                    .column_names()
                    .map(|c| format!("{alias}.{c} AS {}", column_key(Some(alias), c))),
            );
            joins.push_str(&format!(
                " LEFT OUTER JOIN {} AS {alias} ON {alias}.id = t0.{}",
                relationship.target.name, relationship.local_column
            ));
        }

        format!(
            "SELECT {} FROM {} AS t0{joins} WHERE t0.id = $1",
            columns.join(", "),
            table.name
        )
    }
}
