//! models/country_model.rs
//! País: destino de los viajeros.

use std::fmt;

use sqlx::postgres::PgRow;

use crate::errors::OrmError;
use crate::models::attribute_model::{format_repr, Attr, Repr};
use crate::models::orm_model::{read_column, Model, Persist, Value};
use crate::models::schema_model::{Column, Relationship, Table};

pub const COUNTRY_TABLE: Table = Table {
    name: "country",
    model: "Country",
    columns: &[
        Column {
            primary_key: true,
            ..Column::new("id", "SERIAL")
        },
        Column::new("name", "VARCHAR(128)"),
    ],
    eager_defaults: false,
};

/// Un país (destino de viaje).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Country {
    pub id: Attr<i32>,
    pub name: Option<String>,
}

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Country {
            id: Attr::NotLoaded,
            name: Some(name.into()),
        }
    }

    /// Lee un país con alias de columnas. Devuelve `None` si el LEFT
    /// JOIN no encontró fila.
    pub fn from_prefixed(row: &PgRow, prefix: Option<&str>) -> Result<Option<Self>, OrmError> {
        let id: Option<i32> = read_column(row, prefix, "id")?;
        match id {
            Some(id) => Ok(Some(Country {
                id: Attr::Loaded(id),
                name: read_column(row, prefix, "name")?,
            })),
            None => Ok(None),
        }
    }
}

impl Model for Country {
    const TABLE: &'static Table = &COUNTRY_TABLE;
    const RELATIONSHIPS: &'static [Relationship] = &[];

    fn id(&self) -> &Attr<i32> {
        &self.id
    }

    fn from_row(row: &PgRow, _joined: &[&'static Relationship]) -> Result<Self, OrmError> {
        Country::from_prefixed(row, None)?
            .ok_or(OrmError::Database(sqlx::Error::RowNotFound))
    }

    fn refresh_from(&mut self, fresh: Self) {
        *self = fresh;
    }
}

impl Persist for Country {
    fn table(&self) -> &'static Table {
        &COUNTRY_TABLE
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![("name", Value::Text(self.name.clone()))]
    }

    fn apply_generated(&mut self, row: &PgRow, _fetched: &[&'static str]) -> Result<(), OrmError> {
        self.id = Attr::Loaded(read_column(row, None, "id")?);
        Ok(())
    }

    fn is_persisted(&self) -> bool {
        self.id.is_loaded()
    }
}

impl Repr for Country {
    fn repr(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format_repr(
            "Country",
            &[("id", self.id.repr()), ("name", self.name.repr())],
        );
        f.write_str(&repr)
    }
}
