//! models/traveler_model.rs
//! Viajeros: dos variantes que solo difieren en si traen los defaults
//! del servidor al insertar, y una tercera con destino (many-to-one).

use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDateTime;
use sqlx::postgres::PgRow;

use crate::errors::OrmError;
use crate::models::attribute_model::{format_repr, Attr, Repr};
use crate::models::country_model::{Country, COUNTRY_TABLE};
use crate::models::orm_model::{read_column, Model, Persist, Value};
use crate::models::schema_model::{Column, Relationship, Table};

const ID: Column = Column {
    primary_key: true,
    ..Column::new("id", "SERIAL")
};
const CREATED_AT: Column = Column {
    server_default: Some("now()"),
    ..Column::new("created_at", "TIMESTAMP WITHOUT TIME ZONE")
};
const NAME: Column = Column::new("name", "VARCHAR(128)");
const AGE: Column = Column::new("age", "INTEGER");

pub const LAZY_TRAVELER_TABLE: Table = Table {
    name: "lazy_traveler",
    model: "LazyTraveler",
    columns: &[ID, CREATED_AT, NAME, AGE],
    eager_defaults: false,
};

pub const EAGER_TRAVELER_TABLE: Table = Table {
    name: "eager_traveler",
    model: "EagerTraveler",
    columns: &[ID, CREATED_AT, NAME, AGE],
    eager_defaults: true,
};

pub const TRAVELER_WITH_DESTINATION_TABLE: Table = Table {
    name: "traveler_with_destination",
    model: "TravelerWithDestination",
    columns: &[
        ID,
        CREATED_AT,
        NAME,
        AGE,
        Column {
            references: Some("country"),
            ..Column::new("destination_id", "INTEGER")
        },
    ],
    eager_defaults: true,
};

const DESTINATION: Relationship = Relationship {
    name: "destination",
    target: &COUNTRY_TABLE,
    local_column: "destination_id",
};

/// Variante de viajero: define tabla y política de defaults.
pub trait TravelerKind: Send + Sync + 'static {
    const TABLE: &'static Table;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lazy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eager;

impl TravelerKind for Lazy {
    const TABLE: &'static Table = &LAZY_TRAVELER_TABLE;
}

impl TravelerKind for Eager {
    const TABLE: &'static Table = &EAGER_TRAVELER_TABLE;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Traveler<K: TravelerKind> {
    pub id: Attr<i32>,
    pub created_at: Attr<Option<NaiveDateTime>>,
    pub name: Option<String>,
    pub age: Option<i32>,
    kind: PhantomData<K>,
}

/// `created_at` no se trae en el INSERT.
pub type LazyTraveler = Traveler<Lazy>;
/// `created_at` vuelve en el `RETURNING` del INSERT.
pub type EagerTraveler = Traveler<Eager>;

impl<K: TravelerKind> Traveler<K> {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Traveler {
            id: Attr::NotLoaded,
            created_at: Attr::NotLoaded,
            name: Some(name.into()),
            age: Some(age),
            kind: PhantomData,
        }
    }

    pub fn created_at(&self) -> Result<Option<NaiveDateTime>, OrmError> {
        self.created_at
            .get(K::TABLE.model, "created_at")
            .map(|value| *value)
    }
}

impl<K: TravelerKind> Model for Traveler<K> {
    const TABLE: &'static Table = K::TABLE;

    fn id(&self) -> &Attr<i32> {
        &self.id
    }

    fn from_row(row: &PgRow, _joined: &[&'static Relationship]) -> Result<Self, OrmError> {
        Ok(Traveler {
            id: Attr::Loaded(read_column(row, None, "id")?),
            created_at: Attr::Loaded(read_column(row, None, "created_at")?),
            name: read_column(row, None, "name")?,
            age: read_column(row, None, "age")?,
            kind: PhantomData,
        })
    }

    fn refresh_from(&mut self, fresh: Self) {
        *self = fresh;
    }
}

impl<K: TravelerKind> Persist for Traveler<K> {
    fn table(&self) -> &'static Table {
        K::TABLE
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(self.name.clone())),
            ("age", Value::Int(self.age)),
        ]
    }

    fn apply_generated(&mut self, row: &PgRow, fetched: &[&'static str]) -> Result<(), OrmError> {
        self.id = Attr::Loaded(read_column(row, None, "id")?);
        if fetched.contains(&"created_at") {
            self.created_at = Attr::Loaded(read_column(row, None, "created_at")?);
        }
        Ok(())
    }

    fn is_persisted(&self) -> bool {
        self.id.is_loaded()
    }
}

impl<K: TravelerKind> fmt::Display for Traveler<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format_repr(
            K::TABLE.model,
            &[
                ("id", self.id.repr()),
                ("created_at", self.created_at.repr()),
                ("name", self.name.repr()),
                ("age", self.age.repr()),
            ],
        );
        f.write_str(&repr)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TravelerWithDestination {
    pub id: Attr<i32>,
    pub created_at: Attr<Option<NaiveDateTime>>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub destination_id: Attr<Option<i32>>,
    pub destination: Attr<Option<Country>>,
}

impl TravelerWithDestination {
    pub fn new(name: impl Into<String>, age: i32, destination: Option<Country>) -> Self {
        TravelerWithDestination {
            id: Attr::NotLoaded,
            created_at: Attr::NotLoaded,
            name: Some(name.into()),
            age: Some(age),
            destination_id: Attr::Loaded(None),
            destination: Attr::Loaded(destination),
        }
    }

    pub fn destination(&self) -> Result<Option<&Country>, OrmError> {
        self.destination
            .get("TravelerWithDestination", "destination")
            .map(Option::as_ref)
    }
}

impl Model for TravelerWithDestination {
    const TABLE: &'static Table = &TRAVELER_WITH_DESTINATION_TABLE;
    const RELATIONSHIPS: &'static [Relationship] = &[DESTINATION];

    fn id(&self) -> &Attr<i32> {
        &self.id
    }

    fn from_row(row: &PgRow, joined: &[&'static Relationship]) -> Result<Self, OrmError> {
        let destination = if joined.iter().any(|r| r.name == DESTINATION.name) {
            Attr::Loaded(Country::from_prefixed(row, Some(DESTINATION.name))?)
        } else {
            Attr::NotLoaded
        };

        Ok(TravelerWithDestination {
            id: Attr::Loaded(read_column(row, None, "id")?),
            created_at: Attr::Loaded(read_column(row, None, "created_at")?),
            name: read_column(row, None, "name")?,
            age: read_column(row, None, "age")?,
            destination_id: Attr::Loaded(read_column(row, None, "destination_id")?),
            destination,
        })
    }

    fn refresh_from(&mut self, fresh: Self) {
        // la relación ya cargada se conserva si la FK no cambió
        let keep_destination =
            self.destination.is_loaded() && self.destination_id == fresh.destination_id;
        let destination = std::mem::take(&mut self.destination);
        *self = fresh;
        if keep_destination {
            self.destination = destination;
        }
    }
}

impl Persist for TravelerWithDestination {
    fn table(&self) -> &'static Table {
        &TRAVELER_WITH_DESTINATION_TABLE
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(self.name.clone())),
            ("age", Value::Int(self.age)),
            (
                "destination_id",
                Value::Int(self.destination_id.loaded().copied().flatten()),
            ),
        ]
    }

    fn apply_generated(&mut self, row: &PgRow, fetched: &[&'static str]) -> Result<(), OrmError> {
        self.id = Attr::Loaded(read_column(row, None, "id")?);
        if fetched.contains(&"created_at") {
            self.created_at = Attr::Loaded(read_column(row, None, "created_at")?);
        }
        Ok(())
    }

    fn is_persisted(&self) -> bool {
        self.id.is_loaded()
    }

    fn pending_parent(&mut self) -> Option<&mut dyn Persist> {
        match self.destination.get_mut() {
            Some(Some(country)) if !country.is_persisted() => Some(country as &mut dyn Persist),
            _ => None,
        }
    }

    fn link_parent(&mut self) {
        if let Some(Some(country)) = self.destination.loaded() {
            if let Some(id) = country.id.loaded() {
                self.destination_id = Attr::Loaded(Some(*id));
            }
        }
    }
}

impl fmt::Display for TravelerWithDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = format_repr(
            "TravelerWithDestination",
            &[
                ("id", self.id.repr()),
                ("created_at", self.created_at.repr()),
                ("name", self.name.repr()),
                ("age", self.age.repr()),
                ("destination_id", self.destination_id.repr()),
                ("destination", self.destination.repr()),
            ],
        );
        f.write_str(&repr)
    }
}
