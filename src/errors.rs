//! errors.rs
//! Errores tipados de la capa de mapeo (modelos, sesiones, esquema).
//! El resto de la app trabaja con `anyhow` y hace downcast cuando
//! necesita distinguir alguno de estos casos.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrmError {
    /// Se intentó leer un atributo que no se cargó. En código async no
    /// se puede disparar el query implícito que lo resolvería.
    #[error(
        "attribute '{attribute}' of {model} is not loaded and cannot be fetched implicitly from async code"
    )]
    NotLoaded {
        model: &'static str,
        attribute: &'static str,
    },

    #[error("{model} has no relationship named '{relationship}'")]
    UnknownRelationship {
        model: &'static str,
        relationship: String,
    },

    /// La instancia todavía no tiene primary key (no se hizo flush).
    #[error("{model} instance has not been persisted yet")]
    NotPersisted { model: &'static str },

    #[error("foreign key cycle detected at table '{table}'")]
    DependencyCycle { table: &'static str },

    #[error("table '{table}' references unknown table '{references}'")]
    UnknownTable {
        table: &'static str,
        references: &'static str,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl OrmError {
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, OrmError::NotLoaded { .. })
    }
}
