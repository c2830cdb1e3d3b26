//! models/mod.rs
//! Módulo raíz para modelos mapeados, esquema y payloads de la API.

pub mod attribute_model;
pub mod country_model;
pub mod demo_model;
pub mod orm_model;
pub mod schema_model;
pub mod traveler_model;

use country_model::COUNTRY_TABLE;
use schema_model::Metadata;
use traveler_model::{EAGER_TRAVELER_TABLE, LAZY_TRAVELER_TABLE, TRAVELER_WITH_DESTINATION_TABLE};

/// Todas las tablas de la demo.
pub fn metadata() -> Metadata {
    Metadata::new()
        .register(&LAZY_TRAVELER_TABLE)
        .register(&EAGER_TRAVELER_TABLE)
        .register(&TRAVELER_WITH_DESTINATION_TABLE)
        .register(&COUNTRY_TABLE)
}
