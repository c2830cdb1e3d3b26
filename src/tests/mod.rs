//! tests/mod.rs
//! Pruebas unitarias. Las que necesitan Postgres solo corren si está
//! definida `TEST_DATABASE_URL`.

mod database_tests;
mod model_tests;
