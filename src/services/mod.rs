//! services/mod.rs
//! Módulo que agrupa las capas de acceso a datos y las demos.

pub mod demo_service;
pub mod engine_service;
pub mod session_service;
