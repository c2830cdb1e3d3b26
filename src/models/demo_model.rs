//! models/demo_model.rs
//! Payloads de la API de demos.

use serde::{Deserialize, Serialize};

/// Resultado de correr una demo por HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoReport {
    pub label: String,
    pub result: Option<String>,
    pub transcript: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoListResponse {
    pub demos: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlushResponse {
    pub success: bool,
    pub message: String,
}
