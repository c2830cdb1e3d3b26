//! handlers/demo_handler.rs
//! Endpoints para listar y correr las demos.

use actix_web::{web, HttpResponse};
use log::error;

use crate::config::demo_config::DemoConfig;
use crate::models::demo_model::{DemoListResponse, DemoReport, FlushResponse};
use crate::output::Transcript;
use crate::services::demo_service::{Demo, DemoService};

/// GET /api/demos
pub async fn list_demos_endpoint() -> HttpResponse {
    HttpResponse::Ok().json(DemoListResponse {
        demos: Demo::labels(),
    })
}

/// POST /api/demos/{label}
/// Corre la demo y devuelve el resultado junto con el transcript.
pub async fn run_demo_endpoint(
    demo_service: web::Data<DemoService>,
    config: web::Data<DemoConfig>,
    path: web::Path<String>,
) -> HttpResponse {
    let label = path.into_inner();
    let demo: Demo = match label.parse() {
        Ok(demo) => demo,
        Err(e) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Demo not found",
                "details": e.to_string()
            }))
        }
    };

    log::info!("Corriendo demo '{}' por HTTP", demo);
    let transcript = Transcript::buffered(config.divider_width);
    match demo_service.run_verbosely(demo, &transcript).await {
        Ok(result) => HttpResponse::Ok().json(DemoReport {
            label,
            result,
            transcript: transcript.lines(),
        }),
        Err(e) => {
            error!("Error corriendo demo '{}': {:?}", demo, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error",
                "details": format!("{:?}", e)
            }))
        }
    }
}

/// POST /api/database/flush
pub async fn flush_database_endpoint(demo_service: web::Data<DemoService>) -> HttpResponse {
    match demo_service.flush_database().await {
        Ok(()) => HttpResponse::Ok().json(FlushResponse {
            success: true,
            message: "Schema recreated".to_string(),
        }),
        Err(e) => {
            error!("Error recreando el esquema: {:?}", e);
            HttpResponse::InternalServerError().json(FlushResponse {
                success: false,
                message: format!("Failed to recreate schema: {:?}", e),
            })
        }
    }
}
