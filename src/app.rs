//! app.rs
use crate::handlers::demo_handler;
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/demos")
                    .route("", web::get().to(demo_handler::list_demos_endpoint))
                    .route("/{label}", web::post().to(demo_handler::run_demo_endpoint)),
            )
            .service(
                web::scope("/database")
                    .route("/flush", web::post().to(demo_handler::flush_database_endpoint)),
            ),
    );
}
