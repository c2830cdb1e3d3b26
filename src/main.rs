use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;

use crate::config::cli::{Cli, Command};
use crate::config::demo_config::DemoConfig;
use crate::logger::init_logger;
use crate::output::Transcript;
use crate::services::demo_service::{Demo, DemoService};
use crate::services::engine_service::Engine;

mod app;
mod config;
mod errors;
mod handlers;
mod logger;
mod models;
mod output;
mod services;

#[cfg(test)]
mod tests;

/// Corre las demos en orden, imprimiendo el transcript en stdout.
async fn run_demos(labels: &[String]) -> Result<()> {
    // validar etiquetas antes de tocar la base
    let demos = Demo::parse_all(labels)?;
    let config = DemoConfig::from_env()?;

    let engine = Engine::connect(&config).await?;
    let demo_service = DemoService::new(engine);
    let transcript = Transcript::stdout(config.divider_width);

    let outcome = demo_service.run_all(&demos, &transcript).await;
    demo_service.dispose().await;
    outcome
}

async fn serve() -> Result<()> {
    let config = DemoConfig::from_env()?;

    let engine = Engine::connect(&config).await?;
    let demo_service = DemoService::new(engine);
    demo_service
        .flush_database()
        .await
        .context("Fallo al recrear el esquema")?;

    log::info!(
        "Levantando servidor en {}:{}",
        config.bind_address,
        config.port
    );
    let bind = (config.bind_address.clone(), config.port);
    let app_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(demo_service.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .configure(app::init_app)
    })
    .workers(1)
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    match Cli::parse().command() {
        Command::List => {
            for label in Demo::labels() {
                println!("{label}");
            }
            Ok(())
        }
        Command::Run { labels } => run_demos(&labels).await,
        Command::Serve => serve().await,
    }
}
