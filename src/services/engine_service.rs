//! services/engine_service.rs
//! Engine async sobre un pool de Postgres, y la fábrica de sesiones.

use std::str::FromStr;

use anyhow::{Context, Result};
use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::ConnectOptions;

use crate::config::demo_config::DemoConfig;
use crate::models::schema_model::Metadata;
use crate::services::session_service::Session;

#[derive(Clone, Debug)]
pub struct Engine {
    pool: PgPool,
}

impl Engine {
    /// Crea el pool y verifica que se pueda conectar.
    pub async fn connect(config: &DemoConfig) -> Result<Self> {
        let options = Self::connect_options(config)?;
        log::info!(
            "Conectando a Postgres (echo={}, max_connections={})",
            config.echo,
            config.max_connections
        );
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .context("No se pudo conectar a la base de datos Postgres")?;

        Ok(Engine { pool })
    }

    /// Crea el pool sin abrir ninguna conexión todavía.
    pub fn connect_lazy(config: &DemoConfig) -> Result<Self> {
        let options = Self::connect_options(config)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy_with(options);

        Ok(Engine { pool })
    }

    fn connect_options(config: &DemoConfig) -> Result<PgConnectOptions> {
        let options = PgConnectOptions::from_str(&config.database_url)
            .context("DATABASE_URL no es una URL de Postgres válida")?;

        // echo: cada statement (BEGIN/COMMIT incluidos) sale por el logger
        Ok(if config.echo {
            options.log_statements(LevelFilter::Info)
        } else {
            options.disable_statement_logging()
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `SELECT <message>` con el mensaje como parámetro.
    pub async fn simple_statement(&self, message: &str) -> Result<String> {
        let mut conn = self.pool.acquire().await?;
        let value: String = sqlx::query_scalar("SELECT $1::text")
            .bind(message)
            .fetch_one(&mut *conn)
            .await
            .context("Fallo al ejecutar el statement simple")?;
        Ok(value)
    }

    /// Borra y recrea todo el esquema en una sola transacción.
    pub async fn flush_database(&self, metadata: &Metadata) -> Result<()> {
        let drops = metadata.drop_all_statements()?;
        let creates = metadata.create_all_statements()?;

        let mut tx = self.pool.begin().await?;
        for statement in drops.iter().chain(creates.iter()) {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Fallo al ejecutar: {statement}"))?;
        }
        tx.commit().await.context("Fallo al recrear el esquema")?;

        log::info!("Esquema recreado ({} tablas)", creates.len());
        Ok(())
    }

    pub async fn dispose(&self) {
        self.pool.close().await;
    }
}

/// Fábrica de sesiones. Las instancias no se expiran al hacer commit.
#[derive(Clone, Debug)]
pub struct SessionMaker {
    engine: Engine,
}

impl SessionMaker {
    pub fn new(engine: Engine) -> Self {
        SessionMaker { engine }
    }

    pub fn session(&self) -> Session {
        Session::new(self.engine.clone())
    }
}
