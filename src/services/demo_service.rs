//! services/demo_service.rs
//! Las demostraciones de la charla: defaults del servidor con y sin
//! carga eager, y relaciones cargadas o no con joined load.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;

use crate::models::attribute_model::Repr;
use crate::models::country_model::Country;
use crate::models::metadata;
use crate::models::orm_model::{Model, Persist, Select};
use crate::models::traveler_model::{
    Eager, Lazy, LazyTraveler, Traveler, TravelerKind, TravelerWithDestination,
};
use crate::output::{execute_verbosely, Transcript};
use crate::services::engine_service::{Engine, SessionMaker};

const TRAVELER_NAME: &str = "Sebastiaan";
const TRAVELER_AGE: i32 = 35;
const DESTINATION_NAME: &str = "Norway";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    Simple,
    LazyLoading,
    EagerLoading,
    UnloadedRelationship,
    AccessUnloadedRelationship,
    AccessLoadedRelationship,
    ExplicitRefresh,
}

impl Demo {
    /// En el orden en que se presentan.
    pub const ALL: [Demo; 7] = [
        Demo::Simple,
        Demo::LazyLoading,
        Demo::EagerLoading,
        Demo::UnloadedRelationship,
        Demo::AccessUnloadedRelationship,
        Demo::AccessLoadedRelationship,
        Demo::ExplicitRefresh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Demo::Simple => "simple",
            Demo::LazyLoading => "lazy_loading",
            Demo::EagerLoading => "eager_loading",
            Demo::UnloadedRelationship => "unloaded_relationship",
            Demo::AccessUnloadedRelationship => "access_unloaded_relationship",
            Demo::AccessLoadedRelationship => "access_loaded_relationship",
            Demo::ExplicitRefresh => "explicit_refresh",
        }
    }

    pub fn labels() -> Vec<String> {
        Demo::ALL.iter().map(|d| d.label().to_string()).collect()
    }

    /// Convierte etiquetas en demos. Vacío significa todas.
    pub fn parse_all(labels: &[String]) -> Result<Vec<Demo>> {
        if labels.is_empty() {
            return Ok(Demo::ALL.to_vec());
        }
        labels.iter().map(|label| label.parse()).collect()
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Demo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Demo::ALL
            .iter()
            .copied()
            .find(|demo| demo.label() == s)
            .ok_or_else(|| anyhow!("Unknown demo '{s}'. Available: {}", Demo::labels().join(", ")))
    }
}

#[derive(Clone, Debug)]
pub struct DemoService {
    engine: Engine,
    session_maker: SessionMaker,
}

impl DemoService {
    pub fn new(engine: Engine) -> Self {
        let session_maker = SessionMaker::new(engine.clone());
        DemoService {
            engine,
            session_maker,
        }
    }

    pub async fn flush_database(&self) -> Result<()> {
        self.engine.flush_database(&metadata()).await
    }

    pub async fn run(&self, demo: Demo, transcript: &Transcript) -> Result<Option<String>> {
        match demo {
            Demo::Simple => self.simple_statement("Hello, world!").await,
            Demo::LazyLoading => self.lazy_loading(transcript).await,
            Demo::EagerLoading => self.eager_loading(transcript).await,
            Demo::UnloadedRelationship => self.unloaded_relationship().await,
            Demo::AccessUnloadedRelationship => self.access_unloaded_relationship(transcript).await,
            Demo::AccessLoadedRelationship => self.access_loaded_relationship(transcript).await,
            Demo::ExplicitRefresh => self.explicit_refresh(transcript).await,
        }
    }

    pub async fn run_verbosely(&self, demo: Demo, transcript: &Transcript) -> Result<Option<String>> {
        execute_verbosely(transcript, demo.label(), self.run(demo, transcript)).await
    }

    /// Corre las demos en orden sobre un esquema recién creado.
    pub async fn run_all(&self, demos: &[Demo], transcript: &Transcript) -> Result<()> {
        execute_verbosely(transcript, "flush_db", async {
            self.flush_database().await?;
            Ok::<_, anyhow::Error>(None)
        })
        .await?;

        for demo in demos {
            self.run_verbosely(*demo, transcript).await?;
        }
        Ok(())
    }

    pub async fn simple_statement(&self, message: &str) -> Result<Option<String>> {
        Ok(Some(self.engine.simple_statement(message).await?))
    }

    /// El default del servidor no vuelve en el INSERT: leerlo falla.
    pub async fn lazy_loading(&self, transcript: &Transcript) -> Result<Option<String>> {
        self.access_attribute_with_server_default::<Lazy>(transcript)
            .await
    }

    /// Con eager defaults el `created_at` ya está cargado.
    pub async fn eager_loading(&self, transcript: &Transcript) -> Result<Option<String>> {
        self.access_attribute_with_server_default::<Eager>(transcript)
            .await
    }

    /// Las relaciones no se precargan: el repr muestra `<NOT_LOADED>`.
    pub async fn unloaded_relationship(&self) -> Result<Option<String>> {
        let select = self.create_traveler_with_destination().await?;

        let mut session = self.session_maker.session();
        let traveler = session
            .execute(&select)
            .await?
            .context("No se encontró el viajero recién creado")?;
        session.close();

        Ok(Some(traveler.to_string()))
    }

    pub async fn access_unloaded_relationship(
        &self,
        transcript: &Transcript,
    ) -> Result<Option<String>> {
        let select = self.create_traveler_with_destination().await?;
        self.get_destination(&select, transcript).await
    }

    pub async fn access_loaded_relationship(
        &self,
        transcript: &Transcript,
    ) -> Result<Option<String>> {
        let select = self
            .create_traveler_with_destination()
            .await?
            .joined_load("destination")?;
        self.get_destination(&select, transcript).await
    }

    /// La salida async-safe: pedir explícitamente los atributos que faltan.
    pub async fn explicit_refresh(&self, transcript: &Transcript) -> Result<Option<String>> {
        let mut traveler = LazyTraveler::new(TRAVELER_NAME, TRAVELER_AGE);

        let mut session = self.session_maker.session();
        let mut tx = session.begin().await?;
        tx.add(&mut traveler).await?;
        tx.commit().await?;

        transcript.divider("Engine activity after refreshing ORM-instance");
        session.refresh(&mut traveler).await?;
        session.close();

        let created_at = traveler.created_at()?;
        Ok(Some(format!(
            "Traveler {TRAVELER_NAME} created at: {}",
            format_timestamp(created_at)
        )))
    }

    /// Persiste la instancia en su propia transacción y devuelve el
    /// select que la vuelve a traer.
    pub async fn create_orm_instance<M>(&self, mut instance: M) -> Result<Select<M>>
    where
        M: Model + Persist,
    {
        let mut session = self.session_maker.session();
        let mut tx = session.begin().await?;
        tx.add(&mut instance).await?;
        tx.commit().await?;
        session.close();

        Ok(Select::for_instance(&instance)?)
    }

    pub async fn access_attribute_with_server_default<K: TravelerKind>(
        &self,
        transcript: &Transcript,
    ) -> Result<Option<String>> {
        let mut traveler = Traveler::<K>::new(TRAVELER_NAME, TRAVELER_AGE);

        let mut session = self.session_maker.session();
        let mut tx = session.begin().await?;
        tx.add(&mut traveler).await?;
        tx.commit().await?;

        transcript.divider("Engine activity after committing ORM-instance");
        let result = match traveler.created_at() {
            Ok(created_at) => Some(format!(
                "Traveler {TRAVELER_NAME} created at: {}",
                format_timestamp(created_at)
            )),
            Err(e) if e.is_not_loaded() => {
                transcript.line(format!("Cannot access lazy attribute: {e}"));
                None
            }
            Err(e) => return Err(e.into()),
        };
        session.close();

        Ok(result)
    }

    async fn create_traveler_with_destination(&self) -> Result<Select<TravelerWithDestination>> {
        self.create_orm_instance(TravelerWithDestination::new(
            TRAVELER_NAME,
            TRAVELER_AGE,
            Some(Country::new(DESTINATION_NAME)),
        ))
        .await
    }

    async fn get_destination(
        &self,
        select: &Select<TravelerWithDestination>,
        transcript: &Transcript,
    ) -> Result<Option<String>> {
        let mut session = self.session_maker.session();
        let traveler = session
            .execute(select)
            .await?
            .context("No se encontró el viajero recién creado")?;

        transcript.divider("Engine activity after fetching ORM-instance");
        let result = match traveler.destination() {
            Ok(Some(country)) => Some(format!(
                "The traveler is traveling to {}",
                country.name.repr()
            )),
            Ok(None) => Some("The traveler has no destination".to_string()),
            Err(e) if e.is_not_loaded() => {
                transcript.line(format!("Cannot access lazy attribute: {e}"));
                None
            }
            Err(e) => return Err(e.into()),
        };
        session.close();

        Ok(result)
    }

    pub async fn dispose(&self) {
        self.engine.dispose().await;
    }
}

fn format_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|ts| ts.to_string())
        .unwrap_or_else(|| "None".to_string())
}
