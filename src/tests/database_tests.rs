//! tests/database_tests.rs
//! Demos completas contra un Postgres real. Se saltean si no está
//! definida `TEST_DATABASE_URL`. Todo corre en un solo test porque
//! cada pasada recrea el esquema.

#[cfg(test)]
mod tests {
    use crate::config::demo_config::DemoConfig;
    use crate::models::country_model::Country;
    use crate::models::orm_model::Select;
    use crate::models::traveler_model::{LazyTraveler, TravelerWithDestination};
    use crate::output::Transcript;
    use crate::services::demo_service::{Demo, DemoService};
    use crate::services::engine_service::{Engine, SessionMaker};

    fn test_config() -> Option<DemoConfig> {
        let database_url = std::env::var("TEST_DATABASE_URL").ok()?;
        Some(DemoConfig {
            database_url,
            echo: false,
            ..DemoConfig::default()
        })
    }

    #[actix_rt::test]
    async fn test_demos_against_postgres() {
        let Some(config) = test_config() else {
            eprintln!("TEST_DATABASE_URL no definida, se saltea");
            return;
        };

        let engine = Engine::connect(&config).await.expect("conexión");
        let service = DemoService::new(engine.clone());
        service.flush_database().await.expect("flush");

        let transcript = Transcript::buffered(config.divider_width);

        let simple = service.run(Demo::Simple, &transcript).await.expect("simple");
        assert_eq!(simple.as_deref(), Some("Hello, world!"));

        let lazy = service
            .run(Demo::LazyLoading, &transcript)
            .await
            .expect("lazy_loading");
        assert!(lazy.is_none());
        assert!(transcript
            .lines()
            .iter()
            .any(|l| l.starts_with("Cannot access lazy attribute:")));

        let eager = service
            .run(Demo::EagerLoading, &transcript)
            .await
            .expect("eager_loading")
            .expect("created_at cargado");
        assert!(eager.starts_with("Traveler Sebastiaan created at: "));
        assert!(!eager.ends_with("None"));

        let unloaded = service
            .run(Demo::UnloadedRelationship, &transcript)
            .await
            .expect("unloaded_relationship")
            .expect("repr");
        assert!(unloaded.starts_with("TravelerWithDestination(id="));
        assert!(unloaded.contains("name='Sebastiaan'"));
        assert!(unloaded.ends_with("destination=<NOT_LOADED>)"));

        let access_unloaded = service
            .run(Demo::AccessUnloadedRelationship, &transcript)
            .await
            .expect("access_unloaded_relationship");
        assert!(access_unloaded.is_none());

        let access_loaded = service
            .run(Demo::AccessLoadedRelationship, &transcript)
            .await
            .expect("access_loaded_relationship");
        assert_eq!(
            access_loaded.as_deref(),
            Some("The traveler is traveling to 'Norway'")
        );

        let refreshed = service
            .run(Demo::ExplicitRefresh, &transcript)
            .await
            .expect("explicit_refresh")
            .expect("created_at tras refresh");
        assert!(!refreshed.ends_with("None"));

        // rollback: lo insertado no queda
        let sessions = SessionMaker::new(engine.clone());
        let mut traveler = LazyTraveler::new("Ghost", 99);
        let mut session = sessions.session();
        let mut tx = session.begin().await.expect("begin");
        tx.add(&mut traveler).await.expect("insert");
        tx.rollback().await.expect("rollback");
        let select = Select::for_instance(&traveler).expect("tiene id");
        assert!(session.execute(&select).await.expect("select").is_none());
        session.close();

        // transacción descartada sin commit: también hace rollback
        let mut traveler = LazyTraveler::new("Dropped", 42);
        let mut session = sessions.session();
        {
            let mut tx = session.begin().await.expect("begin");
            tx.add(&mut traveler).await.expect("insert");
        }
        let select = Select::for_instance(&traveler).expect("tiene id");
        assert!(session.execute(&select).await.expect("select").is_none());
        session.close();

        let mut session = sessions.session();
        assert!(session.execute(&select).await.expect("select").is_none());
        session.close();

        // cascada: el país se inserta primero y la FK queda enlazada
        let mut traveler =
            TravelerWithDestination::new("Sebastiaan", 35, Some(Country::new("Peru")));
        let mut session = sessions.session();
        let mut tx = session.begin().await.expect("begin");
        tx.add(&mut traveler).await.expect("insert");
        tx.commit().await.expect("commit");
        let country_id = traveler
            .destination()
            .expect("cargado")
            .and_then(|c| c.id.loaded().copied());
        assert!(country_id.is_some());
        assert_eq!(traveler.destination_id.loaded().copied().flatten(), country_id);
        session.close();

        service.dispose().await;
    }
}
