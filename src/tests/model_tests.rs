//! tests/model_tests.rs
//! Estado de carga, repr, INSERT/SELECT generados y cascada de relaciones.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::errors::OrmError;
    use crate::models::attribute_model::{Attr, Repr, NOT_LOADED};
    use crate::models::country_model::Country;
    use crate::models::orm_model::{Model, Persist, Select, Value};
    use crate::models::traveler_model::{EagerTraveler, LazyTraveler, TravelerWithDestination};
    use crate::services::demo_service::Demo;
    use crate::services::session_service::insert_sql;

    fn norway() -> Country {
        Country::new("Norway")
    }

    #[test]
    fn test_not_loaded_attribute_fails_without_io() {
        let traveler = LazyTraveler::new("Sebastiaan", 35);
        let err = traveler.created_at().expect_err("created_at no está cargado");

        assert!(err.is_not_loaded());
        let message = err.to_string();
        assert!(message.contains("created_at"));
        assert!(message.contains("LazyTraveler"));
    }

    #[test]
    fn test_loaded_attribute_is_returned() {
        let attr: Attr<i32> = 7.into();
        assert_eq!(attr.get("Country", "id").ok(), Some(&7));
        assert!(Attr::<i32>::NotLoaded.loaded().is_none());
    }

    #[test]
    fn test_repr_marks_unloaded_attributes() {
        let traveler = LazyTraveler::new("Sebastiaan", 35);
        assert_eq!(
            traveler.to_string(),
            format!(
                "LazyTraveler(id={NOT_LOADED}, created_at={NOT_LOADED}, name='Sebastiaan', age=35)"
            )
        );
    }

    #[test]
    fn test_repr_of_loaded_relationship() {
        let mut country = norway();
        country.id = Attr::Loaded(1);
        let mut traveler = TravelerWithDestination::new("Sebastiaan", 35, Some(country));
        traveler.id = Attr::Loaded(2);
        traveler.created_at = Attr::Loaded(None);
        traveler.destination_id = Attr::Loaded(Some(1));

        assert_eq!(
            traveler.to_string(),
            "TravelerWithDestination(id=2, created_at=None, name='Sebastiaan', age=35, \
             destination_id=1, destination=Country(id=1, name='Norway'))"
        );
    }

    #[test]
    fn test_repr_quotes_strings() {
        assert_eq!("Norway".to_string().repr(), "'Norway'");
        assert_eq!("it's".to_string().repr(), "\"it's\"");
        assert_eq!("it's \"x\"".to_string().repr(), "'it\\'s \"x\"'");
        assert_eq!("a\\b\n".to_string().repr(), "'a\\\\b\\n'");
        assert_eq!(None::<String>.repr(), "None");
    }

    #[test]
    fn test_repr_of_timestamps() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        let full = date.and_hms_micro_opt(3, 4, 5, 123456).unwrap();
        assert_eq!(full.repr(), "datetime.datetime(2024, 1, 2, 3, 4, 5, 123456)");

        let seconds = date.and_hms_opt(3, 4, 5).unwrap();
        assert_eq!(seconds.repr(), "datetime.datetime(2024, 1, 2, 3, 4, 5)");

        let minutes = date.and_hms_opt(3, 4, 0).unwrap();
        assert_eq!(minutes.repr(), "datetime.datetime(2024, 1, 2, 3, 4)");

        let attr: Attr<Option<_>> = Attr::Loaded(Some(full));
        assert_eq!(attr.repr(), full.repr());
    }

    #[test]
    fn test_insert_without_eager_defaults_returns_only_id() {
        let traveler = LazyTraveler::new("Sebastiaan", 35);
        let (sql, values, returning) = insert_sql(&traveler);

        assert_eq!(
            sql,
            "INSERT INTO lazy_traveler (name, age) VALUES ($1, $2) RETURNING id"
        );
        assert_eq!(
            values,
            vec![
                Value::Text(Some("Sebastiaan".to_string())),
                Value::Int(Some(35))
            ]
        );
        assert_eq!(returning, vec!["id"]);
    }

    #[test]
    fn test_insert_with_eager_defaults_returns_server_defaults() {
        let traveler = EagerTraveler::new("Sebastiaan", 35);
        let (sql, _, returning) = insert_sql(&traveler);

        assert_eq!(
            sql,
            "INSERT INTO eager_traveler (name, age) VALUES ($1, $2) RETURNING id, created_at"
        );
        assert_eq!(returning, vec!["id", "created_at"]);
    }

    #[test]
    fn test_pending_destination_is_inserted_first() {
        let mut traveler = TravelerWithDestination::new("Sebastiaan", 35, Some(norway()));
        {
            let parent = traveler.pending_parent().expect("el país está pendiente");
            assert_eq!(parent.table().name, "country");
        }

        // simula el flush del país
        if let Some(Some(country)) = traveler.destination.get_mut() {
            country.id = Attr::Loaded(7);
        }
        assert!(traveler.pending_parent().is_none());

        traveler.link_parent();
        assert_eq!(traveler.destination_id, Attr::Loaded(Some(7)));
        assert!(traveler
            .values()
            .contains(&("destination_id", Value::Int(Some(7)))));
    }

    #[test]
    fn test_traveler_without_destination_has_no_parent() {
        let mut traveler = TravelerWithDestination::new("Sebastiaan", 35, None);
        assert!(traveler.pending_parent().is_none());
        assert_eq!(traveler.destination().ok(), Some(None));
    }

    #[test]
    fn test_select_without_joined_load() {
        let select = Select::<TravelerWithDestination>::by_id(3);
        assert_eq!(
            select.to_sql(),
            "SELECT t0.id AS id, t0.created_at AS created_at, t0.name AS name, t0.age AS age, \
             t0.destination_id AS destination_id FROM traveler_with_destination AS t0 \
             WHERE t0.id = $1"
        );
        assert!(select.joined().is_empty());
    }

    #[test]
    fn test_select_with_joined_load() {
        let select = Select::<TravelerWithDestination>::by_id(3)
            .joined_load("destination")
            .expect("la relación existe")
            // pedirla dos veces no duplica el JOIN
            .joined_load("destination")
            .expect("la relación existe");
        let sql = select.to_sql();

        assert_eq!(select.joined().len(), 1);
        assert!(sql.contains("destination.id AS destination__id"));
        assert!(sql.contains("destination.name AS destination__name"));
        assert!(sql.contains(
            "LEFT OUTER JOIN country AS destination ON destination.id = t0.destination_id"
        ));
        assert!(sql.ends_with("WHERE t0.id = $1"));
    }

    #[test]
    fn test_unknown_relationship_is_rejected() {
        let err = Select::<LazyTraveler>::by_id(1)
            .joined_load("destination")
            .expect_err("LazyTraveler no tiene relaciones");
        assert!(matches!(err, OrmError::UnknownRelationship { model: "LazyTraveler", .. }));
    }

    #[test]
    fn test_select_for_unpersisted_instance_fails() {
        let traveler = EagerTraveler::new("Sebastiaan", 35);
        assert!(matches!(
            Select::for_instance(&traveler),
            Err(OrmError::NotPersisted { model: "EagerTraveler" })
        ));
    }

    #[test]
    fn test_refresh_keeps_loaded_relationship() {
        let mut country = norway();
        country.id = Attr::Loaded(1);
        let mut traveler = TravelerWithDestination::new("Sebastiaan", 35, Some(country));
        traveler.id = Attr::Loaded(2);
        traveler.destination_id = Attr::Loaded(Some(1));

        let fresh = TravelerWithDestination {
            id: Attr::Loaded(2),
            created_at: Attr::Loaded(None),
            name: Some("Sebastiaan".to_string()),
            age: Some(36),
            destination_id: Attr::Loaded(Some(1)),
            destination: Attr::NotLoaded,
        };
        traveler.refresh_from(fresh);

        assert_eq!(traveler.age, Some(36));
        assert!(traveler.destination.is_loaded());
        assert!(traveler.created_at.is_loaded());
    }

    #[test]
    fn test_refresh_drops_stale_relationship() {
        let mut traveler = TravelerWithDestination::new("Sebastiaan", 35, Some(norway()));
        traveler.id = Attr::Loaded(2);
        traveler.destination_id = Attr::Loaded(Some(1));

        let fresh = TravelerWithDestination {
            destination_id: Attr::Loaded(Some(9)),
            destination: Attr::NotLoaded,
            ..traveler.clone()
        };
        traveler.refresh_from(fresh);

        assert!(!traveler.destination.is_loaded());
    }

    #[test]
    fn test_demo_labels_round_trip() {
        for demo in Demo::ALL {
            assert_eq!(demo.label().parse::<Demo>().ok(), Some(demo));
        }
        assert!("nope".parse::<Demo>().is_err());
        assert_eq!(Demo::parse_all(&[]).map(|d| d.len()).ok(), Some(7));
        assert_eq!(
            Demo::parse_all(&["eager_loading".to_string(), "simple".to_string()]).ok(),
            Some(vec![Demo::EagerLoading, Demo::Simple])
        );
    }
}
