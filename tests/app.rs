use loginstore::app::App;
use loginstore::domain_model::UpsertOutcome;
use loginstore::settings::{Log, Settings, Store};

fn memory_settings(insert_rows: u64, update_rows: u64) -> Settings {
    Settings {
        log: Log {
            filter: "info".to_string(),
        },
        store: Store {
            backend: "memory".to_string(),
            insert_rows,
            update_rows,
        },
        mysql: None,
    }
}

#[tokio::test]
async fn memory_backend_records_logins() {
    let app = App::try_new(&memory_settings(1, 2)).await.unwrap();

    assert_eq!(
        app.user_store.upsert("johnwick").await.unwrap(),
        UpsertOutcome::Inserted
    );
    assert_eq!(
        app.user_store.upsert("johnwick").await.unwrap(),
        UpsertOutcome::Updated
    );
    app.shutdown().await;
}

#[tokio::test]
async fn ambiguous_convention_is_rejected() {
    assert!(App::try_new(&memory_settings(1, 1)).await.is_err());
}

#[tokio::test]
async fn unknown_backend_is_rejected() {
    let mut settings = memory_settings(1, 2);
    settings.store.backend = "postgres".to_string();
    assert!(App::try_new(&settings).await.is_err());
}

#[tokio::test]
async fn mysql_backend_needs_its_section() {
    let mut settings = memory_settings(1, 2);
    settings.store.backend = "mysql".to_string();
    assert!(App::try_new(&settings).await.is_err());
}

#[tokio::test]
async fn migrate_needs_mysql() {
    let app = App::try_new(&memory_settings(1, 2)).await.unwrap();
    assert!(app.migrate().await.is_err());
}
