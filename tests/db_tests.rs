use deena::db::Database;
use std::collections::HashMap;
use tempfile::TempDir;
use tower_sessions::{
    session::{Id, Record},
    SessionStore,
};

async fn setup_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("sessions.db");
    let db_url = format!("sqlite:{}", db_path.display());
    let db = Database::new(&db_url).await.unwrap();
    (db, temp_dir)
}

fn record(key: &str, value: serde_json::Value) -> Record {
    Record {
        id: Id::default(),
        data: HashMap::from([(key.to_string(), value)]),
        expiry_date: time::OffsetDateTime::now_utc() + time::Duration::hours(1),
    }
}

#[tokio::test]
async fn test_database_file_is_created() {
    let (_db, temp) = setup_test_db().await;
    assert!(temp.path().join("sessions.db").exists());
}

#[tokio::test]
async fn test_session_round_trip() {
    let (db, _temp) = setup_test_db().await;
    let store = db.session_store().await.unwrap();

    let saved = record(
        "current_user",
        serde_json::json!({ "name": "Asha", "userid": "42" }),
    );
    store.save(&saved).await.unwrap();

    let loaded = store.load(&saved.id).await.unwrap().expect("session saved");
    assert_eq!(loaded.data.get("current_user"), saved.data.get("current_user"));
}

#[tokio::test]
async fn test_session_store_migration_is_idempotent() {
    let (db, _temp) = setup_test_db().await;
    db.session_store().await.unwrap();
    let store = db.session_store().await.unwrap();

    let gone = store.load(&Id::default()).await.unwrap();
    assert!(gone.is_none());
}

#[tokio::test]
async fn test_expired_session_is_not_loaded() {
    let (db, _temp) = setup_test_db().await;
    let store = db.session_store().await.unwrap();

    let mut stale = record("visitor_id", serde_json::json!("0b0c"));
    stale.expiry_date = time::OffsetDateTime::now_utc() - time::Duration::minutes(5);
    store.save(&stale).await.unwrap();

    assert!(store.load(&stale.id).await.unwrap().is_none());
}
