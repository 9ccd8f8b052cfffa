use futures_util::future::join_all;
use loginstore::application_impl::RealUserStore;
use loginstore::application_port::{UserStore, UserStoreError};
use loginstore::domain_model::{RowCountConvention, UpsertOutcome};
use loginstore::infra_memory::InMemoryUserRepo;
use std::sync::Arc;

fn memory_store() -> (Arc<InMemoryUserRepo>, RealUserStore) {
    let repo = Arc::new(InMemoryUserRepo::new(RowCountConvention::MYSQL));
    let store = RealUserStore::new(repo.clone(), RowCountConvention::MYSQL);
    (repo, store)
}

#[tokio::test]
async fn johnwick_scenario() {
    let (repo, store) = memory_store();

    assert_eq!(store.upsert("johnwick").await.unwrap(), UpsertOutcome::Inserted);
    let user = store.get("johnwick").await.unwrap().unwrap();
    assert_eq!(user.username, "johnwick");
    assert_eq!(user.login_count, 1);

    assert_eq!(store.upsert("johnwick").await.unwrap(), UpsertOutcome::Updated);
    let user = store.get("johnwick").await.unwrap().unwrap();
    assert_eq!(user.login_count, 2);

    let err = store.upsert("").await.unwrap_err();
    assert!(matches!(err, UserStoreError::WriteFailed { .. }));
    assert!(store.get("").await.unwrap().is_none());
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn repeated_logins_count_up() {
    let (repo, store) = memory_store();

    for n in 1..=5u64 {
        let outcome = store.upsert("neo").await.unwrap();
        let expected = if n == 1 {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        };
        assert_eq!(outcome, expected);
        assert_eq!(store.get("neo").await.unwrap().unwrap().login_count, n);
    }
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn usernames_are_isolated() {
    let (_repo, store) = memory_store();

    store.upsert("alice").await.unwrap();
    store.upsert("alice").await.unwrap();
    store.upsert("bob").await.unwrap();

    assert_eq!(store.get("alice").await.unwrap().unwrap().login_count, 2);
    assert_eq!(store.get("bob").await.unwrap().unwrap().login_count, 1);
}

#[tokio::test]
async fn closed_connection_fails_without_state_change() {
    let (repo, store) = memory_store();
    store.upsert("alice").await.unwrap();
    repo.close();

    let err = store.upsert("alice").await.unwrap_err();
    assert!(matches!(err, UserStoreError::WriteFailed { .. }));
    let err = store.upsert("carol").await.unwrap_err();
    assert!(matches!(err, UserStoreError::WriteFailed { .. }));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn engine_specific_update_count_is_honoured() {
    let convention = RowCountConvention::try_new(1, 3).unwrap();
    let repo = Arc::new(InMemoryUserRepo::new(convention));
    let store = RealUserStore::new(repo, convention);

    assert_eq!(store.upsert("a").await.unwrap(), UpsertOutcome::Inserted);
    assert_eq!(store.upsert("a").await.unwrap(), UpsertOutcome::Updated);
}

#[tokio::test]
async fn mismatched_convention_is_inconsistent_on_update() {
    // engine reports 2 for updates, store was configured for 3
    let repo = Arc::new(InMemoryUserRepo::new(RowCountConvention::MYSQL));
    let store = RealUserStore::new(repo, RowCountConvention::try_new(1, 3).unwrap());

    assert_eq!(store.upsert("a").await.unwrap(), UpsertOutcome::Inserted);
    match store.upsert("a").await {
        Err(UserStoreError::InconsistentOutcome { rows_affected, .. }) => {
            assert_eq!(rows_affected, 2)
        }
        other => panic!("expected InconsistentOutcome, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_logins_insert_once() {
    let (repo, store) = memory_store();
    let store = Arc::new(store);

    let handles = (0..64).map(|_| {
        let store = store.clone();
        tokio::spawn(async move { store.upsert("smith").await })
    });
    let outcomes: Vec<UpsertOutcome> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let inserts = outcomes
        .iter()
        .filter(|o| **o == UpsertOutcome::Inserted)
        .count();
    assert_eq!(inserts, 1);
    assert_eq!(store.get("smith").await.unwrap().unwrap().login_count, 64);
    assert_eq!(repo.len(), 1);
}
