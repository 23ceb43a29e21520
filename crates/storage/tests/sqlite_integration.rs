use math_core::model::{LearnerId, SessionState};
use math_core::time::fixed_now;
use storage::repository::SessionStore;
use storage::sqlite::SqliteStore;

async fn open_store() -> SqliteStore {
    SqliteStore::open("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open")
}

#[tokio::test]
async fn missing_row_loads_default_document() {
    let store = open_store().await;
    let state = store.load(LearnerId::generate()).await.unwrap();
    assert_eq!(state, SessionState::default());
}

#[tokio::test]
async fn save_is_a_full_replace() {
    let store = open_store().await;
    let learner = LearnerId::generate();

    let mut state = SessionState::default();
    state.total_stars = 4;
    state.last_active = fixed_now();
    state.multiplication.questions_attempted = 10;
    state.multiplication.questions_correct = 8;
    state.multiplication.tables_completed.insert(7);
    store.save(learner, &state).await.unwrap();

    let loaded = store.load(learner).await.unwrap();
    assert_eq!(loaded, state);

    // Second save overwrites rather than merging.
    let mut replacement = SessionState::default();
    replacement.total_stars = 1;
    replacement.last_active = fixed_now();
    store.save(learner, &replacement).await.unwrap();

    let loaded = store.load(learner).await.unwrap();
    assert_eq!(loaded.total_stars, 1);
    assert!(loaded.multiplication.tables_completed.is_empty());
}

#[tokio::test]
async fn corrupt_row_degrades_to_defaults() {
    let store = open_store().await;
    let learner = LearnerId::generate();

    sqlx::query("INSERT INTO sessions (learner_id, state, last_active) VALUES (?1, ?2, ?3)")
        .bind(learner.to_string())
        .bind("{not json at all")
        .bind(fixed_now().to_rfc3339())
        .execute(store.pool())
        .await
        .unwrap();

    let state = store.load(learner).await.unwrap();
    assert_eq!(state, SessionState::default());
}

#[tokio::test]
async fn reset_deletes_the_row() {
    let store = open_store().await;
    let learner = LearnerId::generate();

    let mut state = SessionState::default();
    state.total_stars = 9;
    state.last_active = fixed_now();
    store.save(learner, &state).await.unwrap();

    store.reset(learner).await.unwrap();
    assert_eq!(store.load(learner).await.unwrap(), SessionState::default());

    // Reset of an absent row is a no-op, not an error.
    store.reset(learner).await.unwrap();
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let store = open_store().await;
    store.migrate().await.unwrap();
    store.migrate().await.unwrap();
}
