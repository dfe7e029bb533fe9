use chrono::Duration;
use quiz_core::model::{
    AnswerSlot, Question, QuestionId, QuestionOption, ResultId, SessionMode, TestId, TestResult,
};
use quiz_core::scoring::score_answers;
use quiz_core::time::fixed_now;
use storage::sqlite::SqliteKeyValueStore;
use storage::{HISTORY_KEY, HISTORY_LIMIT, HistoryStore, KeyValueStore, KvHistoryStore};

async fn connect(name: &str) -> SqliteKeyValueStore {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let kv = SqliteKeyValueStore::connect(&url).await.expect("connect");
    kv.migrate().await.expect("migrate");
    kv
}

fn build_result(n: i64, answers: &[AnswerSlot]) -> TestResult {
    let questions: Vec<Question> = (1..=u32::try_from(answers.len()).unwrap())
        .map(|id| Question {
            id: QuestionId::new(id),
            text: format!("Q{id}"),
            options: vec![
                QuestionOption::new("A", "yes", true),
                QuestionOption::new("B", "no", false),
            ],
            correct_answer: "A".into(),
            explanation: String::new(),
        })
        .collect();
    let card = score_answers(&questions, answers);
    TestResult::from_scorecard(
        ResultId::generate(),
        TestId::new(format!("btr_{n}")),
        format!("Grand Test {n}"),
        SessionMode::Timed,
        &card,
        fixed_now() + Duration::minutes(n),
        120,
    )
}

#[tokio::test]
async fn sqlite_kv_is_last_write_wins() {
    let kv = connect("memdb_kv_lww").await;

    assert_eq!(kv.get("missing").await.unwrap(), None);
    kv.set("k", "first").await.unwrap();
    kv.set("k", "second").await.unwrap();
    assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("second"));

    kv.remove("k").await.unwrap();
    assert_eq!(kv.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let kv = connect("memdb_migrate_twice").await;
    kv.migrate().await.expect("second migrate");
    kv.set("k", "v").await.unwrap();
    assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn sqlite_history_round_trips_results() {
    let store = KvHistoryStore::new(connect("memdb_history_roundtrip").await);
    let result = build_result(
        1,
        &[AnswerSlot::Answered(0), AnswerSlot::Answered(1), AnswerSlot::Unanswered],
    );
    store.append(&result).await.unwrap();

    let listed = store.list().await.unwrap();
    assert_eq!(listed, vec![result]);
    assert_eq!(listed[0].score(), 3);
    assert_eq!(listed[0].max_score(), 12);
}

#[tokio::test]
async fn sqlite_history_respects_limit_and_clear() {
    let store = KvHistoryStore::new(connect("memdb_history_limit").await);
    for n in 0..105 {
        store
            .append(&build_result(n, &[AnswerSlot::Unanswered]))
            .await
            .unwrap();
    }

    let listed = store.list().await.unwrap();
    assert_eq!(listed.len(), HISTORY_LIMIT);
    assert_eq!(listed[0].test_id(), &TestId::new("btr_104"));
    assert_eq!(listed[HISTORY_LIMIT - 1].test_id(), &TestId::new("btr_5"));

    store.clear().await.unwrap();
    assert!(store.list().await.unwrap().is_empty());
    assert_eq!(store.inner().get(HISTORY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_history_tolerates_corrupt_blob() {
    let kv = connect("memdb_history_corrupt").await;
    kv.set(HISTORY_KEY, "[{\"id\": 12}]").await.unwrap();

    let store = KvHistoryStore::new(kv);
    assert!(store.list().await.unwrap().is_empty());
}
