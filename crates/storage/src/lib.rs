#![forbid(unsafe_code)]

pub mod bank;
pub mod history;
pub mod import;
pub mod repository;
pub mod sqlite;

pub use bank::JsonQuestionBank;
pub use history::{HISTORY_KEY, HISTORY_LIMIT, KvHistoryStore};
pub use repository::{
    HistoryStore, InMemoryKeyValueStore, InMemoryQuestionBank, KeyValueStore, QuestionBank,
    Storage, StorageError,
};
