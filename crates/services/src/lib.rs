#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod history_service;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use catalog_service::CatalogService;
pub use error::{AppServicesError, QuizServiceError, TimerError};
pub use history_service::HistoryService;
pub use quiz_core::model::SubmitError;
pub use sessions::{ActiveQuiz, CountdownTimer, Persistence, QuizService, SessionOutcome};
