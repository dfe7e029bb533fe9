mod active;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use active::{ActiveQuiz, Persistence, SessionOutcome};
pub use timer::CountdownTimer;
pub use workflow::QuizService;
