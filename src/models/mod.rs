//! Data models stored in Firestore.

pub mod interview;
pub mod resource;
pub mod user;

pub use interview::{InterviewFeedbackRecord, InterviewPreparedness};
pub use resource::{LastRoadmap, QuizAttempt, ResourceQuizAttempt, ResourceRecord};
pub use user::User;
