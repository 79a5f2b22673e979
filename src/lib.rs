//! liftplan - Offline workout program generator with adaptive readiness
//!
//! План тренировок + шкала готовности

pub mod db;
pub mod exercises;
pub mod plan;
pub mod profile;
pub mod scoring;
pub mod state;
pub mod tui;

pub use db::Database;
pub use state::AppState;
