//! Category execution and results engine for martial-arts competitions
//!
//! This library runs the categories of a competition: single-elimination
//! brackets decided by scores or by manual winners, judged categories scored
//! by five judges, podium derivation, and the competition-wide medal table
//! with club ranking.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tabellone::error::AppError;
//! use tabellone::store::{ExecutionService, JsonCatalog, SqliteExecutionStore};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let catalog = JsonCatalog::load(Path::new("catalog.json")).await?;
//!     let store = SqliteExecutionStore::open(Path::new("gara.sqlite"))?;
//!     let service = ExecutionService::new(store, catalog);
//!
//!     // Start category 3 at competition 12 and enter the first result
//!     let outcome = service.start(3, 12, "K")?;
//!     let state = service.set_score(outcome.id, "r0m0", 101, 8.5)?;
//!     println!("status: {}", state.status.as_str());
//!
//!     let results = service.results(12)?;
//!     for club in results.clubs.podium() {
//!         println!("{} {}", club.club, club.points);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;
pub mod results;
pub mod store;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::AppError;
pub use models::{
    Bracket, CategoryExecutionState, ClassificationEntry, ExecutionPatch, ExecutionStatus, Match,
    Participant, ScoreSheet,
};
pub use results::CompetitionResults;
pub use store::{
    CategoryCatalog, ExecutionService, ExecutionStore, JsonCatalog, SqliteExecutionStore,
};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
