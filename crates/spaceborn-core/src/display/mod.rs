//! Display formatting for dashboard models and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation outcomes are wrapped in newtypes so the same
//! data can be framed differently in lists, creations and deletions. All
//! output is markdown, rendered by the CLI's terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │  Collections &  │    │   Markdown      │
//! │ (Topic, Task..) │───▶│  Result Types   │───▶│    Output       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (Topics, Subtopics, Tasks, ...)
//! - [`results`]: Operation result types (CreateResult, UpdateResult, DeleteResult)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//!
//! ## Usage
//!
//! ```rust
//! use spaceborn_core::display::{OperationStatus, Topics};
//!
//! let topics = Topics(vec![]);
//! assert_eq!(topics.to_string(), "No topics found.\n");
//!
//! let status = OperationStatus::success("Recomputed 3 topics".to_string());
//! assert!(status.to_string().starts_with("Success:"));
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{Groups, Resources, Subtopics, Tasks, Topics};
pub use datetime::LocalDateTime;
pub use models::ProgressBar;
pub use results::{CreateResult, DeleteResult, Labeled, UpdateResult};
pub use status::OperationStatus;
