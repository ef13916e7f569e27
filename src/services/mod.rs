//! Business logic services.
//!
//! Services orchestrate the storage collaborators and provide high-level
//! operations.

mod bucket;
mod outcome;

pub use bucket::BucketService;
pub use outcome::{BucketView, BucketedView, MarkReadOutcome, MarkReadScope};
