//! Domain model types (pure).
//!
//! Row indices, height ranges and the error taxonomy shared by the ledger
//! and its driver.

pub mod error;
pub mod range;
pub mod types;

// Re-export for convenience
pub use error::{AppError, InputError, ScriptError};
pub use range::HeightRange;
pub use types::RowIndex;
