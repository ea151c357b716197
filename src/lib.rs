//! rowledger
//!
//! Row-height ledger mapping table rows to vertical offsets on a scanned
//! page image, with user corrections redistributed over spans of rows.
//!
//! The ledger (`ledger`) is pure and total. Everything else is shell:
//! configuration, logging, and a headless command driver that stands in for
//! the table widget and the image viewer.

pub mod config;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod script;
pub mod source;
pub mod viewer;
