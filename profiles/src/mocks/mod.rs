//! In-memory provider implementations for tests.
//!
//! [`MemoryDataStore`] is the reference implementation of the
//! [`crate::providers::DataStore`] contract; the others back the account
//! and QR flows. All are `Arc`-shared and safe for concurrent use.

mod auth;
mod data_store;
mod qr;

pub use auth::MemoryAuthProvider;
pub use data_store::MemoryDataStore;
pub use qr::MockQrRenderer;
