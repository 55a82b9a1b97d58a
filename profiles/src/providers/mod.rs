//! Provider traits for external dependencies.
//!
//! All I/O is abstracted behind these traits and injected through the
//! reducer environments. Every method returns `Result<_, ProfileError>`;
//! errors never cross the boundary as panics.

mod auth;
mod data_store;
mod qr;

pub use auth::AuthProvider;
pub use data_store::DataStore;
pub use qr::QrRenderer;
