//! Mock QR renderer.

use crate::error::ProfileError;
use crate::providers::QrRenderer;
use crate::qr::{QrFormat, QrImage};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Deterministic [`QrRenderer`] for tests.
///
/// "Renders" the URL bytes themselves, which makes assertions trivial.
#[derive(Clone, Default)]
pub struct MockQrRenderer {
    fail_next: Arc<AtomicBool>,
}

impl MockQrRenderer {
    /// Create a renderer that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `render` call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl QrRenderer for MockQrRenderer {
    async fn render(&self, url: &str, format: QrFormat) -> Result<QrImage, ProfileError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ProfileError::backend("injected renderer failure"));
        }

        Ok(QrImage {
            format,
            bytes: url.as_bytes().to_vec(),
        })
    }
}
