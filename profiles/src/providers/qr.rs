//! QR renderer provider trait.

use crate::error::ProfileError;
use crate::qr::{QrFormat, QrImage};
use std::future::Future;

/// An external QR code renderer.
///
/// Consumed, not implemented: the engine builds the public URL and the
/// download name, the renderer produces the image bytes.
pub trait QrRenderer: Send + Sync {
    /// Render a QR code encoding `url` in the given format.
    fn render(
        &self,
        url: &str,
        format: QrFormat,
    ) -> impl Future<Output = Result<QrImage, ProfileError>> + Send;
}
