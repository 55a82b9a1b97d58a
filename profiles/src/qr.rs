//! QR code export for public profile pages.

use crate::error::ProfileError;
use crate::providers::QrRenderer;
use serde::{Deserialize, Serialize};

/// Output format for a rendered QR code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QrFormat {
    /// Raster image
    Png,
    /// Vector image
    Svg,
}

impl QrFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// A rendered QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrImage {
    /// The format the bytes are in
    pub format: QrFormat,
    /// Encoded image bytes
    pub bytes: Vec<u8>,
}

/// A QR image together with its download filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrDownload {
    /// Suggested filename (`{slug}-qr.{ext}`)
    pub filename: String,
    /// The rendered image
    pub image: QrImage,
}

/// Render the QR code for a profile's public page.
///
/// Builds `{origin}/p/{slug}` and names the download `{slug}-qr.{ext}`.
///
/// # Errors
///
/// Renderer failures surface as [`ProfileError::QrExport`]; they never fail
/// the surrounding workflow.
pub async fn export_profile_qr<Q: QrRenderer>(
    renderer: &Q,
    origin: &str,
    slug: &str,
    format: QrFormat,
) -> Result<QrDownload, ProfileError> {
    let url = format!("{origin}/p/{slug}");

    let image = renderer
        .render(&url, format)
        .await
        .map_err(|error| ProfileError::QrExport {
            message: error.to_string(),
        })?;

    tracing::debug!(%slug, format = ?format, "rendered profile QR code");

    Ok(QrDownload {
        filename: format!("{slug}-qr.{}", format.extension()),
        image,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::mocks::MockQrRenderer;

    #[tokio::test]
    async fn names_the_download_after_the_slug() {
        let renderer = MockQrRenderer::new();

        let download = export_profile_qr(&renderer, "https://linkfol.io", "ana-perez", QrFormat::Png)
            .await
            .unwrap();

        assert_eq!(download.filename, "ana-perez-qr.png");
        assert_eq!(download.image.format, QrFormat::Png);
        assert!(!download.image.bytes.is_empty());
    }

    #[tokio::test]
    async fn renderer_failure_surfaces_as_qr_export() {
        let renderer = MockQrRenderer::new();
        renderer.fail_next();

        let result =
            export_profile_qr(&renderer, "https://linkfol.io", "ana-perez", QrFormat::Svg).await;

        assert!(matches!(result, Err(ProfileError::QrExport { .. })));
    }
}
