//! Configuration for the editor workflow.

use std::time::Duration;

/// Tunable settings for an editor session.
///
/// # Example
///
/// ```
/// use linkfolio_profiles::config::EditorConfig;
/// use std::time::Duration;
///
/// let config = EditorConfig::default()
///     .with_slug_check_debounce(Duration::from_millis(250))
///     .with_public_origin("https://linkfol.io");
/// ```
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Quiet period before the slug availability check fires.
    ///
    /// Each new slug input within the window supersedes the pending check.
    pub slug_check_debounce: Duration,

    /// Origin used to build public profile URLs (`{origin}/p/{slug}`).
    pub public_origin: String,
}

impl EditorConfig {
    /// Set the slug check debounce window.
    #[must_use]
    pub const fn with_slug_check_debounce(mut self, debounce: Duration) -> Self {
        self.slug_check_debounce = debounce;
        self
    }

    /// Set the public origin.
    #[must_use]
    pub fn with_public_origin(mut self, origin: impl Into<String>) -> Self {
        self.public_origin = origin.into();
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            slug_check_debounce: Duration::from_millis(500),
            public_origin: "http://localhost:3000".to_string(),
        }
    }
}
