//! Link formatter and link type registry.
//!
//! The registry is a static catalogue of the link kinds the editor offers,
//! each with a display label, a base URL for bare social handles, a
//! `needs_name` hint (whether the UI must ask for a title), and an input
//! placeholder. Lookups never fail: unknown tags fall back to the custom
//! entry.
//!
//! [`format_url`] normalizes raw user input into a canonical URL per kind;
//! an empty result means the input is unformattable and callers treat it as
//! a validation failure. Formatting is idempotent per kind: re-formatting
//! canonical output is a no-op.

use serde::{Deserialize, Serialize};

/// The kind of a profile link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    /// A plain website
    Website,
    /// Facebook profile
    Facebook,
    /// Instagram profile
    Instagram,
    /// Twitter profile
    Twitter,
    /// LinkedIn profile
    Linkedin,
    /// YouTube channel
    Youtube,
    /// WhatsApp number
    Whatsapp,
    /// Email address
    Email,
    /// Phone number
    Phone,
    /// Anything else
    Custom,
}

impl LinkKind {
    /// The wire tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Linkedin => "linkedin",
            Self::Youtube => "youtube",
            Self::Whatsapp => "whatsapp",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registry entry describing one link kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkType {
    /// The kind this entry describes
    pub kind: LinkKind,
    /// Display label, also the default title for links that don't need one
    pub label: &'static str,
    /// Base URL prepended to bare handles; empty when not applicable
    pub base_url: &'static str,
    /// Whether the UI must ask for a title
    pub needs_name: bool,
    /// Input placeholder
    pub placeholder: &'static str,
}

/// The full catalogue, in display order.
pub static ALL_LINK_TYPES: &[LinkType] = &[
    LinkType {
        kind: LinkKind::Website,
        label: "Website",
        base_url: "",
        needs_name: true,
        placeholder: "https://yoursite.com",
    },
    LinkType {
        kind: LinkKind::Facebook,
        label: "Facebook",
        base_url: "https://facebook.com/",
        needs_name: false,
        placeholder: "facebook.com/yourUser",
    },
    LinkType {
        kind: LinkKind::Instagram,
        label: "Instagram",
        base_url: "https://instagram.com/",
        needs_name: false,
        placeholder: "instagram.com/yourUser",
    },
    LinkType {
        kind: LinkKind::Twitter,
        label: "Twitter",
        base_url: "https://twitter.com/",
        needs_name: false,
        placeholder: "twitter.com/yourUser",
    },
    LinkType {
        kind: LinkKind::Linkedin,
        label: "LinkedIn",
        base_url: "https://linkedin.com/in/",
        needs_name: false,
        placeholder: "linkedin.com/in/yourProfile",
    },
    LinkType {
        kind: LinkKind::Youtube,
        label: "YouTube",
        base_url: "https://youtube.com/c/",
        needs_name: false,
        placeholder: "youtube.com/c/yourChannel",
    },
    LinkType {
        kind: LinkKind::Whatsapp,
        label: "WhatsApp",
        base_url: "https://wa.me/",
        needs_name: false,
        placeholder: "number with country code",
    },
    LinkType {
        kind: LinkKind::Email,
        label: "Email",
        base_url: "mailto:",
        needs_name: false,
        placeholder: "you@email.com",
    },
    LinkType {
        kind: LinkKind::Phone,
        label: "Phone",
        base_url: "tel:",
        needs_name: false,
        placeholder: "+541112345678",
    },
    LinkType {
        kind: LinkKind::Custom,
        label: "Custom",
        base_url: "",
        needs_name: true,
        placeholder: "https://example.com",
    },
];

/// Kinds shown as primary buttons in the editor.
pub static MAIN_KINDS: &[LinkKind] = &[
    LinkKind::Website,
    LinkKind::Instagram,
    LinkKind::Facebook,
    LinkKind::Whatsapp,
    LinkKind::Email,
];

/// Look up the registry entry for a kind. Never fails.
#[must_use]
pub fn link_type(kind: LinkKind) -> &'static LinkType {
    ALL_LINK_TYPES
        .iter()
        .find(|t| t.kind == kind)
        .unwrap_or(&ALL_LINK_TYPES[ALL_LINK_TYPES.len() - 1])
}

/// Look up the registry entry for a wire tag.
///
/// Unknown tags fall back to the custom entry, so the lookup never fails.
#[must_use]
pub fn link_type_for_tag(tag: &str) -> &'static LinkType {
    ALL_LINK_TYPES
        .iter()
        .find(|t| t.kind.as_str() == tag)
        .unwrap_or(&ALL_LINK_TYPES[ALL_LINK_TYPES.len() - 1])
}

/// The kinds not in [`MAIN_KINDS`], in catalogue order.
pub fn other_kinds() -> impl Iterator<Item = LinkKind> {
    ALL_LINK_TYPES
        .iter()
        .map(|t| t.kind)
        .filter(|k| !MAIN_KINDS.contains(k))
}

/// Prepend the registry base URL to a bare social handle.
///
/// Strips a leading `@` and any whitespace; input that already carries a
/// scheme (`http`, `mailto:`, `tel:`) or the base URL itself passes through
/// untouched.
#[must_use]
pub fn format_social_url(kind: LinkKind, raw: &str) -> String {
    let entry = link_type(kind);

    if entry.base_url.is_empty() || raw.starts_with(entry.base_url) {
        return raw.to_string();
    }

    if raw.starts_with("http") || raw.starts_with("mailto:") || raw.starts_with("tel:") {
        return raw.to_string();
    }

    let clean: String = raw
        .trim_start_matches('@')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if clean.is_empty() {
        raw.to_string()
    } else {
        format!("{}{clean}", entry.base_url)
    }
}

/// Normalize raw link input into a canonical URL.
///
/// An explicit kind selects its rule directly; without one (or for the
/// social kinds, which have no dedicated rule) the input content is sniffed
/// in a fixed order: email address, phone number, WhatsApp URL, bare number,
/// schemed URL, bare host.
///
/// Returns an empty string for empty input; callers treat that as a
/// validation failure.
#[must_use]
pub fn format_url(raw: &str, kind: Option<LinkKind>) -> String {
    let url = raw.trim();
    if url.is_empty() {
        return String::new();
    }

    match kind {
        Some(LinkKind::Email) => {
            format!("mailto:{}", url.trim_start_matches("mailto:"))
        }
        Some(LinkKind::Whatsapp) => {
            let digits: String = url.chars().filter(char::is_ascii_digit).collect();
            format!("https://wa.me/{digits}")
        }
        Some(LinkKind::Phone) => {
            let number: String = url
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();
            format!("tel:{number}")
        }
        Some(LinkKind::Website) => {
            if has_http_scheme(url) {
                url.to_string()
            } else {
                format!("https://{url}")
            }
        }
        _ => sniff(url),
    }
}

/// Content sniffing for untagged input, in a fixed order.
///
/// Canonical `tel:` output would otherwise fall through to the bare-host
/// branch and gain an `https://` prefix on the next save, so already-schemed
/// input passes through first.
fn sniff(url: &str) -> String {
    if url.starts_with("mailto:") || url.starts_with("tel:") {
        return url.to_string();
    }

    // Email address
    if url.contains('@') {
        return format!("mailto:{}", url.trim_start_matches("mailto:"));
    }

    // Phone number: leading digit or '+', then digits and phone punctuation
    if looks_like_phone(url) {
        let number: String = url
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        return format!("tel:{number}");
    }

    // Already a WhatsApp URL
    if is_whatsapp_url(url) {
        return url.to_string();
    }

    // Bare number (digits, spaces, dashes, parens): assume WhatsApp
    if url.chars().all(|c| {
        c.is_ascii_digit() || c.is_whitespace() || c == '-' || c == '(' || c == ')'
    }) {
        let digits: String = url.chars().filter(char::is_ascii_digit).collect();
        return format!("https://wa.me/{digits}");
    }

    // Already schemed
    if has_http_scheme(url) {
        return url.to_string();
    }

    // Assume bare host
    format!("https://{url}")
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn looks_like_phone(url: &str) -> bool {
    let mut chars = url.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_digit() || first == '+') {
        return false;
    }
    let mut rest = 0usize;
    for c in chars {
        if !(c.is_ascii_digit() || c.is_whitespace() || c == '-' || c == '(' || c == ')') {
            return false;
        }
        rest += 1;
    }
    rest > 0
}

fn is_whatsapp_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    for scheme in ["http://", "https://"] {
        if let Some(rest) = lower.strip_prefix(scheme) {
            if let Some(path) = rest.strip_prefix("wa.me/") {
                return !path.is_empty();
            }
            if let Some(query) = rest.strip_prefix("api.whatsapp.com/send?") {
                return !query.is_empty();
            }
        }
    }
    false
}
