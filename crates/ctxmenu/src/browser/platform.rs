//! User-agent checks.

/// Body styles that make iOS Safari deliver click events to the
/// document for elements without click handlers.
pub const IOS_TAP_STYLES: [(&str, &str); 2] = [
    ("cursor", "pointer"),
    ("-webkit-tap-highlight-color", "rgba(0, 0, 0, 0)"),
];

/// Whether a user agent string looks like an iPhone, iPad or iPod.
///
/// Matches `ip` anywhere, ignoring case, which is as loose as the
/// check pages have long used for this workaround.
#[must_use]
pub fn is_ios_user_agent(user_agent: &str) -> bool {
    user_agent.to_ascii_lowercase().contains("ip")
}
