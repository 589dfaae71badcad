//! User-Agent string sent to the Fedora repository.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/lsu-ub-uu/diva-storage";

/// Default User-Agent for repository requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("diva-storage/{version} (storage-adapter; +{PROJECT_UA_URL})")
}
