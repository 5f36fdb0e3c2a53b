use serde::Deserialize;

/// A domain to monitor, as listed in the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainEntry {
    /// Display name used in alerts
    pub name: String,
    /// Hostname to connect to (no scheme, no port)
    pub url: String,
    /// Who to reach when the check fails
    pub contact: String,
}

impl DomainEntry {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            contact: contact.into(),
        }
    }
}
