//! Which stored token gets attached to outgoing requests
//!
//! The pipeline asks a [`CredentialPolicy`] for a bearer token before every
//! authenticated request. The policy is an ordered list of named providers;
//! the first provider that finds a non-empty token wins.

use crate::storage::{StorageArea, Storages, keys};

/// One place a bearer token may be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialProvider {
    pub name: &'static str,
    pub area: StorageArea,
    pub key: &'static str,
}

impl CredentialProvider {
    pub const fn new(name: &'static str, area: StorageArea, key: &'static str) -> Self {
        Self { name, area, key }
    }

    pub fn lookup(&self, storages: &Storages) -> Option<String> {
        storages.get(self.area, self.key)
    }
}

/// Token found by a policy, tagged with the provider that supplied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub provider: &'static str,
    pub token: String,
}

/// Ordered list of credential providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialPolicy {
    providers: Vec<CredentialProvider>,
}

impl CredentialPolicy {
    pub const PATIENT: CredentialProvider =
        CredentialProvider::new("patient", StorageArea::Durable, keys::ACCESS_TOKEN);
    pub const HOSPITAL: CredentialProvider =
        CredentialProvider::new("hospital", StorageArea::Durable, keys::HOSPITAL_ACCESS_TOKEN);
    pub const PATIENT_SESSION: CredentialProvider =
        CredentialProvider::new("patient-session", StorageArea::Session, keys::ACCESS_TOKEN);
    pub const HOSPITAL_SESSION: CredentialProvider = CredentialProvider::new(
        "hospital-session",
        StorageArea::Session,
        keys::HOSPITAL_ACCESS_TOKEN,
    );

    pub fn new(providers: Vec<CredentialProvider>) -> Self {
        Self { providers }
    }

    /// Policy with no providers; every request goes out unauthenticated
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Append a provider with the lowest priority so far
    pub fn with_provider(mut self, provider: CredentialProvider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn providers(&self) -> &[CredentialProvider] {
        &self.providers
    }

    pub fn resolve(&self, storages: &Storages) -> Option<ResolvedCredential> {
        self.providers.iter().find_map(|provider| {
            provider.lookup(storages).map(|token| ResolvedCredential {
                provider: provider.name,
                token,
            })
        })
    }
}

impl Default for CredentialPolicy {
    /// Durable patient token, then durable hospital token, then the
    /// session-scoped patient token. Hospital tokens are never looked up in
    /// session storage; add [`CredentialPolicy::HOSPITAL_SESSION`] to opt in.
    fn default() -> Self {
        Self::new(vec![Self::PATIENT, Self::HOSPITAL, Self::PATIENT_SESSION])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storages_with(entries: &[(StorageArea, &str, &str)]) -> Storages {
        let storages = Storages::in_memory();
        for (area, key, value) in entries {
            storages.set(*area, key, value).unwrap();
        }
        storages
    }

    #[test]
    fn durable_patient_token_wins() {
        let storages = storages_with(&[
            (StorageArea::Durable, keys::ACCESS_TOKEN, "patient"),
            (StorageArea::Durable, keys::HOSPITAL_ACCESS_TOKEN, "hospital"),
            (StorageArea::Session, keys::ACCESS_TOKEN, "session"),
        ]);
        let resolved = CredentialPolicy::default().resolve(&storages).unwrap();
        assert_eq!(resolved.provider, "patient");
        assert_eq!(resolved.token, "patient");
    }

    #[test]
    fn hospital_token_beats_session_patient_token() {
        let storages = storages_with(&[
            (StorageArea::Durable, keys::HOSPITAL_ACCESS_TOKEN, "hospital"),
            (StorageArea::Session, keys::ACCESS_TOKEN, "session"),
        ]);
        let resolved = CredentialPolicy::default().resolve(&storages).unwrap();
        assert_eq!(resolved.provider, "hospital");
    }

    #[test]
    fn session_hospital_token_is_ignored_by_default() {
        let storages = storages_with(&[(
            StorageArea::Session,
            keys::HOSPITAL_ACCESS_TOKEN,
            "hospital",
        )]);
        assert_eq!(CredentialPolicy::default().resolve(&storages), None);

        let opted_in = CredentialPolicy::default().with_provider(CredentialPolicy::HOSPITAL_SESSION);
        assert_eq!(
            opted_in.resolve(&storages).map(|c| c.provider),
            Some("hospital-session")
        );
    }

    #[test]
    fn empty_policy_never_resolves() {
        let storages = storages_with(&[(StorageArea::Durable, keys::ACCESS_TOKEN, "A")]);
        assert_eq!(CredentialPolicy::empty().resolve(&storages), None);
    }
}
