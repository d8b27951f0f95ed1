use std::collections::HashMap;
use std::fmt;

/// An API token. `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

pub trait SecretStore: Send + Sync {
    fn get(&self, label: &str) -> Option<Secret>;
}

/// Reads the secret from the environment variable named by the label.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn get(&self, label: &str) -> Option<Secret> {
        std::env::var(label)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(Secret::new)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySecretStore {
    secrets: HashMap<String, Secret>,
}

impl MemorySecretStore {
    pub fn with_secret(mut self, label: impl Into<String>, token: impl Into<String>) -> Self {
        self.secrets.insert(label.into(), Secret::new(token));
        self
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, label: &str) -> Option<Secret> {
        self.secrets.get(label).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let secret = Secret::new("token-123");
        assert_eq!(format!("{secret:?}"), "Secret(***)");
        assert_eq!(secret.expose(), "token-123");
    }

    #[test]
    fn memory_store_looks_up_by_label() {
        let store = MemorySecretStore::default().with_secret("A", "x");
        assert!(store.get("A").is_some());
        assert!(store.get("B").is_none());
    }
}
