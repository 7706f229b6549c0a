//! Identity Provider Adapter
//!
//! Static bearer token table. Stands in for the hosted identity provider.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::Principal;
use crate::ports::outbound::IdentityProvider;

/// Token to principal table.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenIdentity {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenIdentity {
    /// Empty table: every token is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token.
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if no token is registered.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromIterator<(String, Principal)> for StaticTokenIdentity {
    fn from_iter<I: IntoIterator<Item = (String, Principal)>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentity {
    async fn authenticate(&self, token: &str) -> Option<Principal> {
        self.tokens.get(token).cloned()
    }
}
