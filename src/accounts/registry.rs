//! In-process account registry.

/// Authenticated clients keyed by account identifier, in registration order.
#[derive(Debug)]
pub struct AccountRegistry<C> {
    accounts: Vec<(String, C)>,
}

impl<C> Default for AccountRegistry<C> {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }
}

impl<C> AccountRegistry<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `client` under `name`.
    ///
    /// An existing entry keeps its position and its previous client is
    /// returned.
    pub fn insert(&mut self, name: impl Into<String>, client: C) -> Option<C> {
        let name = name.into();
        match self.accounts.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, client)),
            None => {
                self.accounts.push((name, client));
                None
            }
        }
    }

    /// Iterates over accounts in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &C)> {
        self.accounts
            .iter()
            .map(|(name, client)| (name.as_str(), client))
    }

    /// Account identifiers in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.accounts.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Removes every account, in registration order.
    pub fn drain(&mut self) -> impl Iterator<Item = (String, C)> + '_ {
        self.accounts.drain(..)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
