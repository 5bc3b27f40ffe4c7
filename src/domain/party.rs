use serde::{Deserialize, Serialize};

use crate::domain::transaction::PartyRole;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Party {
    pub name: String,
    pub role: PartyRole,
}

impl Party {
    pub fn new(name: impl Into<String>, role: PartyRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Two independent, insertion-ordered name sets. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartyRegistry {
    #[serde(default)]
    clients: Vec<String>,
    #[serde(default)]
    suppliers: Vec<String>,
}

impl PartyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(clients: Vec<String>, suppliers: Vec<String>) -> Self {
        let mut registry = Self::new();
        registry.replace(PartyRole::Client, clients);
        registry.replace(PartyRole::Supplier, suppliers);
        registry
    }

    pub fn names(&self, role: PartyRole) -> &[String] {
        match role {
            PartyRole::Client => &self.clients,
            PartyRole::Supplier => &self.suppliers,
        }
    }

    pub fn parties(&self, role: PartyRole) -> Vec<Party> {
        self.names(role)
            .iter()
            .map(|name| Party::new(name.clone(), role))
            .collect()
    }

    pub fn contains(&self, role: PartyRole, name: &str) -> bool {
        self.names(role).iter().any(|existing| existing == name)
    }

    /// Appends `name` when absent. Returns whether the registry changed.
    pub fn register(&mut self, role: PartyRole, name: &str) -> bool {
        if name.trim().is_empty() || self.contains(role, name) {
            return false;
        }
        self.names_mut(role).push(name.to_string());
        true
    }

    /// Drops `name` from the picker list. Returns whether the registry changed.
    pub fn remove(&mut self, role: PartyRole, name: &str) -> bool {
        let names = self.names_mut(role);
        let before = names.len();
        names.retain(|existing| existing != name);
        names.len() != before
    }

    /// Replaces a whole list: entries are trimmed, blanks dropped and repeats collapsed.
    pub fn replace<I, S>(&mut self, role: PartyRole, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaned: Vec<String> = Vec::new();
        for name in names {
            let trimmed = name.as_ref().trim();
            if !trimmed.is_empty() && !cleaned.iter().any(|existing| existing == trimmed) {
                cleaned.push(trimmed.to_string());
            }
        }
        *self.names_mut(role) = cleaned;
    }

    fn names_mut(&mut self, role: PartyRole) -> &mut Vec<String> {
        match role {
            PartyRole::Client => &mut self.clients,
            PartyRole::Supplier => &mut self.suppliers,
        }
    }
}
