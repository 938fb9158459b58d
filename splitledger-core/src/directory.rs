//! Name to ledger-id resolution for the current user and their friends.
//!
//! The directory is rebuilt from a fresh roster on every operation and never
//! outlives it. Names are not unique: when two people share a name, the one
//! enumerated last wins (the current user is inserted first, then friends in
//! roster order). Callers who need an exact person can write `id:<number>`
//! instead of a name.

use std::collections::{HashMap, HashSet};

use crate::models::{Friend, LedgerId, Person};

/// Prefix for participant tokens that address a person by ledger id.
pub const ID_PREFIX: &str = "id:";

/// Transient name → identifier map.
#[derive(Debug, Clone, Default)]
pub struct IdentityDirectory {
    by_name: HashMap<String, LedgerId>,
    known_ids: HashSet<LedgerId>,
}

impl IdentityDirectory {
    /// Builds the directory from the current user and the friend roster.
    pub fn build(me: &Person, friends: &[Friend]) -> Self {
        let mut directory = Self::default();
        directory.insert(me);
        for friend in friends {
            directory.insert(&friend.person);
        }
        directory
    }

    /// Indexes a person under their display name and, if different, their first name.
    pub fn insert(&mut self, person: &Person) {
        let display = person.display_name();
        if display != person.first_name {
            self.by_name.insert(person.first_name.clone(), person.id);
        }
        self.by_name.insert(display, person.id);
        self.known_ids.insert(person.id);
    }

    /// Resolves one participant token to a ledger id.
    pub fn lookup(&self, token: &str) -> Option<LedgerId> {
        if let Some(raw_id) = token.strip_prefix(ID_PREFIX) {
            return raw_id
                .trim()
                .parse::<LedgerId>()
                .ok()
                .filter(|id| self.known_ids.contains(id));
        }
        self.by_name.get(token).copied()
    }

    /// Resolves every name that has a match; unmatched names are left out.
    pub fn resolve<'a, I>(&self, names: I) -> HashMap<String, LedgerId>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.lookup(name).map(|id| (name.to_string(), id)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.known_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known_ids.is_empty()
    }
}
