//! One level of the command tree: name and alias lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::spec::{Command, CommandEntry};
use crate::error::RegistrationError;

/// Maps command names and aliases to commands at one nesting level.
///
/// An alias key shares the command node with its canonical name. Alias
/// uniqueness is checked against this level only; the same alias may exist
/// under different parents.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<String, Arc<Command>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` under `name` plus its aliases.
    ///
    /// Re-registering a name replaces the previous command and drops its
    /// aliases. On error the registry is left unchanged.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entry: impl Into<CommandEntry>,
    ) -> Result<Arc<Command>, RegistrationError> {
        let name = name.into();
        let command = Arc::new(Command::from_entry(&name, entry.into())?);

        let replaced = self
            .entries
            .get(&name)
            .filter(|existing| existing.name() == name)
            .cloned();
        let mut taken: Vec<&str> = vec![name.as_str()];
        for alias in command.aliases() {
            let collides = taken.contains(&alias.as_str())
                || self
                    .entries
                    .get(alias)
                    .is_some_and(|existing| !is_same(&replaced, existing));
            if collides {
                return Err(RegistrationError::DuplicateAlias {
                    command: name.clone(),
                    alias: alias.clone(),
                });
            }
            taken.push(alias);
        }

        if self.entries.contains_key(&name) {
            self.remove(&name);
        }
        for alias in command.aliases() {
            self.entries.insert(alias.clone(), Arc::clone(&command));
        }
        self.entries.insert(name, Arc::clone(&command));
        Ok(command)
    }

    /// Remove a key. Removing a canonical name also removes the command's
    /// aliases; removing an alias removes only that alias.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(command) = self.entries.get(name).cloned() else {
            return false;
        };

        if command.name() == name {
            self.entries
                .retain(|_, existing| !Arc::ptr_eq(existing, &command));
        } else {
            self.entries.remove(name);
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Command>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Every key, aliases included, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Commands under their canonical names, aliases skipped.
    pub fn commands(&self) -> impl Iterator<Item = &Arc<Command>> {
        self.entries
            .iter()
            .filter(|(key, command)| command.name() == key.as_str())
            .map(|(_, command)| command)
    }

    /// Declared aliases of `command` that still resolve to it here. An alias
    /// removed on its own, or taken over by another command, is left out.
    pub fn aliases_of<'a>(&'a self, command: &'a Arc<Command>) -> Vec<&'a str> {
        command
            .aliases()
            .iter()
            .filter(|alias| {
                self.entries
                    .get(alias.as_str())
                    .is_some_and(|existing| Arc::ptr_eq(existing, command))
            })
            .map(String::as_str)
            .collect()
    }

    /// Number of distinct commands (aliases not counted).
    pub fn command_count(&self) -> usize {
        self.commands().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_same(replaced: &Option<Arc<Command>>, existing: &Arc<Command>) -> bool {
    replaced
        .as_ref()
        .is_some_and(|old| Arc::ptr_eq(old, existing))
}
