/// Machine descriptors in registration order, with title and id lookups
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::machine::descriptor::MachineDescriptor;
use crate::utils::{clean_title, fuzzy_key, normalize_item_id};

#[derive(Debug, Clone)]
struct TitleKey {
    cleaned: String,
    fuzzy: String,
}

#[derive(Debug, Default)]
pub struct MachineRegistry {
    machines: Vec<MachineDescriptor>,
    title_keys: Vec<Option<TitleKey>>,
    by_id: HashMap<String, usize>,
}

impl MachineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_machines<I: IntoIterator<Item = MachineDescriptor>>(machines: I) -> Self {
        let mut registry = Self::new();
        for machine in machines {
            registry.register(machine);
        }
        registry
    }

    /// Register a machine. A machine with the same id is replaced in place.
    pub fn register(&mut self, machine: MachineDescriptor) {
        let key = normalize_item_id(machine.id());
        let title_key = machine.inventory_title().and_then(|title| {
            let cleaned = clean_title(title);
            if cleaned.is_empty() {
                None
            } else {
                Some(TitleKey {
                    fuzzy: fuzzy_key(&cleaned),
                    cleaned,
                })
            }
        });

        match self.by_id.get(&key) {
            Some(&position) => {
                debug!("Replacing machine {}", key);
                self.machines[position] = machine;
                self.title_keys[position] = title_key;
            }
            None => {
                self.by_id.insert(key, self.machines.len());
                self.machines.push(machine);
                self.title_keys.push(title_key);
            }
        }
    }

    pub fn resolve_by_id(&self, id: &str) -> Option<&MachineDescriptor> {
        self.by_id
            .get(&normalize_item_id(id))
            .and_then(|&position| self.machines.get(position))
    }

    /// Resolve a container title.
    ///
    /// Tiers, first hit wins: exact cleaned title, alphanumeric lower-case
    /// match, then containment in either direction. Within a tier the
    /// earliest registered machine wins.
    pub fn resolve_by_title(&self, title: &str) -> Option<&MachineDescriptor> {
        let cleaned = clean_title(title);
        if cleaned.is_empty() {
            return None;
        }

        if let Some(machine) = self.first_matching(|key| key.cleaned == cleaned) {
            debug!("Exact title match '{}' -> {}", cleaned, machine.id());
            return Some(machine);
        }

        let fuzzy = fuzzy_key(&cleaned);
        if !fuzzy.is_empty() {
            if let Some(machine) = self.first_matching(|key| key.fuzzy == fuzzy) {
                debug!("Fuzzy title match '{}' -> {}", cleaned, machine.id());
                return Some(machine);
            }
        }

        if let Some(machine) = self.first_matching(|key| {
            cleaned.contains(key.cleaned.as_str()) || key.cleaned.contains(cleaned.as_str())
        }) {
            debug!("Containment title match '{}' -> {}", cleaned, machine.id());
            return Some(machine);
        }

        warn!("No machine registered for title '{}'", cleaned);
        None
    }

    fn first_matching<F>(&self, predicate: F) -> Option<&MachineDescriptor>
    where
        F: Fn(&TitleKey) -> bool,
    {
        self.title_keys
            .iter()
            .position(|key| key.as_ref().is_some_and(&predicate))
            .and_then(|position| self.machines.get(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MachineDescriptor> {
        self.machines.iter()
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}
