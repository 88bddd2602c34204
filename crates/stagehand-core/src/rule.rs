//! Rules and the keyed rule book that owns them

use crate::{Action, RuleId, Trigger, TriggerKey};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An immutable (trigger, action) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    id: RuleId,
    trigger: Trigger,
    action: Action,
}

impl Rule {
    /// Create a rule; its id is assigned by the rule book it is added to
    pub fn new(trigger: Trigger, action: Action) -> Self {
        Self {
            id: RuleId::default(),
            trigger,
            action,
        }
    }

    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The key this rule is stored under
    pub fn key(&self) -> TriggerKey {
        self.trigger.key()
    }
}

/// Rules grouped by trigger key, in insertion order within each key
///
/// Every rule stored under a key has a trigger classifying to that key.
/// Serialized as a flat list of rules; the grouping is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Rule>", into = "Vec<Rule>")]
pub struct RuleBook {
    rules: IndexMap<TriggerKey, Vec<Rule>>,
    next_id: u64,
}

impl RuleBook {
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
            next_id: 1,
        }
    }

    /// Add a rule under its trigger's key, assigning a fresh id
    pub fn add(&mut self, mut rule: Rule) -> RuleId {
        rule.id = self.allocate_id();
        let id = rule.id;
        self.rules.entry(rule.key()).or_default().push(rule);
        id
    }

    /// Rules stored under `key`, in order
    pub fn rules_for(&self, key: &TriggerKey) -> &[Rule] {
        self.rules.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &TriggerKey) -> bool {
        self.rules.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &TriggerKey> {
        self.rules.keys()
    }

    /// All rules, grouped by key
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values().flatten()
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.iter().find(|rule| rule.id == id)
    }

    /// Remove one rule, dropping its key when it was the last one
    pub fn remove(&mut self, id: RuleId) -> Option<Rule> {
        let (key, index) = self.rules.iter().find_map(|(key, rules)| {
            rules
                .iter()
                .position(|rule| rule.id == id)
                .map(|index| (key.clone(), index))
        })?;
        let list = self.rules.get_mut(&key)?;
        let rule = list.remove(index);
        if list.is_empty() {
            self.rules.shift_remove(&key);
        }
        Some(rule)
    }

    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Drop every rule; ids keep counting from where they were
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Next free id; `u64::MAX` is never handed out and the counter wraps
    /// round to the lowest free id once it runs out
    fn allocate_id(&mut self) -> RuleId {
        let mut raw = self.next_id;
        while raw == 0 || raw == u64::MAX || self.get(RuleId::new(raw)).is_some() {
            raw = raw.wrapping_add(1);
        }
        self.next_id = raw + 1;
        RuleId::new(raw)
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<Rule>> for RuleBook {
    /// Keeps stored ids; rules without one (or with a repeated or out of
    /// range one) get a fresh id
    fn from(rules: Vec<Rule>) -> Self {
        let mut book = RuleBook::new();
        book.next_id = rules
            .iter()
            .map(|rule| rule.id.raw())
            .filter(|raw| *raw != u64::MAX)
            .max()
            .unwrap_or(0)
            + 1;
        let mut seen = std::collections::HashSet::new();
        for mut rule in rules {
            if rule.id.raw() == 0 || rule.id.raw() == u64::MAX || !seen.insert(rule.id) {
                rule.id = book.allocate_id();
                seen.insert(rule.id);
            }
            book.rules.entry(rule.key()).or_default().push(rule);
        }
        book
    }
}

impl From<RuleBook> for Vec<Rule> {
    fn from(book: RuleBook) -> Self {
        book.rules.into_values().flatten().collect()
    }
}
