//! Registry of award reasons.
//!
//! Every ribbon's rule doubles as an *activity*: a (code, name) pair the
//! logbook and UI refer to. The registry enforces code uniqueness; the first
//! registration under a code wins and later collisions are logged and
//! dropped.

use std::collections::BTreeMap;

/// An award reason, identified by its immutable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    code: String,
    name: String,
}

impl Activity {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display names may change after registration, codes never do.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// All known activities, keyed by code.
#[derive(Debug, Default)]
pub struct ActivityRegistry {
    activities: BTreeMap<String, Activity>,
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an activity. Returns false and keeps the existing entry if
    /// the code is already taken.
    pub fn register(&mut self, activity: Activity) -> bool {
        if self.activities.contains_key(activity.code()) {
            log::error!(
                "activity code '{}' already registered, ignoring duplicate",
                activity.code()
            );
            return false;
        }
        log::debug!("registered activity '{}' ({})", activity.name(), activity.code());
        self.activities.insert(activity.code().to_string(), activity);
        true
    }

    pub fn get(&self, code: &str) -> Option<&Activity> {
        self.activities.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.activities.contains_key(code)
    }

    /// Rename an existing activity in place.
    pub fn rename(&mut self, code: &str, name: &str) -> bool {
        match self.activities.get_mut(code) {
            Some(activity) => {
                activity.rename(name);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.activities.values()
    }
}
