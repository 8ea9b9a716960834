use serde::{Deserialize, Serialize};

pub const DEFAULT_FIRST: &str = "John";
pub const DEFAULT_LAST: &str = "Doe";
pub const DEFAULT_EMAIL: &str = "john@example.com";

/// The single contact exposed by the endpoint. All three fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub first: String,
    pub last: String,
    pub email: String,
}

impl Default for ContactRecord {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST.into(),
            last: DEFAULT_LAST.into(),
            email: DEFAULT_EMAIL.into(),
        }
    }
}

/// A partial update. `None` leaves the stored value alone, `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub first: Option<String>,
    pub last: Option<String>,
    pub email: Option<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.last.is_none() && self.email.is_none()
    }
}

impl ContactRecord {
    pub fn apply(&mut self, update: ContactUpdate) {
        if let Some(first) = update.first {
            self.first = first;
        }
        if let Some(last) = update.last {
            self.last = last;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
