use serde::{Deserialize, Serialize};

use crate::domain::context::Context;

/// User defaults kept by the settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Settings {
    /// Overwrite the fields `updates` sets; leave the rest alone.
    pub fn merge(&mut self, updates: Settings) {
        if updates.author.is_some() {
            self.author = updates.author;
        }
        if updates.email.is_some() {
            self.email = updates.email;
        }
        if updates.user.is_some() {
            self.user = updates.user;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.author.is_none() && self.email.is_none() && self.user.is_none()
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("author", self.author.as_deref()),
            ("email", self.email.as_deref()),
            ("user", self.user.as_deref()),
        ]
    }

    /// Fold the settings into `context`. Unset values stay literal
    /// placeholders so a later pass can still fill them.
    pub fn apply_to(&self, context: &mut Context) {
        for (key, value) in self.entries() {
            context.insert_optional(key, value.map(str::to_string));
        }
    }
}
