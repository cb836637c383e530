//! Boot-time installers.

use magic_core::MagicResult;
use std::fmt;

/// Boot priority. Higher runs first.
///
/// `Dispatcher` orders above every integer level and is reserved for the
/// dispatcher bootstrap, which creates the registries every other installer
/// registers into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Level(i32),
    Dispatcher,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Level(0)
    }
}

impl From<i32> for Priority {
    fn from(level: i32) -> Self {
        Priority::Level(level)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Level(level) => write!(f, "{}", level),
            Priority::Dispatcher => write!(f, "dispatcher"),
        }
    }
}

/// A behavior's boot procedure for host type `H`.
///
/// Installers are deduplicated by `id`, so a behavior composed more than
/// once still boots once.
pub struct Installer<H> {
    pub id: &'static str,
    pub priority: Priority,
    pub run: fn(&mut H) -> MagicResult<()>,
}

impl<H> Installer<H> {
    pub fn new(id: &'static str, run: fn(&mut H) -> MagicResult<()>) -> Self {
        Self {
            id,
            priority: Priority::default(),
            run,
        }
    }

    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }
}

impl<H> Clone for Installer<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for Installer<H> {}

impl<H> fmt::Debug for Installer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Installer")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish()
    }
}
