//! Process classification into parent and child roles.
//!
//! A [`ClassificationPredicate`] pairs the path filter, which decides whether a
//! process belongs to the application at all, with the parent filter, which
//! picks the root process out of the matched set by its command line.

use serde::Serialize;
use std::fmt;

use crate::matcher::Matcher;

/// Boxed string predicate.
pub type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Role of a matched process within the application's process tree.
///
/// This is not the OS parent/child relationship; it is whatever the parent
/// filter says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Counted by RSS.
    Parent,
    /// Counted by USS.
    Child,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Parent => write!(f, "parent"),
            Role::Child => write!(f, "child"),
        }
    }
}

/// Caller-supplied pair of predicates. The sampler never looks inside them.
pub struct ClassificationPredicate {
    path_filter: Predicate,
    parent_filter: Predicate,
}

impl ClassificationPredicate {
    pub fn new<P, Q>(path_filter: P, parent_filter: Q) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
        Q: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            path_filter: Box::new(path_filter),
            parent_filter: Box::new(parent_filter),
        }
    }

    pub fn from_matchers(path_filter: Matcher, parent_filter: Matcher) -> Self {
        Self::new(
            move |exe| path_filter.matches(exe),
            move |cmdline| parent_filter.matches(cmdline),
        )
    }

    /// Whether the executable path belongs to the application under test.
    pub fn matches_path(&self, exe: &str) -> bool {
        (self.path_filter)(exe)
    }

    /// Role of a matched process, decided from its resolved command line.
    pub fn classify(&self, cmdline: &str) -> Role {
        if (self.parent_filter)(cmdline) {
            Role::Parent
        } else {
            Role::Child
        }
    }
}

impl fmt::Debug for ClassificationPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationPredicate").finish_non_exhaustive()
    }
}
