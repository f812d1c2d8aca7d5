//! Command catalog.
//!
//! Commands are described by a [`CommandDescriptor`]: a name, aliases, and one
//! or more overloads, each an ordered list of [`ParamInfo`]. The session reads
//! descriptors through the [`CommandCatalog`] trait to build the catalog it
//! advertises; [`CommandRegistry`] is the daemon's implementation and also runs
//! command lines.

pub mod output;
pub mod param;
pub mod registry;

pub use output::Output;
pub use param::{Choice, Enum, ParamValue, Parameter, Target, Varargs};
pub use registry::{CommandRegistry, Runnable};

use std::collections::HashMap;
use std::sync::Arc;

/// One parameter of an overload.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: String,
    /// Type witness; see [`ParamValue`].
    pub value: Arc<dyn ParamValue>,
    pub optional: bool,
    pub suffix: String,
}

impl ParamInfo {
    pub fn new(name: impl Into<String>, value: impl ParamValue + 'static) -> Self {
        Self {
            name: name.into(),
            value: Arc::new(value),
            optional: false,
            suffix: String::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Static description of a command.
#[derive(Debug, Clone, Default)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub overloads: Vec<Vec<ParamInfo>>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            let alias = alias.into();
            if !self.aliases.contains(&alias) {
                self.aliases.push(alias);
            }
        }
        self
    }

    pub fn with_overload(mut self, params: Vec<ParamInfo>) -> Self {
        self.overloads.push(params);
        self
    }
}

/// Source of the commands a session advertises.
pub trait CommandCatalog: Send + Sync {
    /// Every command, keyed by its name and again by each alias.
    fn all_commands(&self) -> HashMap<String, Arc<CommandDescriptor>>;
}
