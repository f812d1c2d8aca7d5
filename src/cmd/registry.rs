//! In-memory command registry.
//!
//! Commands are stored once per name and once per alias, so lookup by either
//! is a single map access. Argument parsing is left to each [`Runnable`]: it
//! receives the remainder of the line after the command name.

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::{CommandCatalog, CommandDescriptor, Output};

/// Executable half of a registered command.
pub trait Runnable: Send + Sync {
    /// Run the command for `source` with the unparsed argument string.
    fn run(&self, source: &str, args: &str, output: &mut Output);
}

impl<F> Runnable for F
where
    F: Fn(&str, &str, &mut Output) + Send + Sync,
{
    fn run(&self, source: &str, args: &str, output: &mut Output) {
        self(source, args, output)
    }
}

#[derive(Clone)]
struct Registered {
    descriptor: Arc<CommandDescriptor>,
    runner: Arc<dyn Runnable>,
}

/// Registry of every command known to the server.
#[derive(Default)]
pub struct CommandRegistry {
    commands: DashMap<String, Registered>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name and all of its aliases.
    ///
    /// A later registration replaces any earlier command using the same key.
    /// Lookups fall back to the lowercased name, so keys should be lowercase.
    pub fn register(&self, descriptor: CommandDescriptor, runner: impl Runnable + 'static) {
        let entry = Registered {
            descriptor: Arc::new(descriptor),
            runner: Arc::new(runner),
        };
        let name = entry.descriptor.name.clone();
        for alias in &entry.descriptor.aliases {
            self.commands.insert(alias.clone(), entry.clone());
        }
        self.commands.insert(name.clone(), entry);
        info!(command = %name, "Registered command");
    }

    fn lookup(&self, name: &str) -> Option<Registered> {
        self.commands
            .get(name)
            .or_else(|| self.commands.get(&name.to_lowercase()))
            .map(|e| e.value().clone())
    }

    /// Look up a command by name or alias.
    pub fn command(&self, name: &str) -> Option<Arc<CommandDescriptor>> {
        self.lookup(name).map(|e| e.descriptor)
    }

    /// Run a command line on behalf of `source`.
    ///
    /// A leading `/` is optional. Unknown commands produce a single error.
    pub fn execute(&self, source: &str, line: &str) -> Output {
        let mut output = Output::new();
        let line = line.trim();
        let line = line.strip_prefix('/').unwrap_or(line);
        let (name, args) = match line.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim_start()),
            None => (line, ""),
        };

        // The entry is cloned out so the map shard is not locked while it runs.
        match self.lookup(name).map(|e| e.runner) {
            Some(runner) => {
                debug!(%source, command = %name, "Executing command");
                runner.run(source, args, &mut output);
            }
            None => output.error(format!(
                "Unknown command: {name}. Please check that the command exists and that you have permission to use it."
            )),
        }
        output
    }
}

impl CommandCatalog for CommandRegistry {
    fn all_commands(&self) -> HashMap<String, Arc<CommandDescriptor>> {
        self.commands
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(&e.value().descriptor)))
            .collect()
    }
}
