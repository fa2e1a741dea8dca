//! Command list building - scoping, merging and de-duplication

use serde::{Deserialize, Serialize};
use std::fmt;

/// A CLI sub-mode a batch of commands must be entered into and exited from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Command that enters the context (e.g. "interface GE0/0/1")
    pub entry: String,
    /// Command that leaves the context (e.g. "quit")
    pub exit: String,
}

impl Scope {
    pub fn new(entry: impl Into<String>, exit: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            exit: exit.into(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entry)
    }
}

/// One command line and the scope it belongs to
///
/// Entry and exit lines carry their own scope as well, so a flattened list
/// keeps every line attributable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub text: String,
    pub scope: Option<Scope>,
}

/// Commands emitted for one resource instance by one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub scope: Option<Scope>,
    pub commands: Vec<String>,
}

impl Batch {
    pub fn new(scope: Option<Scope>, commands: Vec<String>) -> Self {
        Self { scope, commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Block {
    scope: Option<Scope>,
    commands: Vec<String>,
}

/// Final ordered command list handed to the command sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandList {
    blocks: Vec<Block>,
}

impl CommandList {
    /// Rendered command lines, entry/exit included
    pub fn lines(&self) -> Vec<String> {
        self.commands().into_iter().map(|c| c.text).collect()
    }

    /// Flattened commands with their scopes
    pub fn commands(&self) -> Vec<Command> {
        let mut out = Vec::new();
        for block in &self.blocks {
            let line = |text: &str| Command {
                text: text.to_string(),
                scope: block.scope.clone(),
            };
            if let Some(scope) = &block.scope {
                out.push(line(&scope.entry));
                out.extend(block.commands.iter().map(|c| line(c)));
                out.push(line(&scope.exit));
            } else {
                out.extend(block.commands.iter().map(|c| line(c)));
            }
        }
        out
    }

    /// Scopes in output order
    pub fn scopes(&self) -> Vec<&Scope> {
        self.blocks.iter().filter_map(|b| b.scope.as_ref()).collect()
    }

    /// Number of rendered lines
    pub fn len(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.commands.len() + if b.scope.is_some() { 2 } else { 0 })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether applying the list would change the device
    pub fn changed(&self) -> bool {
        !self.is_empty()
    }
}

/// Accumulates batches in emission order and produces a [`CommandList`]
///
/// Every batch that addresses an already-seen scope is folded into the first
/// block for that scope, so each context appears at most once. Identical
/// commands inside one block are kept once. Unscoped commands accumulate in a
/// top-level block at the position of their first batch.
#[derive(Debug, Default)]
pub struct CommandListBuilder {
    blocks: Vec<Block>,
}

impl CommandListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a batch; empty batches contribute nothing
    pub fn push(&mut self, batch: Batch) {
        if batch.is_empty() {
            return;
        }

        let index = match self.blocks.iter().position(|b| b.scope == batch.scope) {
            Some(i) => {
                log::debug!(
                    "Merging repeated block for {}",
                    batch
                        .scope
                        .as_ref()
                        .map_or("top level", |s| s.entry.as_str())
                );
                i
            }
            None => {
                self.blocks.push(Block {
                    scope: batch.scope,
                    commands: Vec::new(),
                });
                self.blocks.len() - 1
            }
        };

        let block = &mut self.blocks[index];
        for cmd in batch.commands {
            if block.commands.contains(&cmd) {
                log::trace!("Dropping duplicate command '{cmd}'");
                continue;
            }
            log::trace!("Emit '{cmd}'");
            block.commands.push(cmd);
        }
    }

    pub fn build(self) -> CommandList {
        CommandList {
            blocks: self.blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(name: &str) -> Option<Scope> {
        Some(Scope::new(format!("interface {name}"), "quit"))
    }

    fn batch(scope: Option<Scope>, cmds: &[&str]) -> Batch {
        Batch::new(scope, cmds.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_empty_batches_emit_nothing() {
        let mut builder = CommandListBuilder::new();
        builder.push(batch(iface("GE0/0/1"), &[]));
        let list = builder.build();

        assert!(list.is_empty());
        assert!(!list.changed());
        assert!(list.lines().is_empty());
    }

    #[test]
    fn test_scoped_block_rendering() {
        let mut builder = CommandListBuilder::new();
        builder.push(batch(iface("GE0/0/1"), &["jumboframe enable 9000"]));
        let list = builder.build();

        assert_eq!(
            list.lines(),
            vec!["interface GE0/0/1", "jumboframe enable 9000", "quit"]
        );
        assert_eq!(list.len(), 3);
        assert!(list.commands().iter().all(|c| c.scope == iface("GE0/0/1")));
    }

    #[test]
    fn test_repeated_scope_is_merged() {
        let mut builder = CommandListBuilder::new();
        builder.push(batch(iface("GE0/0/1"), &["undo description", "undo speed"]));
        builder.push(batch(iface("GE0/0/2"), &["shutdown"]));
        builder.push(batch(iface("GE0/0/1"), &["undo speed", "speed 100"]));
        let list = builder.build();

        assert_eq!(
            list.lines(),
            vec![
                "interface GE0/0/1",
                "undo description",
                "undo speed",
                "speed 100",
                "quit",
                "interface GE0/0/2",
                "shutdown",
                "quit",
            ]
        );
        assert_eq!(list.scopes().len(), 2);
    }

    #[test]
    fn test_unscoped_commands_have_no_entry_exit() {
        let mut builder = CommandListBuilder::new();
        builder.push(batch(None, &["lldp enable"]));
        builder.push(batch(None, &["lldp restart-delay 3", "lldp enable"]));
        let list = builder.build();

        assert_eq!(list.lines(), vec!["lldp enable", "lldp restart-delay 3"]);
        assert!(list.commands().iter().all(|c| c.scope.is_none()));
    }
}
