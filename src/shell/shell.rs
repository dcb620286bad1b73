use std::io::{BufRead, Write};

use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{ShellConfig, ShellLabels};
use crate::namespace::{IdGenerator, NodeHandle, Tree, TreeError};
use super::command::{Command, HELP, ListOrder};

/// Whether the loop should keep reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Line-oriented driver over a [`Tree`]. All output goes to `out`; the
/// tree itself is never touched except through its public operations.
pub struct Shell<W: Write> {
    tree: Tree,
    labels: ShellLabels,
    color: bool,
    prompt: Option<String>,
    out: W,
}

impl<W: Write> Shell<W> {
    /// `color` should already account for terminal support. The prompt is
    /// only printed when `interactive` is set.
    pub fn new(config: &ShellConfig, color: bool, interactive: bool, out: W) -> Self {
        Self {
            tree: Tree::with_id_generator(IdGenerator::new(config.first_id)),
            labels: config.labels.clone(),
            color,
            prompt: interactive.then(|| config.prompt.clone()),
            out,
        }
    }

    #[cfg(test)]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until `exit` or end of input. Returns the number of commands
    /// executed. Lines that are not valid UTF-8 are reported and skipped.
    pub fn run(&mut self, mut input: impl BufRead) -> Result<usize, ShellError> {
        let mut executed = 0;
        let mut buffer = Vec::new();
        loop {
            self.print_prompt()?;
            buffer.clear();
            if input.read_until(b'\n', &mut buffer).context(InputSnafu)? == 0 {
                debug!("End of input");
                break;
            }
            let line = match std::str::from_utf8(&buffer) {
                Ok(line) => line,
                Err(error) => {
                    warn!("Rejected line that is not valid UTF-8: {}", error);
                    writeln!(self.out, "error: line is not valid UTF-8 ({error})")
                        .context(OutputSnafu)?;
                    continue;
                }
            };

            let command = match Command::parse(line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(error) => {
                    warn!("Rejected line '{}': {}", line.trim(), error);
                    writeln!(self.out, "error: {error}").context(OutputSnafu)?;
                    continue;
                }
            };

            executed += 1;
            if self.execute(command)? == Flow::Exit {
                break;
            }
        }
        info!(
            "Shell finished after {} command(s), {} node(s) live",
            executed,
            self.tree.node_count()
        );
        Ok(executed)
    }

    fn print_prompt(&mut self) -> Result<(), ShellError> {
        if let Some(prompt) = &self.prompt {
            let path = self
                .tree
                .path_of(self.tree.current())
                .unwrap_or_default();
            write!(self.out, "{path} {prompt}").context(OutputSnafu)?;
            self.out.flush().context(OutputSnafu)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, command: Command<'_>) -> Result<Flow, ShellError> {
        debug!("Executing {:?}", command);
        match command {
            Command::CreateFile(name) => {
                self.tree.create_file(name);
            }
            Command::CreateDirectory(name) => {
                self.tree.create_directory(name);
            }
            Command::ChangeDirectory(target) => {
                if let Err(error) = self.tree.change_directory(target) {
                    self.report_tree_error(&error)?;
                }
            }
            Command::Find(name) => {
                let hit = self.tree.find_node(name);
                self.print_hit(name, hit)?;
            }
            Command::FindInAll(name) => {
                let hit = self.tree.find_node_in_all(name);
                self.print_hit(name, hit)?;
            }
            Command::Write { file, text } => {
                self.tree.set_content(file, text);
            }
            Command::Read(file) => {
                let content = self
                    .tree
                    .get_content(file)
                    .unwrap_or(self.labels.not_found.as_str());
                writeln!(self.out, "{content}").context(OutputSnafu)?;
            }
            Command::List(order) => {
                let listing = match order {
                    ListOrder::All => self.tree.list_all(),
                    ListOrder::Latest => self.tree.list_latest(),
                    ListOrder::Oldest => self.tree.list_oldest(),
                };
                debug!(
                    "Listing {} file(s) and {} directory(ies)",
                    listing.files().len(),
                    listing.directories().len()
                );
                let rendered = listing.render(&self.labels.listing, self.color);
                self.out
                    .write_all(rendered.as_bytes())
                    .context(OutputSnafu)?;
            }
            Command::Delete(name) => match self.tree.delete_node(name) {
                Ok(true) => {}
                Ok(false) => {
                    writeln!(self.out, "{name}: {}", self.labels.not_found).context(OutputSnafu)?
                }
                Err(error) => self.report_tree_error(&error)?,
            },
            Command::Sort => {
                let mut handles: Vec<_> = self.tree.current_node().children().copied().collect();
                self.tree.sort_children_by_id(&mut handles);
                for handle in handles {
                    self.print_entry(handle)?;
                }
            }
            Command::Lookup(id) => match self.tree.sorted_children(self.tree.current()) {
                Ok(sorted) => match sorted.find_by_id(id) {
                    Some(handle) => self.print_entry(handle)?,
                    None => {
                        writeln!(self.out, "{id}: {}", self.labels.not_found).context(OutputSnafu)?
                    }
                },
                Err(error) => self.report_tree_error(&error)?,
            },
            Command::SetId { name, id } => match self.tree.find_child(name) {
                Some(handle) => {
                    if let Err(error) = self.tree.override_id(handle, id) {
                        self.report_tree_error(&error)?;
                    }
                }
                None => {
                    writeln!(self.out, "{name}: {}", self.labels.not_found).context(OutputSnafu)?
                }
            },
            Command::Pwd => {
                let path = self
                    .tree
                    .path_of(self.tree.current())
                    .unwrap_or_default();
                writeln!(self.out, "{path}").context(OutputSnafu)?;
            }
            Command::Help => {
                self.out.write_all(HELP.as_bytes()).context(OutputSnafu)?;
            }
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn print_hit(&mut self, name: &str, hit: Option<NodeHandle>) -> Result<(), ShellError> {
        match hit.and_then(|handle| Some((self.tree.path_of(handle)?, self.tree.node(handle)?))) {
            Some((path, node)) => {
                writeln!(self.out, "{path} (id {})", node.id()).context(OutputSnafu)
            }
            None => writeln!(self.out, "{name}: {}", self.labels.not_found).context(OutputSnafu),
        }
    }

    fn print_entry(&mut self, handle: NodeHandle) -> Result<(), ShellError> {
        if let Some(node) = self.tree.node(handle) {
            let tag = if node.is_file() {
                &self.labels.listing.file
            } else {
                &self.labels.listing.directory
            };
            writeln!(self.out, "{} {} {}", node.id(), tag, node.name()).context(OutputSnafu)?;
        }
        Ok(())
    }

    fn report_tree_error(&mut self, error: &TreeError) -> Result<(), ShellError> {
        debug!("Operation failed: {}", error);
        let written = match error {
            TreeError::NoParent => writeln!(self.out, "{}", self.labels.no_parent),
            TreeError::NotFound { name } => {
                writeln!(self.out, "{name}: {}", self.labels.not_found)
            }
            TreeError::NotADirectory { name } => {
                writeln!(self.out, "{name}: {}", self.labels.not_a_directory)
            }
            other => writeln!(self.out, "error: {other}"),
        };
        written.context(OutputSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read shell input"))]
    InputError { source: std::io::Error },
    #[snafu(display("Failed to write shell output"))]
    OutputError { source: std::io::Error },
}
