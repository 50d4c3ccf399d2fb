use crate::command::{Command, HELP};
use crate::target::validate_target;
use lapse_core::{Clock, CreateError, LinkSpec, ResolveError};
use lapse_generator::Generator;
use lapse_registry::LinkRegistry;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Whether the shell should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One user's interactive session against a shared registry.
pub struct Session<G, C> {
    registry: Arc<LinkRegistry<G, C>>,
    owner: String,
    base_url: String,
    ttl: Duration,
}

impl<G: Generator, C: Clock> Session<G, C> {
    pub fn new(
        registry: Arc<LinkRegistry<G, C>>,
        owner: impl Into<String>,
        base_url: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            registry,
            owner: owner.into(),
            base_url: base_url.into(),
            ttl,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Handles one line of input, then sweeps expired links.
    pub fn handle_line<W: Write>(&self, line: &str, out: &mut W) -> std::io::Result<Flow> {
        let flow = match Command::parse(line) {
            Ok(command) => self.execute(command, out)?,
            Err(e) => {
                writeln!(out, "{e}")?;
                Flow::Continue
            }
        };
        self.registry.sweep();
        Ok(flow)
    }

    pub fn execute<W: Write>(&self, command: Command, out: &mut W) -> std::io::Result<Flow> {
        match command {
            Command::Create { target, max_uses } => {
                if let Err(e) = validate_target(&target) {
                    writeln!(out, "invalid url ({e}); check the format and try again")?;
                    return Ok(Flow::Continue);
                }
                let spec = LinkSpec::new(target, self.owner.as_str(), self.ttl, max_uses);
                match self.registry.create(spec) {
                    Ok(record) => writeln!(
                        out,
                        "short link created: {}",
                        record.id.to_url(&self.base_url)
                    )?,
                    Err(CreateError::InvalidInput(reason)) => {
                        writeln!(out, "link not created: {reason}")?
                    }
                    Err(e @ CreateError::GenerationExhausted { .. }) => {
                        error!(error = %e, "could not allocate a link id");
                        writeln!(out, "link not created: no free id, try again later")?
                    }
                }
            }
            Command::Open { id } => match self.registry.resolve(&id) {
                Ok(target) => writeln!(out, "redirecting to: {target}")?,
                Err(ResolveError::NotFound) => writeln!(out, "link not found")?,
                Err(ResolveError::Expired) => {
                    writeln!(out, "link expired and has been removed")?
                }
                Err(ResolveError::LimitReached) => {
                    writeln!(out, "link use limit reached; the link is unavailable")?
                }
            },
            Command::Info { id } => match self.registry.get(&id) {
                Some(record) => {
                    let json = serde_json::to_string_pretty(&record)
                        .map_err(std::io::Error::other)?;
                    writeln!(out, "{json}")?
                }
                None => writeln!(out, "link not found")?,
            },
            Command::Delete { id } => {
                if self.registry.delete(&id, &self.owner) {
                    writeln!(out, "link deleted")?
                } else {
                    writeln!(out, "link not found or you are not its owner")?
                }
            }
            Command::Sweep => {
                let removed = self.registry.sweep();
                writeln!(out, "removed {removed} expired link(s)")?
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}
