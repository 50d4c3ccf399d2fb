use anyhow::Context;
use clap::Parser;
use lapse_cli::{logging, Flow, Session, CLI};
use lapse_core::SystemClock;
use lapse_generator::RandomGenerator;
use lapse_registry::{Janitor, LinkRegistry, RegistrySettings};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    logging::init(config.log_format);

    let generator = RandomGenerator::with_width(config.id_width).context("invalid --id-width")?;
    let registry = Arc::new(LinkRegistry::with_parts(
        generator,
        SystemClock,
        RegistrySettings::default(),
    ));

    let owner = config
        .owner
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let ttl = Duration::from_secs(config.ttl_secs);
    let sweep_interval = Duration::from_secs(config.sweep_interval_secs);

    info!(
        base_url = %config.base_url,
        ttl_secs = config.ttl_secs,
        sweep_interval_secs = config.sweep_interval_secs,
        id_width = config.id_width,
        "starting lapse shell"
    );

    let janitor = Janitor::spawn(Arc::clone(&registry), sweep_interval);
    let session = Session::new(registry, owner, config.base_url, ttl);

    let mut stdout = std::io::stdout();
    writeln!(stdout, "your owner id: {}", session.owner())?;
    writeln!(stdout, "{}", lapse_cli::command::HELP)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let mut out = stdout.lock();
        if session.handle_line(&line, &mut out)? == Flow::Quit {
            break;
        }
    }

    writeln!(stdout, "bye")?;
    janitor.shutdown().await;
    Ok(())
}
