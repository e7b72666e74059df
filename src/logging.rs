/// Diagnostics setup.
///
/// The game owns the terminal's alternate screen, so log lines cannot go
/// to stdout or stderr. Set `DOORMAZE_LOG=/path/to/file` to get them in a
/// file; `RUST_LOG` filters as usual (default `info`). Without
/// `DOORMAZE_LOG` no subscriber is installed and every event is dropped.

use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "DOORMAZE_LOG";

pub fn init() -> std::io::Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV_VAR) else {
        return Ok(());
    };
    let file = File::create(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}
