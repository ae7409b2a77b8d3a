use anyhow::{Context, Result};
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle, WriteMode};
use log::error;

use opendota::store::data_dir;

const LOG_SPEC: &str = "warn,opendota=debug,opendota_model=debug";

/// Progress lines are info level, so verbose runs copy info and above to the console.
pub fn stderr_duplication(verbose: bool) -> Duplicate {
    if verbose {
        Duplicate::Info
    } else {
        Duplicate::Warn
    }
}

pub fn init(verbose: bool) -> Result<LoggerHandle> {
    let logger = Logger::try_with_str(LOG_SPEC)
        .context("log config text")?
        .log_to_file(FileSpec::default().directory(data_dir()?.join("logs")))
        .write_mode(WriteMode::BufferAndFlush)
        .duplicate_to_stderr(stderr_duplication(verbose))
        .start()
        .context("log init")?;

    let orig_hook = std::panic::take_hook();
    let logger_for_panic = logger.clone();
    std::panic::set_hook(Box::new(move |panic_info| {
        error!("Panic: {panic_info}");
        logger_for_panic.flush();
        orig_hook(panic_info);
    }));
    Ok(logger)
}

/// Re-applies console verbosity once the config file has been read.
pub fn apply_verbosity(logger: &mut LoggerHandle, verbose: bool) {
    let _ = logger
        .adapt_duplication_to_stderr(stderr_duplication(verbose))
        .inspect_err(|e| error!("Cannot adapt console logging: {e}"));
}
