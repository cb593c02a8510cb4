use log::{debug, LevelFilter};
use std::path::Path;

use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::{Error, Result};

/// Initialize the logger.
///
/// Console lines go to stderr bare, so findings read as plain report lines.
/// When `log_file` is given the same events are also written there with
/// timestamps, rotating at 10MB.
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{m}{n}")))
        .build();

    let mut builder = Config::builder().appender(Appender::builder().build("stderr", Box::new(stderr)));
    let mut root = Root::builder().appender("stderr");

    if let Some(path) = log_file {
        let archived_logs_pattern = format!("{}.{{}}", path.display());

        // Keep 5 archived log files
        let roller = FixedWindowRoller::builder()
            .build(&archived_logs_pattern, 5)
            .map_err(|e| Error::Logging(format!("Failed to create log roller: {}", e)))?;
        let policy = CompoundPolicy::new(
            Box::new(SizeTrigger::new(10 * 1024 * 1024)),
            Box::new(roller),
        );

        let file = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(
                "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}] - {m}{n}",
            )))
            .build(path, Box::new(policy))
            .map_err(|e| Error::Logging(format!("Failed to create log appender: {}", e)))?;

        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    let config = builder
        .build(root.build(level))
        .map_err(|e| Error::Logging(format!("Failed to build log config: {}", e)))?;

    log4rs::init_config(config)
        .map_err(|e| Error::Logging(format!("Failed to initialize log4rs: {}", e)))?;

    debug!("Logging initialised at {}", level);
    Ok(())
}
