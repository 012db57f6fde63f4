use std::path::Path;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const LOG_FILE: &str = "user-directory.log";

/// Configure tracing for the whole application.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (from the config)
/// applies. With a `log_dir` the logs go to `user-directory.log` there,
/// since the terminal belongs to the UI. Without one they go to stderr.
///
/// ```bash
/// RUST_LOG=debug user_directory
/// RUST_LOG=user_directory::actors=debug,info user_directory
/// ```
pub fn setup_tracing(default_level: &str, log_dir: Option<&Path>) -> Result<(), InitError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let writer = match log_dir {
        Some(dir) => BoxMakeWriter::new(
            RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE)
                .build(dir)?,
        ),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(writer)
        .with_ansi(log_dir.is_none())
        .compact()
        .init();

    Ok(())
}
