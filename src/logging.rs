use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Routes diagnostics to stderr so the report owns stdout. `RUST_LOG`
/// directives still take precedence over the base level.
pub fn initialize_logging(level: tracing::Level) {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .init();
}
