use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber: `RUST_LOG` filter (default `info`), JSON
/// lines when `LOG_FORMAT=json`, compact text otherwise. Safe to call twice.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(false)
                    .json(),
            )
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(false).compact()).try_init()
    };
    if let Err(err) = result {
        tracing::debug!(%err, "tracing already initialised");
    }
}
