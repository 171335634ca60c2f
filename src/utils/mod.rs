pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "cashflow_forecast=info";

/// Initializes the global tracing subscriber.
///
/// The base filter comes from `RUST_LOG`, or `cashflow_forecast=info` when unset. Each
/// comma-separated entry of `extra` is added on top of it.
pub fn init_tracing(extra: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::fmt;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        fmt()
            .with_env_filter(with_directives(filter, extra))
            .with_writer(std::io::stderr)
            .init();
    });
}

fn with_directives(filter: EnvFilter, extra: Option<&str>) -> EnvFilter {
    extra
        .into_iter()
        .flat_map(|directives| directives.split(','))
        .filter_map(|directive| directive.trim().parse::<Directive>().ok())
        .fold(filter, |filter, directive| filter.add_directive(directive))
}
