use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins; otherwise planner logs at info, or debug when verbose.
/// Debug includes every new best selection the search finds.
fn planner_filter(verbose: bool) -> EnvFilter {
    let default_directive = if verbose {
        "offset_planner=debug,info"
    } else {
        "offset_planner=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Compact human-readable logs on stderr, leaving stdout to the binaries'
/// summaries.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(planner_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(verbose)
                .compact(),
        )
        .init();
}

/// JSON lines, for runs whose logs are collected by another tool.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(planner_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .json()
                .with_current_span(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_follows_verbosity() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        assert_eq!(planner_filter(false).to_string(), "offset_planner=info");
        assert!(planner_filter(true).to_string().contains("offset_planner=debug"));
    }
}
