use std::io;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_DIRECTIVE: &str = "openscience_stats=info";

/// `RUST_LOG` when it is set and parses, `openscience_stats=info` otherwise.
pub fn env_filter() -> EnvFilter {
    filter_from(std::env::var("RUST_LOG").ok().as_deref())
}

fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs the stderr subscriber. A second call in the same process is a
/// no-op.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn defaults_to_info_for_this_crate() {
        let filter = filter_from(None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(filter.to_string(), DEFAULT_DIRECTIVE);
    }

    #[test]
    fn rust_log_debug_is_not_capped() {
        let filter = filter_from(Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        assert!(!filter.to_string().contains("openscience_stats=info"));
    }

    #[test]
    fn unparseable_rust_log_falls_back_to_default() {
        let filter = filter_from(Some("openscience_stats=loud"));
        assert_eq!(filter.to_string(), DEFAULT_DIRECTIVE);
    }
}
