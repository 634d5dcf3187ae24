use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

const DEFAULT_FILTER: &str = "keyhint=info";

/// Installs the global subscriber: an `RUST_LOG` style filter over an indented tree
/// of spans written to stderr. Does nothing if a subscriber is already installed.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "keyhint=trace" } else { DEFAULT_FILTER })
    });
    let tree = HierarchicalLayer::new(2)
        .with_writer(std::io::stderr)
        .with_targets(true)
        .with_bracketed_fields(true);
    _ = Registry::default().with(filter).with(tree).try_init();
}
