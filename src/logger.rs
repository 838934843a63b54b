//! Logger setup for the generoo binary.

/// Installs env_logger: `Debug` when verbose, `Info` otherwise.
/// `RUST_LOG` still overrides per module.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();
}
