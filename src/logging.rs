use log::LevelFilter;

/// Sets up the `env_logger` backend for the command line tools. Defaults to `info`, and
/// `RUST_LOG` takes precedence when set.
pub fn init() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}
