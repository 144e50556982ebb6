use tracing_subscriber::filter::LevelFilter;

/// Environment variable holding the log threshold.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Parse a log threshold: `0..=4` (debug, info, warn, error, critical) or a
/// level name. `critical` maps to `error`.
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    let s = s.trim();
    match s {
        "0" => Some(LevelFilter::DEBUG),
        "1" => Some(LevelFilter::INFO),
        "2" => Some(LevelFilter::WARN),
        "3" | "4" => Some(LevelFilter::ERROR),
        _ if s.eq_ignore_ascii_case("critical") => Some(LevelFilter::ERROR),
        _ => s.parse::<LevelFilter>().ok(),
    }
}

/// Install the JSON subscriber on stderr.
///
/// `cli_level` wins over `LOG_LEVEL`; unparseable or missing values fall back
/// to `error`.
pub fn init(cli_level: Option<&str>) {
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();
    let level = cli_level
        .or(env_level.as_deref())
        .and_then(parse_level)
        .unwrap_or(LevelFilter::ERROR);

    tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
