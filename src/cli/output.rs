#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

/// Effective format: the -j shorthand wins, then --format, then config.
pub fn resolve_format(
    json_flag: bool,
    format_flag: Option<&str>,
    config_default: &str,
) -> OutputFormat {
    if json_flag {
        return OutputFormat::Json;
    }
    match format_flag.unwrap_or(config_default) {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

/// Effective color mode: --no-color wins, then the config setting, then a
/// tty check honoring NO_COLOR.
pub fn resolve_color(no_color_flag: bool, config_color: &str) -> bool {
    if no_color_flag {
        return false;
    }
    match config_color {
        "always" => true,
        "never" => false,
        _ => detect_color(),
    }
}

fn detect_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty_stdout()
}

fn atty_stdout() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
