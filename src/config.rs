use std::env;
use std::path::PathBuf;

pub const DEFAULT_RECORDS_DIR: &str = "markdown-notes";
pub const DEFAULT_ACCOUNT: &str = "iCloud";
pub const DEFAULT_INTERPRETER: &str = "osascript";
pub const NOTE_TAG: &str = "#claude";

/// Process-wide settings, read once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding saved markdown files.
    pub records_dir: PathBuf,
    /// Notes account every note is created under.
    pub account: String,
    /// Program that executes the generated AppleScript.
    pub interpreter: String,
    /// Tag appended to every note body.
    pub tag: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            records_dir: PathBuf::from(DEFAULT_RECORDS_DIR),
            account: DEFAULT_ACCOUNT.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            tag: NOTE_TAG.to_string(),
        }
    }
}

impl Config {
    /// Defaults, overridden by `NOTES_SAVER_DIR`, `NOTES_SAVER_ACCOUNT` and
    /// `NOTES_SAVER_OSASCRIPT` when set to something non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(dir) = get("NOTES_SAVER_DIR") {
            config.records_dir = PathBuf::from(dir);
        }
        if let Some(account) = get("NOTES_SAVER_ACCOUNT") {
            config.account = account;
        }
        if let Some(program) = get("NOTES_SAVER_OSASCRIPT") {
            config.interpreter = program;
        }
        config
    }
}
