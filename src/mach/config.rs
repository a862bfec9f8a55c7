use std::path::PathBuf;

/// Startup options for a [`Runtime`](super::Runtime).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Program text to load before the first prompt.
    pub program: Option<PathBuf>,
    /// Run the loaded program right away.
    pub run: bool,
    /// Command line executed before anything else.
    pub exec: Option<String>,
    /// Try to continue the session saved in `state_file`.
    pub resume: bool,
    /// Leave when idle and no input is waiting.
    pub quit: bool,
    /// Wait for a key before leaving on `SYSTEM`.
    pub wait: bool,
    /// Session snapshot location. `None` disables snapshots.
    pub state_file: Option<PathBuf>,
    pub auto_increment: u16,
    pub greeting: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            program: None,
            run: false,
            exec: None,
            resume: false,
            quit: false,
            wait: false,
            state_file: None,
            auto_increment: 10,
            greeting: true,
        }
    }
}
