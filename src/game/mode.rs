/// Top-level game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Main menu (classic, endless, options, quit)
    MainMenu,
    /// Choosing the map for a classic session
    MapSelect,
    /// Editing the tunables
    Options,
    /// A round is in progress (running or paused)
    Playing,
    /// Shown after the snake died: restart or quit
    RestartPrompt,
    /// Endless mode has no rules yet; this screen says so
    EndlessUnavailable,
}
