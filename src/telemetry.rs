//! Tracing subscriber setup for hosts embedding the editor.

/// Install the fmt subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init() -> bool {
    tracing_subscriber::fmt().with_target(false).try_init().is_ok()
}
