//! Display availability probing
//!
//! Desktop rendering needs a display server. Headless hosts (CI runners,
//! remote shells without X forwarding) are detected in two layers: an
//! environment probe before any windowing work, and the GLFW init failure
//! path, which [`crate::universe`] maps to the same error. Applications are
//! expected to print [`HEADLESS_MESSAGE`] and exit with a nonzero status.

use thiserror::Error;

/// User-facing message printed when no display is available
pub const HEADLESS_MESSAGE: &str = "No DISPLAY found: running in headless environment. \
     Start an X server or use Xvfb, or run with a real display.";

/// Errors raised when no usable display can be reached
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Neither DISPLAY nor WAYLAND_DISPLAY points at a display server
    #[error("no display server available")]
    Unavailable,

    /// The windowing toolkit failed to initialize, which on desktop systems
    /// almost always means the display connection was refused
    #[error("window toolkit initialization failed: {0}")]
    InitFailed(String),
}

/// Decide display availability from the session environment variables
///
/// Split out from [`display_available`] so the decision logic is testable
/// without mutating process-global environment state.
pub fn env_reports_display(display: Option<&str>, wayland_display: Option<&str>) -> bool {
    let has_x11 = display.map_or(false, |v| !v.is_empty());
    let has_wayland = wayland_display.map_or(false, |v| !v.is_empty());
    has_x11 || has_wayland
}

/// Whether the current session appears to have a display server
///
/// On Unix desktops an empty or missing DISPLAY / WAYLAND_DISPLAY means
/// window creation cannot succeed. macOS and Windows have no equivalent
/// environment contract, so the probe reports available there and the GLFW
/// init path catches genuine failures.
#[cfg(all(unix, not(target_os = "macos")))]
pub fn display_available() -> bool {
    let display = std::env::var("DISPLAY").ok();
    let wayland = std::env::var("WAYLAND_DISPLAY").ok();
    env_reports_display(display.as_deref(), wayland.as_deref())
}

/// Whether the current session appears to have a display server
#[cfg(not(all(unix, not(target_os = "macos"))))]
pub fn display_available() -> bool {
    true
}

/// Fail fast when no display is reachable
pub fn require_display() -> Result<(), DisplayError> {
    if display_available() {
        Ok(())
    } else {
        log::warn!("no DISPLAY or WAYLAND_DISPLAY in environment, treating session as headless");
        Err(DisplayError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x11_display_counts() {
        assert!(env_reports_display(Some(":0"), None));
    }

    #[test]
    fn wayland_display_counts() {
        assert!(env_reports_display(None, Some("wayland-0")));
    }

    #[test]
    fn missing_both_is_headless() {
        assert!(!env_reports_display(None, None));
    }

    #[test]
    fn empty_values_are_headless() {
        assert!(!env_reports_display(Some(""), Some("")));
    }

    #[test]
    fn headless_message_names_the_fix() {
        assert!(HEADLESS_MESSAGE.contains("No DISPLAY found"));
        assert!(HEADLESS_MESSAGE.contains("Xvfb"));
    }
}
