//! Common utility functions.
//!
//! Provides branch prediction hints used on the input hot paths.

/// Marker function for cold code paths.
///
/// Used with branch prediction hints to inform the compiler about infrequently executed paths.
#[inline(always)]
#[cold]
pub fn cold() {}

/// Branch prediction hint for conditions expected to be false.
///
/// # Example
/// ```ignore
/// if unlikely(event_is_hotkey) {
///     toggle_mode();
/// }
/// ```
#[inline(always)]
pub fn unlikely(b: bool) -> bool {
    if b {
        cold()
    }
    b
}
