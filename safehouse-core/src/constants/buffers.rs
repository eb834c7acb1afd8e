//! Capacities and Fixed Sizes
//!
//! Every collection in the core is statically sized. These constants set
//! those sizes.

/// Maximum number of authorized identities in the roster.
///
/// The roster is populated once at startup and never grows past this.
pub const MAX_AUTHORIZED_IDS: usize = 10;

/// Maximum length of an identity string.
///
/// A 10-byte UID rendered as space-separated hex ("04 A3 ...") needs 29
/// characters; 32 leaves room for a terminator-free copy.
pub const MAX_IDENTITY_LEN: usize = 32;

/// Width of one display line in characters (128 px / 8 px font).
pub const DISPLAY_LINE_WIDTH: usize = 16;

/// Number of display lines composed by the status board.
pub const DISPLAY_LINES: usize = 4;

/// Number of environmental alert conditions.
pub const ALERT_CONDITION_COUNT: usize = 4;
