/// Shared constants for the garbled circuits library

/// Size, in bytes, of a wire label.
pub const LABEL_LEN: usize = 16;

/// Size, in bytes, of the random nonce prefixed to every ciphertext.
pub const NONCE_LEN: usize = 16;

/// Size, in bytes, of the authentication tag suffixed to every ciphertext.
pub const TAG_LEN: usize = 16;

/// Gate count above which garbling/evaluation report progress via a bar instead of
/// running silently; small circuits don't need one.
pub const PROGRESS_BAR_THRESHOLD: usize = 256;
