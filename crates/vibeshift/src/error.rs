#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0} is not set")]
    MissingCredential(&'static str),

    #[error("Transform endpoint returned [{status}]: {message}")]
    Endpoint { status: u16, message: String },

    #[error("Transform stream was interrupted: {0}")]
    StreamInterrupted(String),

    #[error("No clipboard command found (tried {0})")]
    NoClipboard(String),

    #[error("Clipboard command failed: {0}")]
    ClipboardFailed(String),
}
