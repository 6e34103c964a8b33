use std::fmt;
use std::io;

/// Errors that can occur while writing a debug dump.
///
/// Trust decisions and rendering never fail. The only fallible step is
/// writing the finished block to the output stream.
#[derive(Debug)]
pub enum Error {
    /// Writing to or flushing the output stream failed
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "failed to write debug dump: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
