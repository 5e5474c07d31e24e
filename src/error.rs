// Boost/Apache2 License

//! Error types for cursor construction.

use std::fmt;

/// A failed call into the windowing subsystem or the cursor library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    /// The error code associated with this error.
    code: u32,

    /// The message associated with this error.
    message: Option<Box<str>>,

    /// The function that caused this error.
    function: &'static str,
}

impl PlatformError {
    /// Create an error for `function` with the given error code.
    pub fn new(function: &'static str, code: u32) -> Self {
        Self {
            code,
            message: None,
            function,
        }
    }

    /// Create an error for `function` with an error code and a human-readable message.
    pub fn with_message(function: &'static str, code: u32, message: impl Into<Box<str>>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            function,
        }
    }

    /// Get the latest error code of the calling thread.
    #[cfg(windows)]
    pub(crate) fn last_error(function: &'static str) -> Self {
        use windows_sys::Win32::Foundation::GetLastError;

        // Fetch the error code.
        let code = unsafe { GetLastError() };
        Self::from_code(function, code)
    }

    /// Create an error from a known code, fetching the system message for it.
    #[cfg(windows)]
    pub(crate) fn from_code(function: &'static str, code: u32) -> Self {
        use std::ptr;
        use windows_sys::Win32::System::Diagnostics::Debug::FormatMessageA;
        use windows_sys::Win32::System::Diagnostics::Debug::{
            FORMAT_MESSAGE_ARGUMENT_ARRAY, FORMAT_MESSAGE_FROM_SYSTEM,
            FORMAT_MESSAGE_IGNORE_INSERTS,
        };

        const BUF_SIZE: usize = 1024;
        let mut buffer = [0u8; BUF_SIZE];

        let mut chars_written = unsafe {
            FormatMessageA(
                FORMAT_MESSAGE_IGNORE_INSERTS
                    | FORMAT_MESSAGE_FROM_SYSTEM
                    | FORMAT_MESSAGE_ARGUMENT_ARRAY,
                ptr::null(),
                code,
                0,
                buffer.as_mut_ptr(),
                BUF_SIZE as u32,
                ptr::null(),
            )
        };

        let message = if chars_written == 0 {
            None
        } else {
            // Trim the trailing newline.
            chars_written = chars_written.saturating_sub(2);
            let buffer = &buffer[..chars_written as usize];
            Some(String::from_utf8_lossy(buffer).into_owned().into_boxed_str())
        };

        Self {
            code,
            message,
            function,
        }
    }

    /// The platform error code.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// The name of the function that failed.
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// The message reported by the platform, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed", self.function)?;

        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }

        write!(f, " (error code: {})", self.code)
    }
}

impl std::error::Error for PlatformError {}

/// The error type for cursor construction.
#[derive(Debug)]
pub enum Error {
    /// A call into the windowing subsystem failed.
    Platform(PlatformError),

    /// The caller passed inconsistent dimensions, hotspot or pixel data.
    ///
    /// This is always detected before any platform call is made.
    InvalidArgument {
        /// The offending argument.
        name: &'static str,

        /// Why it was rejected.
        reason: String,
    },

    /// An internal consistency check failed.
    Assertion(&'static str),

    /// Neither the native cursor constructor nor the fallback produced a cursor.
    CursorCreation {
        /// The error from the last native attempt.
        primary: PlatformError,

        /// The error that stopped the fallback.
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// The last platform error code carried by this error, if any.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Platform(err) => Some(err.code()),
            Self::CursorCreation { primary, source } => source.code().or(Some(primary.code())),
            Self::InvalidArgument { .. } | Self::Assertion(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform(err) => fmt::Display::fmt(err, f),
            Self::InvalidArgument { name, reason } => {
                write!(f, "invalid argument `{}`: {}", name, reason)
            }
            Self::Assertion(what) => write!(f, "assertion failed: {}", what),
            Self::CursorCreation { primary, source } => write!(
                f,
                "failed to create cursor (native: {}; fallback: {})",
                primary, source
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Platform(err) => Some(err),
            Self::CursorCreation { source, .. } => Some(&**source),
            Self::InvalidArgument { .. } | Self::Assertion(_) => None,
        }
    }
}

impl From<PlatformError> for Error {
    fn from(err: PlatformError) -> Self {
        Self::Platform(err)
    }
}
