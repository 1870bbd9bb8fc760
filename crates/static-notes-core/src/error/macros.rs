//! Error macros for static-notes

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::NotesError::UsageError($msg.to_string()))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! bail_config {
    ($msg:expr) => {
        return Err($crate::error::NotesError::configuration($msg))
    };
}
