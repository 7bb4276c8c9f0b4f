//! The failure reason carried by rejected promises
//!
//! Every promise in this crate settles with `Result<T, Failure>`. A `Failure`
//! always has a message, may wrap the structured error that caused it, and
//! accumulates a trail of context messages as it propagates up the call stack.
//!
//! # Examples
//!
//! ## From text
//!
//! ```
//! use tilly::Failure;
//!
//! let failure = Failure::from("connection refused");
//! assert_eq!(failure.message(), "connection refused");
//! assert!(failure.cause().is_none());
//! ```
//!
//! ## Wrapping a structured error
//!
//! ```
//! use tilly::Failure;
//!
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
//! let failure = Failure::from_error(io).context("loading configuration");
//!
//! assert_eq!(failure.message(), "config.toml");
//! assert!(failure.cause().is_some());
//! assert_eq!(failure.context_trail(), &["loading configuration"]);
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// A rejection reason with a message, an optional cause and a context trail.
///
/// `Failure` is cheap to clone: the cause is reference counted so that every
/// observer of a shared promise receives the same underlying error.
///
/// # Examples
///
/// ```
/// use tilly::Failure;
///
/// let failure = Failure::new("timeout")
///     .context("fetching user")
///     .context("rendering profile");
///
/// println!("{}", failure);
/// // Output:
/// // Error: timeout
/// //   -> fetching user
/// //   -> rendering profile
/// ```
#[derive(Clone)]
pub struct Failure {
    message: String,
    cause: Option<Arc<dyn StdError + Send + Sync + 'static>>,
    context: Vec<String>,
}

impl Failure {
    /// Create a failure from a message, with no cause.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilly::Failure;
    ///
    /// let failure = Failure::new("Something went wrong");
    /// assert_eq!(failure.message(), "Something went wrong");
    /// assert_eq!(failure.context_trail(), &[] as &[String]);
    /// ```
    pub fn new(message: impl Into<String>) -> Self {
        Failure {
            message: message.into(),
            cause: None,
            context: Vec::new(),
        }
    }

    /// Create a failure from a structured error.
    ///
    /// The message is the error's `Display` output and the error itself is
    /// kept as the [`cause`](Failure::cause).
    pub fn from_error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Failure {
            message: error.to_string(),
            cause: Some(Arc::new(error)),
            context: Vec::new(),
        }
    }

    /// Create a failure with an explicit message and cause.
    pub fn with_cause<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Failure {
            message: message.into(),
            cause: Some(Arc::new(cause)),
            context: Vec::new(),
        }
    }

    /// Add a context layer
    ///
    /// Context messages are kept in the order they are added, from the
    /// innermost operation to the outermost.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilly::Failure;
    ///
    /// let failure = Failure::new("parse error")
    ///     .context("reading config file")
    ///     .context("initializing app");
    ///
    /// assert_eq!(failure.context_trail(), &["reading config file", "initializing app"]);
    /// ```
    pub fn context(mut self, msg: impl Into<String>) -> Self {
        self.context.push(msg.into());
        self
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The structured error this failure was created from, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// The context trail, innermost first.
    pub fn context_trail(&self) -> &[String] {
        &self.context
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .field("context", &self.context)
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.message)?;

        for ctx in &self.context {
            write!(f, "\n  -> {}", ctx)?;
        }

        Ok(())
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Two failures are equal when their messages and context trails match.
///
/// Causes are not compared: `dyn Error` has no notion of equality.
impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message && self.context == other.context
    }
}

impl Eq for Failure {}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::new(message)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::new(message)
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        Failure::from_error(error)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Failure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Failure", 2)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("context", &self.context)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_new() {
        let failure = Failure::new("base error");
        assert_eq!(failure.message(), "base error");
        assert!(failure.cause().is_none());
        assert_eq!(failure.context_trail(), &[] as &[String]);
    }

    #[test]
    fn test_text_normalizes_into_failure() {
        let from_str: Failure = "boom".into();
        let from_string: Failure = String::from("boom").into();
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.message(), "boom");
    }

    #[test]
    fn test_context_accumulation() {
        let failure = Failure::new("base error")
            .context(String::from("owned string"))
            .context("borrowed str");

        assert_eq!(failure.context_trail(), &["owned string", "borrowed str"]);
    }

    #[test]
    fn test_display_format_no_context() {
        let failure = Failure::new("file not found");
        assert_eq!(format!("{}", failure), "Error: file not found");
    }

    #[test]
    fn test_display_format_with_context() {
        let failure = Failure::new("file not found")
            .context("reading config")
            .context("initializing app");

        let output = format!("{}", failure);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Error: file not found");
        assert_eq!(lines[1], "  -> reading config");
        assert_eq!(lines[2], "  -> initializing app");
    }

    #[test]
    fn test_from_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let failure = Failure::from_error(io);

        assert_eq!(failure.message(), "file not found");
        assert!(failure.source().is_some());
        assert_eq!(
            failure.source().map(|s| s.to_string()),
            Some("file not found".to_string())
        );
    }

    #[test]
    fn test_with_cause_overrides_message() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let failure = Failure::with_cause("could not persist", io);

        assert_eq!(failure.message(), "could not persist");
        assert_eq!(failure.cause().map(|c| c.to_string()), Some("disk full".into()));
    }

    #[test]
    fn test_clone_shares_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "reset");
        let failure = Failure::from_error(io).context("syncing");
        let cloned = failure.clone();

        assert_eq!(failure, cloned);
        assert!(cloned.cause().is_some());
    }

    #[test]
    fn test_eq_ignores_cause() {
        let with_cause = Failure::with_cause(
            "error",
            std::io::Error::new(std::io::ErrorKind::Other, "inner"),
        );
        let without_cause = Failure::new("error");
        let different = Failure::new("error").context("different");

        assert_eq!(with_cause, without_cause);
        assert_ne!(without_cause, different);
    }

    #[test]
    fn test_debug_format() {
        let failure = Failure::new("error").context("context");
        let debug_output = format!("{:?}", failure);

        assert!(debug_output.contains("Failure"));
        assert!(debug_output.contains("error"));
        assert!(debug_output.contains("context"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_failure() {
        let failure = Failure::new("boom").context("step");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "message": "boom", "context": ["step"] })
        );
    }
}
