// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The error an actor raises from `receive`.
//!
//! It never travels back to the sender. The runtime records it on the actor's
//! output tick, hands it to the actor's `error_handler` hook and moves on to the
//! next message.

use std::fmt;

/// Failure raised by an actor while processing one message.
///
/// Carries the underlying cause as an [`anyhow::Error`] plus an optional partial
/// result, which is recorded on the output tick but never broadcast to children.
pub struct ActorProcessingError<M> {
    error: anyhow::Error,
    partial: Option<M>,
}

impl<M> ActorProcessingError<M> {
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            partial: None,
        }
    }

    /// Build an error from a plain message.
    pub fn msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::new(anyhow::Error::msg(message))
    }

    /// Attach the partial result produced before the failure.
    pub fn with_partial(mut self, partial: M) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn partial(&self) -> Option<&M> {
        self.partial.as_ref()
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.error
    }
}

impl<M> From<anyhow::Error> for ActorProcessingError<M> {
    fn from(error: anyhow::Error) -> Self {
        Self::new(error)
    }
}

impl<M> fmt::Display for ActorProcessingError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<M: fmt::Debug> fmt::Debug for ActorProcessingError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorProcessingError")
            .field("error", &self.error)
            .field("partial", &self.partial)
            .finish()
    }
}

impl<M: fmt::Debug> std::error::Error for ActorProcessingError<M> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_cause() {
        let error: ActorProcessingError<i64> = ActorProcessingError::msg("bad payload");
        assert_eq!(error.to_string(), "bad payload");
        assert!(error.partial().is_none());
    }

    #[test]
    fn test_partial_result_is_kept() {
        let error = ActorProcessingError::msg("half done").with_partial(21_i64);
        assert_eq!(error.partial(), Some(&21));
    }

    #[test]
    fn test_from_anyhow() {
        let error: ActorProcessingError<String> = anyhow::anyhow!("boom {}", 7).into();
        assert_eq!(error.cause().to_string(), "boom 7");
    }
}
