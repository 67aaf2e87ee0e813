// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use thiserror::Error;

/// How a handler failed.
#[derive(Error, Debug)]
pub enum HandlerFailure {
    /// The handler returned an error.
    #[error("{0:#}")]
    Returned(anyhow::Error),

    /// The handler panicked; the payload is rendered as text.
    #[error("panicked: {0}")]
    Panicked(String),
}

impl HandlerFailure {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        HandlerFailure::Panicked(message)
    }
}

/// A subscriber's handler failed during dispatch.
///
/// These never escape `dispatch`; they are logged and collected into the
/// [`DispatchOutcome`](crate::events::DispatchOutcome).
#[derive(Error, Debug)]
#[error("subscriber '{subscriber}' failed while handling '{event_type}': {failure}")]
pub struct HandlerError {
    /// Subscriber identity, `name#registration-id`
    pub subscriber: String,
    /// Concrete type of the dispatched event
    pub event_type: String,
    #[source]
    pub failure: HandlerFailure,
}

impl HandlerError {
    pub fn is_panic(&self) -> bool {
        matches!(self.failure, HandlerFailure::Panicked(_))
    }
}
