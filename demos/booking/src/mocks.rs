//! Mock environment dependencies for testing.

use crate::confirmation::{Confirmation, ConfirmationSender};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// Mock confirmation sender.
///
/// Records every confirmation instead of printing it. Clones share the same
/// record, so a test can keep one clone and hand another to the store.
#[derive(Debug, Clone, Default)]
pub struct RecordingConfirmationSender {
    sent: Arc<Mutex<Vec<Confirmation>>>,
}

impl RecordingConfirmationSender {
    /// Create a sender with an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmations delivered so far, in delivery order
    #[must_use]
    pub fn sent(&self) -> Vec<Confirmation> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConfirmationSender for RecordingConfirmationSender {
    fn send_confirmation(&self, confirmation: &Confirmation) -> impl Future<Output = ()> + Send {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(confirmation.clone());
        async {}
    }
}
