use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::AiError;

/// Cooperative cancellation flag shared between a caller and a running
/// prediction.
///
/// Checked between training epochs, between training and inference, and
/// between individual inference calls.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(AiError::Cancelled)` once [`cancel`](Self::cancel) has been called.
    pub fn check(&self) -> Result<(), AiError> {
        if self.is_cancelled() {
            return Err(AiError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(observer.check().is_ok());

        token.cancel();
        assert!(observer.is_cancelled());
        assert_eq!(observer.check(), Err(AiError::Cancelled));
    }
}
