//! BoxReplySender -- object-safe dynamic dispatch wrapper for ReplySender.
//!
//! 1. `ReplySenderDyn` is the object-safe twin of `ReplySender` with boxed futures
//! 2. Blanket impl of `ReplySenderDyn` for every `T: ReplySender`
//! 3. `BoxReplySender` wraps `Box<dyn ReplySenderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use menubot_types::error::DeliveryError;
use menubot_types::message::OutboundMessage;

use super::sender::ReplySender;

/// Object-safe version of [`ReplySender`] with boxed futures.
pub trait ReplySenderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn send_boxed<'a>(
        &'a self,
        message: &'a OutboundMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>>;
}

impl<T: ReplySender> ReplySenderDyn for T {
    fn name(&self) -> &str {
        ReplySender::name(self)
    }

    fn send_boxed<'a>(
        &'a self,
        message: &'a OutboundMessage,
    ) -> Pin<Box<dyn Future<Output = Result<(), DeliveryError>> + Send + 'a>> {
        Box::pin(self.send(message))
    }
}

/// Type-erased reply sender.
///
/// `ReplySender` uses RPITIT and cannot be a trait object directly; this
/// wrapper exposes the same methods over `dyn ReplySenderDyn`.
pub struct BoxReplySender {
    inner: Box<dyn ReplySenderDyn + Send + Sync>,
}

impl BoxReplySender {
    pub fn new<T: ReplySender + 'static>(sender: T) -> Self {
        Self {
            inner: Box::new(sender),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        self.inner.send_boxed(message).await
    }
}

impl std::fmt::Debug for BoxReplySender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxReplySender")
            .field("name", &self.name())
            .finish()
    }
}
