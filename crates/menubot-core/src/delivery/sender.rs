//! ReplySender trait definition.

use menubot_types::error::DeliveryError;
use menubot_types::message::OutboundMessage;

/// Trait for backends that deliver a text reply to an end user.
///
/// Uses native async fn in traits (RPITIT). Wrap an implementation in
/// [`BoxReplySender`](super::BoxReplySender) when the concrete type is
/// chosen at runtime.
pub trait ReplySender: Send + Sync {
    /// Short backend name for logs (e.g. "whatsapp").
    fn name(&self) -> &str;

    /// Deliver `message` to `message.to`.
    fn send(
        &self,
        message: &OutboundMessage,
    ) -> impl std::future::Future<Output = Result<(), DeliveryError>> + Send;
}
