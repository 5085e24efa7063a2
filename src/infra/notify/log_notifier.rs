use crate::domain::models::notification::Notification;
use crate::domain::ports::Notifier;
use crate::error::AppError;
use async_trait::async_trait;
use tracing::info;

/// Stand-in for the external notification collaborator: serializes the
/// structured payload into the log stream. Real delivery lives outside the
/// engine.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), AppError> {
        let payload = serde_json::to_string(notification)
            .map_err(|e| AppError::Validation(format!("unserializable notification: {}", e)))?;
        info!(target: "notifications", "{}", payload);
        Ok(())
    }
}
