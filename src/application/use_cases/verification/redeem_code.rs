use crate::application::ports::profile_repository::ProfileRepository;
use crate::application::ports::stream_publisher::{
    AccountScopedEvent, StreamEvent, StreamPublisher,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    Verified,
    UnknownCode,
}

/// Burns an email verification code: flips the profile to verified, clears
/// the code, and pushes the refreshed account to the owner's stream.
pub struct RedeemVerifyCode<'a, P: ProfileRepository + ?Sized, S: StreamPublisher + ?Sized> {
    pub profiles: &'a P,
    pub events: &'a S,
}

impl<'a, P: ProfileRepository + ?Sized, S: StreamPublisher + ?Sized> RedeemVerifyCode<'a, P, S> {
    pub async fn execute(&self, code: &str) -> anyhow::Result<RedeemOutcome> {
        let Some(account_id) = self.profiles.redeem_verify_code(code).await? else {
            return Ok(RedeemOutcome::UnknownCode);
        };
        // The flip is committed at this point; stream delivery is best-effort.
        match self.profiles.snapshot(account_id).await {
            Ok(Some(snapshot)) => {
                let event = AccountScopedEvent {
                    account_id,
                    event: StreamEvent::MeUpdated(snapshot),
                };
                if let Err(err) = self.events.publish(&event).await {
                    tracing::warn!(account_id = %account_id, error = ?err, "me_updated_publish_failed");
                }
            }
            Ok(None) => {
                tracing::warn!(account_id = %account_id, "verified_account_snapshot_missing");
            }
            Err(err) => {
                tracing::warn!(account_id = %account_id, error = ?err, "verified_account_snapshot_failed");
            }
        }
        Ok(RedeemOutcome::Verified)
    }
}
