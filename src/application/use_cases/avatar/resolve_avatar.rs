use crate::application::ports::account_repository::AccountRepository;
use crate::domain::accounts::Acct;

/// Where `/avatar/:acct` should send the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarResolution {
    /// The account has an avatar image of its own.
    Configured(String),
    /// The account exists but never set an avatar; serve its identicon.
    /// Carries the normalized acct so the caller can build the seed.
    GeneratedFallback(Acct),
    /// Unknown or suspended account.
    Placeholder,
}

pub struct ResolveAvatar<'a, R: AccountRepository + ?Sized> {
    pub repo: &'a R,
    /// Host of this instance, used to fold `@user@ownhost` into `@user`.
    pub own_host: &'a str,
}

impl<'a, R: AccountRepository + ?Sized> ResolveAvatar<'a, R> {
    pub async fn execute(&self, acct: Acct) -> anyhow::Result<AvatarResolution> {
        let acct = acct.normalize_local(self.own_host);
        let account = self.repo.find_by_acct(&acct).await?;
        Ok(match account {
            Some(a) if !a.is_suspended => match a.avatar_url {
                Some(url) => AvatarResolution::Configured(url),
                None => AvatarResolution::GeneratedFallback(acct),
            },
            _ => AvatarResolution::Placeholder,
        })
    }
}
