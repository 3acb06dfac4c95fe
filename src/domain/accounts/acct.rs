use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static RE_USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_]([A-Za-z0-9_.-]{0,126}[A-Za-z0-9_])?$").expect("valid username regex")
});
static RE_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9.-]+(:[0-9]{1,5})?$").expect("valid host regex"));

/// A fediverse account address: `@username` for local accounts,
/// `@username@host` for remote ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acct {
    pub username: String,
    /// Absent for local accounts. Always lowercase.
    pub host: Option<String>,
}

/// Why an acct string could not be parsed. Callers translate this into a
/// client error; it never escalates further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AcctParseError {
    #[error("acct must start with '@'")]
    MissingAtPrefix,
    #[error("acct username is empty or contains illegal characters")]
    BadUsername,
    #[error("acct host is empty or contains illegal characters")]
    BadHost,
    #[error("acct has too many '@' separators")]
    TooManyParts,
}

impl Acct {
    /// Parses the `@username[@host]` form used in avatar URLs.
    pub fn parse(raw: &str) -> Result<Self, AcctParseError> {
        let rest = raw.strip_prefix('@').ok_or(AcctParseError::MissingAtPrefix)?;
        Self::parse_bare(rest)
    }

    /// Parses the bare `username[@host]` form (webfinger `acct:` resources).
    pub fn parse_bare(raw: &str) -> Result<Self, AcctParseError> {
        let mut parts = raw.split('@');
        let username = parts.next().unwrap_or_default();
        let host = parts.next();
        if parts.next().is_some() {
            return Err(AcctParseError::TooManyParts);
        }
        if !RE_USERNAME.is_match(username) {
            return Err(AcctParseError::BadUsername);
        }
        let host = match host {
            None => None,
            Some(h) => {
                let h = h.to_ascii_lowercase();
                if !RE_HOST.is_match(&h) {
                    return Err(AcctParseError::BadHost);
                }
                Some(h)
            }
        };
        Ok(Self {
            username: username.to_string(),
            host,
        })
    }

    /// Folds "host equals this instance" into "no host": both mean local.
    pub fn normalize_local(mut self, own_host: &str) -> Self {
        if self
            .host
            .as_deref()
            .is_some_and(|h| h.eq_ignore_ascii_case(own_host))
        {
            self.host = None;
        }
        self
    }

    pub fn is_local(&self) -> bool {
        self.host.is_none()
    }
}

impl fmt::Display for Acct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            Some(host) => write!(f, "@{}@{}", self.username, host),
            None => write!(f, "@{}", self.username),
        }
    }
}
