//! Redirect-URL policy (open-redirect guard).
//!
//! The redirect URL handed to the provider comes from the caller, so it is
//! validated structurally (absolute URL with an explicit scheme and host)
//! and against an allow-list before leaving this system.

use veriflow_core::{DomainError, DomainResult};

/// Allow-list policy for post-verification redirect URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPolicy {
    allowed_schemes: Vec<String>,
    /// `None` = any host. Hardened deployments pin this.
    allowed_hosts: Option<Vec<String>>,
}

impl Default for RedirectPolicy {
    /// https-only, any host.
    fn default() -> Self {
        Self {
            allowed_schemes: vec!["https".to_string()],
            allowed_hosts: None,
        }
    }
}

impl RedirectPolicy {
    pub fn new(
        allowed_schemes: impl IntoIterator<Item = impl Into<String>>,
        allowed_hosts: Option<Vec<String>>,
    ) -> Self {
        Self {
            allowed_schemes: allowed_schemes
                .into_iter()
                .map(|s| s.into().to_ascii_lowercase())
                .collect(),
            allowed_hosts: allowed_hosts.map(|hosts| {
                hosts
                    .into_iter()
                    .map(|h| h.to_ascii_lowercase())
                    .collect()
            }),
        }
    }

    /// Pin the set of acceptable redirect hosts.
    pub fn with_hosts(mut self, hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_hosts = Some(
            hosts
                .into_iter()
                .map(|h| h.into().to_ascii_lowercase())
                .collect(),
        );
        self
    }

    /// Validate a caller-supplied redirect URL.
    pub fn validate(&self, url: &str) -> DomainResult<()> {
        let url = url.trim();

        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| DomainError::invalid_input("redirect url must be absolute"))?;

        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return Err(DomainError::invalid_input("redirect url scheme is malformed"));
        }

        let scheme = scheme.to_ascii_lowercase();
        if !self.allowed_schemes.contains(&scheme) {
            return Err(DomainError::invalid_input(format!(
                "redirect url scheme '{scheme}' is not allowed"
            )));
        }

        let authority = rest
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        // Reject embedded credentials outright: "user@host" tricks are a
        // classic open-redirect vector.
        if authority.contains('@') {
            return Err(DomainError::invalid_input(
                "redirect url must not carry userinfo",
            ));
        }

        let host = authority.split(':').next().unwrap_or_default();
        if host.is_empty() {
            return Err(DomainError::invalid_input("redirect url host is empty"));
        }

        if let Some(allowed) = &self.allowed_hosts {
            let host = host.to_ascii_lowercase();
            if !allowed.contains(&host) {
                return Err(DomainError::invalid_input(format!(
                    "redirect host '{host}' is not allowed"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_accepts_https_urls() {
        let policy = RedirectPolicy::default();
        policy.validate("https://app.example.com/kyc/done").unwrap();
        policy.validate("https://app.example.com:8443/done?x=1").unwrap();
    }

    #[test]
    fn default_policy_rejects_http_and_relative_urls() {
        let policy = RedirectPolicy::default();
        assert!(policy.validate("http://app.example.com/done").is_err());
        assert!(policy.validate("/kyc/done").is_err());
        assert!(policy.validate("javascript://alert(1)").is_err());
        assert!(policy.validate("https://").is_err());
    }

    #[test]
    fn userinfo_is_rejected() {
        let policy = RedirectPolicy::default();
        assert!(policy
            .validate("https://trusted.example.com@evil.example.net/")
            .is_err());
    }

    #[test]
    fn pinned_hosts_are_enforced_case_insensitively() {
        let policy = RedirectPolicy::default().with_hosts(["app.example.com"]);

        policy.validate("https://APP.EXAMPLE.COM/done").unwrap();
        let err = policy.validate("https://evil.example.net/done").unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
