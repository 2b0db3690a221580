//! Pre-obtained credential for a Salesforce org

use omni_core::{OmniError, Result};
use std::env;

/// Scopes the compiler pages require: `web` for the frontdoor login, `api`
/// for the listing queries.
pub const REQUIRED_SCOPES: &[&str] = &["web", "api"];

/// An authenticated session against one org.
///
/// Obtained externally; this type only carries the credential around and
/// validates its scopes.
#[derive(Debug, Clone)]
pub struct Session {
    /// Org base URL, e.g. `https://example.my.salesforce.com`
    pub instance_url: String,
    /// OAuth access token
    pub access_token: String,
    /// Scopes granted to the token
    pub scopes: Vec<String>,
}

impl Session {
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        scopes: Vec<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            scopes,
        }
    }

    /// Load the credential from `SF_INSTANCE_URL`, `SF_ACCESS_TOKEN` and
    /// `SF_SCOPES` (space- or comma-separated; defaults to `web api` when
    /// unset, matching what the standard CLI login flows grant).
    pub fn from_env() -> Result<Self> {
        let instance_url = env::var("SF_INSTANCE_URL")
            .map_err(|_| OmniError::Session("SF_INSTANCE_URL is not set".to_string()))?;
        let access_token = env::var("SF_ACCESS_TOKEN")
            .map_err(|_| OmniError::Session("SF_ACCESS_TOKEN is not set".to_string()))?;
        let scopes = env::var("SF_SCOPES")
            .unwrap_or_else(|_| "web api".to_string())
            .split([' ', ','])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self::new(instance_url, access_token, scopes))
    }

    /// Fail fast if any of `required` is missing from the granted scopes
    pub fn require_scopes(&self, required: &[&str]) -> Result<()> {
        for scope in required {
            if !self.scopes.iter().any(|s| s == scope) {
                return Err(OmniError::MissingScope(scope.to_string()));
            }
        }
        Ok(())
    }

    /// URL of the session-bootstrap endpoint that turns the access token
    /// into a browser session
    pub fn frontdoor_url(&self) -> String {
        format!(
            "{}/secur/frontdoor.jsp?sid={}",
            self.instance_url, self.access_token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(scopes: &[&str]) -> Session {
        Session::new(
            "https://example.my.salesforce.com/",
            "00Dxx!token",
            scopes.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let s = session(&[]);
        assert_eq!(s.instance_url, "https://example.my.salesforce.com");
    }

    #[test]
    fn test_require_scopes_present() {
        let s = session(&["web", "api", "refresh_token"]);
        assert!(s.require_scopes(REQUIRED_SCOPES).is_ok());
    }

    #[test]
    fn test_require_scopes_missing() {
        let s = session(&["api"]);
        let err = s.require_scopes(REQUIRED_SCOPES).unwrap_err();
        assert!(matches!(err, OmniError::MissingScope(ref scope) if scope == "web"));
    }

    #[test]
    fn test_frontdoor_url() {
        let s = session(&["web", "api"]);
        assert_eq!(
            s.frontdoor_url(),
            "https://example.my.salesforce.com/secur/frontdoor.jsp?sid=00Dxx!token"
        );
    }
}
