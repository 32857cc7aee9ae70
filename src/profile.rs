use serde_json::Value;

use crate::error::{PipelineStage, TiqResult};
use crate::http::HttpRequest;
use crate::session::SessionManager;

/// Sub-resources requested alongside the profile, in request order.
pub const PROFILE_INCLUDES: [&str; 6] = [
    "loadRules",
    "tags",
    "extensions",
    "variables",
    "events",
    "versionIDs",
];

/// Fetches the full profile document through an authenticated session.
pub struct ProfileFetcher {
    session: SessionManager,
}

impl ProfileFetcher {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    fn profile_url(&self) -> String {
        let creds = self.session.credentials();
        let query = PROFILE_INCLUDES
            .iter()
            .map(|include| format!("includes={include}"))
            .collect::<Vec<_>>()
            .join("&");
        format!(
            "https://{}/v3/tiq/accounts/{}/profiles/{}?{}",
            self.session.session().endpoint_host,
            creds.account,
            creds.profile,
            query
        )
    }

    /// Authenticate if needed, then GET the profile and return its JSON body
    /// without any schema checks.
    pub async fn fetch_profile(&mut self) -> TiqResult<Value> {
        self.session
            .ensure_authenticated()
            .await
            .map_err(|e| e.at(PipelineStage::Authenticate))?;

        self.request_profile()
            .await
            .map_err(|e| e.at(PipelineStage::FetchProfile))
    }

    async fn request_profile(&self) -> TiqResult<Value> {
        let url = self.profile_url();
        let token = self.session.session().token().unwrap_or_default();
        let request = HttpRequest::get(&url).with_header("Authorization", format!("Bearer {token}"));

        tracing::info!(host = %self.session.session().endpoint_host, "Fetching profile");
        let response = self.session.http().send(request).await?.error_for_status(&url)?;
        response.json()
    }
}
