//! GitHub repositories lookup, an external collaborator call.

use serde_json::Value;

use crate::config;
use crate::error::ApiError;

/// Fetch the user's five most recently created public repositories.
///
/// Per-deployment client credentials are appended when configured. Any
/// non-success upstream status is reported as a missing GitHub profile.
pub async fn user_repos(username: &str) -> Result<Value, ApiError> {
    let github = &config::config().github;

    let url = format!("https://api.github.com/users/{}/repos", username);
    let mut query: Vec<(&str, String)> =
        vec![("per_page", "5".to_string()), ("sort", "created:asc".to_string())];
    if let Some(client_id) = &github.client_id {
        query.push(("client_id", client_id.clone()));
    }
    if let Some(client_secret) = &github.client_secret {
        query.push(("client_secret", client_secret.clone()));
    }

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .query(&query)
        .header(reqwest::header::USER_AGENT, &github.user_agent)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("GitHub request failed: {}", e);
            ApiError::bad_gateway("Unable to reach GitHub")
        })?;

    if !response.status().is_success() {
        return Err(ApiError::not_found("No Github profile found"));
    }

    response.json::<Value>().await.map_err(|e| {
        tracing::error!("GitHub response decode failed: {}", e);
        ApiError::bad_gateway("Unable to reach GitHub")
    })
}
