use serde::Serialize;

/// Suffix selecting the "Completed" tab of a user's anime list
const COMPLETED_LIST_QUERY: &str = "?status=2";

/// A catalog user sampled from the "recently updated" listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    username: String,
    list_url: String,
}

impl User {
    /// Creates a user whose completed list lives under `base_url`
    pub fn new(base_url: &str, username: String) -> Self {
        let list_url = format!("{}/animelist/{}{}", base_url, username, COMPLETED_LIST_QUERY);
        Self { username, list_url }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// URL of the user's completed-watch list
    pub fn list_url(&self) -> &str {
        &self.list_url
    }
}
