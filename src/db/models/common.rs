//! Small summaries embedded in other resources' responses.

use serde::{Deserialize, Serialize};

/// `{id, fullname}` view of an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub fullname: String,
}

/// `{id, name}` view of a repair service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: i64,
    pub name: String,
}

/// `{id, status}` view of a service booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrderSummary {
    pub id: i64,
    pub status: Option<String>,
}

/// Build a summary from the nullable columns of a LEFT JOIN
pub fn user_summary(id: Option<i64>, fullname: Option<String>) -> Option<UserSummary> {
    match (id, fullname) {
        (Some(id), Some(fullname)) => Some(UserSummary { id, fullname }),
        _ => None,
    }
}

pub fn service_summary(id: Option<i64>, name: Option<String>) -> Option<ServiceSummary> {
    match (id, name) {
        (Some(id), Some(name)) => Some(ServiceSummary { id, name }),
        _ => None,
    }
}

/// Current time in the format used for every timestamp column
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// `{ "success": true }` body returned by deletes
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_needs_both_columns() {
        assert!(user_summary(Some(1), None).is_none());
        assert!(user_summary(None, Some("A".to_string())).is_none());
        assert_eq!(
            user_summary(Some(1), Some("A".to_string())),
            Some(UserSummary {
                id: 1,
                fullname: "A".to_string()
            })
        );
        assert!(service_summary(Some(2), Some("Cleaning".to_string())).is_some());
    }
}
