//! Administrator listings.

use std::sync::Arc;

use careportal_domain::{AuditLogEntry, UserSummary, decode, endpoints};

use crate::error::ApplicationResult;
use crate::ports::ApiClient;

/// Lists every user account.
pub struct ListUsers<C: ApiClient> {
    client: Arc<C>,
}

impl<C: ApiClient> ListUsers<C> {
    /// Creates a new `ListUsers` use case.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetches the user list.
    ///
    /// # Errors
    /// Returns the server's message (e.g. for a non-admin caller).
    pub async fn execute(&self) -> ApplicationResult<Vec<UserSummary>> {
        Ok(decode(self.client.get(endpoints::ADMIN_USERS).await?)?)
    }
}

/// Lists the audit trail.
pub struct ListAuditLogs<C: ApiClient> {
    client: Arc<C>,
}

impl<C: ApiClient> ListAuditLogs<C> {
    /// Creates a new `ListAuditLogs` use case.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetches the audit log entries.
    ///
    /// # Errors
    /// Returns the server's message (e.g. for a non-admin caller).
    pub async fn execute(&self) -> ApplicationResult<Vec<AuditLogEntry>> {
        Ok(decode(self.client.get(endpoints::ADMIN_AUDIT_LOGS).await?)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::MockApiClient;
    use careportal_domain::{ApiError, ApiMethod};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_users() {
        let client = Arc::new(MockApiClient::new());
        client.respond(
            ApiMethod::Get,
            endpoints::ADMIN_USERS,
            Ok(json!([{"id": "u1", "email": "a@h.org", "roles": ["admin"]}])),
        );

        let users = ListUsers::new(client).execute().await.unwrap();

        assert_eq!(users[0].roles, vec!["admin"]);
    }

    #[tokio::test]
    async fn test_list_audit_logs() {
        let client = Arc::new(MockApiClient::new());
        client.respond(
            ApiMethod::Get,
            endpoints::ADMIN_AUDIT_LOGS,
            Ok(json!([{"id": "l1", "user_id": "u1", "action": "delete_record"}])),
        );

        let entries = ListAuditLogs::new(client).execute().await.unwrap();

        assert_eq!(entries[0].action, "delete_record");
    }

    #[tokio::test]
    async fn test_forbidden_surfaces_server_message() {
        let client = Arc::new(MockApiClient::new());
        client.respond(
            ApiMethod::Get,
            endpoints::ADMIN_USERS,
            Err(ApiError::application(403, "Not enough permissions")),
        );

        let err = ListUsers::new(client).execute().await.unwrap_err();

        assert_eq!(err.to_string(), "Not enough permissions");
    }
}
