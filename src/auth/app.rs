use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{Authenticator, TenantContext};
use crate::client::{decode, ApiClient, ApiRequest};
use crate::common::{debug, info, warn};
use crate::protocol::{endpoint, header, AccessToken, LoginRequest, RefreshRequest};
use crate::storage::TokenStore;
use crate::{AdminkitError, Result};

/// [`Authenticator`] for the `/api/v1/auth` contract.
pub struct AppAuthenticator {
    client: Arc<dyn ApiClient>,
    tenant: TenantContext,
    tokens: TokenStore,
}

impl AppAuthenticator {
    pub fn new(client: Arc<dyn ApiClient>, tenant: TenantContext, tokens: TokenStore) -> Self {
        Self {
            client,
            tenant,
            tokens,
        }
    }

    async fn request_token(&self, request: ApiRequest) -> Result<AccessToken> {
        match self.client.send(request).await {
            Ok(body) => decode(body),
            Err(AdminkitError::Status { status, message }) if is_rejection(status) => {
                Err(AdminkitError::authentication(if message.is_empty() {
                    format!("status {}", status)
                } else {
                    message
                }))
            }
            Err(err) => Err(err),
        }
    }
}

// Statuses the auth endpoints use for bad credentials or expired tokens.
fn is_rejection(status: u16) -> bool {
    matches!(status, 400 | 401 | 403)
}

#[async_trait]
impl Authenticator for AppAuthenticator {
    async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let body = LoginRequest {
            email: username.to_owned(),
            password: password.to_owned(),
            remember_me: Some(true),
        };
        let mut request = ApiRequest::post(endpoint::LOGIN, &body)?;
        if let Some(tenant_id) = self.tenant.id() {
            request = request.header(header::TENANT_ID, tenant_id);
        }

        info!(user=%username, tenant=?self.tenant.id(), "Login");
        self.request_token(request).await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken> {
        let body = RefreshRequest {
            token: refresh_token.to_owned(),
        };

        debug!("Refresh access token");
        self.request_token(ApiRequest::post(endpoint::REFRESH, &body)?)
            .await
    }

    async fn logout(&self) -> Result<()> {
        if let Some(access_token) = self.tokens.access_token().await? {
            let request =
                ApiRequest::post(endpoint::LOGOUT, &serde_json::json!({}))?.bearer(&access_token);
            if let Err(err) = self.client.send(request).await {
                warn!(%err, "Server side logout failed");
            }
        }

        self.tokens.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Method;
    use crate::storage::{key, LocalStorage, MemoryStorage};
    use std::sync::Mutex;

    // Replays canned responses and records requests.
    struct ScriptedClient {
        responses: Mutex<Vec<Result<serde_json::Value>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<serde_json::Value>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiClient for ScriptedClient {
        async fn send(&self, request: ApiRequest) -> Result<serde_json::Value> {
            self.requests.lock().unwrap().push(request);
            let response = self.responses.lock().unwrap().remove(0);
            response
        }
    }

    fn token_body() -> serde_json::Value {
        serde_json::json!({"accessToken": "a1", "refreshToken": "r1"})
    }

    fn status(status: u16) -> AdminkitError {
        AdminkitError::Status {
            status,
            message: "rejected".into(),
        }
    }

    #[test]
    fn login_with_tenant() {
        tokio_test::block_on(async move {
            let client = ScriptedClient::new(vec![Ok(token_body())]);
            let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
            let auth =
                AppAuthenticator::new(client.clone(), TenantContext::new("tenant-1"), tokens);

            let token = auth.login("jane.doe@example.com", "secret").await.unwrap();
            assert_eq!(token, AccessToken::new("a1", "r1"));

            let requests = client.requests();
            assert_eq!(requests.len(), 1);
            let req = &requests[0];
            assert_eq!(req.method, Method::Post);
            assert_eq!(req.path, endpoint::LOGIN);
            assert_eq!(req.header_value(header::TENANT_ID), Some("tenant-1"));
            assert_eq!(req.header_value(header::AUTHORIZATION), None);
            assert_eq!(
                req.body,
                Some(serde_json::json!({
                    "email": "jane.doe@example.com",
                    "password": "secret",
                    "rememberMe": true,
                }))
            );
        })
    }

    #[test]
    fn login_without_tenant() {
        tokio_test::block_on(async move {
            let client = ScriptedClient::new(vec![Ok(token_body())]);
            let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
            let auth = AppAuthenticator::new(client.clone(), TenantContext::none(), tokens);

            auth.login("jane.doe@example.com", "secret").await.unwrap();

            assert_eq!(client.requests()[0].header_value(header::TENANT_ID), None);
        })
    }

    #[test]
    fn bad_credentials() {
        tokio_test::block_on(async move {
            let client = ScriptedClient::new(vec![Err(status(401))]);
            let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
            let auth = AppAuthenticator::new(client, TenantContext::none(), tokens);

            let err = auth.login("jane.doe@example.com", "wrong").await.unwrap_err();
            assert!(matches!(err, AdminkitError::Authentication { ref message } if message == "rejected"));
        })
    }

    #[test]
    fn server_error_is_not_authentication() {
        tokio_test::block_on(async move {
            let client = ScriptedClient::new(vec![Err(status(500))]);
            let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
            let auth = AppAuthenticator::new(client, TenantContext::none(), tokens);

            let err = auth.refresh_token("r1").await.unwrap_err();
            assert_eq!(err.status(), Some(500));
        })
    }

    #[test]
    fn refresh_body() {
        tokio_test::block_on(async move {
            let client = ScriptedClient::new(vec![Ok(token_body())]);
            let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
            let auth = AppAuthenticator::new(client.clone(), TenantContext::new("t"), tokens);

            auth.refresh_token("r0").await.unwrap();

            let requests = client.requests();
            let req = &requests[0];
            assert_eq!(req.path, endpoint::REFRESH);
            assert_eq!(req.body, Some(serde_json::json!({"token": "r0"})));
            assert_eq!(req.header_value(header::TENANT_ID), None);
            assert_eq!(req.header_value(header::AUTHORIZATION), None);
        })
    }

    #[test]
    fn logout_clears_tokens_when_server_rejects() {
        tokio_test::block_on(async move {
            let client = ScriptedClient::new(vec![Err(status(500))]);
            let storage = Arc::new(MemoryStorage::new());
            let tokens = TokenStore::new(storage.clone());
            tokens.save(&AccessToken::new("a1", "r1")).await.unwrap();
            let auth = AppAuthenticator::new(client.clone(), TenantContext::none(), tokens);

            auth.logout().await.unwrap();

            let requests = client.requests();
            let req = &requests[0];
            assert_eq!(req.path, endpoint::LOGOUT);
            assert_eq!(req.header_value(header::AUTHORIZATION), Some("Bearer a1"));
            assert_eq!(storage.get_item(key::ACCESS_TOKEN).await.unwrap(), None);
            assert_eq!(storage.get_item(key::REFRESH_TOKEN).await.unwrap(), None);
        })
    }

    #[test]
    fn logout_without_token_skips_server() {
        tokio_test::block_on(async move {
            let client = ScriptedClient::new(vec![]);
            let storage = Arc::new(MemoryStorage::new());
            storage.set_item(key::REFRESH_TOKEN, "r1").await.unwrap();
            let auth = AppAuthenticator::new(
                client.clone(),
                TenantContext::none(),
                TokenStore::new(storage.clone()),
            );

            auth.logout().await.unwrap();

            assert!(client.requests().is_empty());
            assert_eq!(storage.get_item(key::REFRESH_TOKEN).await.unwrap(), None);
        })
    }
}
