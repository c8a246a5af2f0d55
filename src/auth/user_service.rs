use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::client::{decode, ApiClient, ApiRequest};
use crate::protocol::{endpoint, UserProfile};
use crate::Result;

// Characters left as is in a path segment, the same set js encodeURIComponent keeps.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Profile lookup for the signed in user.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn user_by_email(&self, access_token: &str, email: &str) -> Result<UserProfile>;
}

pub struct RemoteUserService {
    client: Arc<dyn ApiClient>,
}

impl RemoteUserService {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    fn by_email_path(email: &str) -> String {
        format!(
            "{}/email/{}",
            endpoint::USERS,
            utf8_percent_encode(email, PATH_SEGMENT)
        )
    }
}

#[async_trait]
impl UserService for RemoteUserService {
    async fn user_by_email(&self, access_token: &str, email: &str) -> Result<UserProfile> {
        let request = ApiRequest::get(RemoteUserService::by_email_path(email)).bearer(access_token);
        decode(self.client.send(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_percent_encoded() {
        assert_eq!(
            RemoteUserService::by_email_path("jane.doe+admin@example.com"),
            "/api/v1/users/email/jane.doe%2Badmin%40example.com"
        );
    }
}
