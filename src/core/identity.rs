use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::common::debug;
use crate::protocol::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Identity of the signed in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    pub id: String,
    pub display_name: String,
    pub email: String,
    // Decoded avatar. Avatars whose bytes are not utf-8 are dropped.
    pub photo: Option<String>,
    pub is_admin: bool,
    pub role: Role,
    pub permissions: Vec<String>,
    pub is_active: bool,
}

impl AppUser {
    /// Identity from the authoritative profile record.
    pub fn from_profile(profile: UserProfile) -> Self {
        let photo = profile
            .avatar
            .as_deref()
            .filter(|avatar| !avatar.is_empty())
            .and_then(decode_avatar);

        Self {
            id: profile.id,
            display_name: profile.name,
            email: profile.email,
            photo,
            is_admin: profile.is_administrator,
            role: Role::from_admin_flag(profile.is_administrator),
            permissions: Vec::new(),
            is_active: !profile.account_deactivated,
        }
    }

    /// Degraded identity built from the login name alone, used when the
    /// profile service can not answer.
    pub fn fallback(username: &str, grant_admin: bool) -> Self {
        let display_name = username.split('@').next().unwrap_or(username);

        Self {
            id: username.to_owned(),
            display_name: display_name.to_owned(),
            email: username.to_owned(),
            photo: None,
            is_admin: grant_admin,
            role: Role::from_admin_flag(grant_admin),
            permissions: Vec::new(),
            is_active: true,
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.is_admin
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_admin || self.permissions.iter().any(|p| p == permission)
    }
}

fn decode_avatar(avatar: &str) -> Option<String> {
    let bytes = match base64::engine::general_purpose::STANDARD.decode(avatar.trim()) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(%err, "Avatar is not valid base64");
            return None;
        }
    };
    match String::from_utf8(bytes) {
        Ok(photo) => Some(photo),
        Err(err) => {
            debug!(%err, "Avatar is not utf-8 text");
            None
        }
    }
}
