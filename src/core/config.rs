use serde::Deserialize;

// Session configuration.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    // Grant admin rights to the fallback identity built when the profile
    // service fails.
    fallback_admin: Option<bool>,
    // Pending units of work before callers wait.
    request_channel_buffer: Option<usize>,
}

impl Config {
    const DEFAULT_FALLBACK_ADMIN: bool = true;
    const DEFAULT_REQUEST_CHANNEL_BUFFER: usize = 64;

    pub fn set_fallback_admin(&mut self, val: Option<bool>) {
        if let Some(val) = val {
            self.fallback_admin = Some(val);
        }
    }
    pub fn set_request_channel_buffer(&mut self, val: Option<usize>) {
        if let Some(val) = val {
            self.request_channel_buffer = Some(std::cmp::max(val, 1));
        }
    }
    pub(crate) fn override_merge(&mut self, other: &mut Config) {
        self.set_fallback_admin(other.fallback_admin);
        self.set_request_channel_buffer(other.request_channel_buffer);
    }

    pub fn fallback_admin(&self) -> bool {
        self.fallback_admin
            .unwrap_or(Config::DEFAULT_FALLBACK_ADMIN)
    }

    pub fn request_channel_buffer(&self) -> usize {
        self.request_channel_buffer
            .unwrap_or(Config::DEFAULT_REQUEST_CHANNEL_BUFFER)
    }
}
