use serde::Deserialize;

// Multi-tenancy discriminator sent with login.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct TenantContext {
    id: Option<String>,
}

impl TenantContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn set_id(&mut self, val: &mut Option<String>) {
        if let Some(val) = val.take() {
            self.id = Some(val)
        }
    }

    pub(crate) fn override_merge(&mut self, other: &mut TenantContext) {
        self.set_id(&mut other.id);
    }

    // Blank ids count as unset.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}
