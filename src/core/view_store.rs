use std::collections::HashMap;

// Session scoped state keyed by view. Cleared on logout.
#[derive(Debug, Default)]
pub(crate) struct ViewStore {
    values: HashMap<String, serde_json::Value>,
}

impl ViewStore {
    pub(crate) fn get(&self, view: &str) -> Option<serde_json::Value> {
        self.values.get(view).cloned()
    }

    pub(crate) fn set(
        &mut self,
        view: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.values.insert(view.into(), value)
    }

    pub(crate) fn remove(&mut self, view: &str) -> Option<serde_json::Value> {
        self.values.remove(view)
    }

    pub(crate) fn reset(&mut self) {
        self.values.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}
