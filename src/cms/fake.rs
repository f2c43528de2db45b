use super::{CmsApi, CmsError, ContentItem, normalize_key};
use serde_json::Value;
use std::cell::RefCell;

/// In-memory CMS used by tool tests. Items are keyed by normalized key and locale.
#[derive(Default)]
pub struct FakeCms {
    pub items: RefCell<Vec<ContentItem>>,
    pub created: RefCell<Vec<ContentItem>>,
    pub updates: RefCell<Vec<(String, String, Value, Option<String>)>>,
    pub fail_with: RefCell<Option<u16>>,
    /// Lookups in this locale fail with a 500 while everything else works.
    pub fail_locale: RefCell<Option<String>>,
}

impl FakeCms {
    pub fn with_items(items: Vec<ContentItem>) -> Self {
        Self {
            items: RefCell::new(items),
            ..Self::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        let fake = Self::default();
        *fake.fail_with.borrow_mut() = Some(status);
        fake
    }

    fn check_failure(&self) -> Result<(), CmsError> {
        match *self.fail_with.borrow() {
            Some(status) => Err(CmsError::Http {
                status,
                body: serde_json::json!({"title": "simulated failure"}),
            }),
            None => Ok(()),
        }
    }
}

impl CmsApi for FakeCms {
    fn get_content(
        &self,
        key: &str,
        version: Option<&str>,
        locale: Option<&str>,
    ) -> Result<ContentItem, CmsError> {
        self.check_failure()?;
        if locale.is_some() && self.fail_locale.borrow().as_deref() == locale {
            return Err(CmsError::Http {
                status: 500,
                body: serde_json::json!({"title": "locale lookup failed"}),
            });
        }
        let key = normalize_key(key);
        self.items
            .borrow()
            .iter()
            .filter(|item| item.key.as_deref() == Some(key.as_str()))
            .filter(|item| locale.is_none() || item.locale.as_deref() == locale)
            .filter(|item| version.is_none() || item.version.as_deref() == version)
            .next_back()
            .cloned()
            .ok_or_else(|| CmsError::not_found(&key))
    }

    fn create_content(&self, content: &ContentItem) -> Result<ContentItem, CmsError> {
        self.check_failure()?;
        let mut stored = content.clone();
        stored.key = Some(
            stored
                .key
                .clone()
                .unwrap_or_else(|| "f00dfeedf00dfeedf00dfeedf00dfeed".to_string()),
        );
        stored.version = Some("1".to_string());
        stored.route_segment = stored
            .route_segment
            .or_else(|| stored.display_name.as_ref().map(|name| name.to_lowercase().replace(' ', "-")));
        stored.last_modified = Some("2024-01-01T00:00:00Z".to_string());
        self.created.borrow_mut().push(content.clone());
        self.items.borrow_mut().push(stored.clone());
        Ok(stored)
    }

    fn create_content_version(&self, content: &ContentItem) -> Result<ContentItem, CmsError> {
        self.check_failure()?;
        let mut stored = content.clone();
        stored.version = Some("100".to_string());
        self.created.borrow_mut().push(content.clone());
        self.items.borrow_mut().push(stored.clone());
        Ok(stored)
    }

    fn update_content(
        &self,
        key: &str,
        version: &str,
        updates: &Value,
        locale: Option<&str>,
    ) -> Result<ContentItem, CmsError> {
        self.updates.borrow_mut().push((
            key.to_string(),
            version.to_string(),
            updates.clone(),
            locale.map(str::to_string),
        ));
        let mut current = self.get_content(key, Some(version), locale)?;
        if let Some(name) = updates.get("displayName").and_then(Value::as_str) {
            current.display_name = Some(name.to_string());
        }
        if let Some(status) = updates.get("status").and_then(Value::as_str) {
            current.status = Some(status.to_string());
        }
        if let Some(properties) = updates.get("properties") {
            let base = current.properties.take().unwrap_or(Value::Null);
            current.properties = Some(crate::merge::merge(&base, Some(properties)));
        }
        Ok(current)
    }
}
