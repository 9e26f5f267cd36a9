use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::{AppId, PageId};

/// The structured payload living in the session-history state slot. `pages`
/// is sparse; a missing entry means "use that application's default page".
/// Map keys are the textual application id, matching the durable page map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<AppId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<BTreeMap<String, PageId>>,
}

impl NavRecord {
    pub fn with_app(app: AppId) -> Self {
        Self {
            app: Some(app),
            pages: None,
        }
    }

    pub fn with_page(app: AppId, page: PageId) -> Self {
        let mut pages = BTreeMap::new();
        pages.insert(app.to_string(), page);
        Self {
            app: None,
            pages: Some(pages),
        }
    }

    pub fn page_for(&self, app: AppId) -> Option<&PageId> {
        self.pages.as_ref()?.get(&app.to_string())
    }

    /// Lenient read: malformed fields degrade individually, never as a whole.
    pub fn decode(state: Option<&Value>) -> Self {
        let Some(Value::Object(fields)) = state else {
            return Self::default();
        };

        let app = fields
            .get("app")
            .and_then(Value::as_u64)
            .and_then(|raw| u32::try_from(raw).ok())
            .map(AppId);

        let pages = match fields.get("pages") {
            Some(Value::Object(entries)) => {
                let entries: BTreeMap<String, PageId> = entries
                    .iter()
                    .filter_map(|(key, value)| {
                        value.as_str().map(|page| (key.clone(), PageId::from(page)))
                    })
                    .collect();
                (!entries.is_empty()).then_some(entries)
            }
            _ => None,
        };

        Self { app, pages }
    }

    /// `app` is overwritten when the partial carries one; `pages` entries are
    /// unioned so other applications' entries survive.
    pub fn merged_over(self, base: NavRecord) -> NavRecord {
        let app = self.app.or(base.app);
        let pages = match (base.pages, self.pages) {
            (None, partial) => partial,
            (existing, None) => existing,
            (Some(mut existing), Some(partial)) => {
                existing.extend(partial);
                Some(existing)
            }
        };
        NavRecord { app, pages }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
