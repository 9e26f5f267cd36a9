use crate::error::AppResult;
use crate::registry::{AppEntry, AppId, Registry};

pub struct Screen {
    pub heading: &'static str,
    pub summary: &'static str,
    pub fields: &'static [(&'static str, &'static str)],
}

impl Screen {
    const fn new(
        heading: &'static str,
        summary: &'static str,
        fields: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            heading,
            summary,
            fields,
        }
    }
}

/// Three admin-style demo applications; application `1` and page `"index"`
/// are the designated defaults throughout.
pub fn demo_registry() -> AppResult<Registry<Screen>> {
    Registry::new(
        AppId(1),
        vec![
            (
                AppId(1),
                AppEntry::new("Accounts", "index")
                    .with_page(
                        "index",
                        Screen::new(
                            "Accounts overview",
                            "Tenant accounts and their operators.",
                            &[("accounts", "34"), ("operators", "128"), ("pending invites", "5")],
                        ),
                    )
                    .with_page(
                        "users",
                        Screen::new(
                            "Users",
                            "Operator directory for the selected account.",
                            &[("active", "119"), ("suspended", "9")],
                        ),
                    )
                    .with_page(
                        "roles",
                        Screen::new(
                            "Roles",
                            "Role assignments and permission sets.",
                            &[("roles", "12"), ("custom policies", "4")],
                        ),
                    ),
            ),
            (
                AppId(2),
                AppEntry::new("Catalog", "index")
                    .with_page(
                        "index",
                        Screen::new(
                            "Catalog overview",
                            "Master data for factories, items and suppliers.",
                            &[("factories", "7"), ("items", "2431"), ("suppliers", "58")],
                        ),
                    )
                    .with_page(
                        "items",
                        Screen::new(
                            "Items",
                            "Item tree with per-factory availability.",
                            &[("leaf items", "2204"), ("groups", "227")],
                        ),
                    )
                    .with_page(
                        "suppliers",
                        Screen::new(
                            "Suppliers",
                            "Supplier contacts and delivery terms.",
                            &[("active", "51"), ("blocked", "7")],
                        ),
                    ),
            ),
            (
                AppId(3),
                AppEntry::new("Reports", "index")
                    .with_page(
                        "index",
                        Screen::new(
                            "Reports overview",
                            "Scheduled and ad-hoc report runs.",
                            &[("scheduled", "16"), ("failed this week", "1")],
                        ),
                    )
                    .with_page(
                        "daily",
                        Screen::new(
                            "Daily digest",
                            "Per-factory daily production digest.",
                            &[("recipients", "42")],
                        ),
                    )
                    .with_page(
                        "export",
                        Screen::new(
                            "Exports",
                            "Spreadsheet export jobs and their history.",
                            &[("queued", "0"), ("completed", "310")],
                        ),
                    ),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use crate::registry::{AppId, PageId};

    use super::demo_registry;

    #[test]
    fn demo_catalogue_is_valid_and_defaults_to_accounts() {
        let registry = demo_registry().expect("demo catalogue should validate");

        assert_eq!(registry.default_app(), AppId(1));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.default_page(AppId(2)), PageId::from("index"));
    }
}
