//! Static menu of the console.

use serde::Serialize;

use crate::core::AppUser;

pub mod routes;

/// Menu entry. Groups carry `links` and no `link`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub label: &'static str,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'static str>,
    // View rendered for the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<&'static str>,
    #[serde(skip_serializing_if = "is_empty")]
    pub links: &'static [NavigationItem],
    #[serde(skip_serializing_if = "is_empty")]
    pub required_permissions: &'static [&'static str],
}

impl NavigationItem {
    const fn leaf(label: &'static str, icon: &'static str, link: &'static str, view: &'static str) -> Self {
        Self {
            label,
            icon,
            link: Some(link),
            view: Some(view),
            links: &[],
            required_permissions: &[],
        }
    }

    const fn group(label: &'static str, icon: &'static str, links: &'static [NavigationItem]) -> Self {
        Self {
            label,
            icon,
            link: None,
            view: None,
            links,
            required_permissions: &[],
        }
    }

    pub fn is_group(&self) -> bool {
        !self.links.is_empty()
    }

    // Admins bypass permission checks.
    pub fn is_visible_to(&self, user: &AppUser) -> bool {
        user.is_administrator()
            || self
                .required_permissions
                .iter()
                .all(|permission| user.has_permission(permission))
    }
}

static SECURITY_LINKS: &[NavigationItem] = &[
    NavigationItem::leaf("Usuários", "users", routes::USUARIOS, "SecurityView"),
    NavigationItem::leaf("Tokens de API", "key", routes::API_TOKENS, "ApiTokenView"),
];

static NAVIGATION: &[NavigationItem] = &[
    NavigationItem::leaf("Home", "dashboard", routes::HOME, "HomeView"),
    NavigationItem::group("Segurança", "shield", SECURITY_LINKS),
];

pub fn navigation_data() -> &'static [NavigationItem] {
    NAVIGATION
}

/// Leaf items in menu order.
pub fn flatten(items: &'static [NavigationItem]) -> Vec<&'static NavigationItem> {
    let mut leaves = Vec::new();
    for item in items {
        if item.is_group() {
            leaves.extend(item.links.iter());
        } else {
            leaves.push(item);
        }
    }
    leaves
}

pub fn find_by_link(link: &str) -> Option<&'static NavigationItem> {
    flatten(NAVIGATION)
        .into_iter()
        .find(|item| item.link == Some(link))
}

/// Menu as seen by the user. Groups without visible children are dropped.
pub fn visible_to(user: &AppUser) -> Vec<VisibleItem> {
    NAVIGATION
        .iter()
        .filter(|item| item.is_visible_to(user))
        .filter_map(|item| {
            let links: Vec<VisibleItem> = item
                .links
                .iter()
                .filter(|link| link.is_visible_to(user))
                .map(|link| VisibleItem::new(link, Vec::new()))
                .collect();
            if item.is_group() && links.is_empty() {
                None
            } else {
                Some(VisibleItem::new(item, links))
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleItem {
    pub label: &'static str,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<VisibleItem>,
}

impl VisibleItem {
    fn new(item: &NavigationItem, links: Vec<VisibleItem>) -> Self {
        Self {
            label: item.label,
            icon: item.icon,
            link: item.link,
            view: item.view,
            links,
        }
    }
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}
