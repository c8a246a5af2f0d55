//! Light and dark console themes and the persisted color scheme.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::common::debug;
use crate::storage::{key, LocalStorage};
use crate::Result;

pub mod palette;
use self::palette::{Palette, APP_ACCENT, APP_GRAY, APP_PRIMARY};

const FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    pub app_primary: Palette,
    pub app_accent: Palette,
    pub app_gray: Palette,
}

// Background and text of the layout chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub navbar_background: &'static str,
    pub navbar_border: &'static str,
    pub card_background: &'static str,
    pub card_text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub scheme: ColorScheme,
    pub primary_color: &'static str,
    pub colors: Colors,
    pub default_radius: &'static str,
    pub font_family: &'static str,
    pub heading_font_weight: &'static str,
    pub surface: Surface,
}

const COLORS: Colors = Colors {
    app_primary: APP_PRIMARY,
    app_accent: APP_ACCENT,
    app_gray: APP_GRAY,
};

pub const LIGHT: Theme = Theme {
    scheme: ColorScheme::Light,
    primary_color: "appPrimary",
    colors: COLORS,
    default_radius: "md",
    font_family: FONT_FAMILY,
    heading_font_weight: "600",
    surface: Surface {
        navbar_background: "#ffffff",
        navbar_border: "1px solid rgba(0, 0, 0, 0.1)",
        card_background: "#ffffff",
        card_text: "#1a1f24",
    },
};

pub const DARK: Theme = Theme {
    scheme: ColorScheme::Dark,
    surface: Surface {
        navbar_background: "#1a1f24",
        navbar_border: "1px solid rgba(255, 255, 255, 0.1)",
        card_background: "#212529",
        card_text: "#f8f9fa",
    },
    ..LIGHT
};

impl Theme {
    pub fn palette(&self, name: &str) -> Option<&Palette> {
        match name {
            "appPrimary" => Some(&self.colors.app_primary),
            "appAccent" => Some(&self.colors.app_accent),
            "appGray" => Some(&self.colors.app_gray),
            _ => None,
        }
    }

    pub fn primary(&self) -> &'static str {
        self.colors.app_primary[palette::MAIN_SHADE]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    pub fn toggle(self) -> Self {
        match self {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        }
    }

    pub fn theme(self) -> &'static Theme {
        match self {
            ColorScheme::Light => &LIGHT,
            ColorScheme::Dark => &DARK,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
        }
    }

    /// Persisted scheme, light when unset or unknown.
    pub async fn load(storage: &dyn LocalStorage) -> Result<Self> {
        let scheme = match storage.get_item(key::COLOR_SCHEME).await? {
            Some(value) => value.parse().unwrap_or_else(|_| {
                debug!(%value, "Unknown color scheme");
                ColorScheme::default()
            }),
            None => ColorScheme::default(),
        };
        Ok(scheme)
    }

    pub async fn save(self, storage: &dyn LocalStorage) -> Result<()> {
        storage.set_item(key::COLOR_SCHEME, self.as_str()).await
    }

    /// Flip the persisted scheme and return the new one.
    pub async fn toggle_persisted(storage: &dyn LocalStorage) -> Result<Self> {
        let scheme = ColorScheme::load(storage).await?.toggle();
        scheme.save(storage).await?;
        Ok(scheme)
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            other => Err(format!("unknown color scheme {}", other)),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
