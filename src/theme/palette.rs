/// Ten shades from lightest to darkest.
pub type Palette = [&'static str; 10];

pub const APP_PRIMARY: Palette = [
    "#e7f5ff", "#d0ebff", "#a5d8ff", "#74c0fc", "#4dabf7", "#339af0", "#228be6", "#1c7ed6",
    "#1971c2", "#1864ab",
];

pub const APP_ACCENT: Palette = [
    "#e6fcf5", "#c3fae8", "#96f2d7", "#63e6be", "#38d9a9", "#20c997", "#12b886", "#0ca678",
    "#099268", "#087f5b",
];

pub const APP_GRAY: Palette = [
    "#f8f9fa", "#e9ecef", "#dee2e6", "#ced4da", "#adb5bd", "#6c757d", "#495057", "#343a40",
    "#212529", "#1a1f24",
];

// Shade used as the main tone of a palette.
pub const MAIN_SHADE: usize = 6;

pub mod colors {
    pub const PRIMARY: &str = "#228be6";
    pub const ACCENT: &str = "#12b886";
    pub const SUCCESS: &str = "#12b886";
    pub const ERROR: &str = "#E53E3E";
    pub const WARNING: &str = "#FF9500";
    pub const INFO: &str = "#228be6";
    pub const TEXT_PRIMARY: &str = "#1a1f24";
    pub const TEXT_SECONDARY: &str = "#46515e";
    pub const SURFACE_DARK: &str = "#1a1f24";
    pub const BACKGROUND_LIGHT: &str = "#ffffff";
}
