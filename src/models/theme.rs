use serde::{Deserialize, Deserializer, Serialize};

/// Visual theme of a published portfolio.
///
/// Stored as its name in the `portfolios.theme` column. Unknown or legacy
/// names read back as [`Theme::Light`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Cyan,
    Gradient,
}

/// Presentation attributes a frontend needs to render a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeAttributes {
    pub background: &'static str,
    pub accent: &'static str,
    pub image: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Light, Theme::Dark, Theme::Cyan, Theme::Gradient];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Cyan => "Cyan",
            Theme::Gradient => "Gradient",
        }
    }

    /// Case-insensitive lookup, falling back to the default theme.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    pub fn attributes(self) -> ThemeAttributes {
        match self {
            Theme::Light => ThemeAttributes {
                background: "bg-gray-100",
                accent: "bg-blue-500",
                image: "/light.png",
            },
            Theme::Dark => ThemeAttributes {
                background: "bg-gray-900",
                accent: "bg-purple-500",
                image: "/dark.png",
            },
            Theme::Cyan => ThemeAttributes {
                background: "bg-cyan-50",
                accent: "bg-cyan-500",
                image: "/cyan.png",
            },
            Theme::Gradient => ThemeAttributes {
                background: "bg-gradient-to-br from-purple-400 to-pink-400",
                accent: "bg-white",
                image: "/gradient.png",
            },
        }
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Theme::from_name(&name))
    }
}
