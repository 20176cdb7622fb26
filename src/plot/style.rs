use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The recognised chart styles, named after the seaborn themes the form and
/// CLI expose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotStyle {
    #[default]
    DarkGrid,
    WhiteGrid,
    Dark,
    White,
    Ticks,
}

impl PlotStyle {
    pub const ALL: [Self; 5] = [
        Self::DarkGrid,
        Self::WhiteGrid,
        Self::Dark,
        Self::White,
        Self::Ticks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DarkGrid => "darkgrid",
            Self::WhiteGrid => "whitegrid",
            Self::Dark => "dark",
            Self::White => "white",
            Self::Ticks => "ticks",
        }
    }

    /// Resolves a style name, falling back to the default style with a
    /// warning when the name is not recognised.
    pub fn resolve(name: &str) -> (Self, Option<String>) {
        match name.parse() {
            Ok(style) => (style, None),
            Err(UnknownStyle(bad)) => {
                let fallback = Self::default();
                let warning = format!(
                    "Unknown style '{bad}', using '{fallback}' (expected one of: {})",
                    Self::ALL.map(|s| s.as_str()).join(", ")
                );
                (fallback, Some(warning))
            }
        }
    }

    pub fn theme(&self) -> Theme {
        let white = RGBColor(255, 255, 255);
        let lavender = RGBColor(234, 234, 242);
        match self {
            Self::DarkGrid => Theme {
                panel: lavender,
                grid: Some(white),
                axis: lavender,
                ..Theme::BASE
            },
            Self::WhiteGrid => Theme {
                grid: Some(RGBColor(204, 204, 204)),
                axis: RGBColor(204, 204, 204),
                ..Theme::BASE
            },
            Self::Dark => Theme {
                panel: lavender,
                axis: lavender,
                ..Theme::BASE
            },
            Self::White => Theme {
                axis: RGBColor(204, 204, 204),
                ..Theme::BASE
            },
            Self::Ticks => Theme::BASE,
        }
    }
}

impl fmt::Display for PlotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown plot style '{}'", self.0)
    }
}

impl std::error::Error for UnknownStyle {}

impl FromStr for PlotStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| UnknownStyle(s.to_owned()))
    }
}

/// Colours used to draw one chart.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub background: RGBColor,
    pub panel: RGBColor,
    pub grid: Option<RGBColor>,
    pub axis: RGBColor,
    pub bar: RGBColor,
    pub edge: RGBColor,
    /// Density curve over histograms.
    pub line: RGBColor,
    pub text: RGBColor,
}

impl Theme {
    const BASE: Self = Self {
        background: RGBColor(255, 255, 255),
        panel: RGBColor(255, 255, 255),
        grid: None,
        axis: RGBColor(38, 38, 38),
        bar: RGBColor(76, 114, 176),
        edge: RGBColor(255, 255, 255),
        line: RGBColor(221, 132, 82),
        text: RGBColor(38, 38, 38),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_styles() {
        for style in PlotStyle::ALL {
            assert_eq!(style.as_str().parse::<PlotStyle>(), Ok(style));
        }
        assert_eq!(" WhiteGrid ".parse::<PlotStyle>(), Ok(PlotStyle::WhiteGrid));
    }

    #[test]
    fn test_resolve_falls_back_with_warning() {
        let (style, warning) = PlotStyle::resolve("neon");
        assert_eq!(style, PlotStyle::DarkGrid);
        let warning = warning.unwrap();
        assert!(warning.contains("neon"));
        assert!(warning.contains("whitegrid"));

        assert_eq!(PlotStyle::resolve("ticks"), (PlotStyle::Ticks, None));
    }

    #[test]
    fn test_grid_only_on_grid_styles() {
        assert!(PlotStyle::DarkGrid.theme().grid.is_some());
        assert!(PlotStyle::WhiteGrid.theme().grid.is_some());
        assert!(PlotStyle::Dark.theme().grid.is_none());
        assert!(PlotStyle::White.theme().grid.is_none());
        assert!(PlotStyle::Ticks.theme().grid.is_none());
    }
}
