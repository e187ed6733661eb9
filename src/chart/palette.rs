//! Named colour schemes and the visual-map ramps derived from them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Default,
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Cyan,
    Pink,
    Yellow,
    Warm,
    Cool,
    Vintage,
    Rainbow,
}

/// Eleven-step diverging ramp shared by several schemes.
const DIVERGING_RAMP: &[&str] = &[
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026",
];

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Default => "default",
            ColorScheme::Blue => "blue",
            ColorScheme::Green => "green",
            ColorScheme::Purple => "purple",
            ColorScheme::Orange => "orange",
            ColorScheme::Red => "red",
            ColorScheme::Cyan => "cyan",
            ColorScheme::Pink => "pink",
            ColorScheme::Yellow => "yellow",
            ColorScheme::Warm => "warm",
            ColorScheme::Cool => "cool",
            ColorScheme::Vintage => "vintage",
            ColorScheme::Rainbow => "rainbow",
        }
    }

    /// Look a scheme up by name. Unknown names fall back to `Default`.
    pub fn from_name(name: &str) -> Self {
        Self::iterator()
            .find(|s| s.as_str() == name)
            .unwrap_or_default()
    }

    pub fn iterator() -> impl Iterator<Item = ColorScheme> {
        [
            ColorScheme::Default,
            ColorScheme::Blue,
            ColorScheme::Green,
            ColorScheme::Purple,
            ColorScheme::Orange,
            ColorScheme::Red,
            ColorScheme::Cyan,
            ColorScheme::Pink,
            ColorScheme::Yellow,
            ColorScheme::Warm,
            ColorScheme::Cool,
            ColorScheme::Vintage,
            ColorScheme::Rainbow,
        ]
        .iter()
        .copied()
    }

    /// The series palette.
    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            ColorScheme::Default => &[
                "#5470c6", "#91cc75", "#fac858", "#ee6666", "#73c0de", "#3ba272", "#fc8452",
                "#9a60b4", "#ea7ccc",
            ],
            ColorScheme::Blue => &[
                "#3b82f6", "#60a5fa", "#2563eb", "#1d4ed8", "#1e40af", "#3730a3", "#6366f1",
                "#8b5cf6", "#a78bfa",
            ],
            ColorScheme::Green => &[
                "#10b981", "#34d399", "#059669", "#047857", "#065f46", "#064e3b", "#84cc16",
                "#a3e635", "#bef264",
            ],
            ColorScheme::Purple => &[
                "#8b5cf6", "#a78bfa", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95", "#ec4899",
                "#f472b6", "#f9a8d4",
            ],
            ColorScheme::Orange => &[
                "#f59e0b", "#fbbf24", "#d97706", "#b45309", "#92400e", "#78350f", "#ef4444",
                "#f87171", "#fca5a5",
            ],
            ColorScheme::Red => &[
                "#ef4444", "#f87171", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d", "#f97316",
                "#fb923c", "#fdba74",
            ],
            ColorScheme::Cyan => &[
                "#06b6d4", "#22d3ee", "#0891b2", "#0e7490", "#155e75", "#164e63", "#14b8a6",
                "#2dd4bf", "#5eead4",
            ],
            ColorScheme::Pink => &[
                "#ec4899", "#f472b6", "#db2777", "#be185d", "#9d174d", "#831843", "#f59e0b",
                "#fbbf24", "#fcd34d",
            ],
            ColorScheme::Yellow => &[
                "#eab308", "#facc15", "#ca8a04", "#a16207", "#854d0e", "#713f12", "#f97316",
                "#fb923c", "#fdba74",
            ],
            ColorScheme::Warm => &[
                "#ff6b6b", "#ffa07a", "#ffd93d", "#ff9a76", "#ff6347", "#ff7f50", "#ffa500",
                "#ff8c00", "#ff4500",
            ],
            ColorScheme::Cool => &[
                "#6495ed", "#4682b4", "#4169e1", "#00bfff", "#1e90ff", "#00ced1", "#008b8b",
                "#20b2aa", "#5f9ea0",
            ],
            ColorScheme::Vintage => &[
                "#d87c7c", "#919e8b", "#d7ab82", "#6e7074", "#61a0a8", "#efa18d", "#787464",
                "#cc7e63", "#724e58",
            ],
            ColorScheme::Rainbow => &[
                "#ef4444", "#f59e0b", "#eab308", "#10b981", "#06b6d4", "#3b82f6", "#8b5cf6",
                "#ec4899",
            ],
        }
    }

    /// Palette colour at `index`, wrapping around.
    pub fn single_color(&self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }

    /// Three-stop light-to-dark ramp for heatmaps.
    pub fn heatmap_ramp(&self) -> &'static [&'static str] {
        match self {
            ColorScheme::Default => &["#f0f9eb", "#5470c6", "#2a335b"],
            _ => self.light_ramp(),
        }
    }

    /// Ramp for 3-D surfaces: the heatmap ramps, with the diverging ramp as default.
    pub fn surface_ramp(&self) -> &'static [&'static str] {
        match self {
            ColorScheme::Default => DIVERGING_RAMP,
            _ => self.light_ramp(),
        }
    }

    fn light_ramp(&self) -> &'static [&'static str] {
        match self {
            ColorScheme::Default | ColorScheme::Blue => &["#e0f2fe", "#0ea5e9", "#0369a1"],
            ColorScheme::Green => &["#dcfce7", "#22c55e", "#15803d"],
            ColorScheme::Purple => &["#f3e8ff", "#a855f7", "#7c3aed"],
            ColorScheme::Orange => &["#ffedd5", "#f97316", "#c2410c"],
            ColorScheme::Red => &["#fee2e2", "#ef4444", "#b91c1c"],
            ColorScheme::Cyan => &["#cffafe", "#06b6d4", "#0891b2"],
            ColorScheme::Pink => &["#fce7f3", "#ec4899", "#be185d"],
            ColorScheme::Yellow => &["#fef9c3", "#eab308", "#a16207"],
            ColorScheme::Warm => &["#fef3c7", "#f59e0b", "#b45309"],
            ColorScheme::Cool => &["#e0f2fe", "#3b82f6", "#1e40af"],
            ColorScheme::Vintage => &["#fef3c7", "#d97706", "#92400e"],
            ColorScheme::Rainbow => &["#fee2e2", "#a855f7", "#3b82f6"],
        }
    }

    /// Dark-to-light ramp for 3-D bars.
    pub fn bar3d_ramp(&self) -> &'static [&'static str] {
        match self {
            ColorScheme::Default => DIVERGING_RAMP,
            ColorScheme::Blue => &["#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8"],
            ColorScheme::Green => &["#006837", "#1a9850", "#66bd63", "#a6d96a", "#d9ef8b"],
            ColorScheme::Purple => &["#40004b", "#762a83", "#9970ab", "#c2a5cf", "#e7d4e8"],
            ColorScheme::Orange => &["#a50026", "#d73027", "#f46d43", "#fdae61", "#fee090"],
            ColorScheme::Red | ColorScheme::Warm => {
                &["#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7"]
            }
            ColorScheme::Cyan => &["#003c30", "#01665e", "#35978f", "#80cdc1", "#c7eae5"],
            ColorScheme::Pink => &["#8e0152", "#c51b7d", "#de77ae", "#f1b6da", "#fde0ef"],
            ColorScheme::Yellow => &["#543005", "#8c510a", "#bf812d", "#dfc27d", "#f6e8c3"],
            ColorScheme::Cool => &["#053061", "#2166ac", "#4393c3", "#92c5de", "#d1e5f0"],
            ColorScheme::Vintage => &["#8c510a", "#bf812d", "#dfc27d", "#f6e8c3", "#c7eae5"],
            ColorScheme::Rainbow => &[
                "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#fef0d9", "#e0f3f8",
                "#abd9e9", "#74add1", "#4575b4", "#313695",
            ],
        }
    }
}
