//! Chart configuration mapper.
//!
//! [`map_chart`] turns rows plus a loosely-typed [`ChartConfig`] into [`ChartOptions`]
//! for one [`ChartKind`]. Absent options fall back to per-kind defaults and missing or
//! empty data yields options with no series; nothing here fails.

mod grid;
mod options;
mod palette;
mod series;

pub use grid::wavelength_to_rgb;
pub use options::{
    Axis, AxisPosition, AxisType, ChartOptions, ColoredPoint, NamedValue, RadarEntry,
    RadarIndicator, Series, SeriesData, SeriesType, VisualMap,
};
pub use palette::ColorScheme;

use crate::value::{Row, Value, ValueKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Pie,
    Scatter,
    Radar,
    Funnel,
    Gauge,
    Heatmap,
    Bar3d,
    Scatter3d,
    Surface3d,
    StackedLine,
    StackedBar,
    MultipleY,
    Linked,
    LedWafer,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Scatter => "scatter",
            ChartKind::Radar => "radar",
            ChartKind::Funnel => "funnel",
            ChartKind::Gauge => "gauge",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Bar3d => "bar3d",
            ChartKind::Scatter3d => "scatter3d",
            ChartKind::Surface3d => "surface3d",
            ChartKind::StackedLine => "stacked_line",
            ChartKind::StackedBar => "stacked_bar",
            ChartKind::MultipleY => "multiple_y",
            ChartKind::Linked => "linked",
            ChartKind::LedWafer => "led_wafer",
        }
    }

    /// `None` for kinds the mapper does not support.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::iterator().find(|k| k.as_str() == s)
    }

    pub fn iterator() -> impl Iterator<Item = ChartKind> {
        [
            ChartKind::Line,
            ChartKind::Bar,
            ChartKind::Pie,
            ChartKind::Scatter,
            ChartKind::Radar,
            ChartKind::Funnel,
            ChartKind::Gauge,
            ChartKind::Heatmap,
            ChartKind::Bar3d,
            ChartKind::Scatter3d,
            ChartKind::Surface3d,
            ChartKind::StackedLine,
            ChartKind::StackedBar,
            ChartKind::MultipleY,
            ChartKind::Linked,
            ChartKind::LedWafer,
        ]
        .iter()
        .copied()
    }

    /// Localized name shown in the chart picker.
    pub fn display_name(&self) -> &'static str {
        match self {
            ChartKind::Line => "折线图-ECharts",
            ChartKind::Bar => "柱状图-ECharts",
            ChartKind::Pie => "饼图-ECharts",
            ChartKind::Scatter => "散点图-ECharts",
            ChartKind::Radar => "雷达图-ECharts",
            ChartKind::Funnel => "漏斗图-ECharts",
            ChartKind::Gauge => "仪表盘-ECharts",
            ChartKind::Heatmap => "热力图-ECharts",
            ChartKind::Bar3d => "3D柱状图-ECharts",
            ChartKind::Scatter3d => "3D散点图-ECharts",
            ChartKind::Surface3d => "3D形貌图-ECharts",
            ChartKind::StackedLine => "堆叠折线图-ECharts",
            ChartKind::StackedBar => "堆叠柱状图-ECharts",
            ChartKind::MultipleY => "多Y轴图-ECharts",
            ChartKind::Linked => "联动图表-ECharts",
            ChartKind::LedWafer => "LED晶圆图-ECharts",
        }
    }

    /// Title used when the config has none.
    pub fn default_title(&self) -> &'static str {
        match self {
            ChartKind::LedWafer => "LED晶圆分析图-ECharts",
            other => other.display_name(),
        }
    }

    pub fn is_3d(&self) -> bool {
        matches!(
            self,
            ChartKind::Bar3d | ChartKind::Scatter3d | ChartKind::Surface3d | ChartKind::LedWafer
        )
    }
}

/// Per-chart options. Every key is optional; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub title: Option<String>,
    pub color_scheme: Option<String>,
    pub x_axis_field: Option<String>,
    pub y_axis_field: Option<String>,
    pub y_axis_fields: Option<Vec<String>>,
    pub name_field: Option<String>,
    pub value_field: Option<String>,
    pub z_axis_field: Option<String>,
    pub wavelength_field: Option<String>,
    /// Radar dimensions.
    pub fields: Option<Vec<String>>,
    /// Gauge ceiling.
    pub max: Option<f64>,
    pub transparent: Option<bool>,
    pub opacity: Option<f64>,
    pub use_visual_map: Option<bool>,
    pub x_start: Option<f64>,
    pub x_interval: Option<f64>,
    pub y_start: Option<f64>,
    pub y_interval: Option<f64>,
    pub z_start: Option<f64>,
    pub z_interval: Option<f64>,
    /// Which X category of a linked chart drives its pie.
    pub chart_index: Option<usize>,
}

impl ChartConfig {
    pub fn scheme(&self) -> ColorScheme {
        self.color_scheme
            .as_deref()
            .map(ColorScheme::from_name)
            .unwrap_or_default()
    }

    pub fn title_for(&self, kind: ChartKind) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| kind.default_title().to_string())
    }

    pub fn y_fields(&self) -> &[String] {
        self.y_axis_fields.as_deref().unwrap_or_default()
    }
}

/// Look up a configured field in a row; an unset field reads as missing.
pub(crate) fn cell<'a>(row: &'a Row, field: Option<&str>) -> Option<&'a Value> {
    field.and_then(|f| row.get(f))
}

/// Distinct values of a field, sorted by display string with missing values last.
///
/// Missing cells are reported as `Value::Null`. The returned keys are in the same order
/// as the values and are what row lookups index against.
pub(crate) fn sorted_distinct(rows: &[Row], field: Option<&str>) -> (Vec<Value>, Vec<Option<ValueKey>>) {
    let mut seen: HashSet<Option<ValueKey>> = HashSet::new();
    let mut distinct: Vec<(Option<ValueKey>, Option<&Value>)> = Vec::new();
    for row in rows {
        let value = cell(row, field);
        let key = value.map(Value::key);
        if seen.insert(key.clone()) {
            distinct.push((key, value));
        }
    }
    distinct.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => a.display_string().cmp(&b.display_string()),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    distinct
        .into_iter()
        .map(|(key, value)| (value.cloned().unwrap_or_default(), key))
        .unzip()
}

/// Position of a row's value among `keys`.
pub(crate) fn index_of(keys: &[Option<ValueKey>], value: Option<&Value>) -> usize {
    let key = value.map(Value::key);
    keys.iter().position(|k| *k == key).unwrap_or_default()
}

/// Build chart options for `kind` from `rows` and `config`.
pub fn map_chart(kind: ChartKind, rows: Option<&[Row]>, config: &ChartConfig) -> ChartOptions {
    let rows = rows.unwrap_or_default();
    let options = match kind {
        ChartKind::Line | ChartKind::Bar => series::cartesian(kind, rows, config),
        ChartKind::Scatter => series::scatter(rows, config),
        ChartKind::Pie | ChartKind::Funnel => series::proportional(kind, rows, config),
        ChartKind::Radar => series::radar(rows, config),
        ChartKind::Gauge => series::gauge(rows, config),
        ChartKind::StackedLine | ChartKind::StackedBar => series::stacked(kind, rows, config),
        ChartKind::MultipleY => series::multiple_y(rows, config),
        ChartKind::Linked => series::linked(rows, config),
        ChartKind::Scatter3d => series::scatter3d(rows, config),
        ChartKind::Heatmap => grid::heatmap(rows, config),
        ChartKind::Bar3d => grid::bar3d(rows, config),
        ChartKind::Surface3d => grid::surface3d(rows, config),
        ChartKind::LedWafer => grid::led_wafer(rows, config),
    };
    debug!(
        "Mapped {} rows into {} {} series",
        rows.len(),
        options.series.len(),
        kind.as_str()
    );
    options
}
