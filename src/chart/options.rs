//! Typed chart options and their rendering into the declarative option object the
//! external chart renderer consumes.

use super::ChartKind;
use crate::value::Value;
use serde::Serialize;
use serde_json::{json, Map};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub axis_type: AxisType,
    pub name: Option<String>,
    pub categories: Vec<Value>,
    pub position: Option<AxisPosition>,
    pub offset: Option<f64>,
    pub color: Option<String>,
    pub min: Option<f64>,
    pub interval: Option<f64>,
}

impl Axis {
    pub fn category(name: Option<String>, categories: Vec<Value>) -> Self {
        Self {
            axis_type: AxisType::Category,
            name,
            categories,
            position: None,
            offset: None,
            color: None,
            min: None,
            interval: None,
        }
    }

    pub fn value(name: Option<String>) -> Self {
        Self {
            axis_type: AxisType::Value,
            ..Self::category(name, Vec::new())
        }
    }

    fn to_json(&self) -> serde_json::Value {
        let mut axis = Map::new();
        axis.insert("type".into(), json!(self.axis_type));
        if let Some(name) = &self.name {
            axis.insert("name".into(), json!(name));
        }
        if self.axis_type == AxisType::Category {
            axis.insert("data".into(), json!(self.categories));
        }
        if let Some(position) = self.position {
            axis.insert("position".into(), json!(position));
        }
        if let Some(offset) = self.offset {
            axis.insert("offset".into(), json!(offset));
        }
        if let Some(color) = &self.color {
            axis.insert(
                "axisLine".into(),
                json!({"show": true, "lineStyle": {"color": color}}),
            );
        }
        if let Some(min) = self.min {
            axis.insert("min".into(), json!(min));
        }
        if let Some(interval) = self.interval {
            axis.insert("interval".into(), json!(interval));
        }
        serde_json::Value::Object(axis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesType {
    Line,
    Bar,
    Pie,
    Scatter,
    Radar,
    Funnel,
    Gauge,
    Heatmap,
    Bar3D,
    Scatter3D,
    Surface,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarEntry {
    pub name: String,
    pub value: Vec<f64>,
}

/// A 3-D bar coloured individually, as the wafer chart draws them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColoredPoint {
    pub value: [f64; 3],
    pub wavelength: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    Values(Vec<f64>),
    Tuples(Vec<Vec<f64>>),
    Named(Vec<NamedValue>),
    Radar(Vec<RadarEntry>),
    Colored(Vec<ColoredPoint>),
    /// Values come from a row of the chart's dataset.
    DatasetRow(usize),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Values(v) => v.len(),
            SeriesData::Tuples(v) => v.len(),
            SeriesData::Named(v) => v.len(),
            SeriesData::Radar(v) => v.len(),
            SeriesData::Colored(v) => v.len(),
            SeriesData::DatasetRow(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub name: Option<String>,
    pub series_type: SeriesType,
    pub data: SeriesData,
    pub stack: Option<String>,
    pub y_axis_index: Option<usize>,
    pub border_radius: Option<[u32; 4]>,
    pub opacity: Option<f64>,
    pub color: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Series {
    pub fn new(series_type: SeriesType, data: SeriesData) -> Self {
        Self {
            name: None,
            series_type,
            data,
            stack: None,
            y_axis_index: None,
            border_radius: None,
            opacity: None,
            color: None,
            min: None,
            max: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn to_json(&self) -> serde_json::Value {
        let mut series = Map::new();
        series.insert("type".into(), json!(self.series_type));
        if let Some(name) = &self.name {
            series.insert("name".into(), json!(name));
        }
        match &self.data {
            SeriesData::DatasetRow(row) => {
                series.insert("seriesLayoutBy".into(), json!("row"));
                series.insert("encode".into(), json!({"x": 0, "y": row}));
            }
            data => {
                series.insert("data".into(), json!(data));
            }
        }
        if let Some(stack) = &self.stack {
            series.insert("stack".into(), json!(stack));
        }
        if let Some(index) = self.y_axis_index {
            series.insert("yAxisIndex".into(), json!(index));
        }
        let mut item_style = Map::new();
        if let Some(radius) = self.border_radius {
            item_style.insert("borderRadius".into(), json!(radius));
        }
        if let Some(opacity) = self.opacity {
            item_style.insert("opacity".into(), json!(opacity));
        }
        if let Some(color) = &self.color {
            item_style.insert("color".into(), json!(color));
        }
        if !item_style.is_empty() {
            series.insert("itemStyle".into(), serde_json::Value::Object(item_style));
        }
        if let Some(min) = self.min {
            series.insert("min".into(), json!(min));
        }
        if let Some(max) = self.max {
            series.insert("max".into(), json!(max));
        }
        serde_json::Value::Object(series)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualMap {
    pub min: f64,
    pub max: f64,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarIndicator {
    pub name: String,
    pub max: f64,
}

/// Everything the mapper derives for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub kind: ChartKind,
    pub title: String,
    pub colors: Vec<String>,
    pub legend: Vec<String>,
    pub x_axis: Option<Axis>,
    pub y_axes: Vec<Axis>,
    pub z_axis: Option<Axis>,
    pub series: Vec<Series>,
    pub visual_map: Option<VisualMap>,
    pub radar: Vec<RadarIndicator>,
    /// Row-major dataset; the first row is the header.
    pub dataset: Option<Vec<Vec<Value>>>,
    /// Headline text shown above a linked chart's pie.
    pub caption: Option<String>,
}

impl ChartOptions {
    pub fn new(kind: ChartKind, title: String, colors: &[&str]) -> Self {
        Self {
            kind,
            title,
            colors: colors.iter().map(|c| c.to_string()).collect(),
            legend: Vec::new(),
            x_axis: None,
            y_axes: Vec::new(),
            z_axis: None,
            series: Vec::new(),
            visual_map: None,
            radar: Vec::new(),
            dataset: None,
            caption: None,
        }
    }

    /// Render as a declarative chart option object.
    ///
    /// 3-D kinds place their axes under `xAxis3D`/`yAxis3D`/`zAxis3D` next to a
    /// `grid3D`; every other kind uses `xAxis`/`yAxis`.
    pub fn to_echarts(&self) -> serde_json::Value {
        let mut option = Map::new();
        option.insert("color".into(), json!(self.colors));
        option.insert("title".into(), json!({"text": self.title, "left": "center"}));
        if !self.legend.is_empty() {
            option.insert("legend".into(), json!({"data": self.legend, "bottom": 10}));
        }

        let three_d = self.kind.is_3d();
        let (x_key, y_key) = if three_d {
            ("xAxis3D", "yAxis3D")
        } else {
            ("xAxis", "yAxis")
        };
        if let Some(x) = &self.x_axis {
            option.insert(x_key.into(), x.to_json());
        }
        match self.y_axes.as_slice() {
            [] => {}
            [single] if self.kind != ChartKind::MultipleY => {
                option.insert(y_key.into(), single.to_json());
            }
            many => {
                option.insert(
                    y_key.into(),
                    serde_json::Value::Array(many.iter().map(Axis::to_json).collect()),
                );
            }
        }
        if let Some(z) = &self.z_axis {
            option.insert("zAxis3D".into(), z.to_json());
        }
        if three_d {
            option.insert(
                "grid3D".into(),
                json!({"boxWidth": 200, "boxDepth": 200, "viewControl": {"autoRotate": true}}),
            );
        }
        if let Some(vm) = &self.visual_map {
            option.insert(
                "visualMap".into(),
                json!({
                    "show": true,
                    "min": vm.min,
                    "max": vm.max,
                    "calculable": true,
                    "inRange": {"color": vm.colors},
                }),
            );
        }
        if !self.radar.is_empty() {
            option.insert("radar".into(), json!({"indicator": self.radar}));
        }
        if let Some(source) = &self.dataset {
            option.insert("dataset".into(), json!({"source": source}));
        }
        if let Some(caption) = &self.caption {
            option.insert(
                "graphic".into(),
                json!([{"type": "text", "left": "center", "style": {"text": caption}}]),
            );
        }
        option.insert(
            "series".into(),
            serde_json::Value::Array(self.series.iter().map(Series::to_json).collect()),
        );
        serde_json::Value::Object(option)
    }
}
