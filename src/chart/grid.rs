//! Kinds that index rows into a category grid: heatmap, 3-D bars, 3-D surface and the
//! LED wafer map.

use super::options::{Axis, ChartOptions, ColoredPoint, Series, SeriesData, SeriesType, VisualMap};
use super::{cell, index_of, sorted_distinct, ChartConfig, ChartKind};
use crate::value::{numeric_or_zero, parse_float_prefix, Row, Value, ValueKey};
use std::collections::HashMap;

const HEATMAP_FALLBACK_MAX: f64 = 100.0;
const EMPTY_RANGE: (f64, f64) = (0.0, 100.0);
const DEFAULT_BAR_OPACITY: f64 = 0.7;
const WAFER_BAR_OPACITY: f64 = 0.8;
const DEFAULT_WAVELENGTH_NM: f64 = 550.0;
const DEFAULT_Z_START: f64 = 0.0;
const DEFAULT_Z_INTERVAL: f64 = 10.0;

/// Sorted distinct X and Y categories plus the `[xIndex, yIndex, z]` tuple of each row.
struct Grid {
    xs: Vec<Value>,
    x_keys: Vec<Option<ValueKey>>,
    ys: Vec<Value>,
    y_keys: Vec<Option<ValueKey>>,
}

impl Grid {
    fn build(rows: &[Row], x: Option<&str>, y: Option<&str>) -> Self {
        let (xs, x_keys) = sorted_distinct(rows, x);
        let (ys, y_keys) = sorted_distinct(rows, y);
        Self {
            xs,
            x_keys,
            ys,
            y_keys,
        }
    }

    fn position(&self, row: &Row, x: Option<&str>, y: Option<&str>) -> (f64, f64) {
        (
            index_of(&self.x_keys, cell(row, x)) as f64,
            index_of(&self.y_keys, cell(row, y)) as f64,
        )
    }

    fn axes(self, opts: &mut ChartOptions, config: &ChartConfig, value_name: Option<&str>) {
        opts.x_axis = Some(Axis::category(config.x_axis_field.clone(), self.xs));
        opts.y_axes
            .push(Axis::category(config.y_axis_field.clone(), self.ys));
        if opts.kind.is_3d() {
            opts.z_axis = Some(Axis::value(value_name.map(String::from)));
        }
    }
}

fn base(kind: ChartKind, config: &ChartConfig) -> ChartOptions {
    ChartOptions::new(kind, config.title_for(kind), config.scheme().colors())
}

/// Minimum and maximum of the third component, or the default range when empty.
fn z_range(points: &[Vec<f64>]) -> (f64, f64) {
    if points.is_empty() {
        return EMPTY_RANGE;
    }
    points
        .iter()
        .map(|p| p[2])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
            (lo.min(z), hi.max(z))
        })
}

pub(super) fn heatmap(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::Heatmap, config);
    let (x, y) = (config.x_axis_field.as_deref(), config.y_axis_field.as_deref());
    let grid = Grid::build(rows, x, y);
    let cells: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| {
            let (xi, yi) = grid.position(row, x, y);
            vec![xi, yi, numeric_or_zero(cell(row, config.value_field.as_deref()))]
        })
        .collect();
    grid.axes(&mut opts, config, None);

    let max = cells.iter().map(|c| c[2]).fold(f64::NEG_INFINITY, f64::max);
    let max = if cells.is_empty() || max == 0.0 {
        HEATMAP_FALLBACK_MAX
    } else {
        max
    };
    opts.visual_map = Some(VisualMap {
        min: 0.0,
        max,
        colors: ramp(config.scheme().heatmap_ramp()),
    });
    if !cells.is_empty() {
        opts.series
            .push(Series::new(SeriesType::Heatmap, SeriesData::Tuples(cells)).named("热力图"));
    }
    opts
}

pub(super) fn bar3d(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::Bar3d, config);
    let (x, y, z) = (
        config.x_axis_field.as_deref(),
        config.y_axis_field.as_deref(),
        config.z_axis_field.as_deref(),
    );
    let grid = Grid::build(rows, x, y);
    let bars: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| {
            let (xi, yi) = grid.position(row, x, y);
            vec![xi, yi, numeric_or_zero(cell(row, z))]
        })
        .collect();
    grid.axes(&mut opts, config, z);

    if config.use_visual_map.unwrap_or(true) {
        let (min, max) = z_range(&bars);
        opts.visual_map = Some(VisualMap {
            min,
            max,
            colors: ramp(config.scheme().bar3d_ramp()),
        });
    }
    if !bars.is_empty() {
        let mut series = Series::new(SeriesType::Bar3D, SeriesData::Tuples(bars));
        series.opacity = Some(bar_opacity(config));
        opts.series.push(series);
    }
    opts
}

fn bar_opacity(config: &ChartConfig) -> f64 {
    if config.transparent.unwrap_or(true) {
        config
            .opacity
            .unwrap_or(DEFAULT_BAR_OPACITY)
            .clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Dense surface over every (x, y) category pair; pairs without a row sit at 0.
pub(super) fn surface3d(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::Surface3d, config);
    let (x, y, z) = (
        config.x_axis_field.as_deref(),
        config.y_axis_field.as_deref(),
        config.z_axis_field.as_deref(),
    );
    let grid = Grid::build(rows, x, y);

    let mut heights: HashMap<(Option<ValueKey>, Option<ValueKey>), f64> = HashMap::new();
    for row in rows {
        let key = (cell(row, x).map(Value::key), cell(row, y).map(Value::key));
        heights.insert(key, numeric_or_zero(cell(row, z)));
    }
    let mut points = Vec::with_capacity(grid.x_keys.len() * grid.y_keys.len());
    for (xi, x_key) in grid.x_keys.iter().enumerate() {
        for (yi, y_key) in grid.y_keys.iter().enumerate() {
            let z = heights
                .get(&(x_key.clone(), y_key.clone()))
                .copied()
                .unwrap_or(0.0);
            points.push(vec![xi as f64, yi as f64, z]);
        }
    }
    grid.axes(&mut opts, config, z);
    if let Some(axis) = opts.z_axis.as_mut() {
        axis.min = Some(config.z_start.unwrap_or(DEFAULT_Z_START));
        axis.interval = Some(config.z_interval.unwrap_or(DEFAULT_Z_INTERVAL));
    }

    let (min, max) = z_range(&points);
    opts.visual_map = Some(VisualMap {
        min,
        max,
        colors: ramp(config.scheme().surface_ramp()),
    });
    if !points.is_empty() {
        opts.series
            .push(Series::new(SeriesType::Surface, SeriesData::Tuples(points)));
    }
    opts
}

/// 3-D bars coloured by each row's emission wavelength.
pub(super) fn led_wafer(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::LedWafer, config);
    let (x, y, z) = (
        config.x_axis_field.as_deref(),
        config.y_axis_field.as_deref(),
        config.z_axis_field.as_deref(),
    );
    let grid = Grid::build(rows, x, y);
    let points: Vec<ColoredPoint> = rows
        .iter()
        .map(|row| {
            let (xi, yi) = grid.position(row, x, y);
            let wavelength = match parse_float_prefix(cell(row, config.wavelength_field.as_deref())) {
                w if w.is_nan() || w == 0.0 => DEFAULT_WAVELENGTH_NM,
                w => w,
            };
            ColoredPoint {
                value: [xi, yi, numeric_or_zero(cell(row, z))],
                wavelength,
                color: wavelength_to_rgb(wavelength),
            }
        })
        .collect();
    grid.axes(&mut opts, config, z);
    if !points.is_empty() {
        let mut series = Series::new(SeriesType::Bar3D, SeriesData::Colored(points));
        series.opacity = Some(WAFER_BAR_OPACITY);
        opts.series.push(series);
    }
    opts
}

fn ramp(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

/// Approximate display colour of visible light, as `#rrggbb`.
///
/// Wavelengths outside 380–780 nm are grey.
pub fn wavelength_to_rgb(wavelength: f64) -> String {
    let w = wavelength;
    if !(380.0..=780.0).contains(&w) {
        return "#808080".to_string();
    }
    let (r, g, b) = if w < 410.0 {
        (0.6 - 0.41 * ((410.0 - w) / 30.0), 0.0, 0.39 + 0.6 * ((410.0 - w) / 30.0))
    } else if w < 440.0 {
        (0.19 - 0.19 * ((440.0 - w) / 30.0), 0.0, 1.0)
    } else if w < 490.0 {
        (0.0, 1.0 - ((490.0 - w) / 50.0), 1.0)
    } else if w < 510.0 {
        (0.0, 1.0, (510.0 - w) / 20.0)
    } else if w < 580.0 {
        (1.0 - ((580.0 - w) / 70.0), 1.0, 0.0)
    } else if w < 640.0 {
        (1.0, (640.0 - w) / 60.0, 0.0)
    } else if w < 700.0 {
        (1.0, 0.0, 0.0)
    } else {
        (0.35 - 0.65 * ((780.0 - w) / 80.0), 0.0, 0.0)
    };
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}
