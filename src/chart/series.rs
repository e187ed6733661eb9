//! Kinds whose axes follow row order: cartesian, proportional, radar, gauge, the
//! multi-series kinds and the linked dataset chart.

use super::options::{
    Axis, AxisPosition, ChartOptions, NamedValue, RadarEntry, RadarIndicator, Series,
    SeriesData, SeriesType,
};
use super::{cell, sorted_distinct, ChartConfig, ChartKind};
use crate::value::{numeric_or_zero, Row, Value};

const DEFAULT_SERIES_NAME: &str = "数值";
const UNKNOWN_NAME: &str = "未知";
const RADAR_INDICATOR_MAX: f64 = 100.0;
const GAUGE_DEFAULT_MAX: f64 = 100.0;
const STACK_GROUP: &str = "total";
const MULTI_AXIS_OFFSET: f64 = 60.0;

fn base(kind: ChartKind, config: &ChartConfig) -> ChartOptions {
    ChartOptions::new(kind, config.title_for(kind), config.scheme().colors())
}

/// Raw values of the X field in row order; missing cells become null.
fn x_categories(rows: &[Row], config: &ChartConfig) -> Vec<Value> {
    rows.iter()
        .map(|row| cell(row, config.x_axis_field.as_deref()).cloned().unwrap_or_default())
        .collect()
}

fn column(rows: &[Row], field: Option<&str>) -> Vec<f64> {
    rows.iter().map(|row| numeric_or_zero(cell(row, field))).collect()
}

pub(super) fn cartesian(kind: ChartKind, rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(kind, config);
    let name = config
        .y_axis_field
        .clone()
        .unwrap_or_else(|| DEFAULT_SERIES_NAME.to_string());
    opts.x_axis = Some(Axis::category(None, x_categories(rows, config)));
    opts.y_axes.push(Axis::value(None));
    opts.legend.push(name.clone());
    if rows.is_empty() {
        return opts;
    }
    let series_type = if kind == ChartKind::Bar {
        SeriesType::Bar
    } else {
        SeriesType::Line
    };
    let mut series = Series::new(
        series_type,
        SeriesData::Values(column(rows, config.y_axis_field.as_deref())),
    )
    .named(name);
    if kind == ChartKind::Bar {
        series.border_radius = Some([4, 4, 0, 0]);
    }
    opts.series.push(series);
    opts
}

pub(super) fn scatter(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::Scatter, config);
    let (x, y) = (config.x_axis_field.as_deref(), config.y_axis_field.as_deref());
    opts.x_axis = Some(Axis::value(Some(x.unwrap_or("X轴").to_string())));
    opts.y_axes.push(Axis::value(Some(y.unwrap_or("Y轴").to_string())));
    if rows.is_empty() {
        return opts;
    }
    let points = rows
        .iter()
        .map(|row| vec![numeric_or_zero(cell(row, x)), numeric_or_zero(cell(row, y))])
        .collect();
    let mut series = Series::new(SeriesType::Scatter, SeriesData::Tuples(points)).named("散点");
    series.color = Some(config.scheme().single_color(0).to_string());
    opts.series.push(series);
    opts
}

/// Pie and funnel: one `{name, value}` item per row.
pub(super) fn proportional(kind: ChartKind, rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(kind, config);
    if rows.is_empty() {
        return opts;
    }
    let items: Vec<NamedValue> = rows
        .iter()
        .map(|row| NamedValue {
            name: match cell(row, config.name_field.as_deref()) {
                Some(v) if !v.is_falsy() => v.display_string(),
                _ => UNKNOWN_NAME.to_string(),
            },
            value: numeric_or_zero(cell(row, config.value_field.as_deref())),
        })
        .collect();
    opts.legend = items.iter().map(|i| i.name.clone()).collect();
    let series_type = if kind == ChartKind::Funnel {
        SeriesType::Funnel
    } else {
        SeriesType::Pie
    };
    let name = config.name_field.clone().unwrap_or_else(|| "数据".to_string());
    opts.series
        .push(Series::new(series_type, SeriesData::Named(items)).named(name));
    opts
}

pub(super) fn radar(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::Radar, config);
    let fields = config.fields.as_deref().unwrap_or_default();
    opts.radar = fields
        .iter()
        .map(|f| RadarIndicator {
            name: f.clone(),
            max: RADAR_INDICATOR_MAX,
        })
        .collect();
    if rows.is_empty() {
        return opts;
    }
    let entries: Vec<RadarEntry> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| RadarEntry {
            name: format!("数据{}", i + 1),
            value: fields
                .iter()
                .map(|f| numeric_or_zero(row.get(f)))
                .collect(),
        })
        .collect();
    opts.legend = entries.iter().map(|e| e.name.clone()).collect();
    opts.series
        .push(Series::new(SeriesType::Radar, SeriesData::Radar(entries)).named("雷达图"));
    opts
}

/// Single reading from the first row on a `[0, max]` dial.
pub(super) fn gauge(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let color = config.scheme().single_color(0);
    let mut opts = ChartOptions::new(ChartKind::Gauge, config.title_for(ChartKind::Gauge), &[color]);
    let Some(first) = rows.first() else {
        return opts;
    };
    let value = numeric_or_zero(cell(first, config.value_field.as_deref()));
    let mut series = Series::new(
        SeriesType::Gauge,
        SeriesData::Named(vec![NamedValue {
            name: config.value_field.clone().unwrap_or_default(),
            value,
        }]),
    );
    series.min = Some(0.0);
    series.max = Some(config.max.unwrap_or(GAUGE_DEFAULT_MAX));
    series.color = Some(color.to_string());
    opts.series.push(series);
    opts
}

pub(super) fn stacked(kind: ChartKind, rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(kind, config);
    let fields = config.y_fields();
    opts.x_axis = Some(Axis::category(None, x_categories(rows, config)));
    opts.y_axes.push(Axis::value(None));
    opts.legend = fields.to_vec();
    if rows.is_empty() {
        return opts;
    }
    let bars = kind == ChartKind::StackedBar;
    let last = fields.len().saturating_sub(1);
    for (i, field) in fields.iter().enumerate() {
        let series_type = if bars { SeriesType::Bar } else { SeriesType::Line };
        let mut series =
            Series::new(series_type, SeriesData::Values(column(rows, Some(field.as_str()))))
                .named(field);
        series.stack = Some(STACK_GROUP.to_string());
        if bars {
            series.border_radius = Some(if i == last { [4, 4, 0, 0] } else { [0; 4] });
        }
        opts.series.push(series);
    }
    opts
}

/// One value axis per field: alternating sides, outer axes pushed out by a fixed offset.
pub(super) fn multiple_y(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::MultipleY, config);
    let fields = config.y_fields();
    let scheme = config.scheme();
    opts.x_axis = Some(Axis::category(None, x_categories(rows, config)));
    opts.legend = fields.to_vec();
    for (i, field) in fields.iter().enumerate() {
        let mut axis = Axis::value(Some(field.clone()));
        axis.position = Some(if i % 2 == 0 {
            AxisPosition::Left
        } else {
            AxisPosition::Right
        });
        axis.offset = Some(if i > 1 {
            (i - 1) as f64 * MULTI_AXIS_OFFSET
        } else {
            0.0
        });
        axis.color = Some(scheme.single_color(i).to_string());
        opts.y_axes.push(axis);
    }
    if rows.is_empty() {
        return opts;
    }
    for (i, field) in fields.iter().enumerate() {
        let series_type = if i == 1 { SeriesType::Bar } else { SeriesType::Line };
        let mut series =
            Series::new(series_type, SeriesData::Values(column(rows, Some(field.as_str()))))
                .named(field);
        series.y_axis_index = Some(i);
        opts.series.push(series);
    }
    opts
}

pub(super) fn scatter3d(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::Scatter3d, config);
    let (x, y, z) = (
        config.x_axis_field.as_deref(),
        config.y_axis_field.as_deref(),
        config.z_axis_field.as_deref(),
    );
    opts.x_axis = Some(Axis::value(Some(x.unwrap_or("X轴").to_string())));
    opts.y_axes.push(Axis::value(Some(y.unwrap_or("Y轴").to_string())));
    opts.z_axis = Some(Axis::value(Some(z.unwrap_or("Z轴").to_string())));
    if rows.is_empty() {
        return opts;
    }
    let points = rows
        .iter()
        .map(|row| {
            vec![
                numeric_or_zero(cell(row, x)),
                numeric_or_zero(cell(row, y)),
                numeric_or_zero(cell(row, z)),
            ]
        })
        .collect();
    let mut series = Series::new(SeriesType::Scatter3D, SeriesData::Tuples(points));
    series.opacity = Some(0.8);
    opts.series.push(series);
    opts
}

/// Line per name over sorted X categories, plus a pie of one X column.
///
/// The dataset header is `[name field, x1, x2, ...]`; each following row is a name and
/// the value of the first row matching that name and X category (0 when none does).
pub(super) fn linked(rows: &[Row], config: &ChartConfig) -> ChartOptions {
    let mut opts = base(ChartKind::Linked, config);
    let (x_field, name_field, value_field) = (
        config.x_axis_field.as_deref(),
        config.name_field.as_deref(),
        config.value_field.as_deref(),
    );
    if rows.is_empty() {
        opts.x_axis = Some(Axis::category(x_field.map(String::from), Vec::new()));
        return opts;
    }
    let (xs, x_keys) = sorted_distinct(rows, x_field);
    let (names, name_keys) = sorted_distinct(rows, name_field);

    let mut header = vec![Value::from(name_field.unwrap_or_default())];
    header.extend(xs.iter().cloned());
    let mut dataset = vec![header];
    let mut matrix: Vec<Vec<f64>> = Vec::with_capacity(names.len());
    for (name, name_key) in names.iter().zip(&name_keys) {
        let values: Vec<f64> = x_keys
            .iter()
            .map(|x_key| {
                rows.iter()
                    .find(|row| {
                        cell(row, x_field).map(Value::key) == *x_key
                            && cell(row, name_field).map(Value::key) == *name_key
                    })
                    .map_or(0.0, |row| numeric_or_zero(cell(row, value_field)))
            })
            .collect();
        let mut line = vec![name.clone()];
        line.extend(values.iter().copied().map(Value::Number));
        dataset.push(line);
        matrix.push(values);
    }

    let index = config.chart_index.unwrap_or(0);
    opts.caption = Some(xs.get(index).map(Value::display_string).unwrap_or_default());
    opts.x_axis = Some(Axis::category(x_field.map(String::from), xs));
    opts.y_axes.push(Axis::value(value_field.map(String::from)));
    opts.legend = names.iter().map(Value::display_string).collect();
    for i in 0..names.len() {
        opts.series
            .push(Series::new(SeriesType::Line, SeriesData::DatasetRow(i + 1)));
    }
    let pie: Vec<NamedValue> = names
        .iter()
        .zip(&matrix)
        .map(|(name, values)| NamedValue {
            name: name.display_string(),
            value: values.get(index).copied().unwrap_or(0.0),
        })
        .collect();
    opts.series
        .push(Series::new(SeriesType::Pie, SeriesData::Named(pie)).named("pie"));
    opts.dataset = Some(dataset);
    opts
}

#[cfg(test)]
mod tests {
    use super::super::map_chart;
    use super::*;
    use serde_json::json;

    fn rows(v: serde_json::Value) -> Vec<Row> {
        serde_json::from_value(v).unwrap()
    }

    fn config(v: serde_json::Value) -> ChartConfig {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn bar_projects_rows_in_order() {
        let data = rows(json!([{"a": "x", "b": 5}, {"a": "y", "b": 3}]));
        let opts = map_chart(
            ChartKind::Bar,
            Some(&data),
            &config(json!({"xAxisField": "a", "yAxisField": "b"})),
        );
        let x = opts.x_axis.unwrap();
        assert_eq!(x.categories, vec![Value::from("x"), Value::from("y")]);
        assert_eq!(opts.series[0].data, SeriesData::Values(vec![5.0, 3.0]));
        assert_eq!(opts.series[0].name.as_deref(), Some("b"));
        assert_eq!(opts.title, "柱状图-ECharts");
    }

    #[test]
    fn line_coerces_and_defaults_series_name() {
        let data = rows(json!([{"a": "x", "b": "12kg"}, {"a": "x", "b": "n/a"}, {"a": "z"}]));
        let opts = map_chart(ChartKind::Line, Some(&data), &config(json!({"xAxisField": "a"})));
        assert_eq!(opts.series[0].data, SeriesData::Values(vec![0.0, 0.0, 0.0]));
        assert_eq!(opts.series[0].name.as_deref(), Some("数值"));
        assert_eq!(opts.x_axis.unwrap().categories.len(), 3, "no de-duplication");

        let opts = map_chart(ChartKind::Line, Some(&data), &config(json!({"yAxisField": "b"})));
        assert_eq!(opts.series[0].data, SeriesData::Values(vec![12.0, 0.0, 0.0]));
    }

    #[test]
    fn scatter_axis_names_default() {
        let data = rows(json!([{"x": 1, "y": "2"}]));
        let opts = map_chart(ChartKind::Scatter, Some(&data), &ChartConfig::default());
        assert_eq!(opts.x_axis.unwrap().name.as_deref(), Some("X轴"));
        assert_eq!(opts.series[0].data, SeriesData::Tuples(vec![vec![0.0, 0.0]]));
        let opts = map_chart(
            ChartKind::Scatter,
            Some(&data),
            &config(json!({"xAxisField": "x", "yAxisField": "y", "colorScheme": "green"})),
        );
        assert_eq!(opts.series[0].data, SeriesData::Tuples(vec![vec![1.0, 2.0]]));
        assert_eq!(opts.series[0].color.as_deref(), Some("#10b981"));
    }

    #[test]
    fn pie_names_fall_back_to_unknown() {
        let data = rows(json!([{"n": "a", "v": 3}, {"n": "", "v": "x"}, {"v": 1}]));
        let opts = map_chart(
            ChartKind::Funnel,
            Some(&data),
            &config(json!({"nameField": "n", "valueField": "v"})),
        );
        assert_eq!(opts.series[0].series_type, SeriesType::Funnel);
        let SeriesData::Named(items) = &opts.series[0].data else {
            panic!("expected named items");
        };
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "未知", "未知"]);
        assert_eq!(items[1].value, 0.0);
    }

    #[test]
    fn radar_entries_per_row() {
        let data = rows(json!([{"a": 10, "b": 20}, {"a": "5"}]));
        let opts = map_chart(ChartKind::Radar, Some(&data), &config(json!({"fields": ["a", "b"]})));
        assert_eq!(opts.radar.len(), 2);
        assert_eq!(opts.radar[0].max, 100.0);
        let SeriesData::Radar(entries) = &opts.series[0].data else {
            panic!("expected radar entries");
        };
        assert_eq!(entries[1].name, "数据2");
        assert_eq!(entries[1].value, vec![5.0, 0.0]);
    }

    #[test]
    fn gauge_reads_first_row() {
        let data = rows(json!([{"v": "42"}, {"v": 7}]));
        let opts = map_chart(
            ChartKind::Gauge,
            Some(&data),
            &config(json!({"valueField": "v", "colorScheme": "red"})),
        );
        let gauge = &opts.series[0];
        assert_eq!(gauge.max, Some(100.0));
        assert_eq!(gauge.color.as_deref(), Some("#ef4444"));
        assert_eq!(opts.colors, vec!["#ef4444".to_string()]);
        let SeriesData::Named(v) = &gauge.data else {
            panic!("expected a reading");
        };
        assert_eq!(v[0].value, 42.0);
    }

    #[test]
    fn stacked_bar_rounds_top_segment_only() {
        let data = rows(json!([{"x": "q1", "a": 1, "b": 2, "c": 3}]));
        let opts = map_chart(
            ChartKind::StackedBar,
            Some(&data),
            &config(json!({"xAxisField": "x", "yAxisFields": ["c", "a", "b"]})),
        );
        let names: Vec<_> = opts.series.iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert!(opts.series.iter().all(|s| s.stack.as_deref() == Some("total")));
        assert_eq!(opts.series[0].border_radius, Some([0; 4]));
        assert_eq!(opts.series[2].border_radius, Some([4, 4, 0, 0]));
    }

    #[test]
    fn multiple_y_axes_alternate_and_offset() {
        let data = rows(json!([{"x": 1, "a": 1, "b": 2, "c": 3, "d": 4}]));
        let opts = map_chart(
            ChartKind::MultipleY,
            Some(&data),
            &config(json!({"xAxisField": "x", "yAxisFields": ["a", "b", "c", "d"]})),
        );
        let positions: Vec<_> = opts.y_axes.iter().map(|a| a.position).collect();
        assert_eq!(
            positions,
            vec![
                Some(AxisPosition::Left),
                Some(AxisPosition::Right),
                Some(AxisPosition::Left),
                Some(AxisPosition::Right)
            ]
        );
        let offsets: Vec<_> = opts.y_axes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![Some(0.0), Some(0.0), Some(60.0), Some(120.0)]);
        let types: Vec<_> = opts.series.iter().map(|s| s.series_type).collect();
        assert_eq!(
            types,
            vec![SeriesType::Line, SeriesType::Bar, SeriesType::Line, SeriesType::Line]
        );
        assert_eq!(opts.series[3].y_axis_index, Some(3));
        assert_eq!(opts.y_axes[1].color.as_deref(), Some("#91cc75"));
        assert!(opts.to_echarts()["yAxis"].is_array());
    }

    #[test]
    fn linked_builds_dataset_and_pie() {
        let data = rows(json!([
            {"month": "feb", "team": "b", "v": 4},
            {"month": "jan", "team": "a", "v": 1},
            {"month": "jan", "team": "b", "v": "2"},
            {"month": "feb", "team": "a", "v": 3},
            {"month": "jan", "team": "a", "v": 99}
        ]));
        let opts = map_chart(
            ChartKind::Linked,
            Some(&data),
            &config(json!({
                "xAxisField": "month",
                "nameField": "team",
                "valueField": "v",
                "chartIndex": 1
            })),
        );
        let dataset = opts.dataset.clone().unwrap();
        assert_eq!(
            dataset[0],
            vec![Value::from("team"), Value::from("feb"), Value::from("jan")]
        );
        assert_eq!(
            dataset[1],
            vec![Value::from("a"), Value::from(3.0), Value::from(1.0)]
        );
        assert_eq!(
            dataset[2],
            vec![Value::from("b"), Value::from(4.0), Value::from(2.0)]
        );
        assert_eq!(opts.series.len(), 3);
        assert_eq!(opts.series[1].data, SeriesData::DatasetRow(2));
        let SeriesData::Named(pie) = &opts.series[2].data else {
            panic!("expected pie data");
        };
        assert_eq!(pie[0].value, 1.0);
        assert_eq!(pie[1].value, 2.0);
        assert_eq!(opts.caption.as_deref(), Some("jan"));
    }
}
