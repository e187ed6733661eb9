use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::Serialize;
use snaplens::config::{AppConfig, ConfigManager};
use snaplens::error_display::user_message_from_report;
use snaplens::filter::operators_for;
use snaplens::snapshot::{load_enabled_fields, load_json, load_table, to_json_string, write_json};
use snaplens::{
    aggregate, apply_filters, import_table, logging, map_chart, validate_conditions,
    AggregationSpec, Args, ChartConfig, ChartKind, Command, CompressionFormat, DataType,
    FilterCondition, ImportOptions, Table, APP_NAME,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Load a snapshot, filling in field types from an enabled-fields list when given.
fn load_snapshot(
    path: &Path,
    compression: Option<CompressionFormat>,
    fields: Option<&Path>,
) -> Result<Table> {
    let table = load_table(path, compression)
        .map_err(|e| eyre!("{}", user_message_from_report(&e, Some(path))))?;
    match fields {
        Some(fields_path) => {
            let enabled = load_enabled_fields(fields_path)
                .map_err(|e| eyre!("{}", user_message_from_report(&e, Some(fields_path))))?;
            Ok(table.with_enabled_field_types(&enabled))
        }
        None => Ok(table),
    }
}

/// Write `value` as JSON to `output`, or to stdout when no output file is given.
fn emit<T: Serialize>(value: &T, output: Option<&PathBuf>, pretty: bool) -> Result<()> {
    match output {
        Some(path) => {
            write_json(path, value, pretty)?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", to_json_string(value, pretty)?),
    }
    Ok(())
}

fn resolve_chart_kind(flag: Option<&str>, config: &AppConfig) -> Result<ChartKind> {
    match flag {
        Some(name) => ChartKind::parse(name).ok_or_else(|| {
            let known: Vec<&str> = ChartKind::iterator().map(|k| k.as_str()).collect();
            eyre!(
                "Unknown chart kind '{}'. Expected one of: {}",
                name,
                known.join(", ")
            )
        }),
        None => Ok(config.default_chart_kind()),
    }
}

fn load_chart_config(path: Option<&Path>, config: &AppConfig) -> Result<ChartConfig> {
    let mut chart_config: ChartConfig = match path {
        Some(p) => load_json(p)?,
        None => ChartConfig::default(),
    };
    if chart_config.color_scheme.is_none() {
        chart_config.color_scheme = Some(config.chart.default_color_scheme.clone());
    }
    Ok(chart_config)
}

fn run(args: &Args, command: &Command, config: &AppConfig) -> Result<()> {
    let pretty = args.pretty || config.output.pretty;

    match command {
        Command::Filter {
            snapshot,
            conditions,
            fields,
            strict,
            output,
        } => {
            let table = load_snapshot(snapshot, args.compression, fields.as_deref())?;
            let conditions: Vec<FilterCondition> = load_json(conditions)?;
            if *strict {
                validate_conditions(&table, &conditions)?;
            }
            let filtered = apply_filters(&table, &conditions);
            info!(
                "Kept {} of {} rows",
                filtered.row_count(),
                table.row_count()
            );
            emit(&filtered, output.as_ref(), pretty)
        }
        Command::Aggregate {
            snapshot,
            stats,
            group_by,
            fields,
            output,
        } => {
            let table = load_snapshot(snapshot, args.compression, fields.as_deref())?;
            let spec = AggregationSpec::new(group_by.clone(), stats.clone());
            let result = aggregate(&table, &spec)?;
            emit(&result, output.as_ref(), pretty)
        }
        Command::Chart {
            snapshot,
            kind,
            config: chart_config_path,
            output,
        } => {
            let kind = resolve_chart_kind(kind.as_deref(), config)?;
            let chart_config = load_chart_config(chart_config_path.as_deref(), config)?;
            let table = load_snapshot(snapshot, args.compression, None)?;
            let options = map_chart(kind, Some(&table.rows), &chart_config);
            emit(&options.to_echarts(), output.as_ref(), pretty)
        }
        Command::Import {
            path,
            format,
            delimiter,
            no_header,
            skip_rows,
            output,
        } => {
            let options = ImportOptions {
                format: *format,
                compression: args.compression,
                delimiter: *delimiter,
                has_header: Some(!no_header),
                skip_rows: *skip_rows,
            };
            let table = import_table(path, &options)
                .map_err(|e| eyre!("{}", user_message_from_report(&e, Some(path))))?;
            emit(&table, output.as_ref(), pretty)
        }
        Command::Values {
            snapshot,
            field,
            limit,
        } => {
            let table = load_snapshot(snapshot, args.compression, None)?;
            let descriptor = table
                .field_by_id(field)
                .ok_or_else(|| eyre!("No field with id '{}' in {}", field, snapshot.display()))?;
            let limit = limit.unwrap_or(config.analysis.unique_values_limit);
            let values = table.unique_values(&descriptor.field_name, limit);
            emit(&values, None, pretty)
        }
        Command::Operators { data_type } => {
            let data_type = DataType::parse(data_type)
                .ok_or_else(|| eyre!("Unknown data type '{}'", data_type))?;
            for op in operators_for(data_type) {
                println!("{}\t{}", op.as_str(), op.label(data_type));
            }
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if args.generate_config {
        let manager = ConfigManager::new(APP_NAME)?;
        let path = manager.write_default_config(args.force)?;
        println!("Default configuration written to {}", path.display());
        return Ok(());
    }

    let config = AppConfig::load(APP_NAME)?;
    logging::init(args.debug, args.log_format, &config)?;

    let Some(command) = args.command.as_ref() else {
        return Err(eyre!("No command given. Run `snaplens --help` for usage."));
    };

    if let Err(e) = run(&args, command, &config) {
        eprintln!("Error: {}", user_message_from_report(&e, None));
        std::process::exit(1);
    }
    Ok(())
}
