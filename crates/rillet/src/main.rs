mod input;

use std::io::{self, BufWriter, Write};

use clap::{Parser, Subcommand, ValueEnum};
use rillet_core::arrays::datatype::DataType;
use rillet_core::config::function::FunctionConfig;
use rillet_core::functions::aggregate::AggregatePartition;
use rillet_core::functions::aggregate::builtin::find_builtin_aggregate;
use rillet_core::functions::aggregate::builtin::sum_if::{
    FUNCTION_SET_SUM_IF,
    FUNCTION_SET_SUM_IF_NON_NULL,
};
use rillet_core::functions::documentation::Documentation;
use rillet_core::functions::scalar::builtin::find_builtin_scalar;
use rillet_core::functions::scalar::builtin::list::array_distinct::FUNCTION_SET_ARRAY_DISTINCT;
use rillet_core::functions::{aggregate, scalar};
use rillet_error::{DbError, Result};

#[derive(Parser)]
#[clap(name = "rillet")]
struct Arguments {
    /// Default log level, overridden by RUST_LOG.
    #[clap(long, default_value = "error", env = "RILLET_LOG_LEVEL")]
    log_level: String,
    /// Log output format.
    #[clap(long, value_enum, default_value_t = LogFormatArg::Human)]
    log_format: LogFormatArg,
    /// Function settings, as `name=value`.
    #[clap(long = "set", value_parser = input::parse_key_val)]
    settings: Vec<(String, String)>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Sum values where the condition holds.
    SumIf {
        /// Element type of values and defaults (bigint, real, double).
        #[clap(long = "type", default_value = "bigint")]
        datatype: String,
        /// Comma separated booleans.
        #[clap(long)]
        conditions: String,
        /// Comma separated values.
        #[clap(long)]
        values: String,
        /// Comma separated values used when the condition doesn't hold.
        #[clap(long)]
        defaults: Option<String>,
        /// Split rows into this many partitions. Partial results are combined
        /// in reverse order.
        #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
        partitions: u16,
        /// Return 0 instead of NULL when the condition never holds.
        #[clap(long)]
        non_null: bool,
    },
    /// Remove duplicate elements from an array.
    Distinct {
        /// Element type of the array.
        #[clap(long = "type", default_value = "bigint")]
        datatype: String,
        /// Comma separated values.
        values: String,
    },
    /// List function settings and their current values.
    Settings,
    /// List builtin functions, or describe one by name or alias.
    Functions {
        name: Option<String>,
    },
}

/// Small binary for running `sum_if` and `array_distinct` on literal inputs.
fn main() {
    let args = Arguments::parse();
    let format = match args.log_format {
        LogFormatArg::Human => logutil::LogFormat::HumanReadable,
        LogFormatArg::Json => logutil::LogFormat::Json,
    };
    logutil::configure_global_logger(logutil::level_from_str(&args.log_level), format, io::stderr);

    // Nested result. Outer result for the panic, inner is execution result.
    let result = std::panic::catch_unwind(|| inner(args));

    match result {
        Ok(Err(err)) => {
            println!("ERROR: {err}");
            std::process::exit(1);
        }
        Err(err) => {
            println!("PANIC: {err:?}");
            std::process::exit(2);
        }
        Ok(Ok(())) => (),
    }
}

fn parse_datatype(name: &str) -> Result<DataType> {
    DataType::from_name(name)
        .ok_or_else(|| DbError::new("Unknown data type").with_field("name", name))
}

fn write_documentation(out: &mut impl Write, doc: &Documentation) -> Result<()> {
    writeln!(out, "  category: {}", doc.category.as_str())?;
    writeln!(out, "  arguments: {}", doc.arguments.join(", "))?;
    writeln!(out, "  {}", doc.description.trim().replace('\n', "\n  "))?;
    if let Some(example) = &doc.example {
        writeln!(out, "  example: {} => {}", example.example, example.output)?;
    }
    Ok(())
}

fn inner(args: Arguments) -> Result<()> {
    let mut config = FunctionConfig::default();
    for (name, value) in &args.settings {
        config.set_from_str(name, value)?;
    }

    let mut stdout = BufWriter::new(io::stdout());

    match args.command {
        Command::SumIf {
            datatype,
            conditions,
            values,
            defaults,
            partitions,
            non_null,
        } => {
            let datatype = parse_datatype(&datatype)?;
            let num_partitions = usize::from(partitions);

            let mut columns = vec![
                input::parse_partitioned(DataType::Boolean, &conditions, num_partitions)?,
                input::parse_partitioned(datatype, &values, num_partitions)?,
            ];
            if let Some(defaults) = &defaults {
                columns.push(input::parse_partitioned(datatype, defaults, num_partitions)?);
            }

            let partition_lens: Vec<Vec<usize>> = columns
                .iter()
                .map(|col| col.iter().map(|arr| arr.len()).collect())
                .collect();
            if partition_lens.windows(2).any(|w| w[0] != w[1]) {
                return Err(DbError::new("All inputs must have the same number of values"));
            }

            let mut partitions: Vec<AggregatePartition> = (0..columns[0].len())
                .map(|idx| {
                    AggregatePartition::ungrouped(
                        columns.iter().map(|col| col[idx].clone()).collect(),
                    )
                })
                .collect();
            partitions.reverse();

            let set = if non_null {
                FUNCTION_SET_SUM_IF_NON_NULL
            } else {
                FUNCTION_SET_SUM_IF
            };
            let input_types: Vec<_> = partitions[0]
                .inputs
                .iter()
                .map(|input| input.datatype())
                .collect();
            let function = set.try_find_exact(&input_types)?;

            tracing::debug!(num_partitions = partitions.len(), function = set.name, "running aggregate");
            let out = function.aggregate(&partitions, 1)?;
            writeln!(stdout, "{}", out.format_value(0))?;
        }
        Command::Distinct { datatype, values } => {
            let datatype = parse_datatype(&datatype)?;
            let inputs = input::parse_partitioned(datatype, &values, 1)?;

            let function = FUNCTION_SET_ARRAY_DISTINCT.try_find_exact(&[datatype])?;
            let out = function.execute(&config, &inputs)?;
            writeln!(stdout, "{}", input::format_array(&out))?;
        }
        Command::Functions { name: None } => {
            let aggregates = aggregate::builtin::BUILTIN_AGGREGATE_FUNCTION_SETS
                .iter()
                .map(|set| (set.name, set.aliases, set.doc));
            let scalars = scalar::builtin::BUILTIN_SCALAR_FUNCTION_SETS
                .iter()
                .map(|set| (set.name, set.aliases, set.doc));
            for (name, aliases, doc) in aggregates.chain(scalars) {
                let category = doc.map(|doc| doc.category.as_str()).unwrap_or("");
                write!(stdout, "{name} [{category}]")?;
                if !aliases.is_empty() {
                    write!(stdout, " (aliases: {})", aliases.join(", "))?;
                }
                writeln!(stdout)?;
            }
        }
        Command::Functions { name: Some(name) } => {
            let (canonical, doc) = match (find_builtin_aggregate(&name), find_builtin_scalar(&name)) {
                (Some(set), _) => (set.name, set.doc),
                (None, Some(set)) => (set.name, set.doc),
                (None, None) => {
                    return Err(DbError::new("Unknown function").with_field("name", name));
                }
            };
            writeln!(stdout, "{canonical}")?;
            if let Some(doc) = doc {
                write_documentation(&mut stdout, doc)?;
            }
        }
        Command::Settings => {
            for (name, description) in FunctionConfig::settings() {
                writeln!(
                    stdout,
                    "{name} = {} -- {description}",
                    config.get_as_string(name)?
                )?;
            }
        }
    }

    stdout.flush()?;

    Ok(())
}
