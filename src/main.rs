use anyhow::{anyhow, bail, Context, Result};
use crossterm::style::Stylize;
use std::path::PathBuf;
use tracing::debug;
use typed_table::config::Config;
use typed_table::data::column::SortOrder;
use typed_table::data::plain_reader::{PlainReader, TAB_DELIMITER};
use typed_table::logging::{init_tracing, DEFAULT_FILTER};
use typed_table::table_display::display_table;

/// Options collected from the command line; unset values fall back to the
/// configuration file.
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    source: Option<String>,
    delimiter: Option<String>,
    no_header: bool,
    index: Option<String>,
    sort: Option<(String, SortOrder)>,
    start: usize,
    limit: Option<usize>,
    types: Option<Vec<String>>,
    config: Option<PathBuf>,
    pretty: bool,
    verbose: bool,
    help: bool,
    generate_config: bool,
}

fn print_help() {
    println!("{}", "typed-table - typed preview of delimited text".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  typed-table [OPTIONS] <FILE|URL>");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}   - Field delimiter (default ,)", "--delimiter D".green());
    println!("  {}           - Tab separated input", "--tsv".green());
    println!("  {}     - First line is data, not headers", "--no-header".green());
    println!("  {}   - Group rows by a column", "--index COL".green());
    println!(
        "  {} - Sort rows by a column",
        "--sort COL[:asc|:desc]".green()
    );
    println!("  {}     - First row to show", "--start N".green());
    println!("  {}     - Number of rows to show", "--limit N".green());
    println!(
        "  {} - Column types, e.g. number,,date(y-M-d)",
        "--types t1,t2".green()
    );
    println!("  {} - Read configuration from FILE", "--config FILE".green());
    println!("  {}        - Render with borders", "--pretty".green());
    println!("  {}       - Debug logging", "--verbose".green());
    println!(
        "  {} - Print a default configuration file",
        "--generate-config".green()
    );
}

fn next_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| anyhow!("Missing value for {}", flag))
}

fn parse_count(value: &str, flag: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("Invalid number for {}: {}", flag, value))
}

fn parse_sort(value: &str) -> Result<(String, SortOrder)> {
    if let Some((column, order)) = value.rsplit_once(':') {
        if let Ok(order) = order.parse::<SortOrder>() {
            return Ok((column.to_string(), order));
        }
    }
    Ok((value.to_string(), SortOrder::Asc))
}

fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => options.help = true,
            "--generate-config" => options.generate_config = true,
            "--delimiter" => options.delimiter = Some(next_value(&mut iter, arg)?),
            "--tsv" => options.delimiter = Some(TAB_DELIMITER.to_string()),
            "--no-header" => options.no_header = true,
            "--index" => options.index = Some(next_value(&mut iter, arg)?),
            "--sort" => options.sort = Some(parse_sort(&next_value(&mut iter, arg)?)?),
            "--start" => options.start = parse_count(&next_value(&mut iter, arg)?, arg)?,
            "--limit" => options.limit = Some(parse_count(&next_value(&mut iter, arg)?, arg)?),
            "--types" => {
                let types = next_value(&mut iter, arg)?;
                options.types = Some(types.split(',').map(|t| t.trim().to_string()).collect());
            }
            "--config" => options.config = Some(PathBuf::from(next_value(&mut iter, arg)?)),
            "--pretty" => options.pretty = true,
            "--verbose" | "-v" => options.verbose = true,
            flag if flag.starts_with("--") => bail!("Unknown option: {}", flag),
            source => {
                if options.source.is_some() {
                    bail!("Only one source can be given, found extra '{}'", source);
                }
                options.source = Some(source.to_string());
            }
        }
    }

    Ok(options)
}

fn run(options: CliOptions) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(types) = options.types {
        config.reader.types = types;
    }

    let source = options
        .source
        .ok_or_else(|| anyhow!("No input file or URL given (see --help)"))?;
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| config.reader.delimiter.clone());
    let header = config.reader.header && !options.no_header;

    let reader = PlainReader::from_config(&config.reader);
    let mut table = reader.read_with(&source, &delimiter, header)?;
    debug!("Read stats: {:?}", reader.read_stats());

    if let Some(index) = &options.index {
        table.index(index)?;
    }
    if let Some((column, order)) = &options.sort {
        table.sort(column, *order)?;
    }

    let limit = options.limit.unwrap_or(config.display.preview_rows);
    if options.pretty || config.display.use_comfy_table {
        display_table(&table, options.start, limit)?;
    } else {
        print!("{}", table.to_preview(options.start, limit)?);
        println!(
            "{}",
            format!(
                "{} rows, {} columns",
                table.row_count(),
                table.column_count()
            )
            .green()
        );
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            std::process::exit(2);
        }
    };

    if options.help {
        print_help();
        return;
    }
    if options.generate_config {
        print!("{}", Config::default_toml());
        return;
    }

    init_tracing(if options.verbose { "debug" } else { DEFAULT_FILTER });

    if let Err(e) = run(options) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}
