//! vibefilter - filter delimited rows with a predicate tree

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use vibefilter::expression::{read_plan, write_plan, Comparator};
use vibefilter::{DataType, Expression, FilterPredicate, Row, Value};

/// vibefilter - evaluate a filter predicate over delimited rows
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Column types, comma separated (e.g. "int,string,decimal")
    #[arg(short, long)]
    schema: String,

    /// Predicate as column:op:literal, op one of eq ne gt ge lt le.
    /// Repeat to AND several predicates together.
    #[arg(short = 'w', long = "where")]
    predicates: Vec<String>,

    /// Load an encoded plan instead of building one from --where
    #[arg(short, long, conflicts_with = "predicates")]
    plan: Option<PathBuf>,

    /// Write the plan in use to this path
    #[arg(long)]
    save_plan: Option<PathBuf>,

    /// Input file (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Field delimiter
    #[arg(short = 'D', long, default_value = ",")]
    delimiter: char,

    /// Skip the first input line
    #[arg(long)]
    skip_header: bool,

    /// Print the plan and exit without reading rows
    #[arg(long)]
    explain: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let schema = parse_schema(&args.schema)?;

    let expr = match &args.plan {
        Some(path) => read_plan(path)
            .with_context(|| format!("Failed to load plan from {}", path.display()))?,
        None => build_predicate(&args.predicates, &schema)?,
    };
    let predicate =
        FilterPredicate::with_schema(expr, &schema).context("Filter does not fit the schema")?;

    if let Some(path) = &args.save_plan {
        write_plan(path, predicate.expr())
            .with_context(|| format!("Failed to save plan to {}", path.display()))?;
    }

    if args.explain {
        print_plan(predicate.expr());
        return Ok(());
    }

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut scanned = 0usize;
    let mut kept = 0usize;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if (args.skip_header && line_no == 0) || line.trim().is_empty() {
            continue;
        }
        let row = Row::parse_delimited(&line, args.delimiter, &schema)
            .with_context(|| format!("Line {}", line_no + 1))?;
        scanned += 1;
        if predicate
            .matches(&row)
            .with_context(|| format!("Line {}", line_no + 1))?
        {
            kept += 1;
            writeln!(out, "{}", line)?;
        }
    }

    log::info!("Kept {} of {} rows", kept, scanned);
    Ok(())
}

fn parse_schema(text: &str) -> Result<Vec<DataType>> {
    text.split(',')
        .map(|name| name.parse::<DataType>().map_err(anyhow::Error::msg))
        .collect()
}

/// Turn `col:op:literal` clauses into one conjunction
fn build_predicate(clauses: &[String], schema: &[DataType]) -> Result<Expression> {
    let mut predicates = Vec::with_capacity(clauses.len());
    for clause in clauses {
        let mut parts = clause.splitn(3, ':');
        let (Some(column), Some(op), Some(literal)) = (parts.next(), parts.next(), parts.next())
        else {
            bail!("Predicate '{}' is not column:op:literal", clause);
        };

        let index: usize = column
            .trim()
            .parse()
            .with_context(|| format!("Bad column index in '{}'", clause))?;
        let Some(&data_type) = schema.get(index) else {
            bail!("Column {} is outside the {}-column schema", index, schema.len());
        };
        let Some(comparator) = Comparator::parse(op) else {
            bail!("Unknown comparison operator '{}'", op);
        };

        let value = Value::parse_as(literal, data_type).map_err(anyhow::Error::msg)?;
        let right = match value {
            Value::Null => Expression::null(data_type),
            value => Expression::literal(value),
        };
        predicates.push(Expression::compare(
            comparator,
            Expression::column(index, data_type),
            right,
        ));
    }

    Expression::conjunction(predicates).context("No predicate given; use --where or --plan")
}

fn print_plan(expr: &Expression) {
    println!("Filter: {}", expr);
    println!("Root:   {}", expr.kind());
    println!("Reads:  {:?}", expr.column_indices());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clauses(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_schema() {
        let schema = parse_schema("int, string,decimal").unwrap();
        assert_eq!(schema, vec![DataType::Integer, DataType::String, DataType::Decimal]);

        assert!(parse_schema("int,blob").is_err());
    }

    #[test]
    fn test_build_single_predicate() {
        let schema = [DataType::Integer, DataType::String];
        let expr = build_predicate(&clauses(&["0:gt:100"]), &schema).unwrap();
        assert_eq!(expr.describe(), "GreaterThan(Column(#0),Literal(100))");

        // The literal may itself contain the separator
        let expr = build_predicate(&clauses(&["1:eq:a:b"]), &schema).unwrap();
        assert_eq!(expr.describe(), "Equals(Column(#1),Literal('a:b'))");
    }

    #[test]
    fn test_build_conjunction() {
        let schema = [DataType::Integer, DataType::String];
        let expr = build_predicate(&clauses(&["0:ge:1", "1:ne:x"]), &schema).unwrap();
        assert_eq!(
            expr.describe(),
            "And(GreaterThanEquals(Column(#0),Literal(1)),NotEquals(Column(#1),Literal('x')))"
        );
    }

    #[test]
    fn test_null_literal() {
        let schema = [DataType::Integer];
        let expr = build_predicate(&clauses(&["0:eq:NULL"]), &schema).unwrap();
        assert_eq!(expr.describe(), "Equals(Column(#0),Literal(NULL))");

        let row = Row::new(vec![Value::Null]);
        assert!(!FilterPredicate::new(expr).matches(&row).unwrap());
    }

    #[test]
    fn test_rejects_bad_clauses() {
        let schema = [DataType::Integer];

        let err = build_predicate(&clauses(&["0:gt"]), &schema).unwrap_err();
        assert!(err.to_string().contains("not column:op:literal"));

        let err = build_predicate(&clauses(&["x:gt:1"]), &schema).unwrap_err();
        assert!(err.to_string().contains("Bad column index"));

        let err = build_predicate(&clauses(&["3:eq:1"]), &schema).unwrap_err();
        assert!(err.to_string().contains("outside the 1-column schema"));

        let err = build_predicate(&clauses(&["0:like:1"]), &schema).unwrap_err();
        assert!(err.to_string().contains("Unknown comparison operator"));

        assert!(build_predicate(&clauses(&["0:eq:ten"]), &schema).is_err());
        assert!(build_predicate(&[], &schema).is_err());
    }
}
