use clap::Parser;
use tracing::info;

use tsdb_session::command::types::AggregateKind;
use tsdb_session::engine::core::read::ResultTable;
use tsdb_session::engine::types::{Cell, DataType, Value};
use tsdb_session::frontend::TcpTransport;
use tsdb_session::logging;
use tsdb_session::session::Session;
use tsdb_session::shared::config::load_settings;

#[derive(Parser)]
#[command(name = "tsdb-demo")]
#[command(about = "Walks a session through writes and every query shape", long_about = None)]
struct Args {
    /// Server host, overrides `connection.host`
    #[arg(long)]
    host: Option<String>,

    /// Server port, overrides `connection.port`
    #[arg(short, long)]
    port: Option<u16>,

    #[arg(short, long)]
    username: Option<String>,

    #[arg(long)]
    password: Option<String>,

    /// Series prefix for the demo data
    #[arg(long, default_value = "test.go")]
    prefix: String,
}

const NAMES: [&str; 7] = ["one", "two", "three", "four", "five", "six", "seven"];

/// One sample per demo series: name, then integer, long, float, double and flag.
fn samples(name: &str, i: i32, flag: bool) -> Vec<Value> {
    vec![
        Value::from(name),
        Value::Integer(i),
        Value::Long(i as i64),
        Value::Float(i as f32 + 0.1),
        Value::Double(i as f64 + 0.1),
        Value::Boolean(flag),
    ]
}

fn demo_rows() -> Vec<Vec<Cell>> {
    NAMES
        .iter()
        .enumerate()
        .map(|(row, name)| {
            samples(name, row as i32 + 1, row % 2 == 0)
                .into_iter()
                .enumerate()
                // Leave one hole per row from the third row on.
                .map(|(col, v)| (row < 2 || col != row - 1).then_some(v))
                .collect()
        })
        .collect()
}

fn full_rows(rows: &[(&str, i32, bool)]) -> Vec<Vec<Cell>> {
    rows.iter()
        .map(|(name, i, flag)| samples(name, *i, *flag).into_iter().map(Some).collect())
        .collect()
}

fn full_columns(rows: &[(&str, i32, bool)]) -> Vec<Vec<Cell>> {
    let rows = full_rows(rows);
    (0..DataType::ALL.len())
        .map(|col| rows.iter().map(|row| row[col].clone()).collect())
        .collect()
}

fn print_table(title: &str, table: &ResultTable) {
    println!("== {title} ({} rows)", table.len());
    print!("{:>20}", "time");
    for path in table.paths() {
        print!(" {path:>14}");
    }
    println!();
    for row in table.rows() {
        print!("{:>20}", row.timestamp);
        for cell in &row.values {
            match cell {
                Some(value) => print!(" {:>14}", value.to_string()),
                None => print!(" {:>14}", "null"),
            }
        }
        println!();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = load_settings()?;
    if let Some(host) = args.host {
        settings.connection.host = host;
    }
    if let Some(port) = args.port {
        settings.connection.port = port;
    }
    if let Some(username) = args.username {
        settings.connection.username = username;
    }
    if let Some(password) = args.password {
        settings.connection.password = password;
    }
    logging::init(&settings.logging)?;

    let transport = TcpTransport::from_settings(&settings)?;
    let mut session = Session::open(transport, &settings.connection)?;
    info!("Replica count: {}", session.replica_num()?);
    print!("{}", session.cluster_info()?);

    let paths: Vec<String> = ["a", "b", "c", "d", "e", "f"]
        .iter()
        .map(|s| format!("{}.{}", args.prefix, s))
        .collect();
    let timestamps: Vec<i64> = (1..=NAMES.len() as i64).collect();
    session.insert_row_records(&paths, &timestamps, demo_rows(), &DataType::ALL)?;
    session.insert_non_aligned_row_records(
        &paths,
        &[8, 9],
        full_rows(&[("eight", 8, false), ("nine", 9, true)]),
        &DataType::ALL,
    )?;
    session.insert_column_records(
        &paths,
        &[10, 11],
        full_columns(&[("ten", 10, false), ("eleven", 11, true)]),
        &DataType::ALL,
    )?;
    session.insert_non_aligned_column_records(
        &paths,
        &[12, 13],
        full_columns(&[("twelve", 12, false), ("thirteen", 13, true)]),
        &DataType::ALL,
    )?;

    for series in session.list_time_series()? {
        println!("{series}");
    }

    print_table("all", &session.query(&paths, 0, i64::MAX)?);

    let filter = format!("{0}.b > 3 && {0}.c < 7", args.prefix);
    print_table(
        "filtered",
        &session.value_filter_query(&paths[1..3], 0, i64::MAX, &filter)?,
    );
    print_table(
        "downsample max/5",
        &session.downsample_query(&paths[1..5], 0, 14, AggregateKind::Max, 5)?,
    );
    print_table(
        "aggregate max",
        &session.aggregate_query(&paths[1..5], 0, 14, AggregateKind::Max)?,
    );
    print_table("last", &session.last_query(&paths, 1)?);

    session.close()?;
    Ok(())
}
