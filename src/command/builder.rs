use tracing::debug;

use crate::command::parser::ParseError;
use crate::command::types::{AggregateKind, FilterExpr, QueryShape, QuerySpec};
use crate::engine::errors::ClientError;
use crate::shared::path::{check_selection, is_selected};

/// Validates a selection and shape and produces an immutable `QuerySpec`.
///
/// Checks run in order: selection, time range, shape-specific arguments
/// (interval, limit, filter paths). Nothing here touches the network.
pub fn build<P: AsRef<str>>(paths: &[P], shape: QueryShape) -> Result<QuerySpec, ClientError> {
    let paths = check_selection(paths)?;

    if let Some((start, end)) = shape.time_range() {
        if start > end {
            return Err(ClientError::InvalidRange { start, end });
        }
    }

    match &shape {
        QueryShape::Downsample { interval, .. } if *interval <= 0 => {
            return Err(ClientError::InvalidInterval(*interval));
        }
        QueryShape::Last { limit } if *limit <= 0 => {
            return Err(ClientError::InvalidArgument(format!(
                "last-value limit must be positive, got {}",
                limit
            )));
        }
        QueryShape::Filtered { filter, .. } => {
            if let Some(unknown) = filter
                .expr()
                .paths()
                .into_iter()
                .find(|p| !is_selected(&paths, p))
            {
                return Err(ClientError::InvalidFilterSyntax(
                    ParseError::UnknownPath(unknown.to_string()).to_string(),
                ));
            }
        }
        _ => {}
    }

    debug!(
        target: "tsdb_session::query",
        shape = shape.name(),
        series = paths.len(),
        "Built query spec"
    );
    Ok(QuerySpec { paths, shape })
}

pub fn plain_range<P: AsRef<str>>(
    paths: &[P],
    start: i64,
    end: i64,
) -> Result<QuerySpec, ClientError> {
    build(paths, QueryShape::Range { start, end })
}

pub fn filtered_range<P: AsRef<str>>(
    paths: &[P],
    start: i64,
    end: i64,
    filter: &str,
) -> Result<QuerySpec, ClientError> {
    // Selection and range errors take precedence over filter syntax.
    check_selection(paths)?;
    if start > end {
        return Err(ClientError::InvalidRange { start, end });
    }
    let filter = FilterExpr::parse(filter)?;
    build(paths, QueryShape::Filtered { start, end, filter })
}

pub fn aggregate<P: AsRef<str>>(
    paths: &[P],
    start: i64,
    end: i64,
    kind: AggregateKind,
) -> Result<QuerySpec, ClientError> {
    build(paths, QueryShape::Aggregate { start, end, kind })
}

pub fn downsample<P: AsRef<str>>(
    paths: &[P],
    start: i64,
    end: i64,
    kind: AggregateKind,
    interval: i64,
) -> Result<QuerySpec, ClientError> {
    build(
        paths,
        QueryShape::Downsample {
            start,
            end,
            kind,
            interval,
        },
    )
}

pub fn last_value<P: AsRef<str>>(paths: &[P], limit: i64) -> Result<QuerySpec, ClientError> {
    build(paths, QueryShape::Last { limit })
}
