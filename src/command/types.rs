use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::parser::filter::parse_filter;
use crate::engine::errors::ClientError;

/// A validated query request. Built only through `command::builder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub(crate) paths: Vec<String>,
    pub(crate) shape: QueryShape,
}

/// The five query shapes. Ranges are `[start, end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryShape {
    Range {
        start: i64,
        end: i64,
    },
    Filtered {
        start: i64,
        end: i64,
        filter: FilterExpr,
    },
    Aggregate {
        start: i64,
        end: i64,
        kind: AggregateKind,
    },
    Downsample {
        start: i64,
        end: i64,
        kind: AggregateKind,
        interval: i64,
    },
    Last {
        limit: i64,
    },
}

impl QueryShape {
    pub fn name(&self) -> &'static str {
        match self {
            QueryShape::Range { .. } => "range",
            QueryShape::Filtered { .. } => "filtered",
            QueryShape::Aggregate { .. } => "aggregate",
            QueryShape::Downsample { .. } => "downsample",
            QueryShape::Last { .. } => "last",
        }
    }

    pub fn time_range(&self) -> Option<(i64, i64)> {
        match self {
            QueryShape::Range { start, end }
            | QueryShape::Filtered { start, end, .. }
            | QueryShape::Aggregate { start, end, .. }
            | QueryShape::Downsample { start, end, .. } => Some((*start, *end)),
            QueryShape::Last { .. } => None,
        }
    }
}

impl QuerySpec {
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn shape(&self) -> &QueryShape {
        &self.shape
    }

    pub fn start(&self) -> Option<i64> {
        self.shape.time_range().map(|(start, _)| start)
    }

    pub fn end(&self) -> Option<i64> {
        self.shape.time_range().map(|(_, end)| end)
    }

    pub fn filter(&self) -> Option<&FilterExpr> {
        match &self.shape {
            QueryShape::Filtered { filter, .. } => Some(filter),
            _ => None,
        }
    }

    pub fn aggregate(&self) -> Option<AggregateKind> {
        match &self.shape {
            QueryShape::Aggregate { kind, .. } | QueryShape::Downsample { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn interval(&self) -> Option<i64> {
        match &self.shape {
            QueryShape::Downsample { interval, .. } => Some(*interval),
            _ => None,
        }
    }

    pub fn last_limit(&self) -> Option<i64> {
        match &self.shape {
            QueryShape::Last { limit } => Some(*limit),
            _ => None,
        }
    }

    /// Buckets of an aggregate or downsample query; empty for other shapes.
    /// Produced lazily since a downsample over a wide range can be huge.
    pub fn buckets(&self) -> TimeBuckets {
        match &self.shape {
            QueryShape::Aggregate { start, end, .. } => TimeBuckets::new(*start, *end, None),
            QueryShape::Downsample {
                start,
                end,
                interval,
                ..
            } => TimeBuckets::new(*start, *end, Some(*interval)),
            _ => TimeBuckets::new(0, 0, None),
        }
    }

    pub fn bucket_count(&self) -> u64 {
        match &self.shape {
            QueryShape::Aggregate { start, end, .. } => u64::from(start < end),
            QueryShape::Downsample {
                start,
                end,
                interval,
                ..
            } => {
                let span = i128::from(*end) - i128::from(*start);
                if span <= 0 || *interval <= 0 {
                    return 0;
                }
                let interval = i128::from(*interval);
                ((span + interval - 1) / interval) as u64
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeBucket {
    pub start: i64,
    pub end: i64,
}

/// Iterator over `[start + k*interval, start + (k+1)*interval)`, the last
/// bucket clipped at `end`. Without an interval, one bucket spans the range.
#[derive(Debug, Clone)]
pub struct TimeBuckets {
    cursor: i64,
    end: i64,
    interval: Option<i64>,
    done: bool,
}

impl TimeBuckets {
    fn new(start: i64, end: i64, interval: Option<i64>) -> Self {
        Self {
            cursor: start,
            end,
            interval,
            done: start >= end || interval.is_some_and(|i| i <= 0),
        }
    }
}

impl Iterator for TimeBuckets {
    type Item = TimeBucket;

    fn next(&mut self) -> Option<TimeBucket> {
        if self.done {
            return None;
        }
        let bucket_end = match self.interval {
            Some(interval) => self
                .cursor
                .checked_add(interval)
                .map_or(self.end, |e| e.min(self.end)),
            None => self.end,
        };
        let bucket = TimeBucket {
            start: self.cursor,
            end: bucket_end,
        };
        if bucket_end >= self.end {
            self.done = true;
        } else {
            self.cursor = bucket_end;
        }
        Some(bucket)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateKind {
    Max,
    Min,
    Sum,
    Avg,
    Count,
    First,
    Last,
}

impl AggregateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateKind::Max => "MAX",
            AggregateKind::Min => "MIN",
            AggregateKind::Sum => "SUM",
            AggregateKind::Avg => "AVG",
            AggregateKind::Count => "COUNT",
            AggregateKind::First => "FIRST",
            AggregateKind::Last => "LAST",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MAX" => Ok(AggregateKind::Max),
            "MIN" => Ok(AggregateKind::Min),
            "SUM" => Ok(AggregateKind::Sum),
            "AVG" => Ok(AggregateKind::Avg),
            "COUNT" => Ok(AggregateKind::Count),
            "FIRST" => Ok(AggregateKind::First),
            "LAST" => Ok(AggregateKind::Last),
            _ => Err(ClientError::InvalidArgument(format!(
                "unknown aggregate '{}'",
                s
            ))),
        }
    }
}

/// A value filter: the text sent to the server plus its parsed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpr {
    text: String,
    expr: Expr,
}

impl FilterExpr {
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        let expr =
            parse_filter(text).map_err(|e| ClientError::InvalidFilterSyntax(e.to_string()))?;
        Ok(Self {
            text: text.trim().to_string(),
            expr,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Compare {
        path: String,
        op: CompareOp,
        value: Literal,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Paths referenced by comparisons, in order of first appearance.
    pub fn paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_paths(&mut out);
        out
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Compare { path, .. } => {
                if !out.contains(&path.as_str()) {
                    out.push(path);
                }
            }
            Expr::And(l, r) | Expr::Or(l, r) => {
                l.collect_paths(out);
                r.collect_paths(out);
            }
            Expr::Not(inner) => inner.collect_paths(out),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare { path, op, value } => write!(f, "{} {} {}", path, op, value),
            Expr::And(l, r) => write!(f, "({} && {})", l, r),
            Expr::Or(l, r) => write!(f, "({} || {})", l, r),
            Expr::Not(inner) => write!(f, "!({})", inner),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// The operator that gives the same result with operands swapped.
    pub fn flipped(self) -> Self {
        match self {
            CompareOp::Eq => CompareOp::Eq,
            CompareOp::Neq => CompareOp::Neq,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Gte => CompareOp::Lte,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Lte => CompareOp::Gte,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::Boolean(v) => write!(f, "{}", v),
            Literal::String(s) => write!(f, "{:?}", s),
        }
    }
}
