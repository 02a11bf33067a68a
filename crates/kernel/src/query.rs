//! Explicit filter specification, sorting and paging shared by services and
//! repositories.

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_MAX_RESULT_COUNT: u64 = 10;
pub const MAX_MAX_RESULT_COUNT: u64 = 1000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("empty sorting clause")]
    EmptySortClause,

    #[error("unknown sort field '{0}'")]
    InvalidSortField(String),

    #[error("unknown sort direction '{0}', expected asc or desc")]
    InvalidSortDirection(String),

    #[error("skipCount must not be negative, got {0}")]
    NegativeSkipCount(i64),

    #[error("maxResultCount must be between 0 and {MAX_MAX_RESULT_COUNT}, got {0}")]
    MaxResultCountOutOfRange(i64),
}

/// Enumerated set of queryable fields of one entity.
pub trait FieldSet: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    fn all() -> &'static [Self];

    /// Name used on the wire (`totalPage`).
    fn name(self) -> &'static str;

    /// Storage column backing the field.
    fn column(self) -> &'static str;

    fn sortable(self) -> bool {
        true
    }

    /// Case-insensitive lookup of a sortable field by wire name.
    fn parse(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|f| f.sortable() && f.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortField<F> {
    pub field: F,
    pub direction: Direction,
}

impl<F> SortField<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Parse a sorting expression such as `"language asc, year DESC"`.
///
/// Blank input yields no clauses.
pub fn parse_sorting<F: FieldSet>(sorting: &str) -> Result<Vec<SortField<F>>, QueryError> {
    if sorting.trim().is_empty() {
        return Ok(Vec::new());
    }

    sorting
        .split(',')
        .map(|clause| {
            let mut parts = clause.split_whitespace();
            let name = parts.next().ok_or(QueryError::EmptySortClause)?;
            let field =
                F::parse(name).ok_or_else(|| QueryError::InvalidSortField(name.to_string()))?;
            let direction = match parts.next() {
                None => Direction::Asc,
                Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
                Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
                Some(d) => return Err(QueryError::InvalidSortDirection(d.to_string())),
            };
            if let Some(extra) = parts.next() {
                return Err(QueryError::InvalidSortDirection(extra.to_string()));
            }
            Ok(SortField { field, direction })
        })
        .collect()
}

/// One predicate of a [`FilterSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition<F> {
    /// Matches when any of `fields` contains `needle`, ignoring ASCII case.
    ContainsAny { fields: Vec<F>, needle: String },
    /// Inclusive range; an absent bound leaves that side open.
    Range {
        field: F,
        min: Option<i64>,
        max: Option<i64>,
    },
}

/// Conjunction of conditions applied to a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec<F> {
    conditions: Vec<Condition<F>>,
}

impl<F> Default for FilterSpec<F> {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
        }
    }
}

impl<F: FieldSet> FilterSpec<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text containment condition unless `needle` is blank.
    pub fn contains_any(mut self, fields: &[F], needle: Option<&str>) -> Self {
        if let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) {
            self.conditions.push(Condition::ContainsAny {
                fields: fields.to_vec(),
                needle: needle.to_string(),
            });
        }
        self
    }

    /// Adds a range condition unless both bounds are absent.
    pub fn range(mut self, field: F, min: Option<i64>, max: Option<i64>) -> Self {
        if min.is_some() || max.is_some() {
            self.conditions.push(Condition::Range { field, min, max });
        }
        self
    }

    pub fn conditions(&self) -> &[Condition<F>] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Offset/limit window over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn from_raw(skip_count: Option<i64>, max_result_count: Option<i64>) -> Result<Self, QueryError> {
        let skip = match skip_count {
            None => 0,
            Some(s) if s < 0 => return Err(QueryError::NegativeSkipCount(s)),
            Some(s) => s as u64,
        };
        let limit = match max_result_count {
            None => DEFAULT_MAX_RESULT_COUNT,
            Some(m) if m < 0 || m as u64 > MAX_MAX_RESULT_COUNT => {
                return Err(QueryError::MaxResultCountOutOfRange(m))
            }
            Some(m) => m as u64,
        };
        Ok(Self { skip, limit })
    }
}

/// Everything a repository needs to produce one page of a listing.
#[derive(Debug, Clone)]
pub struct ListQuery<F> {
    pub filter: FilterSpec<F>,
    pub sorting: Vec<SortField<F>>,
    pub page: PageRequest,
}

/// One page of results plus the total number of matches before paging.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> PagedResult<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

/// Raw paging and sorting parameters of a list request.
pub trait PagedAndSortedRequest {
    fn skip_count(&self) -> Option<i64>;
    fn max_result_count(&self) -> Option<i64>;
    fn sorting(&self) -> Option<&str>;
}
