//! Row filters and ordering for table queries

use std::fmt;

/// Column filter; the backend contract only ever needs equality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    /// Rows where `column` equals `value`
    pub fn eq<T: ToString + ?Sized>(column: &str, value: &T) -> Self {
        Self {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    /// The query pair understood by PostgREST (`column=eq.value`)
    pub fn to_query_pair(&self) -> (String, String) {
        (self.column.clone(), format!("eq.{}", self.value))
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Ordering applied to a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: SortOrder,
}

impl Order {
    /// Newest rows first, by creation timestamp
    pub fn newest_first() -> Self {
        Self {
            column: "created_at".to_string(),
            direction: SortOrder::Descending,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.column, self.direction.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_filter_renders_postgrest_syntax() {
        let filter = Filter::eq("email", "a@b.c");
        assert_eq!(
            filter.to_query_pair(),
            ("email".to_string(), "eq.a@b.c".to_string())
        );
    }

    #[test]
    fn newest_first_orders_by_created_at_desc() {
        assert_eq!(Order::newest_first().to_string(), "created_at.desc");
    }
}
