//! Query builders for TableClient

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::postgrest::filter::{Filter, Order};
use crate::postgrest::types::ReturnOption;
use crate::postgrest::TableClient;

/// Builder for SELECT queries
pub struct SelectBuilder {
    table: TableClient,
    columns: String,
    filters: Vec<Filter>,
    order: Option<Order>,
    limit: Option<usize>,
}

impl SelectBuilder {
    pub(crate) fn new(table: TableClient, columns: &str) -> Self {
        Self {
            table,
            columns: columns.to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<T: ToString + ?Sized>(self, column: &str, value: &T) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Order the results
    pub fn order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Limit the number of rows returned
    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// Execute the query and return the rows
    pub async fn execute<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let mut fetch = self.table.decorate(Fetch::get(&self.table.client, &self.table.url));
        fetch = fetch.query_pair("select", &self.columns);
        for filter in &self.filters {
            let (column, value) = filter.to_query_pair();
            fetch = fetch.query_pair(&column, &value);
        }
        if let Some(order) = &self.order {
            fetch = fetch.query_pair("order", &order.to_string());
        }
        if let Some(limit) = self.limit {
            fetch = fetch.query_pair("limit", &limit.to_string());
        }

        tracing::debug!(table = %self.table.table, "select");
        fetch.execute::<Vec<T>>().await
    }
}

/// Builder for INSERT queries
pub struct InsertBuilder<T: Serialize> {
    table: TableClient,
    rows: T,
}

impl<T: Serialize> InsertBuilder<T> {
    pub(crate) fn new(table: TableClient, rows: T) -> Self {
        Self { table, rows }
    }

    /// Execute the insert and return the inserted rows
    pub async fn execute<R: DeserializeOwned>(self) -> Result<Vec<R>> {
        tracing::debug!(table = %self.table.table, "insert");
        self.table
            .decorate(Fetch::post(&self.table.client, &self.table.url))
            .header("Prefer", ReturnOption::Representation.as_header())
            .query_pair("select", "*")
            .json(&self.rows)?
            .execute::<Vec<R>>()
            .await
    }
}

/// Builder for UPDATE queries
pub struct UpdateBuilder<T: Serialize> {
    table: TableClient,
    values: T,
    filters: Vec<Filter>,
}

impl<T: Serialize> UpdateBuilder<T> {
    pub(crate) fn new(table: TableClient, values: T) -> Self {
        Self {
            table,
            values,
            filters: Vec::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString + ?Sized>(mut self, column: &str, value: &V) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Execute the update without returning the updated rows
    pub async fn execute(self) -> Result<()> {
        if self.filters.is_empty() {
            return Err(Error::InvalidInput(format!(
                "update on {} without a filter",
                self.table.table
            )));
        }

        tracing::debug!(table = %self.table.table, "update");
        let mut fetch = self
            .table
            .decorate(Fetch::patch(&self.table.client, &self.table.url))
            .header("Prefer", ReturnOption::Minimal.as_header());
        for filter in &self.filters {
            let (column, value) = filter.to_query_pair();
            fetch = fetch.query_pair(&column, &value);
        }
        fetch.json(&self.values)?.execute_empty().await
    }
}

/// Builder for DELETE queries
pub struct DeleteBuilder {
    table: TableClient,
    filters: Vec<Filter>,
}

impl DeleteBuilder {
    pub(crate) fn new(table: TableClient) -> Self {
        Self {
            table,
            filters: Vec::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString + ?Sized>(mut self, column: &str, value: &V) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Execute the delete without returning the deleted rows
    pub async fn execute(self) -> Result<()> {
        if self.filters.is_empty() {
            return Err(Error::InvalidInput(format!(
                "delete on {} without a filter",
                self.table.table
            )));
        }

        tracing::debug!(table = %self.table.table, "delete");
        let mut fetch = self
            .table
            .decorate(Fetch::delete(&self.table.client, &self.table.url))
            .header("Prefer", ReturnOption::Minimal.as_header());
        for filter in &self.filters {
            let (column, value) = filter.to_query_pair();
            fetch = fetch.query_pair(&column, &value);
        }
        fetch.execute_empty().await
    }
}
