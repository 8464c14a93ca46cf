//! Types for the table client

/// Options for returning data from writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOption {
    /// Return representation (the written rows)
    Representation,

    /// Return nothing
    Minimal,
}

impl ReturnOption {
    /// Value of the `Prefer` header
    pub fn as_header(&self) -> &'static str {
        match self {
            ReturnOption::Representation => "return=representation",
            ReturnOption::Minimal => "return=minimal",
        }
    }
}
