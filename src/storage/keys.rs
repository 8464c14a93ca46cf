//! Object naming for uploaded images

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Generates object names from the current time in milliseconds.
///
/// Tokens are strictly increasing per generator, so two uploads within the
/// same millisecond still get distinct names.
#[derive(Debug, Default)]
pub struct ObjectKeys {
    last: AtomicI64,
}

impl ObjectKeys {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_token(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }

    /// `{token}.{extension}` for a file originally called `original_name`
    pub fn next_name(&self, original_name: &str) -> String {
        format!("{}.{}", self.next_token(), extension_of(original_name))
    }
}

/// Text after the last dot; a name without a dot is its own extension
pub fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Last path segment of a public object URL
pub fn object_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Inline-encoded images (`data:` URLs) live in the row, not in a bucket
pub fn is_inline(url: &str) -> bool {
    url.starts_with("data:")
}
