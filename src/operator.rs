//! The person driving the admin dashboard

/// Blocking prompts shown to the operator.
///
/// Implemented by whatever surface hosts the dashboard; stores only ever
/// talk to the operator through this trait.
pub trait Operator: Send + Sync {
    /// Show a blocking notification
    fn alert(&self, message: &str);

    /// Ask a yes/no question; `true` proceeds
    fn confirm(&self, prompt: &str) -> bool;
}

/// Non-interactive operator: logs alerts and answers every prompt the same way
#[derive(Debug, Clone, Copy)]
pub struct LogOperator {
    pub answer: bool,
}

impl LogOperator {
    /// Confirms every prompt
    pub fn confirming() -> Self {
        Self { answer: true }
    }

    /// Declines every prompt
    pub fn declining() -> Self {
        Self { answer: false }
    }
}

impl Operator for LogOperator {
    fn alert(&self, message: &str) {
        tracing::warn!(message, "operator alert");
    }

    fn confirm(&self, prompt: &str) -> bool {
        tracing::info!(prompt, answer = self.answer, "operator confirmation");
        self.answer
    }
}
