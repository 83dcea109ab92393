use serde::{Deserialize, Serialize};

/// Session key under which the pending flow survives between submissions.
pub const FLOW_KEY: &str = "verificationFlow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VerificationStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// One participant's code-exchange attempt.
///
/// `Idle -> Submitting -> {Succeeded, Failed}`, with `Failed` retryable. At
/// most one exchange may be in flight at a time; a duplicate submission is
/// rejected rather than interleaved. No session state is touched here; the
/// handler owns that on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VerificationFlow {
    pub status: VerificationStatus,
    pub error: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitRejection {
    /// The trimmed code was empty; nothing may be sent.
    EmptyCode,
    /// An exchange is already in flight for this flow.
    InFlight,
}

impl VerificationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move into `Submitting`, returning the trimmed code to exchange.
    ///
    /// An empty code keeps the current status and records a local validation
    /// error instead.
    pub fn begin(&mut self, code: &str) -> Result<String, SubmitRejection> {
        if self.status == VerificationStatus::Submitting {
            return Err(SubmitRejection::InFlight);
        }

        let code = code.trim();
        if code.is_empty() {
            self.error = Some("Verification code is required".to_string());
            return Err(SubmitRejection::EmptyCode);
        }

        self.status = VerificationStatus::Submitting;
        self.error = None;
        Ok(code.to_string())
    }

    pub fn succeed(&mut self) {
        self.status = VerificationStatus::Succeeded;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = VerificationStatus::Failed;
        self.error = Some(message.into());
    }
}
