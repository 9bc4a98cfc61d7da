//! Submission lifecycle of the recipe form.

use log::{debug, info};

use crate::error::FormError;

/// Hands the user over to another view once a recipe has been created.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// Navigator that only remembers where it was sent. Useful for hosts that
/// route after the form returns, and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingNavigator {
    pub visited: Vec<String>,
}

impl RecordingNavigator {
    pub fn last(&self) -> Option<&str> {
        self.visited.last().map(String::as_str)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, path: &str) {
        self.visited.push(path.to_string());
    }
}

/// Where the submit button currently is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    /// The backend accepted the recipe under this id.
    Succeeded(String),
}

/// Owns the submit phase and the outcome shown in the page-level banner.
///
/// The banner is the `Err` side of the last outcome; nothing else writes it.
#[derive(Debug, Default)]
pub struct SubmitMachine {
    phase: SubmitPhase,
    outcome: Option<Result<String, FormError>>,
}

impl SubmitMachine {
    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// Last outcome: the created id, or the error shown to the user.
    pub fn outcome(&self) -> Option<&Result<String, FormError>> {
        self.outcome.as_ref()
    }

    /// Banner text, if the last outcome was a failure.
    pub fn error_message(&self) -> Option<String> {
        match &self.outcome {
            Some(Err(err)) => Some(err.to_string()),
            _ => None,
        }
    }

    /// Whether a new submit may begin. Only an idle form can submit; a
    /// created recipe is final.
    pub fn is_idle(&self) -> bool {
        self.phase == SubmitPhase::Idle
    }

    /// Enter Submitting. Refused while a request is in flight or once the
    /// recipe has been created.
    pub fn start(&mut self) -> Result<(), FormError> {
        match self.phase {
            SubmitPhase::Idle => {}
            SubmitPhase::Submitting => return Err(FormError::SubmitInFlight),
            SubmitPhase::Succeeded(_) => return Err(FormError::AlreadySubmitted),
        }
        self.outcome = None;
        self.phase = SubmitPhase::Submitting;
        debug!("Submit started");
        Ok(())
    }

    /// Leave Submitting with the backend's answer. A success moves to
    /// Succeeded; a failure returns to Idle and fills the banner.
    ///
    /// Outside Submitting the result is ignored and `None` is returned.
    pub fn finish(&mut self, result: Result<String, FormError>) -> Option<&str> {
        if !self.is_submitting() {
            debug!("Ignoring submit result outside Submitting: {:?}", result);
            return None;
        }
        match result {
            Ok(id) => {
                info!("Recipe created with id {}", id);
                self.phase = SubmitPhase::Succeeded(id.clone());
                self.outcome = Some(Ok(id));
            }
            Err(err) => {
                info!("Recipe submission failed: {}", err);
                self.phase = SubmitPhase::Idle;
                self.outcome = Some(Err(err));
            }
        }
        match &self.phase {
            SubmitPhase::Succeeded(id) => Some(id.as_str()),
            _ => None,
        }
    }

    /// Record a failure that happened outside a request, e.g. a rejected
    /// image. The phase is left unchanged.
    pub fn report(&mut self, err: FormError) {
        self.outcome = Some(Err(err));
    }

    /// Drop a previously reported failure.
    pub fn clear_error(&mut self) {
        if matches!(self.outcome, Some(Err(_))) {
            self.outcome = None;
        }
    }
}
