//! Boundary state for one converter screen.
//!
//! # Design
//! `ConverterForm` owns what the screen owns: the three editable fields, the
//! busy flag and the single result/error slot. A conversion attempt moves
//! through
//!
//! ```text
//! Idle -> Validating -> Idle (error)           invalid input
//!                    -> Fetching -> Idle (result | error)
//! ```
//!
//! Validating is synchronous inside `submit`, so only `Idle` and `Fetching`
//! are observable. Each attempt gets a `Ticket`; `complete` ignores any
//! ticket that is not the one in flight, so a late answer for a superseded
//! attempt can never overwrite the display.

use std::fmt;

use uuid::Uuid;

use crate::converter::Converter;
use crate::error::{ConversionError, FxError, ValidationError};
use crate::http::HttpTransport;
use crate::types::{ConversionRequest, ConversionResult, ConversionSummary};
use crate::validate::validate;

pub const DEFAULT_BASE: &str = "CAD";
pub const DEFAULT_TARGET: &str = "USD";
pub const DEFAULT_AMOUNT: &str = "1";

/// Identity of one conversion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(Uuid);

impl Ticket {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fetching(Ticket),
}

/// What the screen currently shows below the inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Converted(ConversionSummary),
    Failed(FxError),
}

impl Outcome {
    /// Lines to render, one per row.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Outcome::Converted(summary) => vec![summary.headline(), summary.rate_line()],
            Outcome::Failed(err) => vec![err.to_string()],
        }
    }
}

/// Handed out by a successful `submit`; pass the ticket back to `complete`.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub ticket: Ticket,
    pub request: ConversionRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// An attempt is already in flight.
    Busy,
    Invalid(ValidationError),
}

#[derive(Debug, Clone)]
pub struct ConverterForm {
    base: String,
    target: String,
    amount: String,
    phase: Phase,
    in_flight: Option<ConversionRequest>,
    outcome: Option<Outcome>,
}

impl Default for ConverterForm {
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_TARGET, DEFAULT_AMOUNT)
    }
}

impl ConverterForm {
    pub fn new(base: &str, target: &str, amount: &str) -> Self {
        Self {
            base: base.to_string(),
            target: target.to_string(),
            amount: amount.to_string(),
            phase: Phase::Idle,
            in_flight: None,
            outcome: None,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Fetching(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    // Edits drop a shown result but leave errors and in-flight attempts alone.

    pub fn set_base(&mut self, text: &str) {
        self.base = text.to_string();
        self.clear_result();
    }

    pub fn set_target(&mut self, text: &str) {
        self.target = text.to_string();
        self.clear_result();
    }

    pub fn set_amount(&mut self, text: &str) {
        self.amount = text.to_string();
        self.clear_result();
    }

    fn clear_result(&mut self) {
        if matches!(self.outcome, Some(Outcome::Converted(_))) {
            self.outcome = None;
        }
    }

    /// Validate the fields and, if they pass, enter `Fetching`.
    ///
    /// On success the fields are rewritten in normalized form.
    pub fn submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.is_busy() {
            return Err(SubmitRejected::Busy);
        }
        self.outcome = None;

        let request = match validate(&self.base, &self.target, &self.amount) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = ?err, "submission rejected");
                self.outcome = Some(Outcome::Failed(err.into()));
                return Err(SubmitRejected::Invalid(err));
            }
        };

        self.base = request.base.to_string();
        self.target = request.target.to_string();

        let ticket = Ticket::fresh();
        self.phase = Phase::Fetching(ticket);
        self.in_flight = Some(request.clone());
        tracing::debug!(%ticket, base = %request.base, target = %request.target, "fetching");
        Ok(Submission { ticket, request })
    }

    /// Record the answer for `ticket` and return to `Idle`.
    ///
    /// Returns `false`, changing nothing, if `ticket` is not the attempt in
    /// flight.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<ConversionResult, ConversionError>,
    ) -> bool {
        if self.phase != Phase::Fetching(ticket) {
            tracing::debug!(%ticket, "ignoring stale conversion result");
            return false;
        }
        let Some(request) = self.in_flight.take() else {
            return false;
        };

        self.phase = Phase::Idle;
        self.outcome = Some(match result {
            Ok(result) => Outcome::Converted(ConversionSummary { request, result }),
            Err(err) => Outcome::Failed(err.into()),
        });
        true
    }
}

/// Run one full attempt: submit, convert, complete.
///
/// Returns the rejection if `submit` refused; otherwise the outcome is left
/// on the form.
pub async fn run_conversion<T: HttpTransport>(
    form: &mut ConverterForm,
    converter: &Converter<T>,
) -> Result<(), SubmitRejected> {
    let submission = form.submit()?;
    let result = converter.convert(&submission.request).await;
    form.complete(submission.ticket, result);
    Ok(())
}
