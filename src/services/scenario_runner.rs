//! Runs a case table against a translator session.
//!
//! Cases execute one after another; each starts from a freshly opened page.
//! Convergence timeouts and page failures mark a case as errored, failed
//! verifications mark it as failed, and neither stops the run.

use tokio::time::Instant;

use tracing::{info, info_span, warn, Instrument};

use super::session::TranslatorSession;
use super::tolerance::threshold_for;
use super::verifier;
use crate::domain::errors::SessionError;
use crate::domain::models::{
    CaseCheck, CaseGroup, CaseOutcome, CaseStatus, LengthTier, RunReport, TestCase,
};

/// What a single check concluded, before timing and identity are attached.
struct CheckResult {
    status: CaseStatus,
    detail: String,
    score: Option<f64>,
    threshold: Option<f64>,
    observed: String,
}

impl CheckResult {
    fn from_bool(pass: bool, observed: String, ok: &str, failed: String) -> Self {
        Self {
            status: if pass {
                CaseStatus::Passed
            } else {
                CaseStatus::Failed
            },
            detail: if pass { ok.to_string() } else { failed },
            score: None,
            threshold: None,
            observed,
        }
    }

    fn similar(observed: String, expected: &str, threshold: f64) -> Self {
        match verifier::similar(&observed, expected, threshold) {
            Ok(verdict) => Self {
                status: CaseStatus::Passed,
                detail: format!("similarity {:.3} >= {}", verdict.score(), verdict.threshold()),
                score: Some(verdict.score()),
                threshold: Some(verdict.threshold()),
                observed,
            },
            Err(mismatch) => Self {
                status: CaseStatus::Failed,
                detail: mismatch.to_string(),
                score: Some(mismatch.verdict.score()),
                threshold: Some(mismatch.verdict.threshold()),
                observed,
            },
        }
    }
}

/// Sequential case executor
pub struct ScenarioRunner<'a> {
    session: &'a TranslatorSession,
}

impl<'a> ScenarioRunner<'a> {
    pub const fn new(session: &'a TranslatorSession) -> Self {
        Self { session }
    }

    /// Run `cases` in order, calling `on_outcome` after each one
    pub async fn run<'c, I, F>(&self, cases: I, mut on_outcome: F) -> RunReport
    where
        I: IntoIterator<Item = (CaseGroup, &'c TestCase)>,
        F: FnMut(&CaseOutcome),
    {
        let mut report = RunReport::new(self.session.page().driver_name());
        info!(run_id = %report.run_id, driver = %report.driver, "run started");

        for (group, case) in cases {
            let outcome = self.run_case(group, case).await;
            on_outcome(&outcome);
            report.record(outcome);
        }

        info!(
            run_id = %report.run_id,
            passed = report.passed(),
            total = report.total(),
            "run finished"
        );
        report
    }

    /// Run one case from a fresh page
    pub async fn run_case(&self, group: CaseGroup, case: &TestCase) -> CaseOutcome {
        let check = case.effective_check();
        let span = info_span!("case", id = %case.id, group = %group, check = check.as_str());

        async {
            let started = Instant::now();
            let result = match self.execute(check, case).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(error = %err, "case errored");
                    CheckResult {
                        status: CaseStatus::Errored,
                        detail: err.to_string(),
                        score: None,
                        threshold: None,
                        observed: self.session.output_text().await,
                    }
                }
            };

            info!(status = %result.status, "case finished");
            CaseOutcome {
                id: case.id.clone(),
                name: case.name.clone(),
                group,
                check,
                status: result.status,
                detail: result.detail,
                score: result.score,
                threshold: result.threshold,
                observed: result.observed,
                elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, check: CaseCheck, case: &TestCase) -> Result<CheckResult, SessionError> {
        let session = self.session;
        session.open().await?;

        let result = match check {
            CaseCheck::Similar => {
                session.enter_text(&case.input).await?;
                let observed = session.output_text().await;
                CheckResult::similar(observed, &case.expected_output, threshold_for(case.length))
            }
            CaseCheck::Differs => {
                session.enter_text(&case.input).await?;
                let observed = session.output_text().await;
                let pass = verifier::differs(&observed, &case.expected_output);
                CheckResult::from_bool(
                    pass,
                    observed,
                    "normalized output differs from expected",
                    format!(
                        "normalized output equals expected: {}",
                        case.expected_output
                    ),
                )
            }
            CaseCheck::Unsegmented => {
                session.enter_text(&case.input).await?;
                let observed = session.output_text().await;
                let pass = verifier::unsegmented(&observed);
                CheckResult::from_bool(
                    pass,
                    observed,
                    "output is a single unsegmented run",
                    "output is empty or contains whitespace".to_string(),
                )
            }
            CaseCheck::ClearResets => {
                session.enter_text(&case.input).await?;
                let initial = session.output_text().await;
                if initial.split_whitespace().next().is_none() {
                    return Ok(CheckResult::from_bool(
                        false,
                        initial,
                        "",
                        "no output before clearing".to_string(),
                    ));
                }

                session.clear_input().await?;
                let input = session.input_value().await?;
                let observed = session.output_text().await;
                let pass = verifier::cleared(&input, &observed);
                CheckResult::from_bool(
                    pass,
                    observed,
                    "input and output cleared",
                    format!("input after clear: {input:?}"),
                )
            }
            CaseCheck::RealtimeTyping => {
                session.type_incrementally(&case.input).await?;
                session.await_realtime_output().await?;
                let observed = session.output_text().await;
                CheckResult::similar(
                    observed,
                    &case.expected_output,
                    threshold_for(LengthTier::Short),
                )
            }
        };

        Ok(result)
    }
}
