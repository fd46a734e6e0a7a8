//! Guard harness shared by every pre-flight check and the final
//! confirmation gate.
//!
//! A check produces a [`CheckOutcome`]. The harness turns it into a
//! [`GuardDecision`]:
//!
//! - `Pass` needs nothing from the operator.
//! - A `Fatal` failure is an error in every mode.
//! - An `Overridable` failure follows its non-interactive policy when
//!   `--noprompt` is set, otherwise the operator is asked once. `y`/`yes`
//!   overrides; `n`/`no` and anything unrecognized decline.
//!
//! What a declined decision means is up to the caller: pre-flight aborts,
//! the final gate prints the manual commands instead.

use log::{info, warn};

use crate::error::{Result, SetupError};
use crate::prompt::{self, Answer, Prompter};
use crate::theme;
use crate::types::CheckKind;

/// What a failed check allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Terminates the run regardless of mode
    Fatal,
    /// Operator may continue; `noprompt` is the answer applied without asking
    Overridable { noprompt: NoPromptPolicy },
}

/// Fixed answer used when prompting is disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPromptPolicy {
    Accept,
    Reject,
}

/// A failed check, described for the operator
#[derive(Debug)]
pub struct Failure {
    pub check: CheckKind,
    /// First line shown, e.g. "DNS lookup failed!"
    pub headline: String,
    /// Explanation and remediation lines shown after the headline
    pub details: Vec<String>,
    /// Question asked in interactive mode
    pub question: String,
    /// Printed when the override is applied
    pub proceed_note: String,
    /// Printed when the operator declines
    pub decline_note: Option<String>,
    pub policy: FailurePolicy,
    /// Error returned for a fatal failure
    pub fatal: Option<SetupError>,
}

impl Failure {
    /// A failure the operator may override; auto-accepted under `--noprompt`
    pub fn overridable(check: CheckKind, headline: impl Into<String>) -> Self {
        Self {
            check,
            headline: headline.into(),
            details: Vec::new(),
            question: "Do you wish to continue?".to_string(),
            proceed_note: "Proceeding with install!".to_string(),
            decline_note: None,
            policy: FailurePolicy::Overridable {
                noprompt: NoPromptPolicy::Accept,
            },
            fatal: None,
        }
    }

    /// A failure that always terminates the run with `error`
    pub fn fatal(check: CheckKind, headline: impl Into<String>, error: SetupError) -> Self {
        Self {
            check,
            headline: headline.into(),
            details: Vec::new(),
            question: String::new(),
            proceed_note: String::new(),
            decline_note: None,
            policy: FailurePolicy::Fatal,
            fatal: Some(error),
        }
    }

    pub fn detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }

    pub fn details<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    pub fn proceed_note(mut self, note: impl Into<String>) -> Self {
        self.proceed_note = note.into();
        self
    }

    pub fn decline_note(mut self, note: impl Into<String>) -> Self {
        self.decline_note = Some(note.into());
        self
    }

    pub fn noprompt_policy(mut self, policy: NoPromptPolicy) -> Self {
        if let FailurePolicy::Overridable { .. } = self.policy {
            self.policy = FailurePolicy::Overridable { noprompt: policy };
        }
        self
    }
}

/// Result of running one check
#[derive(Debug)]
pub enum CheckOutcome {
    Pass(CheckKind),
    Fail(Failure),
}

/// How a check was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Override,
    Declined,
}

/// Outcome of one guard, consumed immediately by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardDecision {
    pub check: CheckKind,
    pub verdict: Verdict,
    /// Operator answer, `None` when no question was asked
    pub response: Option<Answer>,
}

impl GuardDecision {
    pub fn proceeds(&self) -> bool {
        !matches!(self.verdict, Verdict::Declined)
    }
}

/// Applies failure policies, asking the operator when allowed
pub struct GuardHarness<'a> {
    noprompt: bool,
    prompter: &'a mut dyn Prompter,
}

impl<'a> GuardHarness<'a> {
    pub fn new(noprompt: bool, prompter: &'a mut dyn Prompter) -> Self {
        Self { noprompt, prompter }
    }

    pub fn noprompt(&self) -> bool {
        self.noprompt
    }

    /// Access to the prompter for callers that need free-form input
    pub fn prompter(&mut self) -> &mut (dyn Prompter + 'a) {
        &mut *self.prompter
    }

    pub fn evaluate(&mut self, outcome: CheckOutcome) -> Result<GuardDecision> {
        let failure = match outcome {
            CheckOutcome::Pass(check) => {
                info!("{} check passed", check);
                return Ok(GuardDecision {
                    check,
                    verdict: Verdict::Pass,
                    response: None,
                });
            }
            CheckOutcome::Fail(failure) => failure,
        };

        let check = failure.check;
        show_failure(&failure);

        let noprompt_policy = match failure.policy {
            FailurePolicy::Fatal => {
                warn!("{} check failed fatally", check);
                theme::failure("Exiting!");
                theme::blank();
                return Err(failure
                    .fatal
                    .unwrap_or_else(|| SetupError::Aborted { check }));
            }
            FailurePolicy::Overridable { noprompt } => noprompt,
        };

        if self.noprompt {
            return Ok(match noprompt_policy {
                NoPromptPolicy::Accept => {
                    warn!("{} check failed, continuing (--noprompt)", check);
                    theme::warning(&failure.proceed_note);
                    theme::blank();
                    GuardDecision {
                        check,
                        verdict: Verdict::Override,
                        response: None,
                    }
                }
                NoPromptPolicy::Reject => {
                    warn!("{} check failed, declined (--noprompt)", check);
                    show_decline(&failure);
                    GuardDecision {
                        check,
                        verdict: Verdict::Declined,
                        response: None,
                    }
                }
            });
        }

        let answer = prompt::ask_yes_no(&mut *self.prompter, &failure.question)?;
        theme::blank();
        let verdict = match answer {
            Answer::Yes => {
                info!("{} check overridden by operator", check);
                theme::warning(&failure.proceed_note);
                theme::blank();
                Verdict::Override
            }
            Answer::No => {
                info!("{} check declined by operator", check);
                show_decline(&failure);
                Verdict::Declined
            }
            Answer::Invalid => {
                info!("{} check: unrecognized answer treated as no", check);
                theme::failure("Invalid input. Assuming no...");
                show_decline(&failure);
                Verdict::Declined
            }
        };

        Ok(GuardDecision {
            check,
            verdict,
            response: Some(answer),
        })
    }
}

fn show_failure(failure: &Failure) {
    theme::blank();
    match failure.policy {
        FailurePolicy::Fatal => theme::failure_strong(&failure.headline),
        FailurePolicy::Overridable { .. } => theme::warning_strong(&failure.headline),
    }
    for line in &failure.details {
        theme::message(line);
    }
    if !failure.details.is_empty() {
        theme::blank();
    }
}

fn show_decline(failure: &Failure) {
    if let Some(note) = &failure.decline_note {
        theme::warning(note);
        theme::blank();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;

    fn advisory() -> CheckOutcome {
        CheckOutcome::Fail(
            Failure::overridable(CheckKind::Multiplexer, "not in screen")
                .detail("installation may take a while"),
        )
    }

    #[test]
    fn test_pass_asks_nothing() {
        let mut p = ScriptedPrompter::silent();
        let mut h = GuardHarness::new(false, &mut p);
        let d = h.evaluate(CheckOutcome::Pass(CheckKind::Platform)).unwrap();
        assert_eq!(d.verdict, Verdict::Pass);
        assert_eq!(d.response, None);
        assert_eq!(p.reads(), 0);
    }

    #[test]
    fn test_noprompt_accepts_without_reading() {
        let mut p = ScriptedPrompter::silent();
        let mut h = GuardHarness::new(true, &mut p);
        let d = h.evaluate(advisory()).unwrap();
        assert_eq!(d.verdict, Verdict::Override);
        assert_eq!(p.reads(), 0);
    }

    #[test]
    fn test_noprompt_reject_policy() {
        let mut p = ScriptedPrompter::silent();
        let mut h = GuardHarness::new(true, &mut p);
        let outcome = CheckOutcome::Fail(
            Failure::overridable(CheckKind::Multiplexer, "x").noprompt_policy(NoPromptPolicy::Reject),
        );
        let d = h.evaluate(outcome).unwrap();
        assert_eq!(d.verdict, Verdict::Declined);
        assert!(!d.proceeds());
        assert_eq!(p.reads(), 0);
    }

    #[test]
    fn test_interactive_yes_overrides() {
        let mut p = ScriptedPrompter::new(["Yes"]);
        let mut h = GuardHarness::new(false, &mut p);
        let d = h.evaluate(advisory()).unwrap();
        assert_eq!(d.verdict, Verdict::Override);
        assert_eq!(d.response, Some(Answer::Yes));
    }

    #[test]
    fn test_interactive_invalid_declines_once() {
        let mut p = ScriptedPrompter::new(["sure", "yes"]);
        let mut h = GuardHarness::new(false, &mut p);
        let d = h.evaluate(advisory()).unwrap();
        assert_eq!(d.verdict, Verdict::Declined);
        assert_eq!(d.response, Some(Answer::Invalid));
        assert_eq!(p.reads(), 1);
    }

    #[test]
    fn test_fatal_is_error_in_both_modes() {
        for noprompt in [true, false] {
            let mut p = ScriptedPrompter::new(["yes"]);
            let mut h = GuardHarness::new(noprompt, &mut p);
            let outcome = CheckOutcome::Fail(Failure::fatal(
                CheckKind::Platform,
                "EL8 platform not detected!",
                SetupError::UnsupportedPlatform {
                    release: "6.1.0-arch1".into(),
                },
            ));
            let err = h.evaluate(outcome).unwrap_err();
            assert!(matches!(err, SetupError::UnsupportedPlatform { .. }));
            assert_eq!(p.reads(), 0);
        }
    }
}
