//! Convergence observer behaviour under paused time.

mod common;

use std::time::Duration;

use common::{FakeInput, FakeOutput, InputEvent};
use tidemark::domain::errors::{ConvergenceError, SurfaceError};
use tidemark::domain::models::{PollBudget, WatchPredicate};
use tidemark::domain::ports::Key;
use tidemark::services::{ConvergenceObserver, RecomputeNudger};
use tokio::time::Instant;

const PAUSE: Duration = Duration::from_millis(50);
const SETTLE: Duration = Duration::from_millis(350);

fn observer() -> ConvergenceObserver {
    ConvergenceObserver::new(
        PollBudget::from_millis(10_000, 150).unwrap(),
        RecomputeNudger::new(PAUSE, SETTLE),
    )
}

fn produce_budget() -> PollBudget {
    PollBudget::from_millis(25_000, 150).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_converges_without_nudge() {
    let input = FakeInput::new("mama gedhara yanavaa");
    let output = FakeOutput::new("");
    output.render_after(Duration::from_millis(900), "මම ගෙදර යනවා");

    let started = Instant::now();
    let value = observer()
        .await_non_empty_change(&output, &input, "", produce_budget())
        .await
        .unwrap();

    assert_eq!(value, "මම ගෙදර යනවා");
    assert!(started.elapsed() < Duration::from_millis(1_200));
    assert!(input.events().is_empty(), "no nudge expected");
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_single_nudge() {
    let input = FakeInput::new("oyaa hari");
    let output = FakeOutput::new("");
    input.render_on_backspace(&output, "ඔයා හරි");

    let started = Instant::now();
    let value = observer()
        .await_non_empty_change(&output, &input, "", produce_budget())
        .await
        .unwrap();

    assert_eq!(value, "ඔයා හරි");
    assert!(started.elapsed() >= Duration::from_millis(25_000));
    assert_eq!(
        input.events(),
        vec![
            InputEvent::Focus,
            InputEvent::Press(Key::End),
            InputEvent::Type(" ".to_string()),
            InputEvent::Press(Key::Backspace),
        ]
    );
    assert_eq!(input.value(), "oyaa hari");
}

#[tokio::test(start_paused = true)]
async fn test_times_out_after_exactly_one_nudge() {
    let input = FakeInput::new("oyaa hari");
    let output = FakeOutput::new("");

    let started = Instant::now();
    let err = observer()
        .await_non_empty_change(&output, &input, "", produce_budget())
        .await
        .unwrap_err();

    let diagnostics = err.diagnostics().expect("timeout diagnostics");
    assert!(diagnostics.nudged);
    assert_eq!(diagnostics.predicate, WatchPredicate::NonEmptyAndChanged);
    assert_eq!(diagnostics.surface_count, 1);
    assert_eq!(diagnostics.last_len, 0);
    assert_eq!(input.backspaces(), 1);

    // Both phases ran to the end, plus the nudge itself.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(35_000) + PAUSE + SETTLE);
    assert!(elapsed < Duration::from_millis(36_000));
    assert!(err.to_string().contains("nudged=true"));
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_output_is_not_convergence() {
    let input = FakeInput::new("hari");
    let output = FakeOutput::new("හරි");

    let err = observer()
        .await_non_empty_change(&output, &input, "හරි", produce_budget())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.diagnostics().unwrap().last_len, 3);
}

#[tokio::test(start_paused = true)]
async fn test_await_condition_never_nudges() {
    let output = FakeOutput::new("same");
    let budget = PollBudget::from_millis(1_000, 100).unwrap();

    let started = Instant::now();
    let err = observer()
        .await_condition(&output, WatchPredicate::Changed, "same", budget)
        .await
        .unwrap_err();

    let diagnostics = err.diagnostics().unwrap();
    assert!(!diagnostics.nudged);
    assert!(started.elapsed() < Duration::from_millis(1_200));
    assert!(output.reads() <= 12);
}

#[tokio::test(start_paused = true)]
async fn test_unresolved_read_counts_as_emptied() {
    let output = FakeOutput::new("මම");
    output.detach();

    let value = observer()
        .await_change_or_clear(&output, None, PollBudget::from_millis(8_000, 100).unwrap())
        .await
        .unwrap();

    assert_eq!(value, "");
}

#[tokio::test(start_paused = true)]
async fn test_unmounted_output_counts_as_changed() {
    let output = FakeOutput::new("මම");
    output.detach();

    let started = Instant::now();
    let value = observer()
        .await_change_or_clear(
            &output,
            Some("මම"),
            PollBudget::from_millis(10_000, 100).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(value, "");
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_unresolved_blank_output_is_not_a_change() {
    let output = FakeOutput::new("");
    output.detach();

    let err = observer()
        .await_change_or_clear(&output, Some(""), PollBudget::from_millis(1_000, 100).unwrap())
        .await
        .unwrap_err();

    assert!(err.is_timeout());
}

#[tokio::test(start_paused = true)]
async fn test_unresolved_read_is_not_new_content() {
    let input = FakeInput::new("");
    let output = FakeOutput::new("");
    output.detach();
    output.render_after(Duration::from_millis(600), "හරි");

    let value = observer()
        .await_non_empty_change(&output, &input, "", produce_budget())
        .await
        .unwrap();

    assert_eq!(value, "හරි");
}

#[tokio::test(start_paused = true)]
async fn test_blank_input_nudge_is_skipped() {
    let input = FakeInput::new("   ");
    let output = FakeOutput::new("");

    let err = observer()
        .await_non_empty_change(&output, &input, "", produce_budget())
        .await
        .unwrap_err();

    assert!(err.diagnostics().unwrap().nudged);
    assert!(input.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_surface_error_aborts_wait() {
    let output = FakeOutput::new("");
    output.fail(SurfaceError::SessionClosed);

    let started = Instant::now();
    let err = observer()
        .await_change_or_clear(&output, Some("x"), PollBudget::from_millis(5_000, 100).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ConvergenceError::Surface(SurfaceError::SessionClosed)
    ));
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_change_to_empty_satisfies_changed() {
    let output = FakeOutput::new("හරි");
    output.render_after(Duration::from_millis(300), "");

    let value = observer()
        .await_change_or_clear(&output, Some("හරි"), PollBudget::from_millis(10_000, 100).unwrap())
        .await
        .unwrap();

    assert_eq!(value, "");
}
