//! Translator session scenarios against the simulated page.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tidemark::domain::models::{
    Config, GateReport, SimulationConfig, TypingLanguage,
};
use tidemark::domain::ports::TranslatorPage;
use tidemark::infrastructure::fixtures::CaseLoader;
use tidemark::infrastructure::simulated::SimulatedPage;
use tidemark::services::TranslatorSession;
use tokio::time::Instant;

const INPUT: &str = "mama gedhara yanavaa";
const EXPECTED: &str = "මම ගෙදර යනවා";

fn page(simulation: SimulationConfig) -> Arc<SimulatedPage> {
    let cases = CaseLoader::builtin().unwrap();
    Arc::new(SimulatedPage::from_cases(&simulation, &cases))
}

fn session(page: &Arc<SimulatedPage>) -> TranslatorSession {
    let page: Arc<dyn TranslatorPage> = page.clone();
    TranslatorSession::from_config(page, &Config::default()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_enter_text_waits_for_rendered_output() {
    common::setup_test_logging();
    let page = page(SimulationConfig::default());
    let session = session(&page);
    session.open().await.unwrap();

    let report = session.enter_text(INPUT).await.unwrap();

    assert!(matches!(report, GateReport::Observed(_)));
    assert_eq!(session.output_text().await, EXPECTED);
    assert_eq!(session.input_value().await.unwrap(), INPUT);

    let stats = page.stats().await;
    assert_eq!(stats.exchanges, 1);
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.dropped, 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_result_recovers_through_nudge() {
    let page = page(SimulationConfig {
        dropped_applies: 1,
        ..SimulationConfig::default()
    });
    let session = session(&page);
    session.open().await.unwrap();

    let started = Instant::now();
    session.enter_text(INPUT).await.unwrap();

    assert_eq!(session.output_text().await, EXPECTED);
    // The first phase had to run out before the nudge.
    assert!(started.elapsed() >= Duration::from_millis(25_000));
    assert_eq!(session.input_value().await.unwrap(), INPUT);

    let stats = page.stats().await;
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.applied, 1);
}

#[tokio::test(start_paused = true)]
async fn test_two_dropped_results_time_out() {
    let page = page(SimulationConfig {
        dropped_applies: 2,
        ..SimulationConfig::default()
    });
    let session = session(&page);
    session.open().await.unwrap();

    let err = session.enter_text(INPUT).await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(session.output_text().await, "");
}

#[tokio::test(start_paused = true)]
async fn test_clear_empties_input_and_output() {
    let page = page(SimulationConfig::default());
    let session = session(&page);
    session.open().await.unwrap();
    session.enter_text(INPUT).await.unwrap();

    session.clear_input().await.unwrap();

    assert_eq!(session.input_value().await.unwrap(), "");
    assert_eq!(session.output_text().await, "");
    assert_eq!(page.stats().await.clear_clicks, 1);
}

#[tokio::test(start_paused = true)]
async fn test_blank_entry_clears_previous_output() {
    let page = page(SimulationConfig::default());
    let session = session(&page);
    session.open().await.unwrap();
    session.enter_text(INPUT).await.unwrap();

    let report = session.enter_text("   ").await.unwrap();

    assert_eq!(report, GateReport::NotArmed);
    assert_eq!(session.output_text().await, "");
    assert_eq!(page.stats().await.exchanges, 1);
}

#[tokio::test(start_paused = true)]
async fn test_blank_entry_on_blank_page_does_not_wait() {
    let page = page(SimulationConfig::default());
    let session = session(&page);
    session.open().await.unwrap();

    let started = Instant::now();
    session.enter_text("").await.unwrap();

    // Only the debounce window elapses.
    assert!(started.elapsed() < Duration::from_millis(1_000));
}

#[tokio::test(start_paused = true)]
async fn test_typing_language_switched_to_english() {
    let page = Arc::new(
        SimulatedPage::from_cases(&SimulationConfig::default(), &CaseLoader::builtin().unwrap())
            .with_initial_language(TypingLanguage::Sinhala),
    );
    let session = session(&page);
    session.open().await.unwrap();

    session.enter_text(INPUT).await.unwrap();

    assert_eq!(session.output_text().await, EXPECTED);
    assert_eq!(
        page.typing_language().await.unwrap(),
        Some(TypingLanguage::English)
    );
    assert_eq!(page.stats().await.language_switches, 1);
}

#[tokio::test(start_paused = true)]
async fn test_detached_reads_do_not_break_convergence() {
    let page = page(SimulationConfig {
        detached_reads: 5,
        ..SimulationConfig::default()
    });
    let session = session(&page);
    session.open().await.unwrap();

    session.enter_text(INPUT).await.unwrap();

    assert_eq!(session.output_text().await, EXPECTED);
    assert_eq!(page.stats().await.detached_reads, 5);
}

#[tokio::test(start_paused = true)]
async fn test_incremental_typing_produces_output() {
    let page = page(SimulationConfig::default());
    let session = session(&page);
    session.open().await.unwrap();

    session.type_incrementally(INPUT).await.unwrap();
    let value = session.await_realtime_output().await.unwrap();

    assert_eq!(value, EXPECTED);
    assert_eq!(page.stats().await.edits, INPUT.chars().count() as u64);
}

#[tokio::test(start_paused = true)]
async fn test_open_resets_page() {
    let page = page(SimulationConfig::default());
    let session = session(&page);
    session.open().await.unwrap();
    session.enter_text(INPUT).await.unwrap();

    session.open().await.unwrap();

    assert_eq!(session.input_value().await.unwrap(), "");
    assert_eq!(session.output_text().await, "");
    assert_eq!(page.stats().await.opens, 2);
}
