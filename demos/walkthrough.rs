//! Plays one round of every exercise kind on a single page.
//!
//! Run with:
//!   cargo run --example walkthrough
//!   RUST_LOG=debug cargo run --example walkthrough
//!
//! The page uses a `ManualClock`, so the timers and the Match Items feedback
//! delays advance only when the walkthrough says so and the output is the
//! same on every run (fixed seed).

use course_drills::dom_adapter::render_page;
use course_drills::exercise_engine::drag::stacked_layout;
use course_drills::exercise_engine::engines::sort::SortZone;
use course_drills::{Clock, ContainerId, EngineConfig, Exercise, ManualClock, Page};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PAGE: &str = r#"{ "exercises": [
    { "kind": "order_items", "container": "boil-water", "list": [
        "Fill the kettle", "Switch it on", "Wait for the click", "Pour" ] },
    { "kind": "match_items", "container": "capitals", "items": [
        { "text": "France", "pair_id": "fr" },
        { "text": "Paris", "pair_id": "fr", "side": "definition" },
        { "text": "Japan", "pair_id": "jp" },
        { "text": "Tokyo", "pair_id": "jp", "side": "definition" } ] },
    { "kind": "select_all", "container": "mammals", "list": [
        { "text": "Whale", "correct": true },
        { "text": "Shark" },
        { "text": "Bat", "correct": true },
        { "text": "Penguin" } ] },
    { "kind": "sort_items", "container": "states-of-matter",
      "answer_bank": { "items": [
          { "text": "Ice", "bucket": "Solid" },
          { "text": "Steam", "bucket": "Gas" } ] },
      "buckets": [
          { "label": "Solid", "items": [ { "text": "Granite" } ] },
          { "label": "Gas", "items": [ { "text": "Helium" } ] } ] },
    { "kind": "sort_items", "container": "forgot-the-bank", "buckets": [ { "label": "Lonely" } ] }
] }"#;

// ── helpers ───────────────────────────────────────────────────────────────────

fn id_of(page: &Page<ManualClock>, container: &ContainerId, text: &str) -> Option<course_drills::ItemId> {
    page.get(container)?
        .as_exercise()
        .items()
        .into_iter()
        .find(|i| i.text == text)
        .map(|i| i.id)
}

fn heading(title: &str) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  {title}");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

// ── rounds ────────────────────────────────────────────────────────────────────

fn order_round(page: &mut Page<ManualClock>, clock: &ManualClock) {
    let container = ContainerId::from("boil-water");
    heading("Order Items");
    let Some(order) = page.order_mut(&container).map(|(o, _)| o) else {
        return;
    };
    println!("  shuffled: {:?}", order.current_order());
    let target: Vec<String> = order.ground_truth().to_vec();

    for text in &target {
        let Some(id) = id_of(page, &container, text) else { continue };
        let Some((order, drag)) = page.order_mut(&container) else { return };
        let layout = stacked_layout(order.items().iter().map(|i| i.id), 32.0);
        order.drag_start(drag, id);
        order.drop(drag, None, f64::MAX, &layout);
        order.drag_end(drag);
    }
    clock.advance(14_000);
    let now = clock.now_ms();
    if let Some((order, _)) = page.order_mut(&container) {
        println!("  arranged: {:?}", order.current_order());
        let result = order.check(now);
        println!("  check:    {:?} in {}", result, order.timer().display());
    }
}

fn match_round(page: &mut Page<ManualClock>, clock: &ManualClock) {
    let container = ContainerId::from("capitals");
    heading("Match Items");
    for (a, b) in [("France", "Tokyo"), ("France", "Paris"), ("Japan", "Tokyo")] {
        let (Some(a_id), Some(b_id)) = (id_of(page, &container, a), id_of(page, &container, b)) else {
            continue;
        };
        let now = clock.now_ms();
        let Some(game) = page.match_mut(&container) else { return };
        game.click(a_id, now);
        let outcome = game.click(b_id, now);
        println!("  {a} + {b}: {outcome:?}");
        clock.advance(1_500);
        page.poll();
    }
    clock.advance(500);
    page.poll();
    if let Some(game) = page.match_mut(&container) {
        let report = game.check();
        println!("  {} (attempts: {})", report.message, report.attempts);
    }
}

fn select_all_round(page: &mut Page<ManualClock>, clock: &ManualClock) {
    let container = ContainerId::from("mammals");
    heading("Select All");
    let picks: Vec<_> = ["Whale", "Shark", "Bat"]
        .iter()
        .filter_map(|t| id_of(page, &container, t))
        .collect();
    clock.advance(6_000);
    let now = clock.now_ms();
    let Some(sa) = page.select_all_mut(&container) else { return };
    for id in picks {
        sa.click(id);
    }
    let report = sa.check(now);
    println!(
        "  score: {}  wrong picks: {}  time: {}",
        report.score_text(),
        report.incorrect_selections,
        sa.timer().display()
    );
}

fn sort_round(page: &mut Page<ManualClock>, clock: &ManualClock) {
    let container = ContainerId::from("states-of-matter");
    heading("Sort Items");
    let moves = [("Granite", 0), ("Ice", 0), ("Helium", 1)];
    for (text, bucket) in moves {
        let Some(id) = id_of(page, &container, text) else { continue };
        let Some((sort, drag)) = page.sort_mut(&container) else { return };
        sort.drag_start(drag, id);
        sort.drop(drag, SortZone::Bucket(bucket), f64::MAX, &[]);
        sort.drag_end(drag);
    }
    let now = clock.now_ms();
    if let Some((sort, _)) = page.sort_mut(&container) {
        if let course_drills::exercise_engine::engines::sort::SortCheck::Progress(r) = sort.check(now) {
            println!("  {}", r.message().replace('\n', "\n  "));
        }
    }

    if let Some(id) = id_of(page, &container, "Steam") {
        if let Some((sort, drag)) = page.sort_mut(&container) {
            sort.drag_start(drag, id);
            sort.drop(drag, SortZone::Bucket(1), f64::MAX, &[]);
            sort.drag_end(drag);
        }
    }
    clock.advance(3_000);
    let now = clock.now_ms();
    if let Some((sort, _)) = page.sort_mut(&container) {
        println!("  {:?}", sort.check(now));
    }
}

fn main() -> course_drills::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let clock = ManualClock::new(0);
    let mut page = Page::from_json(PAGE, EngineConfig::seeded(2024), clock.clone())?;
    println!("mounted {} exercises, skipped {}", page.len(), page.skipped().len());

    order_round(&mut page, &clock);
    match_round(&mut page, &clock);
    select_all_round(&mut page, &clock);
    sort_round(&mut page, &clock);

    heading("Rendered page");
    println!("{}", serde_json::to_string_pretty(&render_page(&page))?);
    Ok(())
}
