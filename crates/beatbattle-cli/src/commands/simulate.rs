//! Simulate command: play a chart against an input script.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use beatbattle_core::{
    BattleEvent, BattleOutcome, BattleSession, EngineConfig, InputScript, ManualClock,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::report;

#[derive(Serialize)]
struct SimulationReport {
    generated_at: DateTime<Utc>,
    chart: String,
    outcome: BattleOutcome,
    unused_inputs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<BattleEvent>>,
}

pub fn run(
    chart_path: &str,
    inputs: Option<&str>,
    config_path: Option<&str>,
    tick: f64,
    show_events: bool,
    json: bool,
) -> Result<()> {
    if !(tick > 0.0 && tick.is_finite()) {
        bail!("--tick must be a positive number of seconds (got {})", tick);
    }

    let chart = super::load_chart(chart_path)?;
    let config = match config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::default(),
    };
    let mut script = match inputs {
        Some(path) => InputScript::load(path)
            .with_context(|| format!("Failed to load input script: {}", path))?,
        None => InputScript::default(),
    };

    let chart_name = chart.name.clone();
    let start = -chart.lookahead_seconds;
    let end = chart.total_duration() + config.windows.late + config.grace_period + tick;

    let mut session = BattleSession::new(ManualClock::playing_at(start), config)?;
    session
        .load_chart(chart)
        .with_context(|| format!("Cannot start battle with {}", chart_path))?;

    let recorded = Rc::new(RefCell::new(Vec::new()));
    if show_events {
        let sink = Rc::clone(&recorded);
        session.subscribe(move |event: &BattleEvent| {
            if !json {
                println!("{}", report::format_event(event));
            }
            sink.borrow_mut().push(event.clone());
        });
    }

    session.start()?;
    let mut step: u64 = 0;
    while !session.is_completed() {
        // Multiply rather than accumulate so long charts do not drift
        let now = start + step as f64 * tick;
        if now > end {
            break;
        }
        session.clock_mut().set_time(now);
        let batch = script.next_batch(now).to_vec();
        session.tick(&batch)?;
        step += 1;
    }
    debug!("Simulation ran {} ticks", step);

    let outcome = session.finish()?;

    if json {
        let events = show_events.then(|| recorded.borrow().clone());
        let report = SimulationReport {
            generated_at: Utc::now(),
            chart: chart_name,
            outcome,
            unused_inputs: script.remaining(),
            events,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report::format_outcome(&chart_name, &outcome));
        if script.remaining() > 0 {
            eprintln!("{} input(s) after the end of the chart were not used", script.remaining());
        }
    }

    Ok(())
}
