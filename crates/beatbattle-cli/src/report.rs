//! Console output formatting with colored display

use std::fmt::Write as _;

use beatbattle_core::{BattleEvent, BattleOutcome, ChartModel, Judgement, ValidationReport};
use owo_colors::OwoColorize;

/// Format a battle outcome as a boxed summary
pub fn format_outcome(chart_name: &str, outcome: &BattleOutcome) -> String {
    let mut output = String::new();

    let border_width = (chart_name.len() + 4).max(40);
    let border: String = "━".repeat(border_width);
    let border_dim = border.dimmed();

    let result = if outcome.victory {
        "VICTORY".green().bold().to_string()
    } else {
        "DEFEAT".red().bold().to_string()
    };

    let _ = writeln!(output, "{}", border_dim);
    let _ = writeln!(output, "  {}", chart_name.bold());
    let _ = writeln!(output, "{}", border_dim);
    let _ = writeln!(output, "  RESULT   : {}", result);
    let _ = writeln!(output, "  ACCURACY : {:.2}%", outcome.accuracy * 100.0);
    let _ = writeln!(
        output,
        "  JUDGE    : {}/{}/{}/{}",
        outcome.perfect.cyan(),
        outcome.good.yellow(),
        outcome.miss.red(),
        outcome.auto_miss.truecolor(200, 50, 30),
    );
    let combo = if outcome.is_full_combo() {
        format!("{} {}", outcome.max_combo, "FULL COMBO".cyan())
    } else {
        outcome.max_combo.to_string()
    };
    let _ = writeln!(output, "  MAX CB   : {}", combo);
    let _ = writeln!(output, "  HOLDS    : {}", outcome.holds_completed);
    let _ = writeln!(output, "  DAMAGE   : {}", outcome.total_damage);
    let _ = writeln!(output, "  NOTES    : {}/{}", outcome.resolved(), outcome.notes);
    let _ = write!(output, "{}", border_dim);

    output
}

/// Format chart metadata and validation state
pub fn format_chart_info(chart: &ChartModel, validation: &ValidationReport) -> String {
    let mut output = String::new();
    let stats = chart.statistics();

    let _ = writeln!(output, "{} (difficulty {})", chart.name.bold(), chart.difficulty);
    if !chart.description.is_empty() {
        let _ = writeln!(output, "  {}", chart.description.dimmed());
    }
    let _ = writeln!(
        output,
        "  BPM {} / {} measures x {} beats / lookahead {:.2}s",
        chart.bpm, chart.measures, chart.beats_per_measure, chart.lookahead_seconds
    );
    let _ = writeln!(
        output,
        "  {} events ({} tap, {} hold), {:.2}s",
        stats.event_count, stats.tap_count, stats.hold_count, stats.total_duration
    );
    if validation.is_valid() {
        let _ = write!(output, "  {}", "valid".green());
    } else {
        let _ = write!(output, "  {}: {}", "invalid".red(), validation);
    }

    output
}

/// Format one battle notification as a log line
pub fn format_event(event: &BattleEvent) -> String {
    match event {
        BattleEvent::NoteSpawned(note) => format!(
            "{:>8.3}s  {} {} {}",
            note.spawn_time,
            "spawn".dimmed(),
            note.id,
            note.event
        ),
        BattleEvent::NoteProcessed(note) => format!(
            "{:>8.3}s  {} {}",
            note.resolved_time.unwrap_or(note.judge_window_center),
            "done".dimmed(),
            note.id
        ),
        BattleEvent::NoteAutoMiss(note) => format!(
            "{:>8.3}s  {} {}",
            note.resolved_time.unwrap_or(note.judge_window_center),
            "expired".dimmed(),
            note.id
        ),
        BattleEvent::AutoMiss(note) => format!(
            "{:>8.3}s  {} {} {}",
            note.resolved_time.unwrap_or(note.judge_window_center),
            "AUTO-MISS".red(),
            note.id,
            note.event
        ),
        BattleEvent::JudgeResult { judgement, note }
        | BattleEvent::HoldComplete { judgement, note } => format!(
            "{:>8.3}s  {} {} {}",
            note.resolved_time.unwrap_or(note.judge_window_center),
            format_colored_judgement(judgement),
            note.id,
            note.event
        ),
        BattleEvent::PlayerDamaged { amount } => {
            format!("{:>9}  {} {}", "", "damage".red(), amount)
        }
    }
}

/// Format judgement with color
fn format_colored_judgement(judgement: &Judgement) -> String {
    let name = judgement.short_name();
    match judgement {
        Judgement::Perfect => name.cyan().to_string(),
        Judgement::Good => name.yellow().to_string(),
        Judgement::Miss => name.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatbattle_core::{BattleStatistics, BeatEvent, VictoryRule};

    #[test]
    fn test_format_outcome() {
        let stats = BattleStatistics {
            perfect: 3,
            good: 1,
            max_combo: 4,
            ..Default::default()
        };
        let outcome = BattleOutcome::from_statistics(&stats, 4, &VictoryRule::default());

        let summary = format_outcome("Test Pattern", &outcome);
        assert!(summary.contains("Test Pattern"));
        assert!(summary.contains("VICTORY"));
        assert!(summary.contains("FULL COMBO"));
        assert!(summary.contains("87.50%"));
        assert!(!summary.contains("DEFEAT"));
    }

    #[test]
    fn test_format_chart_info_lists_issues() {
        let chart = ChartModel::new(120, 1, 8, 2.0)
            .with_events([BeatEvent::tap(0, 1), BeatEvent::tap(0, 1)]);
        let info = format_chart_info(&chart, &chart.validate());
        assert!(info.contains("2 events (2 tap, 0 hold)"));
        assert!(info.contains("invalid"));
        assert!(info.contains("M1:B2"));
    }
}
