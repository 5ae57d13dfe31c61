//! Terminal rendering

use colored::Colorize;
use std::io::Write;
use studybreak_monitor::{
    ActionReport, LearningStatsView, ProgressFrame, ProgressSink, SessionSnapshot,
    StatusSnapshot, ToastPhase, ToastView, TrainingStatsView,
};
use studybreak_protocol::{Preferences, RecommendationResponse};

const BAR_WIDTH: usize = 30;

/// `[#####.....]` for a percentage in `[0, 100]`
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

fn rule() {
    println!("{}", "─".repeat(50).dimmed());
}

pub fn print_dashboard(snapshot: &SessionSnapshot) {
    rule();
    println!(
        "{}: {} min   {}: {}   {}: {}",
        "Study time".cyan(),
        snapshot.study_time.to_string().yellow(),
        "Fatigue".cyan(),
        snapshot.fatigue.as_deref().unwrap_or("-").yellow(),
        "Step".cyan(),
        snapshot.step_count.to_string().yellow()
    );
    println!(
        "{}: {} {:.0}% of {} min",
        "Goal".cyan(),
        progress_bar(snapshot.progress, BAR_WIDTH).green(),
        snapshot.progress,
        snapshot.session_goal_minutes
    );
    println!(
        "{}: {}",
        "Session reward".cyan(),
        snapshot.accumulated_reward.to_string().yellow()
    );
    match &snapshot.recommendation {
        Some(recommendation) => print_recommendation(recommendation),
        None => println!("{}", "No recommendation yet.".dimmed()),
    }
    rule();
}

pub fn print_status(status: &StatusSnapshot, goal_minutes: u32) {
    println!(
        "{}: {} min",
        "Study time".cyan(),
        status.study_time.to_string().yellow()
    );
    println!("{}: {}", "Fatigue".cyan(), status.fatigue.yellow());
    println!(
        "{}: {} {:.0}% of {} min",
        "Goal".cyan(),
        progress_bar(status.progress, BAR_WIDTH).green(),
        status.progress,
        goal_minutes
    );
}

pub fn print_recommendation(recommendation: &RecommendationResponse) {
    println!(
        "{} {} {}",
        "Next:".cyan().bold(),
        recommendation.action_icon,
        recommendation.action_name.bold()
    );
    if !recommendation.action_description.is_empty() {
        println!("      {}", recommendation.action_description.dimmed());
    }
}

pub fn print_report(report: &ActionReport) {
    println!(
        "{} {} ({} {}, {} {} min)",
        "Took:".cyan().bold(),
        report.action.label().bold(),
        "reward".dimmed(),
        report.outcome.reward,
        "study time".dimmed(),
        report.outcome.study_time
    );
    println!(
        "{}: {}   {}: {}   {}: {:.0}%",
        "Session reward".cyan(),
        report.accumulated_reward,
        "Step".cyan(),
        report.step_count,
        "Goal".cyan(),
        report.progress
    );

    if let Some(reward) = report.final_reward {
        println!(
            "{}",
            format!(
                "Session completed! Final reward: {}\nRun the next step to start a new session.",
                reward
            )
            .green()
            .bold()
        );
    }
}

pub fn print_toasts(toasts: &[ToastView]) {
    for toast in toasts {
        let line = format!("{} {}", toast.icon, toast.message);
        match toast.phase {
            ToastPhase::Visible => println!("  {}", line.bold()),
            ToastPhase::FadingIn | ToastPhase::FadingOut => println!("  {}", line.dimmed()),
            ToastPhase::Gone => {}
        }
    }
}

pub fn print_preferences(preferences: &Preferences) {
    println!(
        "{}: {}",
        "Fatigue sensitivity".cyan(),
        preferences.fatigue_sensitivity.to_string().yellow()
    );
    println!(
        "{}: {}",
        "Break bias".cyan(),
        preferences.break_bias.to_string().yellow()
    );
}

pub fn print_training_stats(stats: &TrainingStatsView) {
    println!("{}", "Training statistics:".cyan().bold());
    println!("  {}: {}", "Average reward".cyan(), stats.average_reward);
    println!("  {}: {}", "Max reward".cyan(), stats.max_reward);
    println!("  {}: {}", "Episodes trained".cyan(), stats.episodes);

    if stats.has_series() {
        println!("  {}", "Reward per episode:".cyan());
        println!("  {}", sparkline(&stats.series));
    }
}

fn sparkline(series: &[(usize, f64)]) -> String {
    const TICKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;

    series
        .iter()
        .map(|(_, value)| {
            if span <= f64::EPSILON {
                TICKS[0]
            } else {
                let idx = ((value - min) / span * (TICKS.len() - 1) as f64).round() as usize;
                TICKS[idx.min(TICKS.len() - 1)]
            }
        })
        .collect()
}

pub fn print_learning_stats(stats: &LearningStatsView) {
    println!("{}", "Learning statistics:".cyan().bold());
    println!("  {}: {}", "Total sessions".cyan(), stats.total_sessions);
    println!("  {}: {}", "Average reward".cyan(), stats.average_reward);
    println!("  {}: {} min", "Total study time".cyan(), stats.total_study_time);

    if !stats.distribution.is_empty() {
        println!("{}", "Action distribution:".cyan().bold());
        for row in &stats.distribution {
            println!(
                "  {:<20} {:>7}  {}",
                row.label,
                row.percentage.yellow(),
                row.count.dimmed()
            );
        }
    }

    println!("{}", "Recent sessions:".cyan().bold());
    match stats.placeholder() {
        Some(placeholder) => println!("  {}", placeholder.dimmed()),
        None => {
            for session in &stats.recent_sessions {
                println!(
                    "  {:<26} {:>8}  {}",
                    session.date, session.study_time, session.reward
                );
            }
        }
    }
}

/// Single-line progress bar for training runs
pub struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn started(&self, requested_episodes: u32) {
        println!(
            "{} {} episodes...",
            "Training".cyan().bold(),
            requested_episodes
        );
    }

    fn frame(&self, frame: ProgressFrame) {
        print!(
            "\r{} Completed: {}/{} episodes",
            progress_bar(frame.percent, BAR_WIDTH).green(),
            frame.completed,
            frame.total
        );
        let _ = std::io::stdout().flush();
    }

    fn finished(&self) {
        print!("\r{}\r", " ".repeat(BAR_WIDTH + 40));
        let _ = std::io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_fill() {
        assert_eq!(progress_bar(0.0, 10), "[..........]");
        assert_eq!(progress_bar(50.0, 10), "[#####.....]");
        assert_eq!(progress_bar(100.0, 10), "[##########]");
        assert_eq!(progress_bar(250.0, 10), "[##########]");
    }

    #[test]
    fn test_sparkline_scales_to_range() {
        let line = sparkline(&[(1, 0.0), (2, 5.0), (3, 10.0)]);
        assert_eq!(line, "▁▅█");
    }

    #[test]
    fn test_sparkline_flat_series() {
        assert_eq!(sparkline(&[(1, 3.0), (2, 3.0)]), "▁▁");
    }
}
