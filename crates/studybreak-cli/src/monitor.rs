//! Interactive session monitor

use colored::Colorize;
use std::io::Write;
use studybreak_monitor::{MonitorError, TrainingRun};
use studybreak_protocol::{BreakBias, FatigueSensitivity, Preferences};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::App;
use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    Next,
    Status,
    Reset,
    Goal(i64),
    Train(Option<u32>),
    Prefs(Option<Preferences>),
    Stats,
    History,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> MonitorCommand {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return MonitorCommand::Empty;
    };
    let args: Vec<&str> = parts.collect();

    match (head.to_lowercase().as_str(), args.as_slice()) {
        ("n" | "next", []) => MonitorCommand::Next,
        ("s" | "status", []) => MonitorCommand::Status,
        ("r" | "reset", []) => MonitorCommand::Reset,
        ("g" | "goal", [minutes]) => match minutes.parse::<i64>() {
            Ok(minutes) => MonitorCommand::Goal(minutes),
            Err(_) => MonitorCommand::Invalid(format!("'{}' is not a number of minutes", minutes)),
        },
        ("t" | "train", []) => MonitorCommand::Train(None),
        ("t" | "train", [episodes]) => match episodes.parse::<u32>() {
            Ok(episodes) => MonitorCommand::Train(Some(episodes)),
            Err(_) => MonitorCommand::Invalid(format!("'{}' is not an episode count", episodes)),
        },
        ("p" | "prefs", []) => MonitorCommand::Prefs(None),
        ("p" | "prefs", [fatigue, bias]) => {
            match (
                fatigue.parse::<FatigueSensitivity>(),
                bias.parse::<BreakBias>(),
            ) {
                (Ok(fatigue), Ok(bias)) => MonitorCommand::Prefs(Some(Preferences::new(fatigue, bias))),
                (Err(error), _) | (_, Err(error)) => MonitorCommand::Invalid(error),
            }
        }
        ("stats", []) => MonitorCommand::Stats,
        ("history", []) => MonitorCommand::History,
        ("h" | "help" | "?", []) => MonitorCommand::Help,
        ("q" | "quit" | "exit", []) => MonitorCommand::Quit,
        _ => MonitorCommand::Invalid(format!("Unknown command: {}", line.trim())),
    }
}

fn print_help() {
    println!("{}", "Commands:".cyan().bold());
    println!("  {}          take the recommended action", "n".yellow());
    println!("  {}          refresh status", "s".yellow());
    println!("  {}          reset the session", "r".yellow());
    println!("  {}    set the session goal", "g <min>".yellow());
    println!("  {}   train the agent", "t [eps]".yellow());
    println!("  {}  show or save preferences", "p [f b]".yellow());
    println!("  {}      training statistics", "stats".yellow());
    println!("  {}    learning statistics", "history".yellow());
    println!("  {}          quit", "q".yellow());
}

fn print_error(error: &dyn std::fmt::Display) {
    eprintln!("{}: {}", "Error".red().bold(), error);
}

fn report_error(error: &MonitorError) {
    if !error.is_user_facing() {
        println!("{}", error.to_string().dimmed());
        return;
    }
    print_error(error);
    if error.is_retryable() {
        println!(
            "{}",
            "The decision service looks unavailable. Try again in a moment.".dimmed()
        );
    }
}

fn drain_logs(logs: &mut UnboundedReceiver<String>) {
    while let Ok(line) = logs.try_recv() {
        println!("{}", line.dimmed());
    }
}

pub async fn run_monitor(
    app: &App,
    mut logs: UnboundedReceiver<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let controller = &app.controller;

    println!("{}", "Study Break Optimizer".cyan().bold());
    println!(
        "{} {}",
        "Backend:".dimmed(),
        app.config.server.base_url.dimmed()
    );
    let snapshot = controller.initialize().await;
    render::print_dashboard(&snapshot);
    if let Some(stats) = controller.training_stats().await {
        render::print_training_stats(&stats);
    }
    println!("{}", "Type h for help.".dimmed());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        drain_logs(&mut logs);
        render::print_toasts(&controller.notifications().toasts());
        print!("{} ", ">".cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            MonitorCommand::Next => match controller.take_action().await {
                Ok(report) => {
                    render::print_report(&report);
                    render::print_dashboard(&controller.snapshot());
                }
                Err(error) => report_error(&error),
            },
            MonitorCommand::Status => {
                controller.refresh_status().await;
                render::print_dashboard(&controller.snapshot());
            }
            MonitorCommand::Reset => {
                let snapshot = controller.reset().await;
                println!("{}", "Session reset!".green());
                render::print_dashboard(&snapshot);
            }
            MonitorCommand::Goal(minutes) => match controller.set_goal(minutes) {
                Ok(update) => println!(
                    "{} {} min ({:.0}%)",
                    "Goal:".cyan(),
                    update.goal_minutes,
                    update.progress
                ),
                Err(error) => report_error(&error),
            },
            MonitorCommand::Train(episodes) => {
                let episodes = episodes.unwrap_or_else(|| app.training.default_episodes());
                match app.training.run(episodes, &render::TerminalProgress).await {
                    Ok(TrainingRun::Completed { stats, .. }) => {
                        println!("{}", "Training completed!".green().bold());
                        if let Some(stats) = stats {
                            render::print_training_stats(&stats);
                        }
                    }
                    Ok(TrainingRun::Skipped) => {
                        println!("{}", "Training is already running.".dimmed())
                    }
                    Err(error) => report_error(&error),
                }
            }
            MonitorCommand::Prefs(None) => render::print_preferences(&controller.preferences()),
            MonitorCommand::Prefs(Some(preferences)) => {
                match controller.save_preferences(preferences).await {
                    Ok(saved) => render::print_preferences(&saved),
                    Err(error) => report_error(&error),
                }
            }
            MonitorCommand::Stats => match controller.training_stats().await {
                Some(stats) => render::print_training_stats(&stats),
                None => println!("{}", "Statistics unavailable.".dimmed()),
            },
            MonitorCommand::History => match controller.learning_stats().await {
                Some(stats) => render::print_learning_stats(&stats),
                None => println!("{}", "Statistics unavailable.".dimmed()),
            },
            MonitorCommand::Help => print_help(),
            MonitorCommand::Quit => break,
            MonitorCommand::Empty => {}
            MonitorCommand::Invalid(message) => print_error(&message),
        }
    }

    drain_logs(&mut logs);
    Ok(())
}
