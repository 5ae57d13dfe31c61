//! Studybreak - study/break coaching from the terminal

use clap::Parser;
use colored::Colorize;
use std::path::Path;
use studybreak_config::{find_all_config_files, load_config, StudybreakConfig};
use studybreak_monitor::{NotificationPermission, TrainingRun};
use studybreak_telemetry::{init_channel_subscriber, init_subscriber};

mod app;
mod commands;
mod monitor;
mod render;

use app::App;
use commands::{Cli, Commands, ConfigCommands, GoalCommands, NotificationCommands, PrefsCommands};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(mut config) => {
            if let Some(url) = &cli.url {
                config.server.base_url = url.clone();
            }
            config
        }
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    };

    let logs = if cli.is_interactive() {
        Some(init_channel_subscriber(&config.telemetry))
    } else {
        init_subscriber(&config.telemetry);
        None
    };

    let result = match App::new(config, cli.state_dir.as_deref()) {
        Ok(app) => {
            let result = run(&cli, &app, logs).await;
            // Desktop alerts run on their own threads and die with the process.
            let controller = app.controller.clone();
            if tokio::task::spawn_blocking(move || controller.notifications().flush_alerts())
                .await
                .is_err()
            {
                tracing::warn!("Flushing desktop alerts failed");
            }
            result
        }
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(
    cli: &Cli,
    app: &App,
    logs: Option<tokio::sync::mpsc::UnboundedReceiver<String>>,
) -> CliResult {
    match &cli.command {
        None | Some(Commands::Monitor) => match logs {
            Some(logs) => monitor::run_monitor(app, logs).await,
            None => Err("interactive monitor needs the channel logger".into()),
        },
        Some(Commands::Status) => run_status(app).await,
        Some(Commands::Recommend) => run_recommend(app).await,
        Some(Commands::Act) => run_act(app).await,
        Some(Commands::Reset) => {
            let snapshot = app.controller.reset().await;
            println!("{}", "Session reset!".green());
            render::print_dashboard(&snapshot);
            Ok(())
        }
        Some(Commands::Goal { command }) => run_goal(command, app),
        Some(Commands::Prefs { command }) => run_prefs(command, app).await,
        Some(Commands::Train { episodes }) => run_train(*episodes, app).await,
        Some(Commands::Stats) => match app.controller.training_stats().await {
            Some(stats) => {
                render::print_training_stats(&stats);
                Ok(())
            }
            None => Err("Could not load training statistics".into()),
        },
        Some(Commands::History) => match app.controller.learning_stats().await {
            Some(stats) => {
                render::print_learning_stats(&stats);
                Ok(())
            }
            None => Err("Could not load learning statistics".into()),
        },
        Some(Commands::Notifications { command }) => run_notifications(command, app),
        Some(Commands::Config { command }) => {
            run_config(command, &app.config, cli.config.as_deref())
        }
    }
}

async fn run_status(app: &App) -> CliResult {
    let status = app
        .controller
        .refresh_status()
        .await
        .ok_or("Could not load status from the decision service")?;
    render::print_status(&status, app.controller.session_goal());
    Ok(())
}

async fn run_recommend(app: &App) -> CliResult {
    let recommendation = app
        .controller
        .refresh_recommendation()
        .await
        .ok_or("Could not load a recommendation")?;
    render::print_recommendation(&recommendation);
    Ok(())
}

async fn run_act(app: &App) -> CliResult {
    app.controller.initialize().await;
    let report = app.controller.take_action().await?;
    render::print_report(&report);
    render::print_toasts(&app.controller.notifications().toasts());
    if let Some(recommendation) = app.controller.snapshot().recommendation {
        render::print_recommendation(&recommendation);
    }
    Ok(())
}

fn run_goal(command: &GoalCommands, app: &App) -> CliResult {
    match command {
        GoalCommands::Show => {
            println!(
                "{}: {} minutes",
                "Session goal".cyan(),
                app.controller.session_goal().to_string().yellow()
            );
        }
        GoalCommands::Set { minutes } => {
            let update = app.controller.set_goal(*minutes)?;
            render::print_toasts(&app.controller.notifications().toasts());
            println!(
                "{}: {} minutes",
                "Session goal".cyan(),
                update.goal_minutes.to_string().yellow()
            );
        }
    }
    Ok(())
}

async fn run_prefs(command: &PrefsCommands, app: &App) -> CliResult {
    match command {
        PrefsCommands::Show => {
            let preferences = app
                .controller
                .load_preferences()
                .await
                .ok_or("Could not load preferences")?;
            render::print_preferences(&preferences);
        }
        PrefsCommands::Set { fatigue, bias } => {
            let preferences = studybreak_protocol::Preferences::new(*fatigue, *bias);
            let saved = app.controller.save_preferences(preferences).await?;
            render::print_toasts(&app.controller.notifications().toasts());
            render::print_preferences(&saved);
        }
    }
    Ok(())
}

async fn run_train(episodes: Option<u32>, app: &App) -> CliResult {
    let episodes = episodes.unwrap_or_else(|| app.training.default_episodes());
    match app.training.run(episodes, &render::TerminalProgress).await? {
        TrainingRun::Completed {
            total_episodes,
            stats,
        } => {
            println!(
                "{} ({} episodes)",
                "Training completed!".green().bold(),
                total_episodes
            );
            if let Some(stats) = stats {
                render::print_training_stats(&stats);
            }
        }
        TrainingRun::Skipped => println!("{}", "Training is already running.".dimmed()),
    }
    Ok(())
}

fn run_notifications(command: &NotificationCommands, app: &App) -> CliResult {
    let permission = match command {
        NotificationCommands::Allow => {
            app.controller
                .set_notification_permission(NotificationPermission::Granted)?;
            NotificationPermission::Granted
        }
        NotificationCommands::Deny => {
            app.controller
                .set_notification_permission(NotificationPermission::Denied)?;
            NotificationPermission::Denied
        }
        NotificationCommands::Status => app.controller.notifications().permission(),
    };

    println!(
        "{}: {}",
        "Desktop notifications".cyan(),
        permission.to_string().yellow()
    );
    Ok(())
}

fn run_config(
    command: &ConfigCommands,
    config: &StudybreakConfig,
    explicit: Option<&Path>,
) -> CliResult {
    match command {
        ConfigCommands::Show => {
            let source = explicit
                .map(Path::to_path_buf)
                .or_else(|| find_all_config_files().into_iter().next());
            match source {
                Some(path) => println!("{} {}", "Loaded from:".cyan().bold(), path.display()),
                None => println!("{}", "No configuration file found, using defaults.".dimmed()),
            }
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }
    Ok(())
}
