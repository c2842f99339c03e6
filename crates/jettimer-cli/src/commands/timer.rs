use std::sync::Arc;

use clap::Subcommand;
use jettimer_core::{
    format_hms, parse_hhmmss, Config, Event, LogNotifier, LogSound, PreferencePort, Ports, RunState,
    SoundPort, SqlitePreferences, TimerCoordinator, TokioClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::sound::TerminalBell;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Configure the next timer from an HHMMSS entry (e.g. 130 = 1m 30s)
    Set {
        /// Up to six digits, read right to left as seconds, minutes, hours
        hhmmss: String,
    },
    /// Run the configured timer in the foreground.
    ///
    /// Type `p` (or just Enter) to pause/resume, `+` to add a minute,
    /// `r` to reset and `q` to quit.
    Run {
        /// Print every event as a JSON line
        #[arg(long)]
        json: bool,
    },
    /// Print the stored timer as JSON
    Status,
    /// Forget the configured timer
    Clear,
}

fn coordinator(config: &Config, prefs: Arc<SqlitePreferences>) -> TimerCoordinator {
    let sound: Arc<dyn SoundPort> = if config.notifications.enabled && config.notifications.sound {
        Arc::new(TerminalBell)
    } else {
        Arc::new(LogSound)
    };
    let ports = Ports::new(prefs)
        .with_notifier(Arc::new(LogNotifier))
        .with_sound(sound);
    TimerCoordinator::new(config.timer_settings(), Arc::new(TokioClock::new()), ports)
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let prefs = Arc::new(SqlitePreferences::open()?);

    match action {
        TimerAction::Set { hhmmss } => {
            let millis = parse_hhmmss(&hhmmss)?;
            coordinator(&config, prefs).configure(millis)?;
            println!("timer set to {}", format_hms(millis));
        }
        TimerAction::Run { json } => {
            let timer = coordinator(&config, prefs.clone());
            let rt = tokio::runtime::Runtime::new()?;
            let result = rt.block_on(run_foreground(&timer, json));
            if timer.state() != RunState::Stopped {
                prefs.set_running(false)?;
            }
            result?;
        }
        TimerAction::Status => {
            let status = serde_json::json!({
                "duration_ms": prefs.duration(),
                "temp_duration_ms": prefs.temp_duration(),
                "running": prefs.running(),
                "label": format_hms(prefs.temp_duration().max(prefs.duration())),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        TimerAction::Clear => {
            coordinator(&config, prefs).reset();
            println!("timer cleared");
        }
    }
    Ok(())
}

async fn run_foreground(
    timer: &TimerCoordinator,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Subscribed first so the start event arrives through the same stream.
    let mut events = timer.subscribe();
    timer.start()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    render(&event, json)?;
                    if !stdin_open && matches!(event, Event::TimerFinished { .. }) {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event output lagging");
                }
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    if timer.state() == RunState::Finished {
                        break;
                    }
                    continue;
                };
                let outcome = match line.trim() {
                    "" | "p" => timer.toggle(),
                    "+" => timer.add_minute(),
                    "r" => Ok(timer.reset()),
                    "q" => break,
                    other => {
                        eprintln!("unknown command: {other} (p, +, r, q)");
                        continue;
                    }
                };
                match outcome {
                    Ok(event @ Event::TimerReset { .. }) => {
                        render(&event, json)?;
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => eprintln!("error: {e}"),
                }
            }
        }
    }
    Ok(())
}

fn render(event: &Event, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::TimerStarted { remaining_ms, .. } => println!("started: {}", format_hms(*remaining_ms)),
        Event::TimerPaused { remaining_ms, .. } => println!("paused at {}", format_hms(*remaining_ms)),
        Event::TimerResumed { remaining_ms, .. } => println!("resumed: {}", format_hms(*remaining_ms)),
        Event::Tick {
            label: Some(label),
            remaining_ms,
            ..
        } if *remaining_ms > 0 => println!("{label}"),
        Event::TimerFinished { .. } => println!("time's up"),
        Event::MinuteAdded { remaining_ms, .. } => println!("+1 minute: {}", format_hms(*remaining_ms)),
        Event::TimerReset { .. } => println!("timer reset"),
        _ => {}
    }
    Ok(())
}
