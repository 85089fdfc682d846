//! Command handlers

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use razer_mouse::{CommandSession, DeviceChanges, DeviceRegistry};
use tracing::{info, warn};

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Poll granularity while waiting between watch iterations
const INTERRUPT_POLL: Duration = Duration::from_millis(100);

/// Set up a Ctrl-C handler that clears the returned flag when triggered
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    if let Err(e) = ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    running
}

fn format_level(level: i32) -> String {
    if level < 0 {
        "unavailable".to_string()
    } else {
        format!("{level}%")
    }
}

fn print_status(session: &CommandSession) {
    let level = session.query_battery_level();
    let charging = session.query_charging_status();
    println!("{} (0x{:04X})", session.name(), session.product_id());
    println!("  Level:    {}", format_level(level));
    println!("  Charging: {}", if charging { "Yes" } else { "No" });
}

fn print_changes(registry: &DeviceRegistry, changes: &DeviceChanges) {
    for pid in &changes.removed {
        println!("- 0x{pid:04X} disconnected");
    }
    for pid in &changes.added {
        let name = registry.device_name(*pid).unwrap_or("unknown");
        println!("+ 0x{pid:04X} {name} connected");
    }
}

/// List connected devices
pub fn list(registry: &mut DeviceRegistry) -> CommandResult {
    registry.refresh().context("Device enumeration failed")?;

    if registry.sessions().is_empty() {
        println!("No supported devices found");
        return Ok(());
    }

    println!("Connected devices");
    println!("-----------------");
    for session in registry.sessions() {
        println!(
            "  0x{:04X}  {:<24} {}  (transaction id 0x{:02X})",
            session.product_id(),
            session.name(),
            session.path(),
            session.transaction_id()
        );
    }
    Ok(())
}

/// Show battery level and charging state for one or all devices
pub fn battery(registry: &mut DeviceRegistry, pid: Option<u16>, quiet: bool) -> CommandResult {
    registry.refresh().context("Device enumeration failed")?;

    let sessions: Vec<&CommandSession> = match pid {
        Some(pid) => vec![registry.resolve(pid)?],
        None => registry.sessions().iter().collect(),
    };

    if sessions.is_empty() {
        if quiet {
            bail!("No supported devices found");
        }
        println!("No supported devices found");
        return Ok(());
    }

    for session in sessions {
        if quiet {
            let level = session.query_battery_level();
            if level < 0 {
                bail!("Failed to read battery of {}", session.name());
            }
            println!("{level}");
        } else {
            print_status(session);
        }
    }
    Ok(())
}

/// Poll until Ctrl-C, printing connects, disconnects and battery state
pub fn watch(registry: &mut DeviceRegistry, interval: u64) -> CommandResult {
    let running = setup_interrupt_handler();
    let interval = Duration::from_secs(interval);
    info!("Watching devices every {:?}", interval);

    while running.load(Ordering::SeqCst) {
        match registry.refresh() {
            Ok(changes) => {
                print_changes(registry, &changes);
                for session in registry.sessions() {
                    print_status(session);
                }
            }
            Err(e) => warn!("Device enumeration failed: {}", e),
        }

        let deadline = Instant::now() + interval;
        while running.load(Ordering::SeqCst) && Instant::now() < deadline {
            std::thread::sleep(INTERRUPT_POLL);
        }
    }

    info!("Watch stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(100), "100%");
        assert_eq!(format_level(0), "0%");
        assert_eq!(format_level(-1), "unavailable");
    }
}
