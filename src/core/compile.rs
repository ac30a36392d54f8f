//! Simulated compile action for the active editor file.

use crate::core::deploy::detect::detect_in_source;
use crate::core::random::{class_hash, short_hex};
use crate::models::{DeploymentLog, LogLevel};

fn line(timestamp: u64, level: LogLevel, message: String) -> DeploymentLog {
    DeploymentLog {
        timestamp,
        level,
        message,
    }
}

/// Logged as soon as compilation starts.
pub fn compile_started(path: &str, now: u64) -> DeploymentLog {
    line(now, LogLevel::Info, format!("Compiling {}...", path))
}

/// Logged once the simulated compiler finishes.
pub fn compile_finished(path: &str, source: &str, now: u64) -> Vec<DeploymentLog> {
    if source.trim().is_empty() {
        return vec![line(
            now,
            LogLevel::Error,
            format!("error: {} is empty, nothing to compile", path),
        )];
    }

    let contracts = detect_in_source(path, source);
    let mut out = Vec::new();
    if contracts.is_empty() {
        out.push(line(
            now,
            LogLevel::Warn,
            format!("warning: no #[starknet::contract] module found in {}", path),
        ));
    }
    for contract in &contracts {
        out.push(line(
            now,
            LogLevel::Info,
            format!(
                "{}: class hash {}",
                contract.name,
                short_hex(&class_hash(source))
            ),
        ));
    }
    out.push(line(
        now,
        LogLevel::Success,
        format!(
            "Finished compiling {} ({} contract{})",
            path,
            contracts.len(),
            if contracts.len() == 1 { "" } else { "s" }
        ),
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::template;

    #[test]
    fn test_contract_compiles() {
        let logs = compile_finished("/src/counter.cairo", template::COUNTER_CAIRO, 0);
        assert_eq!(logs.len(), 2);
        assert!(logs[0].message.starts_with("Counter: class hash 0x"));
        assert_eq!(logs[1].level, LogLevel::Success);
    }

    #[test]
    fn test_plain_file_warns() {
        let logs = compile_finished("/src/utils.cairo", "fn add(a: u8) -> u8 { a }", 0);
        assert_eq!(logs[0].level, LogLevel::Warn);
        assert!(logs[1].message.ends_with("(0 contracts)"));
    }

    #[test]
    fn test_empty_file_fails() {
        let logs = compile_finished("/src/empty.cairo", "  \n", 0);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Error);
    }
}
