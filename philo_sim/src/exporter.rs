//! JSON exporter for recorded dinners.
//!
//! Bundles the configuration, the status transcript and the final report
//! into one document for offline inspection.

use crate::oracle::Violation;

use philo_core::{DinnerConfig, DinnerReport};
use philo_env::StatusLine;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete dinner export.
#[derive(Debug, Clone, Serialize)]
pub struct SimExport {
    /// Scenario name, or "cli" for a direct run
    pub scenario: String,
    
    /// Seed used
    pub seed: u64,
    
    /// Table configuration
    pub config: DinnerConfig,
    
    /// Every printed status line, in output order
    pub transcript: Vec<StatusLine>,
    
    /// Engine report, absent if the dinner failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DinnerReport>,
    
    /// Final results
    pub passed: bool,
    
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64, config: DinnerConfig) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            config,
            transcript: Vec::new(),
            report: None,
            passed: false,
            violations: Vec::new(),
        }
    }
    
    /// Records the transcript and report of a finished dinner.
    pub fn record(&mut self, transcript: Vec<StatusLine>, report: DinnerReport) {
        self.transcript = transcript;
        self.report = Some(report);
    }
    
    /// Finalizes the export.
    pub fn finalize(&mut self, violations: Vec<Violation>) {
        self.passed = self.report.is_some() && violations.is_empty();
        self.violations = violations;
    }
    
    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use philo_core::DinnerOutcome;
    use philo_env::{PhilosopherId, Status};
    
    fn report() -> DinnerReport {
        DinnerReport {
            outcome: DinnerOutcome::Death { philosopher: PhilosopherId::new(1), at_ms: 801 },
            meals: vec![0],
            fork_pickups: vec![1],
            peak_fork_holders: 1,
            lines_written: 2,
            elapsed_ms: 801,
        }
    }
    
    #[test]
    fn test_export_serializes_transcript() {
        let config = DinnerConfig::from_millis(1, 800, 200, 200).unwrap();
        let mut export = SimExport::new("lone_philosopher", 42, config);
        export.record(
            vec![
                StatusLine::new(0, PhilosopherId::new(1), Status::TakeFirstFork),
                StatusLine::new(801, PhilosopherId::new(1), Status::Died),
            ],
            report(),
        );
        export.finalize(Vec::new());
        
        assert!(export.passed);
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["scenario"], "lone_philosopher");
        assert_eq!(value["transcript"].as_array().map(Vec::len), Some(2));
        assert!(value.get("violations").is_none());
    }
    
    #[test]
    fn test_export_without_report_fails() {
        let config = DinnerConfig::from_millis(2, 800, 200, 200).unwrap();
        let mut export = SimExport::new("cli", 0, config);
        export.finalize(Vec::new());
        
        assert!(!export.passed);
    }
    
    #[test]
    fn test_write_to_file() {
        let config = DinnerConfig::from_millis(1, 800, 200, 200).unwrap();
        let mut export = SimExport::new("lone_philosopher", 7, config);
        export.record(Vec::new(), report());
        export.finalize(Vec::new());
        
        let path = std::env::temp_dir().join(format!("philo-export-{}.json", std::process::id()));
        export.write_to_file(&path).unwrap();
        
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(written.contains("\"seed\": 7"));
    }
}
