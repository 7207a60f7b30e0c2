//! Suite results

use std::time::Duration;

use colored::*;
use serde::Serialize;

use crate::error::ScenarioError;
use crate::scenario::Scenario;

/// Result of one scenario
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    /// Job submitted by the scenario; absent when it never got to run
    pub job_id: Option<String>,
    pub duration: Duration,
    pub result: Result<(), ScenarioError>,
}

impl ScenarioOutcome {
    pub fn new(
        scenario: Scenario,
        job_id: Option<String>,
        duration: Duration,
        result: Result<(), ScenarioError>,
    ) -> Self {
        Self {
            scenario,
            job_id,
            duration,
            result,
        }
    }

    /// Outcome of a scenario whose task never returned
    pub fn aborted(scenario: Scenario, error: ScenarioError) -> Self {
        Self::new(scenario, None, Duration::ZERO, Err(error))
    }

    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Serialized form of an outcome
#[derive(Serialize)]
struct OutcomeRecord<'a> {
    scenario: Scenario,
    job_id: Option<&'a str>,
    duration_ms: u64,
    status: &'static str,
    error: Option<String>,
}

impl<'a> From<&'a ScenarioOutcome> for OutcomeRecord<'a> {
    fn from(outcome: &'a ScenarioOutcome) -> Self {
        let (status, error) = match &outcome.result {
            Ok(()) => ("passed", None),
            Err(e) if e.is_fatal() => ("error", Some(e.to_string())),
            Err(e) => ("failed", Some(e.to_string())),
        };
        Self {
            scenario: outcome.scenario,
            job_id: outcome.job_id.as_deref(),
            duration_ms: outcome.duration.as_millis() as u64,
            status,
            error,
        }
    }
}

/// Outcomes of a suite run, in scenario order
#[derive(Debug)]
pub struct SuiteReport {
    outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn new(outcomes: Vec<ScenarioOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ScenarioOutcome] {
        &self.outcomes
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Machine-readable report
    pub fn to_json(&self) -> serde_json::Value {
        let records: Vec<OutcomeRecord<'_>> = self.outcomes.iter().map(OutcomeRecord::from).collect();
        serde_json::json!({
            "passed": self.passed(),
            "failed": self.failed(),
            "scenarios": records,
        })
    }

    /// Prints a colored summary to stdout
    pub fn print_summary(&self) {
        println!();
        for outcome in &self.outcomes {
            let job = outcome.job_id.as_deref().unwrap_or("-");
            match &outcome.result {
                Ok(()) => println!(
                    "{} {} ({}, {:.1}s)",
                    "PASS".green().bold(),
                    outcome.scenario,
                    job.dimmed(),
                    outcome.duration.as_secs_f64()
                ),
                Err(e) => {
                    let label = if e.is_fatal() { "ERROR" } else { "FAIL" };
                    println!(
                        "{} {} ({}, {:.1}s)",
                        label.red().bold(),
                        outcome.scenario,
                        job.dimmed(),
                        outcome.duration.as_secs_f64()
                    );
                    println!("     {}", e.to_string().red());
                }
            }
        }
        println!();

        let summary = format!("{} passed, {} failed", self.passed(), self.failed());
        if self.is_success() {
            println!("{}", summary.green().bold());
        } else {
            println!("{}", summary.red().bold());
        }
    }
}
