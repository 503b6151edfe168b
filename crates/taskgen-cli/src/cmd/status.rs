use crate::output::{print_json, print_table};
use std::time::Instant;
use taskgen_core::config::Config;
use taskgen_core::health::{self, CheckResult, HealthStatus};
use taskgen_core::{FileStore, SpecStore};

/// Run the same checks the `/api/status` endpoint runs, against the local
/// data directory and the configured provider. Fails when anything is
/// unhealthy so scripts can gate on the exit code.
pub fn run(config: &Config, api_key: Option<String>, json: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let storage = FileStore::new(config.specs_file()).health_check();

    let generator = super::build_generator(config, api_key)?;
    let rt = tokio::runtime::Runtime::new()?;
    let llm = rt.block_on(generator.check_health());

    let report = health::aggregate(health::backend_check(started.elapsed()), storage, llm);

    if json {
        print_json(&report)?;
    } else {
        let row = |name: &str, check: &CheckResult| {
            vec![
                name.to_string(),
                check.status.to_string(),
                check.message.clone(),
            ]
        };
        print_table(
            &["CHECK", "STATUS", "MESSAGE"],
            vec![
                row("backend", &report.checks.backend),
                row("storage", &report.checks.storage),
                row("llm", &report.checks.llm),
            ],
        );
        println!();
        println!("overall: {}", report.overall);
    }

    if report.overall == HealthStatus::Unhealthy {
        anyhow::bail!("one or more checks are unhealthy");
    }
    Ok(())
}
