//! `session-logger runners`: show the effective runner table.

use anyhow::Result;
use colored::Colorize;

use crate::config::Config;
use crate::supervisor::runners::RunnerSpec;

pub fn list(config: &Config) -> Result<()> {
    let table = config.runner_table();
    println!("{}", "Runners".bold());
    for (ext, spec) in table.iter() {
        println!("  {:<8} {}", format!(".{ext}"), describe(spec));
    }
    Ok(())
}

fn describe(spec: &RunnerSpec) -> String {
    let command = std::iter::once(spec.program.as_str())
        .chain(spec.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    if which::which(&spec.program).is_ok() {
        command
    } else {
        format!("{command} {}", "(not installed)".dimmed())
    }
}
