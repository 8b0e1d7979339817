use super::{json_pretty, BarReporter, EXIT_SUCCESS};
use crate::config::RunConfig;
use console::Style;
use verpin_core::{PinReport, Pinner};

pub fn run(config: &RunConfig) -> Result<u8, String> {
    let reporter = BarReporter::new(config.show_progress());
    let report = Pinner::new(&config.project)
        .pin(&reporter)
        .map_err(|e| e.to_string())?;
    print_result(&report, config.json)?;
    Ok(EXIT_SUCCESS)
}

fn print_result(report: &PinReport, json: bool) -> Result<(), String> {
    if json {
        let payload = serde_json::json!({
            "status": "pinned",
            "manifest": report.manifest,
            "total": report.total,
            "changed": report.changed,
            "resolved": report.resolved,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "{} pinned {} dependencies in {} ({} changed)",
            Style::new().green().apply_to("✓"),
            report.total,
            report.manifest.display(),
            report.changed
        );
    }
    Ok(())
}
