use std::io::{self, Write};

use tracing::warn;

use crate::cli::CfCli;

/// Fetch recent logs for `app_name` and emit them; used after a failed start.
pub async fn dump_recent_logs(cli: &CfCli, app_name: &str) {
    match cli.recent_logs(app_name).await {
        Ok(logs) => emit_logs(app_name, &logs),
        Err(err) => warn!(app = app_name, error = %err, "failed to fetch recent logs"),
    }
}

/// Print the log body to stderr once; the tracing event only records its size.
pub fn emit_logs(app_name: &str, logs: &str) {
    warn!(app = app_name, bytes = logs.len(), "recent logs written to stderr");
    if let Err(err) = write_logs(&mut io::stderr().lock(), app_name, logs) {
        warn!(app = app_name, error = ?err, "failed to write recent logs");
    }
}

fn write_logs(out: &mut impl Write, app_name: &str, logs: &str) -> io::Result<()> {
    writeln!(out, "---- recent logs of {app_name} ----")?;
    out.write_all(logs.as_bytes())?;
    if !logs.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush()
}

/// True when `substring` occurs anywhere in `logs`, including offset 0.
#[must_use]
pub fn logs_contain(logs: &str, substring: &str) -> bool {
    logs.contains(substring)
}
