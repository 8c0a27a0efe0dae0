//! Audit log commands.

use latchd_core::{AuditLog, CoreResult};
use tracing::debug;

/// Shows the access log as a table.
pub fn show(log: &AuditLog) {
    let entries = log.read();
    if entries.is_empty() {
        println!("No access records available.");
        return;
    }
    println!();
    println!("--- Access records ---");
    println!("{:<30} {:<15} {:<10}", "Timestamp", "Card ID", "Status");
    println!("{}", "-".repeat(55));
    for entry in &entries {
        let status = if entry.authorized { "Authorized" } else { "Denied" };
        println!(
            "{:<30} {:<15} {:<10}",
            entry.timestamp, entry.card_id, status
        );
    }
}

/// Truncates the access log.
pub fn clear(log: &AuditLog) -> CoreResult<()> {
    debug!(path = %log.path().display(), "truncating access log");
    log.clear()?;
    println!("Access log cleared.");
    Ok(())
}
