//! Audit trail display

use crate::audit::AuditEntry;

/// Format audit entries, newest last
pub fn format_audit_log(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "Audit log is empty.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_audit_log() {
        assert_eq!(format_audit_log(&[]), "Audit log is empty.\n");

        let entries = vec![
            AuditEntry::import("march.csv", "CSV imported: 3, skipped: 0"),
            AuditEntry::wipe(3, 1),
        ];
        let output = format_audit_log(&entries);
        assert!(output.contains("IMPORT"));
        assert!(output.contains("WIPE"));
        assert!(output.contains("march.csv"));
    }
}
