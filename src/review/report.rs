// CodeLens Audit Report
// Copyright (c) 2026 Xing_The_Creator | CodeLens
//
// Plain-text export of an analysis reply plus the current metrics.

use crate::review::session::MetricsSnapshot;
use chrono::{DateTime, Local};
use std::path::Path;
use thiserror::Error;
use tracing::info;

const TITLE: &str = "CodeLens Audit Report";
const FOOTER: &str = "Powered by CodeLens";
const RULE_WIDTH: usize = 60;
const MAX_HEADER_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no analysis to export yet")]
    NothingToExport,
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Header,
    Bullet,
    Body,
    Blank,
}

fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if (starts_with_label(line) || trimmed.ends_with(':')) && trimmed.len() < MAX_HEADER_LEN {
        return LineKind::Header;
    }
    if trimmed.starts_with('*') || trimmed.starts_with('-') {
        return LineKind::Bullet;
    }
    LineKind::Body
}

/// `Word:` at the very start of the line, e.g. "Summary: ...".
fn starts_with_label(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    let rest: String = chars.take_while(|c| c.is_ascii_lowercase()).collect();
    !rest.is_empty() && line[1 + rest.len()..].starts_with(':')
}

fn clean(content: &str) -> String {
    content.replace("**", "").replace("###", "").replace('`', "")
}

pub struct AuditReport<'a> {
    content: &'a str,
    metrics: &'a MetricsSnapshot,
}

impl<'a> AuditReport<'a> {
    pub fn new(content: &'a str, metrics: &'a MetricsSnapshot) -> Self {
        Self { content, metrics }
    }

    pub fn render(&self, generated_at: DateTime<Local>) -> String {
        let mut out = String::new();
        out.push_str(TITLE);
        out.push('\n');
        out.push_str(&format!(
            "Generated by CodeLens • {}\n",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ));

        if let Some(score) = self.metrics.score {
            out.push_str(&format!("Health: {}/100\n", score));
            if let Some(time) = &self.metrics.time_complexity {
                match &self.metrics.previous_time_complexity {
                    Some(prev) => out.push_str(&format!("Time: {} -> {}\n", prev, time)),
                    None => out.push_str(&format!("Time: {}\n", time)),
                }
            }
        }
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');

        for line in clean(self.content).lines() {
            let trimmed = line.trim();
            match classify(line) {
                LineKind::Header => {
                    out.push('\n');
                    out.push_str(&trimmed.to_uppercase());
                    out.push('\n');
                }
                LineKind::Bullet => {
                    let body = trimmed.strip_prefix(['*', '-']).unwrap_or(trimmed).trim();
                    out.push_str(&format!("•  {}\n", body));
                }
                LineKind::Body => {
                    out.push_str(trimmed);
                    out.push('\n');
                }
                LineKind::Blank => {}
            }
        }

        out.push('\n');
        out.push_str(FOOTER);
        out.push('\n');
        out
    }

    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        if self.content.trim().is_empty() {
            return Err(ReportError::NothingToExport);
        }
        std::fs::write(path, self.render(Local::now()))?;
        info!("[REPORT] Audit report written to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("Summary: all good"), LineKind::Header);
        assert_eq!(classify("Key findings:"), LineKind::Header);
        assert_eq!(classify("* ✅ Uses a set"), LineKind::Bullet);
        assert_eq!(classify("- ⚠️ Nested loop"), LineKind::Bullet);
        assert_eq!(classify("The loop is fine."), LineKind::Body);
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify(&format!("{}:", "x".repeat(60))), LineKind::Body);
    }

    #[test]
    fn test_render_with_metrics() {
        let metrics = MetricsSnapshot {
            score: Some(88),
            time_complexity: Some("O(N)".into()),
            space_complexity: Some("O(1)".into()),
            previous_time_complexity: Some("O(N^2)".into()),
        };
        let content = "**Verdict:**\n* ✅ `sum` is clean\n\nNo issues.";
        let text = AuditReport::new(content, &metrics).render(fixed_time());

        assert!(text.starts_with("CodeLens Audit Report\nGenerated by CodeLens • 2026-03-01 09:30:00\n"));
        assert!(text.contains("Health: 88/100\nTime: O(N^2) -> O(N)\n"));
        assert!(text.contains("\nVERDICT:\n"));
        assert!(text.contains("•  ✅ sum is clean\n"));
        assert!(text.contains("No issues.\n"));
        assert!(!text.contains("**"));
        assert!(text.trim_end().ends_with("Powered by CodeLens"));
    }

    #[test]
    fn test_render_without_score_skips_health() {
        let metrics = MetricsSnapshot::default();
        let text = AuditReport::new("fine", &metrics).render(fixed_time());
        assert!(!text.contains("Health:"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let metrics = MetricsSnapshot::default();
        AuditReport::new("- ok", &metrics).save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("•  ok"));
    }

    #[test]
    fn test_bullet_drops_one_marker() {
        let metrics = MetricsSnapshot::default();
        let text = AuditReport::new("---\n- -1 is returned on error", &metrics).render(fixed_time());
        assert!(text.contains("•  --\n"));
        assert!(text.contains("•  -1 is returned on error\n"));
    }

    #[test]
    fn test_save_refuses_empty_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let metrics = MetricsSnapshot::default();
        let err = AuditReport::new("  \n", &metrics).save(&path).unwrap_err();
        assert!(matches!(err, ReportError::NothingToExport));
        assert!(!path.exists());
    }
}
