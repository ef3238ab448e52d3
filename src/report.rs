//! Aggregate memory report produced by one sampling pass.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::SampleError;
use crate::process::Role;

/// Point-in-time view of one matched process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub exe: String,
    /// Resolved command line, or just `exe` when nothing better was available.
    pub cmdline: Vec<String>,
    pub rss: u64,
    pub uss: u64,
}

impl ProcessSnapshot {
    /// Command line joined with single spaces, as the parent filter sees it.
    pub fn command_line(&self) -> String {
        self.cmdline.join(" ")
    }
}

/// One row of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessLine {
    pub pid: u32,
    pub role: Role,
    /// Full command line in verbose mode, executable path otherwise.
    pub display: String,
    pub rss: u64,
    pub uss: u64,
}

impl ProcessLine {
    pub fn from_snapshot(snapshot: &ProcessSnapshot, role: Role, verbose: bool) -> Self {
        let display = if verbose {
            snapshot.command_line()
        } else {
            snapshot.exe.clone()
        };
        Self {
            pid: snapshot.pid,
            role,
            display,
            rss: snapshot.rss,
            uss: snapshot.uss,
        }
    }

    /// Bytes this row contributes to the total.
    pub fn counted_bytes(&self) -> u64 {
        match self.role {
            Role::Parent => self.rss,
            Role::Child => self.uss,
        }
    }
}

impl fmt::Display for ProcessLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rss_mark, uss_mark) = match self.role {
            Role::Parent => ("*", " "),
            Role::Child => (" ", "*"),
        };
        writeln!(f, "[{}] - {}", self.pid, self.display)?;
        writeln!(f, "  {} RSS - {}", rss_mark, self.rss)?;
        write!(f, "  {} USS - {}", uss_mark, self.uss)
    }
}

/// Parent RSS plus children USS over every matched process.
///
/// Only [`AggregateReport::new`] builds one, and it refuses a report with no
/// counted parent memory.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    sampled_at: DateTime<Utc>,
    processes: Vec<ProcessLine>,
    parent_rss: u64,
    children_uss: u64,
    total: u64,
}

impl AggregateReport {
    pub fn new(processes: Vec<ProcessLine>) -> Result<Self, SampleError> {
        let mut parent_rss = 0u64;
        let mut children_uss = 0u64;
        let mut children = 0usize;
        for line in &processes {
            match line.role {
                Role::Parent => parent_rss += line.counted_bytes(),
                Role::Child => {
                    children_uss += line.counted_bytes();
                    children += 1;
                }
            }
        }

        if parent_rss == 0 {
            return Err(if children_uss != 0 {
                SampleError::NoParentMatch { children }
            } else {
                SampleError::NoProcessMatch
            });
        }

        Ok(Self {
            sampled_at: Utc::now(),
            processes,
            parent_rss,
            children_uss,
            total: parent_rss + children_uss,
        })
    }

    pub fn sampled_at(&self) -> DateTime<Utc> {
        self.sampled_at
    }

    pub fn processes(&self) -> &[ProcessLine] {
        &self.processes
    }

    pub fn parent_rss(&self) -> u64 {
        self.parent_rss
    }

    pub fn children_uss(&self) -> u64 {
        self.children_uss
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Role assigned to `pid`, if it was part of the report.
    pub fn role_of(&self, pid: u32) -> Option<Role> {
        self.processes.iter().find(|p| p.pid == pid).map(|p| p.role)
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.processes {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        write!(f, "Total: {} bytes", group_thousands(self.total))
    }
}

/// Formats an integer with `,` between groups of three digits.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pid: u32, role: Role, rss: u64, uss: u64) -> ProcessLine {
        ProcessLine {
            pid,
            role,
            display: "/opt/app/app".into(),
            rss,
            uss,
        }
    }

    // -------------------------------------------------------------------------
    // Tests for group_thousands
    // -------------------------------------------------------------------------

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(123456), "123,456");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(u64::MAX), "18,446,744,073,709,551,615");
    }

    // -------------------------------------------------------------------------
    // Tests for AggregateReport
    // -------------------------------------------------------------------------

    #[test]
    fn test_report_counts_parent_rss_and_child_uss() {
        let report = AggregateReport::new(vec![
            line(100, Role::Parent, 1000, 400),
            line(101, Role::Child, 900, 300),
            line(102, Role::Child, 800, 200),
        ])
        .unwrap();

        assert_eq!(report.parent_rss(), 1000);
        assert_eq!(report.children_uss(), 500);
        assert_eq!(report.total(), 1500);
        assert_eq!(report.role_of(101), Some(Role::Child));
        assert_eq!(report.role_of(999), None);
    }

    #[test]
    fn test_report_multiple_parents_are_summed() {
        let report = AggregateReport::new(vec![
            line(1, Role::Parent, 10, 1),
            line(2, Role::Parent, 20, 2),
        ])
        .unwrap();
        assert_eq!(report.total(), 30);
    }

    #[test]
    fn test_report_empty_is_no_process_match() {
        assert!(matches!(
            AggregateReport::new(vec![]),
            Err(SampleError::NoProcessMatch)
        ));
    }

    #[test]
    fn test_report_children_only_is_no_parent_match() {
        let err = AggregateReport::new(vec![
            line(5, Role::Child, 100, 50),
            line(6, Role::Child, 100, 60),
        ])
        .unwrap_err();
        assert!(matches!(err, SampleError::NoParentMatch { children: 2 }));
    }

    #[test]
    fn test_line_display_marks_counted_metric() {
        let parent = line(100, Role::Parent, 2048, 1024).to_string();
        assert_eq!(parent, "[100] - /opt/app/app\n  * RSS - 2048\n    USS - 1024");

        let child = line(101, Role::Child, 2048, 1024).to_string();
        assert_eq!(child, "[101] - /opt/app/app\n    RSS - 2048\n  * USS - 1024");
    }

    #[test]
    fn test_report_display_ends_with_total() {
        let report = AggregateReport::new(vec![
            line(100, Role::Parent, 1_000_000, 1),
            line(101, Role::Child, 5, 234_567),
        ])
        .unwrap();
        let text = report.to_string();
        assert!(text.starts_with("[100] - "));
        assert!(text.ends_with("\n\nTotal: 1,234,567 bytes"));
    }

    #[test]
    fn test_report_serializes_total() {
        let report = AggregateReport::new(vec![line(1, Role::Parent, 10, 5)]).unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total"], 10);
        assert_eq!(json["processes"][0]["role"], "parent");
    }

    #[test]
    fn test_from_snapshot_verbose_display() {
        let snap = ProcessSnapshot {
            pid: 9,
            exe: "/opt/app/app".into(),
            cmdline: vec!["/opt/app/app".into(), "--parent".into()],
            rss: 1,
            uss: 1,
        };
        assert_eq!(
            ProcessLine::from_snapshot(&snap, Role::Parent, true).display,
            "/opt/app/app --parent"
        );
        assert_eq!(
            ProcessLine::from_snapshot(&snap, Role::Parent, false).display,
            "/opt/app/app"
        );
    }

    #[test]
    fn test_counted_bytes_follows_role() {
        assert_eq!(line(1, Role::Parent, 700, 300).counted_bytes(), 700);
        assert_eq!(line(2, Role::Child, 700, 300).counted_bytes(), 300);
    }

    #[test]
    fn test_snapshot_command_line_joins_args() {
        let snap = ProcessSnapshot {
            pid: 3,
            exe: "/opt/app/app".into(),
            cmdline: vec!["app".into(), "--type=gpu".into(), "--lang=en".into()],
            rss: 0,
            uss: 0,
        };
        assert_eq!(snap.command_line(), "app --type=gpu --lang=en");
    }
}
