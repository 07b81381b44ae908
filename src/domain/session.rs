//! Per-user session state consumed by the presentation layer.
//!
//! A session is an explicit value: resetting produces a fresh context with
//! a bumped generation instead of mutating counters in place.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::AppError;
use crate::domain::source::IngestReport;
use crate::domain::table::{Table, ValueFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// User-visible message produced while ingesting or filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub time: String,
    pub level: NoticeLevel,
    pub source: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub id: Uuid,
    /// Incremented on every reset; widgets key their state on it
    pub generation: u64,
    report: Option<IngestReport>,
    filter: Option<ValueFilter>,
    filtered: Option<Table>,
    notices: Vec<Notice>,
    max_notices: usize,
}

impl SessionContext {
    pub fn new(max_notices: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            generation: 0,
            report: None,
            filter: None,
            filtered: None,
            notices: Vec::new(),
            max_notices: max_notices.max(1),
        }
    }

    /// Fresh context for the same user; nothing carries over except the
    /// generation counter.
    pub fn reset(&self) -> Self {
        let mut next = Self::new(self.max_notices);
        next.generation = self.generation + 1;
        next.notify(
            NoticeLevel::Info,
            "Session",
            "Analysis reset. Load a new file or enter a URL.",
        );
        next
    }

    /// Install a successful ingestion. Any active filter is dropped.
    pub fn load(&mut self, report: IngestReport) {
        if let Some(warning) = &report.warning {
            self.notify(NoticeLevel::Warn, "Ingestion", &warning.to_string());
        } else {
            self.notify(
                NoticeLevel::Info,
                "Ingestion",
                &format!(
                    "Loaded {} file: {} rows, {} columns",
                    report.kind,
                    report.table.row_count(),
                    report.table.column_count()
                ),
            );
        }
        self.report = Some(report);
        self.clear_filter();
    }

    /// Record a failed ingestion. The loaded table is left as it was.
    pub fn record_failure(&mut self, error: &AppError) {
        self.notify(NoticeLevel::Error, "Ingestion", &error.to_string());
    }

    pub fn report(&self) -> Option<&IngestReport> {
        self.report.as_ref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.report.as_ref().map(|r| &r.table)
    }

    pub fn set_filter(&mut self, filter: ValueFilter, filtered: Table) {
        if filter.is_active() {
            self.filter = Some(filter);
            self.filtered = Some(filtered);
        } else {
            self.clear_filter();
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.filtered = None;
    }

    pub fn filter(&self) -> Option<&ValueFilter> {
        self.filter.as_ref()
    }

    pub fn filter_active(&self) -> bool {
        self.filter.is_some()
    }

    pub fn filtered_table(&self) -> Option<&Table> {
        self.filtered.as_ref()
    }

    /// Table the filtered views should show
    pub fn active_table(&self) -> Option<&Table> {
        self.filtered.as_ref().or_else(|| self.table())
    }

    pub fn notify(&mut self, level: NoticeLevel, source: &str, message: &str) -> Notice {
        let notice = Notice {
            time: Local::now().format("%H:%M:%S").to_string(),
            level,
            source: source.to_string(),
            message: message.to_string(),
        };
        self.notices.push(notice.clone());
        if self.notices.len() > self.max_notices {
            let overflow = self.notices.len() - self.max_notices;
            self.notices.drain(..overflow);
        }
        notice
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source::FileKind;
    use crate::domain::table::{Cell, FilterValue};

    fn sample_report() -> IngestReport {
        let mut table = Table::default();
        table.push_record(vec![("brand".to_string(), Cell::from_raw("Acme"))]);
        table.push_record(vec![("brand".to_string(), Cell::Missing)]);
        IngestReport::new(table, FileKind::Csv)
    }

    #[test]
    fn test_failure_keeps_previous_table() {
        let mut session = SessionContext::default();
        session.load(sample_report());
        session.record_failure(&AppError::UnparsableDelimiter);

        assert_eq!(session.table().map(|t| t.row_count()), Some(2));
        let last = session.notices().last().unwrap();
        assert_eq!(last.level, NoticeLevel::Error);
    }

    #[test]
    fn test_reset_produces_fresh_context() {
        let mut session = SessionContext::default();
        session.load(sample_report());
        let next = session.reset();

        assert_eq!(next.generation, session.generation + 1);
        assert_ne!(next.id, session.id);
        assert!(next.table().is_none());
        assert!(!next.filter_active());
        assert_eq!(next.notices().len(), 1);
    }

    #[test]
    fn test_active_table_follows_filter() {
        let mut session = SessionContext::default();
        session.load(sample_report());
        let filtered = session.table().unwrap().head(1);
        session.set_filter(
            ValueFilter::new("brand", vec![FilterValue::Value("Acme".to_string())]),
            filtered,
        );
        assert_eq!(session.active_table().map(|t| t.row_count()), Some(1));

        session.clear_filter();
        assert_eq!(session.active_table().map(|t| t.row_count()), Some(2));
    }

    #[test]
    fn test_inactive_filter_is_not_stored() {
        let mut session = SessionContext::default();
        session.load(sample_report());
        session.set_filter(ValueFilter::new("brand", Vec::new()), Table::default());
        assert!(!session.filter_active());
    }

    #[test]
    fn test_notices_are_bounded() {
        let mut session = SessionContext::new(3);
        for i in 0..5 {
            session.notify(NoticeLevel::Info, "Test", &i.to_string());
        }
        let messages: Vec<_> = session.notices().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_warning_report_emits_warning_notice() {
        let mut session = SessionContext::default();
        let mut report = IngestReport::new(Table::default(), FileKind::Xml);
        report.warning = Some(AppError::NoRepeatingStructure);
        session.load(report);

        assert_eq!(session.notices()[0].level, NoticeLevel::Warn);
    }
}
