//! Newsletter scan and selection workflow.
//!
//! The candidate list is built by a scan, edited locally, and only sent to
//! the backend on an explicit save. Requests themselves are issued by the
//! caller: this type decides *whether* a request may go out and applies its
//! result.

use crate::types::Candidate;
use tracing::{debug, info, warn};

pub const SCAN_FAILED_MESSAGE: &str = "An error occurred while scanning.";
pub const SAVE_FAILED_MESSAGE: &str = "An error occurred while saving.";
pub const SAVE_OK_MESSAGE: &str = "Your selections have been saved successfully ✅";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Scanning,
    Scanned,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Saved { count: usize },
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct NewsletterSelection {
    candidates: Vec<Candidate>,
    scan: ScanState,
    save: SaveState,
}

impl NewsletterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn scan_state(&self) -> &ScanState {
        &self.scan
    }

    pub fn save_state(&self) -> &SaveState {
        &self.save
    }

    pub fn is_scanning(&self) -> bool {
        self.scan == ScanState::Scanning
    }

    pub fn is_saving(&self) -> bool {
        self.save == SaveState::Saving
    }

    /// Returns false while a scan is already outstanding.
    pub fn begin_scan(&mut self) -> bool {
        if self.is_scanning() {
            debug!("Scan already in progress");
            return false;
        }
        self.scan = ScanState::Scanning;
        // An outstanding save keeps its state until its response arrives.
        if !self.is_saving() {
            self.save = SaveState::Idle;
        }
        true
    }

    /// A successful scan replaces the whole list, manual entries included.
    pub fn finish_scan(&mut self, result: Result<Vec<Candidate>, String>) {
        match result {
            Ok(candidates) => {
                let dropped = self.candidates.iter().filter(|c| c.manual).count();
                if dropped > 0 {
                    warn!("Rescan discarded {} manual candidate(s)", dropped);
                }
                info!("Scan found {} candidate(s)", candidates.len());
                self.candidates = candidates;
                self.scan = ScanState::Scanned;
            }
            Err(reason) => {
                warn!("Scan failed: {}", reason);
                self.scan = ScanState::Failed(SCAN_FAILED_MESSAGE.to_string());
            }
        }
    }

    pub fn toggle(&mut self, key: &str) -> bool {
        match self.candidates.iter_mut().find(|c| c.key() == key) {
            Some(candidate) => {
                candidate.selected = !candidate.selected;
                true
            }
            None => false,
        }
    }

    /// Adds a hand-entered newsletter. Empty fields and senders already in
    /// the list (ignoring case) are rejected.
    pub fn add_manual(&mut self, name: &str, sender: &str) -> bool {
        let name = name.trim();
        let sender = sender.trim();
        if name.is_empty() || sender.is_empty() {
            return false;
        }
        let sender_lower = sender.to_lowercase();
        if self
            .candidates
            .iter()
            .any(|c| c.sender.to_lowercase() == sender_lower)
        {
            debug!("Manual sender {} already listed", sender);
            return false;
        }
        self.candidates.push(Candidate::manual(name, sender));
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|c| c.key() != key);
        self.candidates.len() != before
    }

    pub fn select_all(&mut self) {
        self.candidates.iter_mut().for_each(|c| c.selected = true);
    }

    pub fn deselect_all(&mut self) {
        self.candidates.iter_mut().for_each(|c| c.selected = false);
    }

    pub fn selected_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.selected).count()
    }

    pub fn total(&self) -> usize {
        self.candidates.len()
    }

    /// Share of candidates selected, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.candidates.is_empty() {
            0.0
        } else {
            self.selected_count() as f32 / self.total() as f32
        }
    }

    pub fn selection_label(&self) -> String {
        match self.selected_count() {
            0 => "No newsletters selected".to_string(),
            1 => "1 newsletter selected for AI summaries".to_string(),
            n => format!("{n} newsletters selected for AI summaries"),
        }
    }

    pub fn can_save(&self) -> bool {
        !self.is_saving() && self.selected_count() > 0
    }

    /// Candidates to submit, or `None` when no request should be sent.
    pub fn begin_save(&mut self) -> Option<Vec<Candidate>> {
        if !self.can_save() {
            debug!(
                "Save refused: saving={} selected={}",
                self.is_saving(),
                self.selected_count()
            );
            return None;
        }
        self.save = SaveState::Saving;
        Some(
            self.candidates
                .iter()
                .filter(|c| c.selected)
                .cloned()
                .collect(),
        )
    }

    /// Nothing was changed optimistically, so a failure only sets a message.
    pub fn finish_save(&mut self, result: Result<usize, String>) {
        self.save = match result {
            Ok(count) => {
                info!("Saved {} newsletter selection(s)", count);
                SaveState::Saved { count }
            }
            Err(reason) => {
                warn!("Saving selection failed: {}", reason);
                SaveState::Failed(SAVE_FAILED_MESSAGE.to_string())
            }
        };
    }

    /// Latest user-facing status line, if any.
    pub fn message(&self) -> Option<&str> {
        match (&self.save, &self.scan) {
            (SaveState::Saved { .. }, _) => Some(SAVE_OK_MESSAGE),
            (SaveState::Failed(message), _) => Some(message.as_str()),
            (_, ScanState::Failed(message)) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Display name guessed from a sender address: `hello@tech-weekly.com`
/// becomes `Tech Weekly`.
pub fn suggested_name(sender: &str) -> String {
    let label = sender
        .trim()
        .split_once('@')
        .and_then(|(_, domain)| domain.split('.').next())
        .unwrap_or("");
    let words: Vec<String> = label
        .split(|c: char| c == '.' || c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        "Newsletter".to_string()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned(senders: &[&str]) -> NewsletterSelection {
        let mut selection = NewsletterSelection::new();
        assert!(selection.begin_scan());
        selection.finish_scan(Ok(senders
            .iter()
            .map(|s| Candidate {
                id: None,
                name: format!("{s} news"),
                sender: s.to_string(),
                count_30d: 4,
                selected: true,
                manual: false,
            })
            .collect()));
        selection
    }

    #[test]
    fn test_scan_transitions() {
        let mut selection = NewsletterSelection::new();
        assert_eq!(selection.scan_state(), &ScanState::Idle);
        assert!(selection.begin_scan());
        assert!(!selection.begin_scan());
        selection.finish_scan(Err("500".into()));
        assert_eq!(
            selection.scan_state(),
            &ScanState::Failed(SCAN_FAILED_MESSAGE.into())
        );
        assert_eq!(selection.message(), Some(SCAN_FAILED_MESSAGE));
    }

    #[test]
    fn test_rescan_replaces_manual_entries() {
        let mut selection = scanned(&["a@x.com"]);
        assert!(selection.add_manual("Mine", "me@y.com"));
        assert_eq!(selection.total(), 2);

        selection.begin_scan();
        selection.finish_scan(Ok(vec![]));
        assert_eq!(selection.total(), 0);
    }

    #[test]
    fn test_scan_does_not_release_pending_save() {
        let mut selection = NewsletterSelection::new();
        assert!(selection.add_manual("Mine", "me@y.com"));
        assert!(selection.begin_save().is_some());

        assert!(selection.begin_scan());
        assert!(selection.is_saving());
        assert!(!selection.can_save());
        assert_eq!(selection.begin_save(), None);

        selection.finish_save(Ok(1));
        assert_eq!(selection.save_state(), &SaveState::Saved { count: 1 });
    }

    #[test]
    fn test_failed_scan_keeps_list() {
        let mut selection = scanned(&["a@x.com", "b@x.com"]);
        selection.begin_scan();
        selection.finish_scan(Err("timeout".into()));
        assert_eq!(selection.total(), 2);
    }

    #[test]
    fn test_toggle_flips_one_candidate() {
        let mut selection = scanned(&["a@x.com", "b@x.com"]);
        assert!(selection.toggle("b@x.com"));
        assert_eq!(selection.selected_count(), 1);
        assert!(selection.candidates()[0].selected);
        assert!(!selection.toggle("missing@x.com"));
    }

    #[test]
    fn test_toggle_prefers_id_key() {
        let mut selection = NewsletterSelection::new();
        selection.begin_scan();
        selection.finish_scan(Ok(vec![Candidate {
            id: Some("c1".into()),
            name: "A".into(),
            sender: "a@x.com".into(),
            count_30d: 1,
            selected: true,
            manual: false,
        }]));
        assert!(!selection.toggle("a@x.com"));
        assert!(selection.toggle("c1"));
        assert_eq!(selection.selected_count(), 0);
    }

    #[test]
    fn test_add_manual_dedups_case_insensitively() {
        let mut selection = NewsletterSelection::new();
        assert!(selection.add_manual("Tech Weekly", "hello@tech.com"));
        assert!(!selection.add_manual("Other", "HELLO@tech.com"));
        let matching: Vec<&Candidate> = selection
            .candidates()
            .iter()
            .filter(|c| c.sender.eq_ignore_ascii_case("hello@tech.com"))
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].sender, "hello@tech.com");
        assert!(matching[0].manual);
        assert!(matching[0].selected);
    }

    #[test]
    fn test_add_manual_rejects_blank_fields() {
        let mut selection = NewsletterSelection::new();
        assert!(!selection.add_manual("", "a@b.com"));
        assert!(!selection.add_manual("Name", "   "));
        assert_eq!(selection.total(), 0);
    }

    #[test]
    fn test_remove_and_bulk_selection() {
        let mut selection = scanned(&["a@x.com", "b@x.com", "c@x.com"]);
        assert!(selection.remove("b@x.com"));
        assert!(!selection.remove("b@x.com"));
        selection.deselect_all();
        assert_eq!(selection.selected_count(), 0);
        assert_eq!(selection.progress(), 0.0);
        selection.select_all();
        assert_eq!(selection.selected_count(), 2);
        assert_eq!(selection.progress(), 1.0);
        assert_eq!(
            selection.selection_label(),
            "2 newsletters selected for AI summaries"
        );
    }

    #[test]
    fn test_save_with_nothing_selected_sends_nothing() {
        let mut selection = scanned(&["a@x.com"]);
        selection.deselect_all();
        assert!(!selection.can_save());
        assert_eq!(selection.begin_save(), None);
        assert_eq!(selection.save_state(), &SaveState::Idle);
    }

    #[test]
    fn test_save_submits_selected_only() {
        let mut selection = scanned(&["a@x.com", "b@x.com"]);
        selection.toggle("a@x.com");
        let payload = selection.begin_save().expect("one candidate selected");
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].sender, "b@x.com");
        assert!(selection.is_saving());
        assert_eq!(selection.begin_save(), None);

        selection.finish_save(Ok(1));
        assert_eq!(selection.save_state(), &SaveState::Saved { count: 1 });
        assert_eq!(selection.message(), Some(SAVE_OK_MESSAGE));
    }

    #[test]
    fn test_failed_save_leaves_candidates() {
        let mut selection = scanned(&["a@x.com", "b@x.com"]);
        let before = selection.candidates().to_vec();
        selection.begin_save();
        selection.finish_save(Err("500 Internal Server Error".into()));
        assert_eq!(selection.candidates(), &before[..]);
        assert_eq!(selection.message(), Some(SAVE_FAILED_MESSAGE));
    }

    #[test]
    fn test_suggested_name() {
        assert_eq!(suggested_name("hello@tech-weekly.com"), "Tech Weekly");
        assert_eq!(suggested_name("news@the_daily.io"), "The Daily");
        assert_eq!(suggested_name("not-an-email"), "Newsletter");
    }
}
