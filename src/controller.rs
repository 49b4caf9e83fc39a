//! The single mutable store behind the form
//!
//! [`ModeController`] owns the active mode, the selected algorithm of each
//! mode's dropdown and the Hill grid. User actions arrive as [`Event`]s
//! through [`ModeController::dispatch`]; everything derived from that state
//! (help text, which key block is shown, whether a grid exists) is
//! recomputed on each transition, and a submit always validates a fresh
//! snapshot.

use crate::catalog::{AlgorithmId, Mode};
use crate::error::{CipherKeyError, ErrorCategory, ErrorKind, Result};
use crate::hill::{self, DEFAULT_ORDER, HillMatrix};
use crate::reporter::{ErrorReporter, Submission};
use crate::validator::{FormState, KeyMaterial, ValidationResult, validate};
use log::debug;
use std::num::NonZeroUsize;

/// A discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Navigation between the text and file sections.
    SwitchMode(Mode),
    /// A dropdown changed. Each mode has its own dropdown.
    SelectAlgorithm {
        mode: Mode,
        algorithm: Option<AlgorithmId>,
    },
    /// The Hill size selector changed.
    ResizeHill(usize),
    /// A Hill grid cell was edited.
    EditHillCell { row: usize, col: usize, value: String },
}

/// Which key input block is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBlock {
    /// Single key text field plus optional key file.
    Plain,
    /// The Hill matrix grid.
    Hill,
}

/// What the presentation layer should show after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    pub section: Mode,
    pub key_block: KeyBlock,
    pub help_text: &'static str,
}

/// Form fields the controller does not own, read at submit time.
#[derive(Clone, Copy, Default)]
pub struct FormInput<'a> {
    pub key: &'a str,
    pub key_file: Option<&'a str>,
    pub data_file: Option<&'a str>,
}

/// Result of a submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    Proceed(Submission),
    /// The submission must not happen; the violations are on display.
    Cancelled(ValidationResult),
}

#[derive(Debug)]
pub struct ModeController {
    mode: Mode,
    text_algorithm: Option<AlgorithmId>,
    file_algorithm: Option<AlgorithmId>,
    hill_order: NonZeroUsize,
    hill: Option<HillMatrix>,
    help_text: &'static str,
    reporter: ErrorReporter,
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeController {
    /// Starts in text mode with nothing selected.
    pub fn new() -> Self {
        let mut controller = Self {
            mode: Mode::Text,
            text_algorithm: None,
            file_algorithm: None,
            hill_order: DEFAULT_ORDER,
            hill: None,
            help_text: "",
            reporter: ErrorReporter::new(),
        };
        controller.refresh();
        controller
    }

    pub fn dispatch(&mut self, event: Event) -> Result<()> {
        match event {
            Event::SwitchMode(target) => self.switch_mode(target),
            Event::SelectAlgorithm { mode, algorithm } => self.select_algorithm(mode, algorithm),
            Event::ResizeHill(order) => self.resize_hill(order)?,
            Event::EditHillCell { row, col, value } => self.edit_hill_cell(row, col, value)?,
        }
        Ok(())
    }

    pub fn switch_mode(&mut self, target: Mode) {
        debug!("switching mode {} -> {}", self.mode, target);
        self.mode = target;
        self.refresh();
    }

    /// Records a dropdown change. Only a change to the active mode's
    /// dropdown refreshes the derived state.
    pub fn select_algorithm(&mut self, mode: Mode, algorithm: Option<AlgorithmId>) {
        debug!(
            "{} dropdown set to {}",
            mode,
            algorithm.map_or("<none>", AlgorithmId::as_str)
        );
        match mode {
            Mode::Text => self.text_algorithm = algorithm,
            Mode::File => self.file_algorithm = algorithm,
        }
        if mode == self.mode {
            self.refresh();
        }
    }

    /// Changes the grid size. The grid is regenerated only while Hill is
    /// the active algorithm; otherwise the size applies the next time it is.
    pub fn resize_hill(&mut self, order: usize) -> Result<()> {
        self.hill_order = hill::check_order(order)?;
        if self.hill.is_some() {
            self.regenerate_hill();
        }
        Ok(())
    }

    fn edit_hill_cell(&mut self, row: usize, col: usize, value: String) -> Result<()> {
        let Some(matrix) = self.hill.as_mut() else {
            return Err(CipherKeyError::with_kind(
                ErrorCategory::User,
                ErrorKind::ModeUnsupported,
                "no Hill matrix is shown for the current algorithm",
            ));
        };
        if !matrix.set_cell(row, col, value) {
            let order = matrix.order();
            return Err(CipherKeyError::with_kind(
                ErrorCategory::User,
                ErrorKind::RangeError,
                format!("cell ({row}, {col}) is outside the {order}x{order} Hill matrix"),
            ));
        }
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The selection of the active mode's dropdown.
    pub fn active_algorithm(&self) -> Option<AlgorithmId> {
        self.algorithm_for(self.mode)
    }

    pub fn algorithm_for(&self, mode: Mode) -> Option<AlgorithmId> {
        match mode {
            Mode::Text => self.text_algorithm,
            Mode::File => self.file_algorithm,
        }
    }

    pub fn hill(&self) -> Option<&HillMatrix> {
        self.hill.as_ref()
    }

    pub fn hill_order(&self) -> usize {
        self.hill_order.get()
    }

    pub fn help_text(&self) -> &'static str {
        self.help_text
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    pub fn view(&self) -> View {
        View {
            section: self.mode,
            key_block: if self.hill.is_some() {
                KeyBlock::Hill
            } else {
                KeyBlock::Plain
            },
            help_text: self.help_text,
        }
    }

    /// Snapshot of the current form for one validation run.
    pub fn form_state(&self, input: &FormInput<'_>) -> FormState {
        let mut key = KeyMaterial::new(input.key);
        if let Some(name) = input.key_file {
            key = key.with_key_file(name);
        }
        if let Some(matrix) = &self.hill {
            key = key.with_hill(matrix.clone());
        }
        let mut form = FormState::new(self.mode, self.active_algorithm(), key);
        if let Some(name) = input.data_file {
            form = form.with_data_file(name);
        }
        form
    }

    /// Validates the current form and decides whether the submission
    /// goes ahead.
    pub fn submit(&mut self, input: &FormInput<'_>) -> SubmitOutcome {
        let form = self.form_state(input);
        let result = validate(&form);
        if !self.reporter.report(&result) {
            return SubmitOutcome::Cancelled(result);
        }
        match Submission::from_form(&form) {
            Some(submission) => SubmitOutcome::Proceed(submission),
            None => SubmitOutcome::Cancelled(result),
        }
    }

    fn refresh(&mut self) {
        let active = self.active_algorithm();
        self.help_text = active.map_or("", AlgorithmId::help_text);
        if active == Some(AlgorithmId::Hill) {
            self.regenerate_hill();
        } else {
            self.hill = None;
        }
    }

    fn regenerate_hill(&mut self) {
        debug!("regenerating {0}x{0} Hill matrix", self.hill_order);
        self.hill = Some(HillMatrix::blank(self.hill_order));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hill_controller(order: usize) -> ModeController {
        let mut c = ModeController::new();
        c.dispatch(Event::ResizeHill(order)).unwrap();
        c.dispatch(Event::SelectAlgorithm {
            mode: Mode::Text,
            algorithm: Some(AlgorithmId::Hill),
        })
        .unwrap();
        c
    }

    fn fill(c: &mut ModeController, values: &[&str]) {
        let order = c.hill().unwrap().order();
        for (i, v) in values.iter().enumerate() {
            c.dispatch(Event::EditHillCell {
                row: i / order,
                col: i % order,
                value: v.to_string(),
            })
            .unwrap();
        }
    }

    #[test]
    fn test_initial_state() {
        let c = ModeController::new();
        assert_eq!(c.mode(), Mode::Text);
        assert_eq!(c.active_algorithm(), None);
        assert_eq!(c.help_text(), "");
        assert!(c.hill().is_none());
        assert_eq!(c.hill_order(), 2);
        assert_eq!(c.view().key_block, KeyBlock::Plain);
    }

    #[test]
    fn test_select_refreshes_help_and_grid() {
        let mut c = ModeController::new();
        c.select_algorithm(Mode::Text, Some(AlgorithmId::Vigenere));
        assert_eq!(c.help_text(), AlgorithmId::Vigenere.help_text());
        assert!(c.hill().is_none());

        c.select_algorithm(Mode::Text, Some(AlgorithmId::Hill));
        assert_eq!(c.view().key_block, KeyBlock::Hill);
        assert_eq!(c.hill().unwrap().order(), 2);

        c.select_algorithm(Mode::Text, Some(AlgorithmId::Shift));
        assert!(c.hill().is_none());
    }

    #[test]
    fn test_dropdowns_are_per_mode() {
        let mut c = ModeController::new();
        c.select_algorithm(Mode::Text, Some(AlgorithmId::Hill));
        c.select_algorithm(Mode::File, Some(AlgorithmId::Affine));
        // Changing the hidden dropdown leaves the visible state alone.
        assert_eq!(c.active_algorithm(), Some(AlgorithmId::Hill));
        assert!(c.hill().is_some());

        c.switch_mode(Mode::File);
        assert_eq!(c.active_algorithm(), Some(AlgorithmId::Affine));
        assert!(c.hill().is_none());
        assert_eq!(c.view().section, Mode::File);
        assert!(c.help_text().contains("256"));

        c.switch_mode(Mode::Text);
        assert_eq!(c.active_algorithm(), Some(AlgorithmId::Hill));
        assert!(c.hill().is_some());
    }

    #[test]
    fn test_resize_replaces_grid() {
        let mut c = hill_controller(2);
        fill(&mut c, &["1", "2", "3", "5"]);
        c.dispatch(Event::ResizeHill(3)).unwrap();
        let m = c.hill().unwrap();
        assert_eq!(m.order(), 3);
        assert!(m.filled_values().is_empty());
    }

    #[test]
    fn test_resize_while_inactive_is_deferred() {
        let mut c = ModeController::new();
        c.resize_hill(3).unwrap();
        assert!(c.hill().is_none());
        c.select_algorithm(Mode::Text, Some(AlgorithmId::Hill));
        assert_eq!(c.hill().unwrap().order(), 3);
    }

    #[test]
    fn test_resize_zero_rejected() {
        let mut c = hill_controller(2);
        let err = c.dispatch(Event::ResizeHill(0)).expect_err("size 0");
        assert_eq!(err.kind, Some(ErrorKind::FormatError));
        assert_eq!(c.hill().unwrap().order(), 2);
    }

    #[test]
    fn test_resize_above_limit_rejected() {
        let mut c = hill_controller(2);
        for order in [hill::MAX_ORDER + 1, 1usize << 32] {
            let err = c.dispatch(Event::ResizeHill(order)).expect_err("oversized grid");
            assert_eq!(err.kind, Some(ErrorKind::FormatError));
        }
        assert_eq!(c.hill_order(), 2);
        assert_eq!(c.hill().unwrap().order(), 2);

        c.dispatch(Event::ResizeHill(hill::MAX_ORDER)).unwrap();
        assert_eq!(c.hill().unwrap().cells().len(), hill::MAX_ORDER * hill::MAX_ORDER);
    }

    #[test]
    fn test_edit_cell_errors() {
        let mut c = ModeController::new();
        let err = c
            .dispatch(Event::EditHillCell {
                row: 0,
                col: 0,
                value: "1".into(),
            })
            .expect_err("no grid without hill");
        assert_eq!(err.kind, Some(ErrorKind::ModeUnsupported));

        let mut c = hill_controller(2);
        let err = c
            .dispatch(Event::EditHillCell {
                row: 2,
                col: 0,
                value: "1".into(),
            })
            .expect_err("row 2 is outside 2x2");
        assert_eq!(err.kind, Some(ErrorKind::RangeError));
    }

    #[test]
    fn test_switch_mode_is_idempotent() {
        let mut c = hill_controller(3);
        fill(&mut c, &["1"]);
        c.switch_mode(Mode::Text);
        let m1 = c.hill().cloned();
        c.switch_mode(Mode::Text);
        let m2 = c.hill().cloned();
        assert_eq!(m1, m2);
        assert_eq!(m1, Some(HillMatrix::generate(3).unwrap()));

        for start in [Mode::Text, Mode::File] {
            let mut c = hill_controller(2);
            c.switch_mode(start);
            c.switch_mode(Mode::File);
            let once = (c.view(), c.hill().cloned());
            c.switch_mode(Mode::File);
            assert_eq!((c.view(), c.hill().cloned()), once);
            assert!(c.hill().is_none());
        }
    }

    #[test]
    fn test_submit_valid_hill() {
        let mut c = hill_controller(2);
        fill(&mut c, &["1", "2", "3", "5"]);
        match c.submit(&FormInput::default()) {
            SubmitOutcome::Proceed(s) => {
                assert_eq!(s.algorithm, AlgorithmId::Hill);
                assert_eq!(s.hill_entries, vec!["1", "2", "3", "5"]);
            }
            SubmitOutcome::Cancelled(r) => panic!("unexpected violations: {:?}", r),
        }
        assert!(!c.reporter().is_visible());
    }

    #[test]
    fn test_submit_singular_hill_cancelled() {
        let mut c = hill_controller(2);
        fill(&mut c, &["2", "4", "6", "8"]);
        match c.submit(&FormInput::default()) {
            SubmitOutcome::Cancelled(r) => assert_eq!(r.kinds(), vec![ErrorKind::RangeError]),
            SubmitOutcome::Proceed(_) => panic!("singular matrix must be rejected"),
        }
        assert!(c.reporter().is_visible());
    }

    #[test]
    fn test_submit_reads_fresh_state() {
        let mut c = ModeController::new();
        c.select_algorithm(Mode::Text, Some(AlgorithmId::Shift));
        let bad = FormInput {
            key: "three",
            ..Default::default()
        };
        assert!(matches!(c.submit(&bad), SubmitOutcome::Cancelled(_)));

        let good = FormInput {
            key: "3",
            ..Default::default()
        };
        assert!(matches!(c.submit(&good), SubmitOutcome::Proceed(_)));
        assert!(c.reporter().displayed().is_empty());
    }

    #[test]
    fn test_submit_file_mode() {
        let mut c = ModeController::new();
        c.switch_mode(Mode::File);
        c.select_algorithm(Mode::File, Some(AlgorithmId::Shift));
        let input = FormInput {
            key: "",
            key_file: Some("key.bin"),
            data_file: Some("photo.png"),
        };
        match c.submit(&input) {
            SubmitOutcome::Proceed(s) => {
                assert_eq!(s.mode, Mode::File);
                assert_eq!(s.key_file.as_deref(), Some("key.bin"));
                assert_eq!(s.data_file.as_deref(), Some("photo.png"));
                assert!(s.hill_entries.is_empty());
            }
            SubmitOutcome::Cancelled(r) => panic!("unexpected violations: {:?}", r),
        }
    }
}
