//! Hill cipher key matrix as entered in the form
//!
//! The matrix holds the raw text of each cell, exactly as typed. Parsing
//! and the invertibility check happen in the validator; this module only
//! owns the grid shape and how it is presented.

use crate::error::{CipherKeyError, ErrorCategory, ErrorKind, Result};
use std::num::NonZeroUsize;

/// Order used when no explicit size has been chosen.
pub const DEFAULT_ORDER: NonZeroUsize = NonZeroUsize::new(2).unwrap();

/// Largest grid offered for entry.
pub const MAX_ORDER: usize = 10;

/// Form field name shared by every matrix cell.
pub const CELL_FIELD_NAME: &str = "hill_key[]";

/// Inclusive bounds of a single key entry (letters A..Z).
pub const ENTRY_MIN: i32 = 0;
pub const ENTRY_MAX: i32 = 25;

/// An `order` x `order` grid of raw cell values, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HillMatrix {
    order: usize,
    cells: Vec<String>,
}

impl HillMatrix {
    /// Creates a blank grid. Any previous grid is meant to be replaced
    /// wholesale by the result; values never carry over across sizes.
    pub fn generate(order: usize) -> Result<Self> {
        Ok(Self::blank(check_order(order)?))
    }

    /// Creates a blank grid of an order already accepted by
    /// [`check_order`]. Larger orders are capped at [`MAX_ORDER`].
    pub fn blank(order: NonZeroUsize) -> Self {
        let order = order.get().min(MAX_ORDER);
        Self {
            order,
            cells: vec![String::new(); order * order],
        }
    }

    /// Builds a grid from flat row-major cell values.
    ///
    /// The number of cells must be `order * order`; nothing is guessed.
    pub fn from_cells(order: usize, cells: Vec<String>) -> Result<Self> {
        let mut matrix = Self::generate(order)?;
        if cells.len() != matrix.cells.len() {
            return Err(CipherKeyError::with_kind(
                ErrorCategory::User,
                ErrorKind::FormatError,
                format!(
                    "a {order}x{order} Hill matrix has {} cells, got {}",
                    matrix.cells.len(),
                    cells.len()
                ),
            ));
        }
        matrix.cells = cells;
        Ok(matrix)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.index(row, col).map(|i| self.cells[i].as_str())
    }

    /// Replaces the raw value of one cell. Returns false when the
    /// coordinates fall outside the grid.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> bool {
        match self.index(row, col) {
            Some(i) => {
                self.cells[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// Trimmed, non-blank cell values in row-major order.
    pub fn filled_values(&self) -> Vec<&str> {
        self.cells
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// One field descriptor per cell, row-major.
    pub fn render(&self) -> Vec<FieldDescriptor> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, value)| FieldDescriptor {
                name: CELL_FIELD_NAME,
                row: i / self.order,
                col: i % self.order,
                min: ENTRY_MIN,
                max: ENTRY_MAX,
                placeholder: "0–25",
                value: value.clone(),
            })
            .collect()
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.order && col < self.order).then(|| row * self.order + col)
    }
}

/// Accepts a grid order between 1 and [`MAX_ORDER`].
pub fn check_order(order: usize) -> Result<NonZeroUsize> {
    match NonZeroUsize::new(order) {
        Some(order) if order.get() <= MAX_ORDER => Ok(order),
        _ => Err(CipherKeyError::with_kind(
            ErrorCategory::User,
            ErrorKind::FormatError,
            format!("Hill matrix size must be between 1 and {MAX_ORDER}, got {order}"),
        )),
    }
}

impl Default for HillMatrix {
    fn default() -> Self {
        Self::blank(DEFAULT_ORDER)
    }
}

/// What the presentation layer needs to draw a single numeric input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub row: usize,
    pub col: usize,
    pub min: i32,
    pub max: i32,
    pub placeholder: &'static str,
    pub value: String,
}
