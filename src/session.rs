//! Calculator session state: the angle mode and the memory register.
//!
//! A [`Session`] is what the key handlers of a calculator UI call into. It owns
//! the only mutable state of the calculator and passes the angle mode into
//! every evaluation explicitly; nothing here is global.

use crate::canon::canonicalize;
use crate::engine::evaluate_with_context;
use crate::format::{format_number, format_outcome};
use crate::{AngleMode, EvalContext, EvaluationOutcome, Real, String};
use log::debug;
use serde::{Deserialize, Serialize};

/// The single accumulating memory value (`M+`, `M-`, `MR`, `MC`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemoryRegister {
    value: Real,
}

impl MemoryRegister {
    pub fn new(value: Real) -> Self {
        Self { value }
    }

    pub fn value(&self) -> Real {
        self.value
    }

    pub fn add(&mut self, amount: Real) {
        self.value += amount;
    }

    pub fn subtract(&mut self, amount: Real) {
        self.value -= amount;
    }

    pub fn clear(&mut self) {
        self.value = 0.0;
    }
}

/// One committed calculation, as the history list shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The display text as the user typed it.
    pub expression: String,
    /// The formatted result.
    pub result: String,
}

/// A calculator session.
///
/// ```
/// use sci_calc::{AngleMode, Session};
///
/// let mut session = Session::default();
/// assert_eq!(session.preview("sin(30)×2"), "1");
/// session.toggle_angle_mode();
/// assert_eq!(session.angle_mode(), AngleMode::Radians);
///
/// let entry = session.commit("5!").unwrap();
/// assert_eq!(entry.result, "120");
/// assert!(session.commit("1÷0").is_none());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "SessionState", into = "SessionState")]
pub struct Session {
    angle_mode: AngleMode,
    memory: MemoryRegister,
    context: EvalContext,
}

/// The persisted part of a [`Session`]; the binding environment is rebuilt
/// from the angle mode.
#[derive(Serialize, Deserialize)]
struct SessionState {
    angle_mode: AngleMode,
    memory: MemoryRegister,
}

impl From<SessionState> for Session {
    fn from(state: SessionState) -> Self {
        let mut session = Session::new(state.angle_mode);
        session.memory = state.memory;
        session
    }
}

impl From<Session> for SessionState {
    fn from(session: Session) -> Self {
        Self {
            angle_mode: session.angle_mode,
            memory: session.memory,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AngleMode::default())
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("angle_mode", &self.angle_mode)
            .field("memory", &self.memory)
            .finish()
    }
}

impl Session {
    pub fn new(angle_mode: AngleMode) -> Self {
        Self {
            angle_mode,
            memory: MemoryRegister::default(),
            context: EvalContext::new(angle_mode),
        }
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    pub fn memory(&self) -> &MemoryRegister {
        &self.memory
    }

    /// Flips between degrees and radians and rebinds the trigonometric functions.
    pub fn toggle_angle_mode(&mut self) -> AngleMode {
        self.set_angle_mode(self.angle_mode.toggled());
        self.angle_mode
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        self.angle_mode = mode;
        self.context = EvalContext::new(mode);
    }

    /// Canonicalizes and evaluates display text under the session's angle mode.
    pub fn evaluate(&self, display: &str) -> EvaluationOutcome {
        evaluate_with_context(&canonicalize(display), &self.context)
    }

    /// The live preview for display text: the formatted result, or an empty
    /// string while the text does not evaluate.
    pub fn preview(&self, display: &str) -> String {
        format_outcome(&self.evaluate(display))
    }

    /// The `=` key. Returns the history entry to record, whose `result` becomes
    /// the new display text, or `None` when the text does not evaluate.
    pub fn commit(&self, display: &str) -> Option<HistoryEntry> {
        let value = self.evaluate(display).value()?;
        let entry = HistoryEntry {
            expression: String::from(display),
            result: format_number(value),
        };
        debug!("committed {:?} = {}", entry.expression, entry.result);
        Some(entry)
    }

    /// `M+`: adds the value of the display text. Does nothing when it fails.
    pub fn memory_add(&mut self, display: &str) {
        if let Some(value) = self.evaluate(display).value() {
            self.memory.add(value);
        }
    }

    /// `M-`: subtracts the value of the display text. Does nothing when it fails.
    pub fn memory_subtract(&mut self, display: &str) {
        if let Some(value) = self.evaluate(display).value() {
            self.memory.subtract(value);
        }
    }

    /// `MR`: the memory value formatted for appending to the display.
    pub fn memory_recall(&self) -> String {
        format_number(self.memory.value())
    }

    /// `MC`.
    pub fn memory_clear(&mut self) {
        self.memory.clear();
    }
}
