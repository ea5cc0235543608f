use crate::error::{CoreError, Result};
use crate::types::EditMode;

// ---------------------------------------------------------------------------
// ModeMachine
// ---------------------------------------------------------------------------

/// Tracks which edit mode is active. Trimming and chapter editing are
/// mutually exclusive and can only be entered from idle; switching modes
/// means cancel-then-enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeMachine {
    current: EditMode,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self {
            current: EditMode::Idle,
        }
    }

    pub fn current(&self) -> EditMode {
        self.current
    }

    pub fn is_idle(&self) -> bool {
        self.current == EditMode::Idle
    }

    /// Enter an edit mode. Only legal from idle.
    pub fn try_enter(&mut self, target: EditMode) -> Result<()> {
        if !self.is_idle() {
            return Err(CoreError::EditInProgress(self.current));
        }
        self.current = target;
        Ok(())
    }

    /// Return to idle, reporting which mode was left.
    pub fn to_idle(&mut self) -> EditMode {
        std::mem::replace(&mut self.current, EditMode::Idle)
    }
}

impl Default for ModeMachine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let machine = ModeMachine::new();
        assert!(machine.is_idle());
        assert_eq!(machine.current(), EditMode::Idle);
    }

    #[test]
    fn enters_edit_modes_from_idle() {
        let mut machine = ModeMachine::new();
        assert!(machine.try_enter(EditMode::Trimming).is_ok());
        assert_eq!(machine.current(), EditMode::Trimming);

        machine.to_idle();
        assert!(machine.try_enter(EditMode::Chapters).is_ok());
        assert_eq!(machine.current(), EditMode::Chapters);
    }

    #[test]
    fn no_direct_switch_between_edit_modes() {
        let mut machine = ModeMachine::new();
        machine.try_enter(EditMode::Trimming).unwrap();

        let err = machine.try_enter(EditMode::Chapters).unwrap_err();
        assert!(matches!(err, CoreError::EditInProgress(EditMode::Trimming)));
        assert_eq!(machine.current(), EditMode::Trimming);
    }

    #[test]
    fn reentering_the_active_mode_is_refused() {
        let mut machine = ModeMachine::new();
        machine.try_enter(EditMode::Chapters).unwrap();
        assert!(machine.try_enter(EditMode::Chapters).is_err());
    }

    #[test]
    fn to_idle_reports_the_mode_left() {
        let mut machine = ModeMachine::new();
        machine.try_enter(EditMode::Trimming).unwrap();
        assert_eq!(machine.to_idle(), EditMode::Trimming);
        assert!(machine.is_idle());
        assert_eq!(machine.to_idle(), EditMode::Idle);
    }
}
