//! Navigation state machine.
//!
//! The navigator owns the session; capture borrows one item at a time through
//! [`Navigator::current_item_mut`]. `Terminated` is absorbing.

use super::{NavError, Session};
use crate::capture::Progress;
use crate::core::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Quit confirmed by the user.
    Quit,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Capturing the item at the session cursor.
    Active,
    Summary,
    ConfirmQuit,
    Terminated(Termination),
}

/// Transient command produced by input capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Quit,
    ShowSummary,
    /// 1-based target.
    Jump(usize),
    Previous,
    /// Also produced by a confirmed answer.
    Next,
    Interrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Command(NavCommand),
    /// A key on the summary view that is not `q`.
    Dismiss,
    /// Response to the quit confirmation.
    QuitAnswer(bool),
}

impl From<NavCommand> for NavEvent {
    fn from(command: NavCommand) -> Self {
        NavEvent::Command(command)
    }
}

#[derive(Debug)]
pub struct Navigator {
    session: Session,
    state: NavState,
}

impl Navigator {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            state: NavState::Active,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn progress(&self) -> Progress {
        Progress {
            position: self.session.current_index() + 1,
            total: self.session.len(),
        }
    }

    pub fn current_item_mut(&mut self) -> &mut Item {
        self.session.current_item_mut()
    }

    /// Applies one event. A rejected jump leaves cursor and state untouched.
    pub fn apply(&mut self, event: impl Into<NavEvent>) -> Result<NavState, NavError> {
        let event = event.into();
        let before = (self.state, self.session.current_index());
        let next = self.transition(event)?;
        self.state = next;
        tracing::debug!(
            ?event,
            from = ?before.0,
            from_index = before.1,
            to = ?next,
            to_index = self.session.current_index(),
            "navigation"
        );
        Ok(next)
    }

    fn transition(&mut self, event: NavEvent) -> Result<NavState, NavError> {
        use NavCommand as C;

        if let NavState::Terminated(_) = self.state {
            return Ok(self.state);
        }
        if event == NavEvent::Command(C::Interrupt) {
            return Ok(NavState::Terminated(Termination::Interrupted));
        }

        let last = self.session.len() - 1;
        let index = self.session.current_index();
        let next = match (self.state, event) {
            (NavState::Active, NavEvent::Command(command)) => match command {
                C::Previous => {
                    self.session.set_current(index.saturating_sub(1));
                    NavState::Active
                }
                C::Next if index < last => {
                    self.session.set_current(index + 1);
                    NavState::Active
                }
                C::Next => NavState::Summary,
                C::Jump(target) => {
                    let total = self.session.len();
                    if target == 0 || target > total {
                        tracing::info!(target, total, "jump rejected");
                        return Err(NavError::JumpOutOfRange { target, total });
                    }
                    self.session.set_current(target - 1);
                    NavState::Active
                }
                C::ShowSummary => NavState::Summary,
                C::Quit => NavState::ConfirmQuit,
                C::Interrupt => NavState::Terminated(Termination::Interrupted),
            },
            (NavState::Active, _) => NavState::Active,

            (NavState::Summary, NavEvent::Command(C::Quit)) => NavState::ConfirmQuit,
            (NavState::Summary, _) => NavState::Active,

            (NavState::ConfirmQuit, NavEvent::QuitAnswer(true)) => {
                NavState::Terminated(Termination::Quit)
            }
            (NavState::ConfirmQuit, _) => NavState::Active,

            (NavState::Terminated(termination), _) => NavState::Terminated(termination),
        };
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::{NavCommand, NavEvent, NavState, Navigator, Termination};
    use crate::core::item::{Item, ItemKind};
    use crate::session::{NavError, Session};

    fn navigator(count: usize) -> Navigator {
        let items = (0..count)
            .map(|index| {
                Item::new(ItemKind::YesNoOther, format!("Question {index}"), Vec::new()).unwrap()
            })
            .collect();
        Navigator::new(Session::new(items).unwrap())
    }

    #[test]
    fn previous_at_first_item_stays_put() {
        let mut nav = navigator(3);
        assert_eq!(nav.apply(NavCommand::Previous), Ok(NavState::Active));
        assert_eq!(nav.session().current_index(), 0);
    }

    #[test]
    fn next_from_last_item_opens_summary() {
        let mut nav = navigator(2);
        nav.apply(NavCommand::Next).unwrap();
        assert_eq!(nav.session().current_index(), 1);
        assert_eq!(nav.apply(NavCommand::Next), Ok(NavState::Summary));
        assert_eq!(nav.session().current_index(), 1);

        assert_eq!(nav.apply(NavEvent::Dismiss), Ok(NavState::Active));
        assert_eq!(nav.session().current_index(), 1);
    }

    #[test]
    fn jump_validates_target() {
        let mut nav = navigator(3);
        nav.apply(NavCommand::Next).unwrap();

        assert_eq!(
            nav.apply(NavCommand::Jump(5)),
            Err(NavError::JumpOutOfRange {
                target: 5,
                total: 3
            })
        );
        assert_eq!(
            nav.apply(NavCommand::Jump(0)),
            Err(NavError::JumpOutOfRange {
                target: 0,
                total: 3
            })
        );
        assert_eq!(nav.state(), NavState::Active);
        assert_eq!(nav.session().current_index(), 1);

        assert_eq!(nav.apply(NavCommand::Jump(3)), Ok(NavState::Active));
        assert_eq!(nav.session().current_index(), 2);
        assert_eq!(nav.progress().position, 3);
    }

    #[test]
    fn quit_needs_confirmation() {
        let mut nav = navigator(3);
        assert_eq!(nav.apply(NavCommand::Quit), Ok(NavState::ConfirmQuit));
        assert_eq!(nav.apply(NavEvent::QuitAnswer(false)), Ok(NavState::Active));

        nav.apply(NavCommand::ShowSummary).unwrap();
        assert_eq!(nav.apply(NavCommand::Quit), Ok(NavState::ConfirmQuit));
        assert_eq!(
            nav.apply(NavEvent::QuitAnswer(true)),
            Ok(NavState::Terminated(Termination::Quit))
        );
    }

    #[test]
    fn interrupt_terminates_from_every_state() {
        for setup in [
            Vec::new(),
            vec![NavEvent::Command(NavCommand::ShowSummary)],
            vec![NavEvent::Command(NavCommand::Quit)],
        ] {
            let mut nav = navigator(2);
            for event in setup {
                nav.apply(event).unwrap();
            }
            assert_eq!(
                nav.apply(NavCommand::Interrupt),
                Ok(NavState::Terminated(Termination::Interrupted))
            );
            assert_eq!(
                nav.apply(NavEvent::Dismiss),
                Ok(NavState::Terminated(Termination::Interrupted))
            );
        }
    }
}
