use crate::store::{ConfigurationStore, StoreError, GENERIC_CREATE_ERROR};
use crate::wizard::gate::WizardStep;
use crate::wizard::state::WizardStore;

/// Ticks on the post-submission countdown, one per second.
pub const RESTART_COUNTDOWN_TICKS: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    Editing { error: Option<String> },
    Submitting,
    Submitted { remaining: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected,
    /// A submission was already in flight or already accepted; nothing sent.
    NotStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    CountedDown(u8),
    /// The aggregate was reset and the wizard should land on Basic.
    Restarted(WizardStep),
}

/// Editing → Submitting → Submitted(countdown) → reset. One submission in
/// flight at a time; the countdown and the explicit "start new now" action
/// both consume the Submitted phase, so the reset fires exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFlow {
    phase: SubmitPhase,
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self {
            phase: SubmitPhase::Editing { error: None },
        }
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    pub fn error_banner(&self) -> Option<&str> {
        match &self.phase {
            SubmitPhase::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, SubmitPhase::Submitting)
    }

    /// Sends the literal current aggregate as one create request. Failure
    /// keeps the flow in Editing with the service's message (or the generic
    /// fallback) and leaves every field untouched for retry.
    pub fn submit(
        &mut self,
        wizard: &WizardStore,
        store: &dyn ConfigurationStore,
    ) -> SubmitOutcome {
        if !matches!(self.phase, SubmitPhase::Editing { .. }) {
            return SubmitOutcome::NotStarted;
        }
        self.phase = SubmitPhase::Submitting;
        match store.create(wizard.state()) {
            Ok(_) => {
                self.phase = SubmitPhase::Submitted {
                    remaining: RESTART_COUNTDOWN_TICKS,
                };
                SubmitOutcome::Accepted
            }
            Err(err) => {
                self.phase = SubmitPhase::Editing {
                    error: Some(err.user_message(GENERIC_CREATE_ERROR)),
                };
                SubmitOutcome::Rejected
            }
        }
    }

    /// One-second wake-up while Submitted. At zero the aggregate is replaced
    /// with defaults and the caller returns to Basic.
    pub fn tick(&mut self, wizard: &mut WizardStore) -> TickOutcome {
        match self.phase {
            SubmitPhase::Submitted { remaining } if remaining > 1 => {
                self.phase = SubmitPhase::Submitted {
                    remaining: remaining - 1,
                };
                TickOutcome::CountedDown(remaining - 1)
            }
            SubmitPhase::Submitted { .. } => {
                self.restart(wizard);
                TickOutcome::Restarted(WizardStep::Basic)
            }
            _ => TickOutcome::Idle,
        }
    }

    /// Explicit "start new configuration now": short-circuits the countdown.
    /// A no-op outside the Submitted phase, which is what makes the race with
    /// the timer safe.
    pub fn start_new_now(&mut self, wizard: &mut WizardStore) -> Option<WizardStep> {
        if !matches!(self.phase, SubmitPhase::Submitted { .. }) {
            return None;
        }
        self.restart(wizard);
        Some(WizardStep::Basic)
    }

    fn restart(&mut self, wizard: &mut WizardStore) {
        wizard.reset_form();
        self.phase = SubmitPhase::Editing { error: None };
    }
}

/// Store double for countdown tests and the scripted wizard.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::store::document::{now_rfc3339, PersistedConfiguration};
    use crate::store::ConfigurationId;
    use crate::wizard::state::WizardState;
    use std::cell::RefCell;

    #[derive(Default)]
    pub struct RecordingStore {
        pub created: RefCell<Vec<WizardState>>,
        pub fail_with: RefCell<Option<StoreError>>,
    }

    impl ConfigurationStore for RecordingStore {
        fn create(&self, aggregate: &WizardState) -> Result<PersistedConfiguration, StoreError> {
            if let Some(err) = self.fail_with.borrow_mut().take() {
                return Err(err);
            }
            self.created.borrow_mut().push(aggregate.clone());
            let now = now_rfc3339();
            Ok(PersistedConfiguration {
                id: ConfigurationId::parse("deadbeef").map_err(StoreError::IdGeneration)?,
                basic: aggregate.basic.clone(),
                rag: aggregate.rag.clone(),
                workflows: aggregate.workflows.clone(),
                security: aggregate.security.clone(),
                created_at: now.clone(),
                updated_at: now,
            })
        }

        fn list(&self) -> Result<Vec<PersistedConfiguration>, StoreError> {
            Ok(Vec::new())
        }

        fn get(&self, _id: &str) -> Result<PersistedConfiguration, StoreError> {
            Err(StoreError::NotFound)
        }

        fn update(
            &self,
            _id: &str,
            _partial: &serde_json::Value,
        ) -> Result<PersistedConfiguration, StoreError> {
            Err(StoreError::NotFound)
        }

        fn delete(&self, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingStore;
    use super::*;
    use crate::wizard::state::{BasicUpdate, WizardState};

    fn wizard_with_content() -> WizardStore {
        let mut wizard = WizardStore::new();
        wizard.update_basic(BasicUpdate {
            app_name: Some("App".to_string()),
            description: Some("A description long enough".to_string()),
        });
        wizard
    }

    #[test]
    fn successful_submit_counts_down_then_resets_once() {
        let mut wizard = wizard_with_content();
        let mut flow = SubmissionFlow::new();
        let store = RecordingStore::default();

        assert_eq!(flow.submit(&wizard, &store), SubmitOutcome::Accepted);
        assert_eq!(
            flow.phase(),
            &SubmitPhase::Submitted {
                remaining: RESTART_COUNTDOWN_TICKS
            }
        );

        for expected in [4, 3, 2, 1] {
            assert_eq!(flow.tick(&mut wizard), TickOutcome::CountedDown(expected));
        }
        assert_eq!(
            flow.tick(&mut wizard),
            TickOutcome::Restarted(WizardStep::Basic)
        );
        assert_eq!(wizard.state(), &WizardState::default());

        // Countdown already fired; further ticks and cancels are inert.
        assert_eq!(flow.tick(&mut wizard), TickOutcome::Idle);
        assert_eq!(flow.start_new_now(&mut wizard), None);
    }

    #[test]
    fn start_new_now_short_circuits_the_countdown() {
        let mut wizard = wizard_with_content();
        let mut flow = SubmissionFlow::new();
        let store = RecordingStore::default();

        flow.submit(&wizard, &store);
        assert_eq!(flow.start_new_now(&mut wizard), Some(WizardStep::Basic));
        assert_eq!(wizard.state(), &WizardState::default());
        assert_eq!(flow.phase(), &SubmitPhase::Editing { error: None });
    }

    #[test]
    fn failed_submit_keeps_fields_and_surfaces_the_service_message() {
        let wizard = wizard_with_content();
        let mut flow = SubmissionFlow::new();
        let store = RecordingStore::default();
        *store.fail_with.borrow_mut() = Some(StoreError::Validation {
            message: "Validation failed".to_string(),
            issues: Vec::new(),
        });

        assert_eq!(flow.submit(&wizard, &store), SubmitOutcome::Rejected);
        assert_eq!(flow.error_banner(), Some("Validation failed"));
        assert_eq!(wizard.state().basic.app_name, "App");

        // Fully retryable.
        assert_eq!(flow.submit(&wizard, &store), SubmitOutcome::Accepted);
    }

    #[test]
    fn resubmission_is_blocked_after_acceptance() {
        let wizard = wizard_with_content();
        let mut flow = SubmissionFlow::new();
        let store = RecordingStore::default();

        flow.submit(&wizard, &store);
        assert_eq!(flow.submit(&wizard, &store), SubmitOutcome::NotStarted);
        assert_eq!(store.created.borrow().len(), 1);
    }

    #[test]
    fn submitted_payload_is_the_literal_aggregate() {
        let wizard = wizard_with_content();
        let mut flow = SubmissionFlow::new();
        let store = RecordingStore::default();

        flow.submit(&wizard, &store);
        assert_eq!(store.created.borrow()[0], *wizard.state());
    }
}
