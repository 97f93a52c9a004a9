use crate::wizard::state::WizardStore;
use std::time::Duration;

/// How long the "redirecting" notice stays on screen before the blocked
/// navigation is replaced with the unmet prerequisite step.
pub const REDIRECT_NOTICE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Basic,
    Rag,
    Workflows,
    Security,
    Overview,
}

pub const ALL_WIZARD_STEPS: [WizardStep; 5] = [
    WizardStep::Basic,
    WizardStep::Rag,
    WizardStep::Workflows,
    WizardStep::Security,
    WizardStep::Overview,
];

impl WizardStep {
    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Basic => "Basic Configuration",
            WizardStep::Rag => "RAG Configuration",
            WizardStep::Workflows => "Workflows",
            WizardStep::Security => "Security",
            WizardStep::Overview => "Overview",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            WizardStep::Basic => "basic",
            WizardStep::Rag => "rag",
            WizardStep::Workflows => "workflows",
            WizardStep::Security => "security",
            WizardStep::Overview => "overview",
        }
    }

    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Basic => Some(WizardStep::Rag),
            WizardStep::Rag => Some(WizardStep::Workflows),
            WizardStep::Workflows => Some(WizardStep::Security),
            WizardStep::Security => Some(WizardStep::Overview),
            WizardStep::Overview => None,
        }
    }

    pub fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::Basic => None,
            WizardStep::Rag => Some(WizardStep::Basic),
            WizardStep::Workflows => Some(WizardStep::Rag),
            WizardStep::Security => Some(WizardStep::Workflows),
            WizardStep::Overview => Some(WizardStep::Security),
        }
    }
}

/// Recomputed from the live store on every navigation attempt; a previously
/// reachable step becomes unreachable again as soon as an earlier step's
/// fields regress.
pub fn step_is_enterable(store: &WizardStore, step: WizardStep) -> bool {
    let can_access_rag = store.is_basic_step_valid();
    let can_access_workflows = can_access_rag && store.is_rag_step_valid();
    let can_access_security = can_access_workflows && store.is_workflows_step_valid();
    let can_access_overview = can_access_security && store.is_security_step_valid();
    match step {
        WizardStep::Basic => true,
        WizardStep::Rag => can_access_rag,
        WizardStep::Workflows => can_access_workflows,
        WizardStep::Security => can_access_security,
        WizardStep::Overview => can_access_overview,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectNotice {
    pub target: WizardStep,
    pub message: String,
}

/// Resolves a blocked navigation to the nearest unmet prerequisite step and
/// the notice text shown while the redirect delay runs. `None` means the
/// target is enterable.
pub fn redirect_for(store: &WizardStore, target: WizardStep) -> Option<RedirectNotice> {
    if step_is_enterable(store, target) {
        return None;
    }
    let mut unmet = WizardStep::Basic;
    for step in ALL_WIZARD_STEPS {
        if step == target {
            break;
        }
        if !step_is_enterable(store, step)
            || !step_gate_passes(store, step)
        {
            unmet = step;
            break;
        }
        unmet = step;
    }
    Some(RedirectNotice {
        target: unmet,
        message: format!("Please complete the {} step first.", unmet.title()),
    })
}

fn step_gate_passes(store: &WizardStore, step: WizardStep) -> bool {
    match step {
        WizardStep::Basic => store.is_basic_step_valid(),
        WizardStep::Rag => store.is_rag_step_valid(),
        WizardStep::Workflows => store.is_workflows_step_valid(),
        WizardStep::Security => store.is_security_step_valid(),
        WizardStep::Overview => true,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub step: WizardStep,
    pub title: &'static str,
    pub locked: bool,
    pub active: bool,
}

/// Sidebar projection: unreachable steps render locked, backward navigation
/// stays available because earlier steps are always reachable by the chain
/// predicate.
pub fn nav_items(store: &WizardStore, current: WizardStep) -> Vec<NavItem> {
    ALL_WIZARD_STEPS
        .iter()
        .map(|step| NavItem {
            step: *step,
            title: step.title(),
            locked: !step_is_enterable(store, *step),
            active: *step == current,
        })
        .collect()
}
