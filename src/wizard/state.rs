use serde::{Deserialize, Serialize};

/// First wizard step: application identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicConfig {
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub description: String,
}

/// One saved snapshot of the RAG step fields. The serialized key for the
/// knowledge-base name is `kbName`, not `knowledgeBaseName`; saved entries
/// and the live form field deliberately use different spellings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagEntry {
    #[serde(default)]
    pub kb_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub chunking: String,
    #[serde(default)]
    pub embeddings: String,
    #[serde(default)]
    pub metrics: String,
    #[serde(default)]
    pub vector_db: String,
}

/// Second wizard step: retrieval pipeline metadata. Enum-backed fields keep
/// their raw string value here so partially-filled drafts stay representable;
/// `wizard::rules` owns the membership checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagConfig {
    #[serde(default)]
    pub knowledge_base_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub embeddings: String,
    #[serde(default)]
    pub metrics: String,
    #[serde(default)]
    pub chunking: String,
    #[serde(default)]
    pub vector_db: String,
    #[serde(default)]
    pub configurations: Vec<RagEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowsConfig {
    #[serde(default)]
    pub selected_workflows: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    #[serde(default)]
    pub enable_encryption: bool,
    #[serde(default)]
    pub enable_audit: bool,
    #[serde(default, rename = "enableRBAC")]
    pub enable_rbac: bool,
}

/// The aggregate root for one wizard session. All four sections are always
/// present; fields hold empty/default values until their step is filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    #[serde(default)]
    pub basic: BasicConfig,
    #[serde(default)]
    pub rag: RagConfig,
    #[serde(default)]
    pub workflows: WorkflowsConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Default)]
pub struct BasicUpdate {
    pub app_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RagUpdate {
    pub knowledge_base_name: Option<String>,
    pub description: Option<String>,
    pub pattern: Option<String>,
    pub embeddings: Option<String>,
    pub metrics: Option<String>,
    pub chunking: Option<String>,
    pub vector_db: Option<String>,
    pub configurations: Option<Vec<RagEntry>>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowsUpdate {
    pub selected_workflows: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityUpdate {
    pub enable_encryption: Option<bool>,
    pub enable_audit: Option<bool>,
    pub enable_rbac: Option<bool>,
}

/// Owns the single in-progress aggregate. Every consumer (step screens, the
/// gate, the submission flow) reads through this handle, so validity checks
/// always see the latest mutation.
#[derive(Debug, Clone, Default)]
pub struct WizardStore {
    state: WizardState,
}

impl WizardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn update_basic(&mut self, update: BasicUpdate) {
        let basic = &mut self.state.basic;
        if let Some(app_name) = update.app_name {
            basic.app_name = app_name;
        }
        if let Some(description) = update.description {
            basic.description = description;
        }
    }

    pub fn update_rag(&mut self, update: RagUpdate) {
        let rag = &mut self.state.rag;
        if let Some(knowledge_base_name) = update.knowledge_base_name {
            rag.knowledge_base_name = knowledge_base_name;
        }
        if let Some(description) = update.description {
            rag.description = description;
        }
        if let Some(pattern) = update.pattern {
            rag.pattern = pattern;
        }
        if let Some(embeddings) = update.embeddings {
            rag.embeddings = embeddings;
        }
        if let Some(metrics) = update.metrics {
            rag.metrics = metrics;
        }
        if let Some(chunking) = update.chunking {
            rag.chunking = chunking;
        }
        if let Some(vector_db) = update.vector_db {
            rag.vector_db = vector_db;
        }
        if let Some(configurations) = update.configurations {
            rag.configurations = configurations;
        }
    }

    pub fn update_workflows(&mut self, update: WorkflowsUpdate) {
        if let Some(selected_workflows) = update.selected_workflows {
            self.state.workflows.selected_workflows = selected_workflows;
        }
    }

    pub fn update_security(&mut self, update: SecurityUpdate) {
        let security = &mut self.state.security;
        if let Some(enable_encryption) = update.enable_encryption {
            security.enable_encryption = enable_encryption;
        }
        if let Some(enable_audit) = update.enable_audit {
            security.enable_audit = enable_audit;
        }
        if let Some(enable_rbac) = update.enable_rbac {
            security.enable_rbac = enable_rbac;
        }
    }

    pub fn add_configuration(&mut self, entry: RagEntry) {
        self.state.rag.configurations.push(entry);
    }

    /// Out-of-range indices are ignored; stale removal requests from the
    /// entries table must never abort the session.
    pub fn remove_configuration(&mut self, index: usize) {
        if index < self.state.rag.configurations.len() {
            self.state.rag.configurations.remove(index);
        }
    }

    /// Navigation gate for the Basic step. This is the loose non-empty check
    /// used for reachability only; form-level messages come from
    /// `rules::validate_basic`, which is stricter.
    pub fn is_basic_step_valid(&self) -> bool {
        let basic = &self.state.basic;
        !basic.app_name.trim().is_empty() && !basic.description.trim().is_empty()
    }

    /// Navigation gate for the RAG step; enum fields are deliberately not
    /// consulted here.
    pub fn is_rag_step_valid(&self) -> bool {
        let rag = &self.state.rag;
        !rag.knowledge_base_name.trim().is_empty()
            && !rag.description.trim().is_empty()
            && !rag.vector_db.trim().is_empty()
    }

    /// Always true even though submission requires a selected workflow; the
    /// step is reachable regardless of its content.
    pub fn is_workflows_step_valid(&self) -> bool {
        true
    }

    /// Always true even though submission requires one enabled flag.
    pub fn is_security_step_valid(&self) -> bool {
        true
    }

    pub fn reset_form(&mut self) {
        self.state = WizardState::default();
    }
}
