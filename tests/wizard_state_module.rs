use ragforge::wizard::state::{
    BasicUpdate, RagEntry, RagUpdate, SecurityUpdate, WizardState, WizardStore, WorkflowsUpdate,
};

fn entry(kb_name: &str) -> RagEntry {
    RagEntry {
        kb_name: kb_name.to_string(),
        description: "docs".to_string(),
        pattern: "Hybrid RAG".to_string(),
        chunking: "Semantic".to_string(),
        embeddings: "512".to_string(),
        metrics: "Cosine".to_string(),
        vector_db: "pinecone".to_string(),
    }
}

#[test]
fn updates_merge_shallowly_and_leave_other_sections_alone() {
    let mut store = WizardStore::new();
    store.update_basic(BasicUpdate {
        app_name: Some("Support Bot".to_string()),
        description: Some("Answers support tickets.".to_string()),
    });
    store.update_rag(RagUpdate {
        knowledge_base_name: Some("tickets".to_string()),
        ..Default::default()
    });

    // A partial basic update keeps the untouched field.
    store.update_basic(BasicUpdate {
        app_name: Some("Helpdesk".to_string()),
        description: None,
    });
    let state = store.state();
    assert_eq!(state.basic.app_name, "Helpdesk");
    assert_eq!(state.basic.description, "Answers support tickets.");
    assert_eq!(state.rag.knowledge_base_name, "tickets");
}

#[test]
fn step_validity_tracks_every_mutation() {
    let mut store = WizardStore::new();
    assert!(!store.is_basic_step_valid());

    store.update_basic(BasicUpdate {
        app_name: Some("A".to_string()),
        description: Some("short".to_string()),
    });
    // Navigation gates only ask for non-empty values, not rule compliance.
    assert!(store.is_basic_step_valid());

    store.update_basic(BasicUpdate {
        app_name: Some(String::new()),
        description: None,
    });
    assert!(!store.is_basic_step_valid());
}

#[test]
fn rag_gate_ignores_choice_fields_and_the_entry_list() {
    let mut store = WizardStore::new();
    store.update_rag(RagUpdate {
        knowledge_base_name: Some("kb".to_string()),
        description: Some("docs".to_string()),
        vector_db: Some("weaviate".to_string()),
        ..Default::default()
    });
    assert!(store.is_rag_step_valid());

    store.update_rag(RagUpdate {
        vector_db: Some(String::new()),
        ..Default::default()
    });
    assert!(!store.is_rag_step_valid());
}

#[test]
fn workflows_and_security_steps_are_always_navigable() {
    let store = WizardStore::new();
    assert!(store.is_workflows_step_valid());
    assert!(store.is_security_step_valid());
}

#[test]
fn entry_list_appends_and_removes_by_index() {
    let mut store = WizardStore::new();
    store.add_configuration(entry("first"));
    store.add_configuration(entry("second"));
    assert_eq!(store.state().rag.configurations.len(), 2);

    store.remove_configuration(0);
    assert_eq!(store.state().rag.configurations.len(), 1);
    assert_eq!(store.state().rag.configurations[0].kb_name, "second");

    // Out-of-range removal is a no-op.
    store.remove_configuration(5);
    assert_eq!(store.state().rag.configurations.len(), 1);
}

#[test]
fn reset_form_returns_the_aggregate_to_defaults() {
    let mut store = WizardStore::new();
    store.update_basic(BasicUpdate {
        app_name: Some("Support Bot".to_string()),
        description: Some("Answers support tickets.".to_string()),
    });
    store.update_workflows(WorkflowsUpdate {
        selected_workflows: Some(vec!["default-workflow".to_string()]),
    });
    store.update_security(SecurityUpdate {
        enable_encryption: Some(true),
        ..Default::default()
    });
    store.add_configuration(entry("kb"));

    store.reset_form();
    assert_eq!(store.state(), &WizardState::default());
}

#[test]
fn aggregate_serializes_with_the_wire_field_names() {
    let mut store = WizardStore::new();
    store.update_rag(RagUpdate {
        knowledge_base_name: Some("tickets".to_string()),
        ..Default::default()
    });
    store.add_configuration(entry("kb"));
    store.update_security(SecurityUpdate {
        enable_rbac: Some(true),
        ..Default::default()
    });

    let value = serde_json::to_value(store.state()).expect("serialize");
    // The in-progress field and the saved entries spell their name keys
    // differently; both spellings are part of the stored document shape.
    assert!(value["rag"]["knowledgeBaseName"].is_string());
    assert_eq!(value["rag"]["configurations"][0]["kbName"], "kb");
    assert_eq!(value["security"]["enableRBAC"], true);
    assert!(value["rag"]["vectorDb"].is_string());
}
