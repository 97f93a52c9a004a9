use ragforge::wizard::rules::{
    validate_aggregate, validate_basic, validate_rag_draft, validate_rag_submission,
    validate_security, validate_workflows, ChunkingStrategy, DistanceMetric, EmbeddingSize,
    RagPattern,
};
use ragforge::wizard::state::{
    BasicConfig, RagConfig, SecurityConfig, WizardState, WorkflowsConfig,
};

fn valid_rag() -> RagConfig {
    RagConfig {
        knowledge_base_name: "tickets".to_string(),
        description: "Historical ticket content".to_string(),
        pattern: "Contextual RAG".to_string(),
        embeddings: "256".to_string(),
        metrics: "Cosine".to_string(),
        chunking: "Semantic".to_string(),
        vector_db: "pinecone".to_string(),
        configurations: Vec::new(),
    }
}

#[test]
fn basic_rules_carry_their_exact_messages() {
    let result = validate_basic(&BasicConfig {
        app_name: "A".to_string(),
        description: "too short".to_string(),
    });
    assert_eq!(
        result.message_for("appName"),
        Some("App name must be at least 2 characters.")
    );
    assert_eq!(
        result.message_for("description"),
        Some("Description must be at least 10 characters.")
    );
}

#[test]
fn length_checks_count_raw_characters_including_whitespace() {
    let padded = BasicConfig {
        app_name: "a ".to_string(),
        description: "12345678  ".to_string(),
    };
    assert!(validate_basic(&padded).is_valid());

    let mut rag = valid_rag();
    rag.knowledge_base_name = " ".to_string();
    rag.vector_db = "  ".to_string();
    let result = validate_rag_submission(&rag);
    assert!(result.is_valid());
    assert_eq!(result.message_for("knowledgeBaseName"), None);
    assert_eq!(result.message_for("vectorDb"), None);
}

#[test]
fn choice_fields_only_accept_their_enumerations() {
    assert!(RagPattern::parse("Agentic RAG").is_ok());
    assert_eq!(
        RagPattern::parse("agentic rag").expect_err("case sensitive"),
        "Please select a valid pattern."
    );
    assert!(EmbeddingSize::parse("1024").is_ok());
    assert!(EmbeddingSize::parse("768").is_err());
    assert!(DistanceMetric::parse("Euclidean norm").is_ok());
    assert!(DistanceMetric::parse("Manhattan").is_err());
    assert!(ChunkingStrategy::parse("Fixed sized").is_ok());
}

#[test]
fn draft_rules_allow_empty_choices_but_reject_garbage() {
    let mut rag = valid_rag();
    rag.pattern = String::new();
    rag.embeddings = String::new();
    assert!(validate_rag_draft(&rag).is_valid());

    rag.pattern = "Hallucinated RAG".to_string();
    let result = validate_rag_draft(&rag);
    assert_eq!(
        result.message_for("pattern"),
        Some("Please select a valid pattern.")
    );
}

#[test]
fn submission_rules_make_every_choice_mandatory() {
    let mut rag = valid_rag();
    rag.pattern = String::new();
    let result = validate_rag_submission(&rag);
    assert!(!result.is_valid());
    assert_eq!(
        result.message_for("pattern"),
        Some("Please select a valid pattern.")
    );

    assert!(validate_rag_submission(&valid_rag()).is_valid());
}

#[test]
fn workflows_and_security_have_minimum_selections() {
    let empty = WorkflowsConfig {
        selected_workflows: Vec::new(),
    };
    assert_eq!(
        validate_workflows(&empty).message_for("selectedWorkflows"),
        Some("At least one workflow is required")
    );

    let security = SecurityConfig {
        enable_encryption: false,
        enable_audit: false,
        enable_rbac: false,
    };
    assert_eq!(
        validate_security(&security).message_for("security"),
        Some("At least one security option must be enabled")
    );
}

#[test]
fn aggregate_validation_prefixes_fields_with_their_section() {
    let state = WizardState::default();
    let result = validate_aggregate(&state);
    assert!(!result.is_valid());

    let fields: Vec<&str> = result
        .errors()
        .iter()
        .map(|error| error.field.as_str())
        .collect();
    assert!(fields.contains(&"basic.appName"));
    assert!(fields.contains(&"rag.knowledgeBaseName"));
    assert!(fields.contains(&"workflows.selectedWorkflows"));
    assert!(fields.contains(&"security.security"));
}

#[test]
fn aggregate_validation_accepts_a_complete_document() {
    let state = WizardState {
        basic: BasicConfig {
            app_name: "Support Bot".to_string(),
            description: "Answers support tickets.".to_string(),
        },
        rag: valid_rag(),
        workflows: WorkflowsConfig {
            selected_workflows: vec!["default-workflow".to_string()],
        },
        security: SecurityConfig {
            enable_encryption: true,
            enable_audit: false,
            enable_rbac: false,
        },
    };
    assert!(validate_aggregate(&state).is_valid());
}
