use crate::shared::serde_ext::parse_via_string;
use crate::wizard::state::{BasicConfig, RagConfig, SecurityConfig, WizardState, WorkflowsConfig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! define_choice_field {
    ($name:ident, $kind:literal, $message:literal, [$(($variant:ident, $label:literal)),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn parse(raw: &str) -> Result<Self, String> {
                match raw {
                    $($label => Ok($name::$variant),)+
                    _ => Err($message.to_string()),
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|value| value.as_str()).collect()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                parse_via_string(deserializer, $kind, Self::parse)
            }
        }
    };
}

define_choice_field!(
    RagPattern,
    "rag pattern",
    "Please select a valid pattern.",
    [
        (Contextual, "Contextual RAG"),
        (Agentic, "Agentic RAG"),
        (Hybrid, "Hybrid RAG"),
        (Graph, "Graph RAG"),
        (SelfReflective, "Self-reflective RAG"),
    ]
);

define_choice_field!(
    EmbeddingSize,
    "embedding size",
    "Please select a valid embedding size.",
    [(Dim256, "256"), (Dim512, "512"), (Dim1024, "1024")]
);

define_choice_field!(
    DistanceMetric,
    "distance metric",
    "Please select a valid metric.",
    [
        (Cosine, "Cosine"),
        (Dot, "Dot"),
        (Product, "Product"),
        (EuclideanNorm, "Euclidean norm"),
    ]
);

define_choice_field!(
    ChunkingStrategy,
    "chunking strategy",
    "Please select a valid chunking method.",
    [
        (Semantic, "Semantic"),
        (FixedSized, "Fixed sized"),
        (Recursive, "Recursive"),
    ]
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors()
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }
}

// Length and required checks count raw characters; only the per-step
// navigation gates trim whitespace.
pub fn validate_basic(basic: &BasicConfig) -> ValidationResult {
    let mut errors = Vec::new();
    if basic.app_name.chars().count() < 2 {
        errors.push(FieldError::new(
            "appName",
            "App name must be at least 2 characters.",
        ));
    }
    if basic.description.chars().count() < 10 {
        errors.push(FieldError::new(
            "description",
            "Description must be at least 10 characters.",
        ));
    }
    ValidationResult::from_errors(errors)
}

fn rag_field_errors(rag: &RagConfig, choices_required: bool) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if rag.knowledge_base_name.is_empty() {
        errors.push(FieldError::new(
            "knowledgeBaseName",
            "Knowledge base name is required.",
        ));
    }
    if rag.description.is_empty() {
        errors.push(FieldError::new("description", "Description is required."));
    }
    check_choice(
        &mut errors,
        "pattern",
        &rag.pattern,
        choices_required,
        |raw| RagPattern::parse(raw).map(|_| ()),
    );
    check_choice(
        &mut errors,
        "embeddings",
        &rag.embeddings,
        choices_required,
        |raw| EmbeddingSize::parse(raw).map(|_| ()),
    );
    check_choice(
        &mut errors,
        "metrics",
        &rag.metrics,
        choices_required,
        |raw| DistanceMetric::parse(raw).map(|_| ()),
    );
    check_choice(
        &mut errors,
        "chunking",
        &rag.chunking,
        choices_required,
        |raw| ChunkingStrategy::parse(raw).map(|_| ()),
    );
    if rag.vector_db.is_empty() {
        errors.push(FieldError::new("vectorDb", "Vector DB is required."));
    }
    errors
}

fn check_choice<F>(
    errors: &mut Vec<FieldError>,
    field: &str,
    raw: &str,
    required: bool,
    parse: F,
) where
    F: FnOnce(&str) -> Result<(), String>,
{
    if raw.is_empty() && !required {
        return;
    }
    if let Err(message) = parse(raw) {
        errors.push(FieldError {
            field: field.to_string(),
            message,
        });
    }
}

/// Step-local rule: choice fields are optional while the step is being
/// edited, but must belong to their enumeration when present.
pub fn validate_rag_draft(rag: &RagConfig) -> ValidationResult {
    ValidationResult::from_errors(rag_field_errors(rag, false))
}

/// Transition/submission rule: same fields, choices now mandatory. Both
/// validators stay distinct on purpose; collapsing them would change which
/// navigations are allowed.
pub fn validate_rag_submission(rag: &RagConfig) -> ValidationResult {
    ValidationResult::from_errors(rag_field_errors(rag, true))
}

pub fn validate_workflows(workflows: &WorkflowsConfig) -> ValidationResult {
    if workflows.selected_workflows.is_empty() {
        return ValidationResult::Invalid(vec![FieldError::new(
            "selectedWorkflows",
            "At least one workflow is required",
        )]);
    }
    ValidationResult::Valid
}

pub fn validate_security(security: &SecurityConfig) -> ValidationResult {
    if security.enable_encryption || security.enable_audit || security.enable_rbac {
        return ValidationResult::Valid;
    }
    ValidationResult::Invalid(vec![FieldError::new(
        "security",
        "At least one security option must be enabled",
    )])
}

/// Whole-document rule applied by the persistence boundary before a create.
pub fn validate_aggregate(state: &WizardState) -> ValidationResult {
    let mut errors = Vec::new();
    collect_prefixed(&mut errors, "basic", validate_basic(&state.basic));
    collect_prefixed(&mut errors, "rag", validate_rag_submission(&state.rag));
    collect_prefixed(
        &mut errors,
        "workflows",
        validate_workflows(&state.workflows),
    );
    collect_prefixed(&mut errors, "security", validate_security(&state.security));
    ValidationResult::from_errors(errors)
}

fn collect_prefixed(errors: &mut Vec<FieldError>, section: &str, result: ValidationResult) {
    if let ValidationResult::Invalid(section_errors) = result {
        for error in section_errors {
            errors.push(FieldError {
                field: format!("{section}.{}", error.field),
                message: error.message,
            });
        }
    }
}
