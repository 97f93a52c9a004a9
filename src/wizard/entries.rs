use crate::wizard::rules::validate_rag_submission;
use crate::wizard::state::{RagEntry, RagUpdate, WizardStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// Silent rejection: nothing appended, no field cleared. Callers surface
    /// this ahead of time by disabling the add action.
    MissingFields,
}

/// Whether the add action is currently allowed: every RAG field, including
/// the choice fields the step gate ignores, must be filled and valid.
pub fn can_add_configuration(store: &WizardStore) -> bool {
    validate_rag_submission(&store.state().rag).is_valid()
}

/// Snapshots the current RAG fields into an appended entry, then clears the
/// editable fields. The saved list survives the clear; entries are never
/// mutated after creation.
pub fn add_configuration_from_fields(store: &mut WizardStore) -> AddOutcome {
    if !can_add_configuration(store) {
        return AddOutcome::MissingFields;
    }

    let rag = &store.state().rag;
    let entry = RagEntry {
        kb_name: rag.knowledge_base_name.clone(),
        description: rag.description.clone(),
        pattern: rag.pattern.clone(),
        chunking: rag.chunking.clone(),
        embeddings: rag.embeddings.clone(),
        metrics: rag.metrics.clone(),
        vector_db: rag.vector_db.clone(),
    };
    store.add_configuration(entry);
    store.update_rag(RagUpdate {
        knowledge_base_name: Some(String::new()),
        description: Some(String::new()),
        pattern: Some(String::new()),
        embeddings: Some(String::new()),
        metrics: Some(String::new()),
        chunking: Some(String::new()),
        vector_db: Some(String::new()),
        configurations: None,
    });
    AddOutcome::Added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::state::RagUpdate;

    fn store_with_filled_rag() -> WizardStore {
        let mut store = WizardStore::new();
        store.update_rag(RagUpdate {
            knowledge_base_name: Some("KB1".to_string()),
            description: Some("desc".to_string()),
            pattern: Some("Hybrid RAG".to_string()),
            embeddings: Some("512".to_string()),
            metrics: Some("Cosine".to_string()),
            chunking: Some("Semantic".to_string()),
            vector_db: Some("pinecone".to_string()),
            configurations: None,
        });
        store
    }

    #[test]
    fn add_snapshots_under_kb_name_key_and_clears_fields() {
        let mut store = store_with_filled_rag();
        assert!(can_add_configuration(&store));
        assert_eq!(add_configuration_from_fields(&mut store), AddOutcome::Added);

        let rag = &store.state().rag;
        assert_eq!(rag.configurations.len(), 1);
        assert_eq!(rag.configurations[0].kb_name, "KB1");
        assert_eq!(rag.configurations[0].vector_db, "pinecone");
        assert!(rag.knowledge_base_name.is_empty());
        assert!(rag.pattern.is_empty());
        assert!(rag.vector_db.is_empty());
    }

    #[test]
    fn add_with_empty_vector_db_is_a_no_op() {
        let mut store = store_with_filled_rag();
        store.update_rag(RagUpdate {
            vector_db: Some(String::new()),
            ..RagUpdate::default()
        });

        assert!(!can_add_configuration(&store));
        assert_eq!(
            add_configuration_from_fields(&mut store),
            AddOutcome::MissingFields
        );
        assert!(store.state().rag.configurations.is_empty());
        // No reset on rejection either.
        assert_eq!(store.state().rag.knowledge_base_name, "KB1");
    }

    #[test]
    fn add_requires_choice_fields_even_though_the_step_gate_does_not() {
        let mut store = store_with_filled_rag();
        store.update_rag(RagUpdate {
            chunking: Some(String::new()),
            ..RagUpdate::default()
        });

        assert!(store.is_rag_step_valid());
        assert!(!can_add_configuration(&store));
    }

    #[test]
    fn saved_entries_survive_subsequent_adds() {
        let mut store = store_with_filled_rag();
        add_configuration_from_fields(&mut store);
        store.update_rag(RagUpdate {
            knowledge_base_name: Some("KB2".to_string()),
            description: Some("second".to_string()),
            pattern: Some("Graph RAG".to_string()),
            embeddings: Some("1024".to_string()),
            metrics: Some("Dot".to_string()),
            chunking: Some("Recursive".to_string()),
            vector_db: Some("qdrant".to_string()),
            configurations: None,
        });
        add_configuration_from_fields(&mut store);

        let entries = &store.state().rag.configurations;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kb_name, "KB1");
        assert_eq!(entries[1].kb_name, "KB2");
    }
}
