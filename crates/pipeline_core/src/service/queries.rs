//! Read-only list queries over the store.
//!
//! # Responsibility
//! - Feed the overview packing layout with key/urgency pairs.
//! - Filter and sort todos by category.

use crate::layout::packing::PackingItem;
use crate::model::entity::{EntityKind, Todo};
use crate::repo::store::EntityStore;
use crate::service::pipeline_service::PipelineService;
use std::collections::BTreeSet;

/// Key and urgency of every record of `kind`, in store order.
pub fn overview_items(store: &EntityStore, kind: EntityKind) -> Vec<PackingItem> {
    store
        .records(kind)
        .into_iter()
        .map(|record| PackingItem {
            label: record.key().to_string(),
            urgency: record.urgency(),
        })
        .collect()
}

impl PipelineService {
    pub fn overview_items(&self, kind: EntityKind) -> Vec<PackingItem> {
        overview_items(&self.store, kind)
    }

    /// Todos carrying any of `filter`, most important first.
    ///
    /// An empty filter matches every todo. Ties keep store order.
    pub fn todos_by_categories<S: AsRef<str>>(&self, filter: &[S]) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self
            .store
            .todos()
            .iter()
            .filter(|todo| {
                filter.is_empty()
                    || filter.iter().any(|wanted| {
                        todo.categories
                            .iter()
                            .any(|category| category == wanted.as_ref().trim())
                    })
            })
            .cloned()
            .collect();
        todos.sort_by(|left, right| right.importance.cmp(&left.importance));
        todos
    }

    /// Sorted union of all todo categories.
    pub fn todo_categories(&self) -> Vec<String> {
        self.store
            .todos()
            .iter()
            .flat_map(|todo| todo.categories.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
