//! Drag-and-drop reordering, independent of any UI toolkit.
//!
//! The host calls [`ReorderCoordinator::begin_drag`] when a drag starts,
//! [`ReorderCoordinator::drop_on`] when it ends over a target and
//! [`ReorderCoordinator::cancel`] when it ends anywhere else.

use crate::catalog::Catalog;

/// What is being dragged or dropped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Category,
    Link,
}

/// A draggable item: a category, or a link inside a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragItem {
    pub kind: DragKind,
    pub id: String,
    /// Owning category id, for links
    pub parent_id: Option<String>,
}

impl DragItem {
    pub fn category(id: impl Into<String>) -> Self {
        Self {
            kind: DragKind::Category,
            id: id.into(),
            parent_id: None,
        }
    }

    pub fn link(category_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: DragKind::Link,
            id: id.into(),
            parent_id: Some(category_id.into()),
        }
    }
}

/// Current drag state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragItem),
}

/// Tracks one pending drag and turns a drop into a reordered catalog
#[derive(Debug, Default)]
pub struct ReorderCoordinator {
    state: DragState,
}

impl ReorderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Start dragging `source`, replacing any drag already in progress
    pub fn begin_drag(&mut self, source: DragItem) {
        log::debug!("Drag started: {:?} '{}'", source.kind, source.id);
        self.state = DragState::Dragging(source);
    }

    /// Abandon the pending drag without touching anything
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Finish the pending drag over `target`.
    ///
    /// Returns the reordered catalog, or None when there was no drag, the
    /// kinds differ, or a link was dropped into another category. The
    /// coordinator is idle afterwards in every case.
    pub fn drop_on(&mut self, target: &DragItem, catalog: &Catalog) -> Option<Catalog> {
        let DragState::Dragging(source) = std::mem::take(&mut self.state) else {
            return None;
        };

        match (source.kind, target.kind) {
            (DragKind::Category, DragKind::Category) => {
                Some(catalog.reorder_categories(&source.id, &target.id))
            }
            (DragKind::Link, DragKind::Link) => match (&source.parent_id, &target.parent_id) {
                (Some(source_parent), Some(target_parent)) if source_parent == target_parent => {
                    Some(catalog.reorder_links(source_parent, &source.id, &target.id))
                }
                _ => {
                    // Moving links between categories is not supported
                    log::debug!(
                        "Link '{}' dropped outside its category, ignoring",
                        source.id
                    );
                    None
                }
            },
            _ => {
                log::debug!(
                    "Cannot drop {:?} onto {:?}",
                    source.kind,
                    target.kind
                );
                None
            }
        }
    }
}
