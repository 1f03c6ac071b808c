/// Per-instance notifications fired around the mutating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Syncing,
    Synced,
    Inserting,
    Inserted,
    Updating,
    Updated,
    Dropping,
    Dropped,
}

/// Type-wide notifications fired around every select issued through an entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectEvent {
    Selecting,
    Selected,
}

/// Hooks of an entity type.
///
/// Deriving `Entity` with `#[lifecycle]` routes the notifications here, override
/// only the ones of interest.
pub trait Lifecycle {
    fn on_event(&self, _event: Event) {}
    fn on_select(_event: SelectEvent)
    where
        Self: Sized,
    {
    }
}
