/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Returns the first identifier that appears more than once, if any.
pub fn first_duplicate_id<'a, T, I>(items: I) -> Option<String>
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .map(Identifiable::id)
        .find(|id| !seen.insert(*id))
        .map(str::to_string)
}

// Re-export common dependencies so consumers can rely on this module as a façade.
pub use chrono;
pub use rust_decimal;
pub use serde;
