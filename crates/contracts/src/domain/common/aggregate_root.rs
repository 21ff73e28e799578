use super::EntityMetadata;

/// Trait for aggregate roots.
///
/// Instance accessors plus static naming metadata used by the DB layer and UI.
pub trait AggregateRoot {
    /// Aggregate identifier type
    type Id;

    fn id(&self) -> Self::Id;
    fn code(&self) -> &str;
    fn description(&self) -> &str;
    fn metadata(&self) -> &EntityMetadata;
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Aggregate index in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Collection name for the DB (e.g. "client")
    fn collection_name() -> &'static str;

    /// Singular UI name (e.g. "Client")
    fn element_name() -> &'static str;

    /// Plural UI name (e.g. "Clients")
    fn list_name() -> &'static str;

    /// Full system name, e.g. "a001_client"
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
