use crate::filters::entity::Entity;

filter_fields! {
    /// Filterable dataset attributes
    DatasetField for Entity::Datasets {
        Id => ("id", String),
        Name => ("name", String),
        Description => ("description", String),
        Tags => ("tags", List),
        CreatedAt => ("created_at", DateTime),
        LastUpdatedAt => ("last_updated_at", DateTime),
        CreatedBy => ("created_by", String),
    }
}
