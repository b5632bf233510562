use crate::filters::entity::Entity;

filter_fields! {
    ProjectField for Entity::Projects {
        Id => ("id", String),
        Name => ("name", String),
        CreatedBy => ("created_by", String),
        CreatedAt => ("created_at", DateTime),
        LastUpdatedAt => ("last_updated_at", DateTime),
    }
}
