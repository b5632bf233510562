use crate::filters::entity::Entity;

filter_fields! {
    /// Filterable prompt attributes
    PromptField for Entity::Prompts {
        Id => ("id", String),
        Name => ("name", String),
        Description => ("description", String),
        TemplateStructure => ("template_structure", Enum, ["text", "chat"]),
        Tags => ("tags", List),
        VersionCount => ("version_count", Number),
        CreatedAt => ("created_at", DateTime),
        LastUpdatedAt => ("last_updated_at", DateTime),
        CreatedBy => ("created_by", String),
        LastUpdatedBy => ("last_updated_by", String),
    }
}
