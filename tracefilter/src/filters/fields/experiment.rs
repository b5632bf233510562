use crate::filters::entity::Entity;

filter_fields! {
    /// Filterable experiment attributes
    ExperimentField for Entity::Experiments {
        Id => ("id", String),
        Name => ("name", String),
        DatasetId => ("dataset_id", String),
        PromptIds => ("prompt_ids", String),
        Metadata => ("metadata", Dictionary),
        FeedbackScores => ("feedback_scores", Dictionary),
        Tags => ("tags", List),
        CreatedAt => ("created_at", DateTime),
    }
}
