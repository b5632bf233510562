use crate::filters::entity::Entity;

filter_fields! {
    /// Filterable trace-thread attributes
    ThreadField for Entity::Threads {
        Id => ("id", String),
        FirstMessage => ("first_message", String),
        LastMessage => ("last_message", String),
        NumberOfMessages => ("number_of_messages", Number),
        Duration => ("duration", Number),
        CreatedAt => ("created_at", DateTime),
        LastUpdatedAt => ("last_updated_at", DateTime),
        StartTime => ("start_time", DateTime),
        EndTime => ("end_time", DateTime),
        Status => ("status", Enum, ["active", "inactive"]),
        Tags => ("tags", List),
        FeedbackScores => ("feedback_scores", Dictionary),
    }
}
