use crate::filters::entity::Entity;

filter_fields! {
    /// Filterable trace attributes
    TraceField for Entity::Traces {
        Id => ("id", String),
        Name => ("name", String),
        StartTime => ("start_time", DateTime),
        EndTime => ("end_time", DateTime),
        Input => ("input", String),
        Output => ("output", String),
        InputJson => ("input_json", Dictionary),
        OutputJson => ("output_json", Dictionary),
        Metadata => ("metadata", Dictionary),
        Tags => ("tags", List),
        ThreadId => ("thread_id", String),
        CreatedBy => ("created_by", String),
        FeedbackScores => ("feedback_scores", Dictionary),
        Usage => ("usage", Dictionary),
        TotalTokens => ("usage.total_tokens", Number),
        Duration => ("duration", Number),
        TotalEstimatedCost => ("total_estimated_cost", Number),
        LlmSpanCount => ("llm_span_count", Number),
        ErrorInfo => ("error_info", String),
    }
}
