use crate::filters::entity::Entity;

filter_fields! {
    /// Filterable span attributes
    SpanField for Entity::Spans {
        Id => ("id", String),
        Name => ("name", String),
        StartTime => ("start_time", DateTime),
        EndTime => ("end_time", DateTime),
        Input => ("input", String),
        Output => ("output", String),
        InputJson => ("input_json", Dictionary),
        OutputJson => ("output_json", Dictionary),
        Metadata => ("metadata", Dictionary),
        Model => ("model", String),
        Provider => ("provider", String),
        Type => ("type", Enum, ["general", "tool", "llm", "guardrail"]),
        Tags => ("tags", List),
        FeedbackScores => ("feedback_scores", Dictionary),
        Usage => ("usage", Dictionary),
        PromptTokens => ("usage.prompt_tokens", Number),
        CompletionTokens => ("usage.completion_tokens", Number),
        TotalTokens => ("usage.total_tokens", Number),
        Duration => ("duration", Number),
        TotalEstimatedCost => ("total_estimated_cost", Number),
        ErrorInfo => ("error_info", String),
    }
}
