pub mod context;

pub use context::{format_events_for_context, NO_EVENTS};

/// What the model must say when the events don't answer the question.
pub const NO_ANSWER: &str = "I cannot answer that based on the provided event data.";

const INSTRUCTIONS: &str = "You are an assistant designed to answer questions about tech events.
Use ONLY the event data provided below to answer the user's query.
Do NOT use any external knowledge or information you were trained on.
If the answer cannot be found in the provided data, say 'I cannot answer that based on the provided event data.'

When listing events, format them concisely.
For example:
- Event Name (Start Date: YYYY-MM-DD, End Date: YYYY-MM-DD, Location)

**IMPORTANT**: Do NOT include conversational filler like 'Here are the events...' or 'Based on the data...'. Just provide the direct answer or list.";

/// Instructions, then the event context, then the user's question.
pub fn build_prompt(event_context: &str, query: &str) -> String {
    format!(
        "{}\n\n--- Event Data ---\n{}\n\n--- User Query ---\n{}",
        INSTRUCTIONS, event_context, query
    )
}
