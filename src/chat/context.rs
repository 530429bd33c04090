use crate::models::Event;

pub const NO_EVENTS: &str = "No events found in the database.";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders events as numbered plain-text paragraphs for an LLM prompt.
/// Dates keep only the calendar day.
pub fn format_events_for_context(events: &[Event]) -> String {
    if events.is_empty() {
        return NO_EVENTS.to_string();
    }

    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            format!(
                "Event {}:\n  Name: {}\n  Start Date: {}\n  End Date: {}\n  Location: {}\n  Description: {}\n  Registration Link: {}\n",
                i + 1,
                event.name,
                event.start_date.format(DATE_FORMAT),
                event.end_date.format(DATE_FORMAT),
                event.location,
                event.description,
                event.registration_link,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
