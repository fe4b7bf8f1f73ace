//! Intro-call detection from the Calendly event-type name

/// True when the event-type name looks like the 15-minute intro call.
///
/// Matches case-insensitively on both "15" and "min" appearing anywhere in
/// the name, so "15-min intro call", "Intro (15 MIN)" and "15 minutes" all
/// qualify. Empty names never match.
pub fn is_intro_call(event_type_name: &str) -> bool {
    let name = event_type_name.to_lowercase();
    name.contains("15") && name.contains("min")
}
