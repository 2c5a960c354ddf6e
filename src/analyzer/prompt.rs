const PROMPT_HEADER: &str = "Analyze these daily voice notes and provide insights on:
- Main themes and topics discussed
- Emotional patterns throughout the day
- Key decisions or ideas mentioned
- Suggestions for follow-up actions
- Overall summary of the day

Here are today's notes:
";

/// Wrap the day's notes in the analysis instructions
pub fn build_prompt(notes: &str) -> String {
    format!("{PROMPT_HEADER}{notes}\n")
}
