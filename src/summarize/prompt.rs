/// Build the summarization prompt: detect the transcript language, then
/// produce a five-section structured summary in that language. The
/// transcript is embedded verbatim.
pub fn build_summary_prompt(transcript_text: &str, additional_context: &str) -> String {
    format!(
        "\
You are an expert TTRPG Game Master and a helpful summarizer assistant.

First, detect the primary language used in the session transcript below.

Then, generate a detailed session summary in the same language you detected. \
Structure the summary exactly with the sections below and keep the content \
concise and useful for both players and the game master.

Required structure (produce these headings in the detected language):
1. GENERAL SESSION SUMMARY (1-2 paragraphs)
2. MAIN EVENTS (bullet points)
3. IMPORTANT PLAYER DECISIONS
4. DISCOVERIES AND REVELATIONS
5. HOOKS FOR THE NEXT SESSION

Here is the session transcript to analyze:

{transcript_text}

Additional context (if any):
{additional_context}

Write the complete structured summary below, in the detected language.
"
    )
}
