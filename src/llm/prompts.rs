use crate::embeddings::ScoredSnippet;
use crate::model::Report;

pub const SYSTEM_REPORT_SUMMARIZER: &str = r#"You are a minute-taker for a weekly team report meeting. You turn a member's spoken update into a short structured report. Be concise and factual. Keep concrete numbers and proper nouns."#;

pub fn summarize_prompt(transcript: &str) -> String {
    format!(
        r#"The text below is a member's spoken update for this week.
Split it into the three report fields and answer with JSON only, no other text.

{{
  "currentTrial": "what they are currently trying (the challenge or experiment in progress)",
  "progress": "what they did this week and how far they got",
  "result": "outcomes, observations and next actions"
}}

Keep each field to 2-4 sentences. If the update has no information for a
field, use "No update this week".

---
UPDATE:
{}
---

JSON:"#,
        truncate_for_llm(transcript)
    )
}

pub const SYSTEM_TEASER_WRITER: &str = r#"You are a copywriter who writes book-jacket hooks. Given a weekly report you produce one short, curiosity-provoking opening line. Output the line only, no explanation or quotes."#;

pub fn teaser_prompt(report: &Report) -> String {
    format!(
        r#"Write a hook line for this weekly report: the kind of line that makes
a teammate think "I want to read this one".

Currently trying: {}
Progress: {}
Result: {}

Rules:
- one short line, a few words at most
- hint at a surprise or an outcome, include a concrete keyword
- no exclamation or question marks
- output the line only

Good examples:
- "Next.js, finally solved"
- "The day the UI leapt"
- "Three days to done"

Bad examples:
- "Studying Next.js" (flat)
- "Did some programming" (vague)"#,
        report.current_trial, report.progress, report.result
    )
}

pub const SYSTEM_TITLE_WRITER: &str = r#"You are a naming assistant. Given the text of an idea you produce one short, engaging title that captures its core. Output the title only."#;

pub fn idea_title_prompt(content: &str) -> String {
    format!(
        r#"Generate a title for this idea. Keep it under 30 characters and make
it concrete. Output the title only, nothing else.

---
IDEA:
{}
---

Title:"#,
        truncate_for_llm(content)
    )
}

pub const SYSTEM_RAG_ANSWERER: &str = r#"You are an assistant that answers questions about a team's past weekly reports. Ground every statement in the context documents you are given. When the context does not contain the answer, say that no matching report was found; do not guess."#;

pub fn rag_answer_prompt(question: &str, snippets: &[ScoredSnippet]) -> String {
    let context = snippets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "[doc {}] (relevance: {:.1}%)\n{}",
                i + 1,
                s.score * 100.0,
                s.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Answer the question using the past reports below.

---
PAST REPORTS:
{}
---

QUESTION:
{}

Rules:
- base the answer only on the reports above
- mention the week and the member name where relevant
- if the reports do not cover the question, answer that no matching report was found
- keep the answer short and clear"#,
        context, question
    )
}

/// Truncate free-form input to fit within LLM context limits
fn truncate_for_llm(text: &str) -> &str {
    const MAX_CHARS: usize = 12_000;
    if text.len() <= MAX_CHARS {
        text
    } else {
        let mut end = MAX_CHARS;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }
}
