//! Prompt assembly for the generation call.

/// Joins retrieved chunk texts into the context block, preserving retrieval
/// rank order, with a blank line between chunks.
pub fn join_context<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    texts.into_iter().collect::<Vec<_>>().join("\n\n")
}

/// Builds the generation prompt from a context block and a question.
///
/// Pure and deterministic; the template wording is part of the service's
/// contract and is kept fixed.
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are Snap Assistant.\n\
         Use the following manual context to answer:\n\
         \n\
         {context}\n\
         \n\
         Question: {question}\n\
         Answer:"
    )
}
