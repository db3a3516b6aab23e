use crate::domain::transcript::Transcript;

/// The one place report tone and audience are encoded. Changing the report
/// style for the recipient means changing these templates and nothing else.
const REPORT_INSTRUCTIONS: &str = "\
You will receive a text containing the following information:
1. Pull Requests merged during a defined period, identified by \"---> Pull Request #X:\".
2. The commits inside each Pull Request, identified by \"--> Commit [sha]:\".
3. The files modified in each commit, mentioned as \"-> File modified: [File name]:\".
4. The specific lines added (\"+\") or removed (\"-\") in each file.

Your main task is to write a final report for the non-technical team leader that will be sent as an email and should contain the following information:
1. Begins with an informal greeting, such as \"Hello,\" and ends with \"Sincerely, Your Virtual Assistant.\"
2. Summarizes the impacts of the changes made in the merged Pull Requests, using clear, non-technical language, without including code snippets, technical terms, or specific technical details.
3. Explains the significance of the changes in terms of functional, aesthetic, usability, or performance improvements, emphasizing their relevance to the overall project.
4. Avoid technical specifications and focus on the essence of the changes and their impact on the project.
5. Mention if key information for understanding the overall impact of the changes is missing or ambiguous, while remaining concise and to the point.

The final result should be a well-structured email because it will be sent automatically, so pay attention.

Important note: The report should be understandable to a non-technical audience, focusing on the progress and impact of the changes on the project without dwelling on technical details.";

const EMPTY_WINDOW_INSTRUCTIONS: &str = "\
Write an email for the non-technical team leader letting them know that no pull requests were merged during the reporting period, so there are no changes to report this time.
Begin with an informal greeting, such as \"Hello,\" and end with \"Sincerely, Your Virtual Assistant.\"
Keep it short, friendly, and free of technical terms, and do not claim that any changes occurred.";

/// Pure mapping from transcript to generation prompt. Deterministic; the
/// empty window gets its own explicit variant instead of an empty text blob.
pub fn build(transcript: &Transcript) -> String {
    if transcript.is_empty() {
        EMPTY_WINDOW_INSTRUCTIONS.to_string()
    } else {
        format!("{REPORT_INSTRUCTIONS}\n\ntext: {}", transcript.as_str())
    }
}
