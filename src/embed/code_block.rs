// src/embed/code_block.rs
// =============================================================================
// Turns a fetched file into a fenced Markdown code block.
//
// Any ``` inside the file would close the fence early, so each occurrence is
// escaped as \`\`\` before the block is assembled.
// =============================================================================

use crate::github::RetrievedFile;

const FENCE: &str = "```";
const ESCAPED_FENCE: &str = "\\`\\`\\`";

pub fn render_code_block(file: &RetrievedFile) -> String {
    let tag = file.kind.map(|k| k.as_str()).unwrap_or_default();
    let body = file.content.replace(FENCE, ESCAPED_FENCE);
    let body = body.strip_suffix('\n').unwrap_or(&body);

    format!("{FENCE}{tag}\n{body}\n{FENCE}")
}
