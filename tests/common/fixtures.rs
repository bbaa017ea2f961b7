//! Static message corpora used across harnesses.
//!
//! Each corpus is a `&'static [&'static str]` of JSON lines as a kernel-style
//! producer writes them.

/// Stream output, in the order a producer would emit it.
pub const CORPUS_STREAM: &[&str] = &[
    r#"{"msg_type":"stream","content":{"name":"stdout","text":"Server started on :8080\n"}}"#,
    r#"{"msg_type":"stream","content":{"name":"stderr","text":"warning: config file not found, using defaults\n"}}"#,
    r#"{"msg_type":"stream","content":{"name":"stdout","text":"epoch 1/3 loss=0.412\nepoch 2/3 loss=0.337\n"}}"#,
    r#"{"msg_type":"stream","content":{"name":"stdout","text":""}}"#,
];

/// Display messages with an HTML representation.
pub const CORPUS_DISPLAY: &[&str] = &[
    r#"{"msg_type":"display_data","content":{"data":{"text/html":"<b>bold</b>","text/plain":"bold"}}}"#,
    r#"{"msg_type":"execute_result","content":{"data":{"text/html":"<table><tr><td>1</td></tr></table>"},"execution_count":3}}"#,
    r#"{"header":{"msg_type":"update_display_data"},"content":{"data":{"text/html":"<p>50%</p>"}}}"#,
];

/// Messages that decode but have no displayable payload.
pub const CORPUS_EMPTY_CONTENT: &[&str] = &[
    r#"{"msg_type":"display_data","content":{"data":{"text/plain":"no html here"}}}"#,
    r#"{"msg_type":"error","content":{"ename":"ValueError","evalue":"bad"}}"#,
    r#"{"msg_type":"display_data","content":{"data":{"text/html":42}}}"#,
];

/// Lines a feed must skip.
pub const CORPUS_MALFORMED: &[&str] = &[
    "",
    "   ",
    "not json at all",
    r#"{"msg_type":"stream","content":{"text":"unterminated"#,
    r#"["an","array"]"#,
    "42",
];

/// A producer's output with garbage interleaved, as a single file body.
pub fn mixed_file_body() -> String {
    let mut body = String::new();
    for (i, line) in CORPUS_STREAM.iter().chain(CORPUS_DISPLAY).enumerate() {
        body.push_str(line);
        body.push('\n');
        if let Some(bad) = CORPUS_MALFORMED.get(i) {
            body.push_str(bad);
            body.push('\n');
        }
    }
    body
}

/// Number of well-formed messages in [`mixed_file_body`].
pub fn mixed_file_message_count() -> usize {
    CORPUS_STREAM.len() + CORPUS_DISPLAY.len()
}
