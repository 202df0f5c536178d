//! # Output Comparison Module / 输出比较模块
//!
//! Turns captured standard output into a sequence of lines and compares it
//! positionally against the expected lines of a test case.
//!
//! 将捕获的标准输出转换为行序列，并与测试用例的期望行逐位置比较。

/// Splits captured output on newline boundaries.
///
/// `\r\n` and lone `\r` are treated as `\n` first. Output ending in a newline
/// yields a final empty entry, so `"55\n"` becomes `["55", ""]`.
///
/// 按换行符拆分捕获的输出。`"55\n"` 会得到 `["55", ""]`。
pub fn split_output_lines(output: &str) -> Vec<String> {
    let normalized = output.replace("\r\n", "\n").replace('\r', "\n");
    normalized.split('\n').map(str::to_string).collect()
}

/// The expected lines plus the implicit empty entry produced by the final newline.
///
/// 期望行加上由末尾换行产生的隐式空行。
pub fn expected_with_terminator(expected: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(expected.len() + 1);
    lines.extend(expected.iter().cloned());
    lines.push(String::new());
    lines
}

/// Positional equality: same length and the same line at every index.
/// 逐位置相等：长度相同且每个位置上的行相同。
pub fn lines_match(actual: &[String], expected: &[String]) -> bool {
    actual == expected
}
