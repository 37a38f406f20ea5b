//! Plain-text narrative report.
//!
//! The model is asked for a short `relatorio` without markup. This module
//! enforces that (strip markup, collapse whitespace, bound the length) and
//! builds a summary from the structured result when the model left it out.

use agendai_core::AnalysisResult;

/// Upper bound on the report, in characters.
pub const MAX_REPORT_CHARS: usize = 1200;

/// Used when there is nothing to summarize.
pub const REPORT_NOT_PROVIDED: &str = "Relatório de resumo não fornecido pela IA.";

/// Returned for an empty task list.
pub const EMPTY_TASKS_REPORT: &str = "Nenhuma tarefa para analisar.";

/// Returned alongside every error envelope.
pub const FAILURE_REPORT: &str = "A IA não conseguiu gerar relatório.";

/// Strip Markdown emphasis, headings and bullets; collapse to one line;
/// cap at [`MAX_REPORT_CHARS`]. Idempotent.
///
/// `#` is only removed as a heading marker and `*` only as a bullet or
/// around a word, so "C#" or "2 * 3" survive.
pub fn sanitize(text: &str) -> String {
    let mut current = sanitize_once(text);
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_once(text: &str) -> String {
    let joined = text
        .lines()
        .map(|line| strip_emphasis(strip_line_markers(&line.replace('`', ""))))
        .collect::<Vec<_>>()
        .join(" ");

    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .chars()
        .take(MAX_REPORT_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Leading headings (`## `) and bullets (`- `, `• `, `* `), repeatedly.
fn strip_line_markers(line: &str) -> &str {
    let mut line = line.trim();
    loop {
        let next = strip_heading(line)
            .or_else(|| line.strip_prefix("- "))
            .or_else(|| line.strip_prefix("• "))
            .or_else(|| line.strip_prefix("* "))
            .map(str::trim_start);
        match next {
            Some(rest) => line = rest,
            None => return line,
        }
    }
}

fn strip_heading(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let is_heading =
        rest.len() < line.len() && (rest.is_empty() || rest.starts_with(char::is_whitespace));
    is_heading.then_some(rest)
}

/// Drop runs of `*` that open or close an emphasized span.
fn strip_emphasis(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '*' {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i] == '*' {
            i += 1;
        }
        let prev = start.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i).copied();

        let opens = next.is_some_and(|c| !c.is_whitespace())
            && prev.is_none_or(|c| c.is_whitespace() || "([{\"'".contains(c));
        let closes = prev.is_some_and(|c| !c.is_whitespace())
            && next.is_none_or(|c| c.is_whitespace() || c.is_ascii_punctuation());

        if !(opens || closes) {
            out.extend(&chars[start..i]);
        }
    }

    out
}

/// Build a day summary from the structured fields.
pub fn summarize(analysis: &AnalysisResult) -> String {
    let mut sentences = Vec::new();

    if !analysis.first_task.trim().is_empty() {
        sentences.push(format!("Comece por: {}.", analysis.first_task.trim()));
    }

    let titles = analysis.ordered_titles();
    if !titles.is_empty() {
        sentences.push(format!("Ordem sugerida: {}.", titles.join(", ")));
    }

    if !analysis.recommendations.trim().is_empty() {
        sentences.push(format!("Recomendações: {}", analysis.recommendations.trim()));
    }

    if sentences.is_empty() {
        return REPORT_NOT_PROVIDED.to_string();
    }

    sanitize(&format!("Resumo do dia. {}", sentences.join(" ")))
}
