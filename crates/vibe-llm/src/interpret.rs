use serde::{Deserialize, Serialize};
use tracing::debug;

/// Characters models like to wrap answers in
const QUOTE_CHARS: [char; 3] = ['"', '\'', '`'];

/// Pull request text extracted from a model reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrContent {
    pub title: String,
    pub description: String,
}

/// Which rule produced the title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleRule {
    /// An explicit `Title:` line
    TitleMarker,
    /// No marker; the first non-blank line was used
    FirstNonBlank,
    /// No line had usable title text
    Blank,
}

/// Result of interpreting a pull request reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPr {
    pub content: PrContent,
    pub rule: TitleRule,
}

struct TitleMatch {
    title: String,
    /// Index of the first line after the title
    body_start: usize,
}

type TitleMatcher = fn(&[&str]) -> Option<TitleMatch>;

/// Title rules, tried in order; the first match wins
const TITLE_RULES: [(TitleRule, TitleMatcher); 2] = [
    (TitleRule::TitleMarker, match_title_marker as TitleMatcher),
    (TitleRule::FirstNonBlank, match_first_non_blank as TitleMatcher),
];

/// Clean a commit message reply: surrounding whitespace and quote
/// characters are stripped from each end independently, so whitespace just
/// inside the quotes goes too
pub fn parse_commit_message(text: &str) -> String {
    text.trim()
        .trim_matches(|c: char| c.is_whitespace() || QUOTE_CHARS.contains(&c))
        .to_string()
}

/// Split a pull request reply into title and description.
///
/// Never fails: replies without a `Title:` line fall back to their first
/// line with usable text, and a reply with none yields empty fields. A
/// reply wrapped in a code fence is unwrapped first.
pub fn parse_pr_content(text: &str) -> ParsedPr {
    let all_lines: Vec<&str> = text.lines().collect();
    let lines = unfence(&all_lines);

    for (rule, matcher) in TITLE_RULES {
        if let Some(found) = matcher(lines) {
            let description = parse_description(&lines[found.body_start..]);
            debug!(?rule, title_len = found.title.len(), description_len = description.len(), "Parsed PR reply");
            return ParsedPr {
                content: PrContent {
                    title: found.title,
                    description,
                },
                rule,
            };
        }
    }

    debug!("PR reply had no usable title");
    ParsedPr {
        content: PrContent::default(),
        rule: TitleRule::Blank,
    }
}

/// A `Title:` line; an empty marker takes its title from the next usable line
fn match_title_marker(lines: &[&str]) -> Option<TitleMatch> {
    let (i, rest) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| strip_prefix_ignore_case(line.trim(), "title:").map(|rest| (i, rest)))?;

    let title = clean_title(rest);
    if title.is_empty() {
        return first_titled_line(lines, i + 1);
    }
    Some(TitleMatch {
        title,
        body_start: i + 1,
    })
}

fn match_first_non_blank(lines: &[&str]) -> Option<TitleMatch> {
    first_titled_line(lines, 0)
}

/// First line from `from` on that still has text once cleaned; fences,
/// lone `#`/quote runs and `Description:` headers are passed over
fn first_titled_line(lines: &[&str], from: usize) -> Option<TitleMatch> {
    lines.iter().enumerate().skip(from).find_map(|(i, line)| {
        if strip_prefix_ignore_case(line.trim(), "description:").is_some() {
            return None;
        }
        let title = clean_title(line);
        (!title.is_empty()).then_some(TitleMatch {
            title,
            body_start: i + 1,
        })
    })
}

fn clean_title(raw: &str) -> String {
    let title = raw
        .trim()
        .trim_matches(|c: char| c == '#' || QUOTE_CHARS.contains(&c))
        .trim();
    strip_prefix_ignore_case(title, "title:")
        .unwrap_or(title)
        .trim()
        .trim_matches(QUOTE_CHARS)
        .trim()
        .to_string()
}

/// Drop a ``` fence pair around the whole reply
fn unfence<'a, 'b>(lines: &'a [&'b str]) -> &'a [&'b str] {
    let is_fence = |line: &&str| line.trim_start().starts_with("```");
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());

    match (first, last) {
        (Some(first), Some(last)) if first < last && is_fence(&lines[first]) && lines[last].trim() == "```" => {
            &lines[first + 1..last]
        }
        _ => lines,
    }
}

/// Everything after the title, minus a `Description:` header and leading
/// blank lines
fn parse_description(lines: &[&str]) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut found_content = false;

    for line in lines {
        let trimmed = line.trim();

        if let Some(rest) = strip_prefix_ignore_case(trimmed, "description:") {
            let rest = rest.trim();
            if !rest.is_empty() {
                kept.push(rest);
                found_content = true;
            }
            continue;
        }

        if !found_content && trimmed.is_empty() {
            continue;
        }

        found_content = true;
        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(text: &str) -> PrContent {
        parse_pr_content(text).content
    }

    #[test]
    fn test_commit_message_quotes_and_whitespace() {
        assert_eq!(parse_commit_message("  \"Add x\"  "), "Add x");
        assert_eq!(parse_commit_message("'  \"Add x\"  '"), "Add x");
        assert_eq!(parse_commit_message("`Fix typo`\n"), "Fix typo");
        assert_eq!(parse_commit_message("Plain message"), "Plain message");
    }

    #[test]
    fn test_commit_message_unbalanced_quotes() {
        assert_eq!(parse_commit_message("\"Add x"), "Add x");
        assert_eq!(parse_commit_message("Add x'"), "Add x");
    }

    #[test]
    fn test_marker_and_plain_replies_agree() {
        let with_markers = parse_pr_content("Title: Fix bug\n\nDescription:\nFixes it.");
        let plain = parse_pr_content("Fix bug\n\nFixes it.");

        assert_eq!(with_markers.content, plain.content);
        assert_eq!(
            plain.content,
            PrContent {
                title: "Fix bug".into(),
                description: "Fixes it.".into(),
            }
        );
        assert_eq!(with_markers.rule, TitleRule::TitleMarker);
        assert_eq!(plain.rule, TitleRule::FirstNonBlank);
    }

    #[test]
    fn test_standard_format() {
        let parsed = pr("Title: Add user authentication\n\nDescription:\nThis PR adds JWT-based authentication.\n\nKey changes:\n- Add auth middleware\n- Add login endpoint");
        assert_eq!(parsed.title, "Add user authentication");
        assert_eq!(
            parsed.description,
            "This PR adds JWT-based authentication.\n\nKey changes:\n- Add auth middleware\n- Add login endpoint"
        );
    }

    #[test]
    fn test_quoted_and_lowercase_titles() {
        assert_eq!(pr("Title: \"Fix bug in parser\"\n\nFixed.").title, "Fix bug in parser");
        let parsed = pr("title: Update dependencies\n\ndescription:\nUpdated all npm packages.");
        assert_eq!(parsed.title, "Update dependencies");
        assert_eq!(parsed.description, "Updated all npm packages.");
        assert_eq!(pr("TITLE: Shouting\nbody").title, "Shouting");
    }

    #[test]
    fn test_markdown_heading_title() {
        let parsed = pr("# Refactor database layer\n\nThis refactors the database.");
        assert_eq!(parsed.title, "Refactor database layer");
        assert_eq!(parsed.description, "This refactors the database.");
    }

    #[test]
    fn test_title_marker_after_preamble() {
        let parsed = parse_pr_content("Sure! Here it is:\n\nTitle: Add caching\nDescription: Speeds up lookups.");
        assert_eq!(parsed.rule, TitleRule::TitleMarker);
        assert_eq!(parsed.content.title, "Add caching");
        assert_eq!(parsed.content.description, "Speeds up lookups.");
    }

    #[test]
    fn test_residual_title_prefix_is_stripped() {
        assert_eq!(pr("Title: Title: Double").title, "Double");
        assert_eq!(pr("`title: quoted`").title, "quoted");
    }

    #[test]
    fn test_empty_title_marker_uses_next_line() {
        let parsed = parse_pr_content("Title:\nFix bug\n\nFixes it.");
        assert_eq!(parsed.rule, TitleRule::TitleMarker);
        assert_eq!(
            parsed.content,
            PrContent {
                title: "Fix bug".into(),
                description: "Fixes it.".into(),
            }
        );
    }

    #[test]
    fn test_fenced_reply() {
        let parsed = parse_pr_content("```\nFix bug\n\nFixes it.\n```");
        assert_eq!(parsed.rule, TitleRule::FirstNonBlank);
        assert_eq!(parsed.content.title, "Fix bug");
        assert_eq!(parsed.content.description, "Fixes it.");

        let parsed = parse_pr_content("```markdown\nTitle: Fix bug\n\nDescription:\nFixes it.\n```\n");
        assert_eq!(parsed.rule, TitleRule::TitleMarker);
        assert_eq!(parsed.content.title, "Fix bug");
        assert_eq!(parsed.content.description, "Fixes it.");
    }

    #[test]
    fn test_unclosed_fence_is_not_a_title() {
        let parsed = parse_pr_content("```\nFix bug\nFixes it.");
        assert_eq!(parsed.content.title, "Fix bug");
        assert_eq!(parsed.content.description, "Fixes it.");
    }

    #[test]
    fn test_title_is_empty_only_without_text() {
        for reply in ["Title:", "```\n```", "\"\"\n#", "Title:\n\n``"] {
            let parsed = parse_pr_content(reply);
            assert_eq!(parsed.rule, TitleRule::Blank, "{reply:?}");
            assert_eq!(parsed.content, PrContent::default());
        }
    }

    #[test]
    fn test_blank_reply() {
        let parsed = parse_pr_content("\n   \n\t\n");
        assert_eq!(parsed.rule, TitleRule::Blank);
        assert_eq!(parsed.content, PrContent::default());
    }

    #[test]
    fn test_title_only_reply() {
        let parsed = pr("Title: Lonely");
        assert_eq!(parsed.title, "Lonely");
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn test_description_keeps_inner_blank_lines_and_indent() {
        let lines = ["", "Description:", "Summary.", "", "  - indented item"];
        assert_eq!(parse_description(&lines), "Summary.\n\n  - indented item");
    }

    #[test]
    fn test_description_variants() {
        assert_eq!(parse_description(&["This is a description."]), "This is a description.");
        assert_eq!(parse_description(&["Description:", "This is the content."]), "This is the content.");
        assert_eq!(parse_description(&["", "", "Content here"]), "Content here");
        assert_eq!(parse_description(&["Line 1", "Line 2", "Line 3"]), "Line 1\nLine 2\nLine 3");
        assert_eq!(parse_description(&[]), "");
    }

    #[test]
    fn test_prefix_match_is_char_boundary_safe() {
        assert_eq!(strip_prefix_ignore_case("tïtle: x", "title:"), None);
        assert_eq!(strip_prefix_ignore_case("é", "title:"), None);
    }
}
