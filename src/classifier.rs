//! Line classification for the INI grammar
//!
//! Each physical line is reduced to a [`LineKind`] by an ordered set of pure
//! matchers. Order matters: a section header wins over everything, `+=` wins
//! over `=` because the append operator also contains `=`, and anything left
//! over is a continuation of the previous label.

/// Characters that start a comment running to end of line
pub const COMMENT_CHARS: [char; 2] = [';', '#'];

/// Append operator
pub const APPEND_OPERATOR: &str = "+=";

/// Assignment operator
pub const ASSIGN_OPERATOR: char = '=';

/// Inclusion directives recognised inside a section header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `[Include <path>]`, a missing file is skipped
    Include,
    /// `[Require <path>]`, a missing file is an error
    Require,
}

impl Directive {
    /// Keyword prefix, including the separating space
    pub fn keyword(self) -> &'static str {
        match self {
            Directive::Include => "Include ",
            Directive::Require => "Require ",
        }
    }
}

/// Classified content of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Blank line or comment only
    Comment,
    /// `[name]`, the name may be empty and must be rejected by the caller
    Section(&'a str),
    /// `[Include path]` or `[Require path]`
    Directive { directive: Directive, target: &'a str },
    /// `label += value`
    Append { label: &'a str, value: &'a str },
    /// `label = value`
    Assign { label: &'a str, value: &'a str },
    /// Any other text, appended to the most recent label
    Continuation(&'a str),
}

impl LineKind<'_> {
    /// Returns a short name for the kind of line
    pub fn type_name(&self) -> &'static str {
        match self {
            LineKind::Comment => "comment",
            LineKind::Section(_) => "section",
            LineKind::Directive { .. } => "directive",
            LineKind::Append { .. } => "append",
            LineKind::Assign { .. } => "assign",
            LineKind::Continuation(_) => "continuation",
        }
    }
}

/// Removes everything from the first comment character onward and trims.
pub fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_CHARS) {
        Some(start) => line[..start].trim(),
        None => line.trim(),
    }
}

/// Recognises `[name]` and returns the trimmed interior.
///
/// The whole line has to be the bracket pair, and the interior may not
/// contain a closing bracket. `[ ]` reports an empty name.
pub fn match_section(line: &str) -> Option<&str> {
    let interior = line.strip_prefix('[')?.strip_suffix(']')?;
    if interior.contains(']') {
        return None;
    }
    Some(interior.trim())
}

/// Recognises `label += value`, splitting at the first `+=`.
pub fn match_append(line: &str) -> Option<(&str, &str)> {
    line.split_once(APPEND_OPERATOR)
        .map(|(label, value)| (label.trim(), value.trim()))
}

/// Recognises `label = value`, splitting at the first `=`.
pub fn match_assign(line: &str) -> Option<(&str, &str)> {
    line.split_once(ASSIGN_OPERATOR)
        .map(|(label, value)| (label.trim(), value.trim()))
}

/// Recognises an inclusion directive inside an already trimmed section name.
pub fn match_directive(section: &str) -> Option<(Directive, &str)> {
    [Directive::Require, Directive::Include]
        .into_iter()
        .find_map(|directive| {
            section
                .strip_prefix(directive.keyword())
                .map(|target| (directive, target.trim()))
        })
}

/// Classifies a raw line.
pub fn classify(line: &str) -> LineKind<'_> {
    let line = strip_comment(line);
    if line.is_empty() {
        return LineKind::Comment;
    }

    if let Some(name) = match_section(line) {
        return match match_directive(name) {
            Some((directive, target)) => LineKind::Directive { directive, target },
            None => LineKind::Section(name),
        };
    }

    if let Some((label, value)) = match_append(line) {
        return LineKind::Append { label, value };
    }

    if let Some((label, value)) = match_assign(line) {
        return LineKind::Assign { label, value };
    }

    LineKind::Continuation(line)
}
