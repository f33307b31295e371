//! Keyword-delimited blocks, e.g.
//!
//! ```text
//! spc
//!     1-3
//! end spc
//! ```

use combine::parser::char::string;
use combine::EasyParser;

use crate::ast::NamedBlock;
use crate::parse::finish;
use crate::parse::prelude::*;
use crate::parse::util::line_internal_whitespace;
use crate::Error;

const INDENT: &str = "    ";

p! {
    comment() -> (), {
        char('#').with(skip_many(none_of("\n".chars())))
    }
}

p! {
    uncommented() -> Vec<&'a str>, {
        many(choice!(
            comment().map(|_| ""),
            recognize(skip_many1(none_of("#".chars())))
        ))
        .skip(eof())
    }
}

p! {
    line_end() -> (), {
        char('\n').map(|_| ()).or(eof())
    }
}

p! {
    any_line() -> &'a str, {
        choice!(
            attempt(recognize(skip_many(none_of("\n".chars())).skip(char('\n')))),
            recognize(skip_many1(none_of("\n".chars()))).skip(eof())
        )
    }
}

// a line holding only the keyword, e.g. `spc`
p! {
    header(keyword: &'static str) -> (), {
        attempt(
            optional(line_internal_whitespace())
                .with(string(keyword))
                .skip(optional(line_internal_whitespace()))
                .skip(line_end())
        )
        .map(|_| ())
    }
}

// a header with a name, e.g. `level lvl_wbs`
p! {
    named_header(keyword: &'static str) -> &'a str, {
        attempt(
            optional(line_internal_whitespace())
                .with(string(keyword))
                .skip(line_internal_whitespace())
                .with(recognize(skip_many1(satisfy(|c: char| !c.is_whitespace()))))
                .skip(optional(line_internal_whitespace()))
                .skip(line_end())
        )
    }
}

p! {
    end_line(keyword: &'static str) -> &'static str, {
        attempt(
            optional(line_internal_whitespace())
                .with(string("end"))
                .skip(line_internal_whitespace())
                .with(string(keyword))
                .skip(optional(line_internal_whitespace()))
                .skip(line_end())
        )
        .map(|_| "end")
    }
}

// everything up to, but not including, the end line
p! {
    body(keyword: &'static str) -> &'a str, {
        recognize(skip_many(not_followed_by(end_line(keyword)).with(any_line())))
    }
}

p! {
    first_block(keyword: &'static str) -> &'a str, {
        skip_many(not_followed_by(header(keyword).map(|_| "header")).with(any_line()))
            .with(header(keyword))
            .with(body(keyword))
            .skip(end_line(keyword))
    }
}

p! {
    named_block(keyword: &'static str) -> NamedBlock<'a>, {
        named_header(keyword)
            .and(body(keyword))
            .skip(end_line(keyword))
            .map(|(name, content)| NamedBlock { name, content })
    }
}

p! {
    named_blocks_in(keyword: &'static str) -> Vec<NamedBlock<'a>>, {
        many(choice!(
            named_block(keyword).map(Some),
            any_line().map(|_| None)
        ))
        .skip(eof())
        .map(|blocks: Vec<Option<NamedBlock<'a>>>| blocks.into_iter().flatten().collect())
    }
}

/// Remove everything from `#` to the end of each line, keeping line breaks.
pub fn strip_comments(text: &str) -> Result<String, Error> {
    Ok(finish(text, uncommented().easy_parse(text))?.concat())
}

/// Get the text strictly between a line containing only `keyword`
/// and the next line reading `end <keyword>`.
pub fn block<'a>(text: &'a str, keyword: &'static str) -> Result<&'a str, Error> {
    first_block(keyword)
        .easy_parse(text)
        .map(|(content, _rest)| content)
        .map_err(|_| Error::BlockNotFound(keyword.to_owned()))
}

/// Get every block whose header line reads `<keyword> <name>`, in file order.
/// A header without a matching `end` line is a parse error.
pub fn named_blocks<'a>(text: &'a str, keyword: &'static str) -> Result<Vec<NamedBlock<'a>>, Error> {
    finish(text, named_blocks_in(keyword).easy_parse(text))
}

/// Re-indent block content to a uniform four spaces, dropping blank lines.
pub fn format_block(content: &str) -> String {
    let mut formatted = String::with_capacity(content.len() + 16);
    for line in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if !formatted.is_empty() {
            formatted.push('\n');
        }
        formatted.push_str(INDENT);
        formatted.push_str(line);
    }
    formatted
}
