use crate::Error;

/// Convert the result of `easy_parse` into our own error type,
/// quoting the line where parsing failed.
pub fn finish<'a, T>(
    text: &'a str,
    result: Result<(T, &'a str), combine::easy::ParseError<&'a str>>,
) -> Result<T, Error> {
    result
        .map(|(parsed, _remainder)| parsed)
        .map_err(|e| {
            let pos = e.position.translate_position(text);
            // isolate the line in question:
            let before = &text[0..pos];
            let after = &text[pos..text.len()];
            let prefix: String = before.chars().rev().take_while(|&c| c != '\n').collect();
            let prefix: String = prefix.chars().rev().collect();
            let suffix: String = after.chars().take_while(|&c| c != '\n').collect();
            let line = prefix + &suffix;
            // since converting combine's errors is a lifetime nightmare,
            // we just stringify the error before returning it.
            Error::Parse {
                pos,
                line,
                msg: format!("{}", e),
            }
        })
}

pub mod prelude {
    pub use combine::parser::char::{char, digit, spaces};
    pub use combine::parser::range::recognize;
    pub use combine::*;
}

pub mod util {

    use super::prelude::*;
    use combine::parser::char::space;

    p! {
        whitespace() -> (), {
            skip_many1(space())
        }
    }

    wrapper! {
        lex(parser), {
            optional(whitespace()).with(parser).skip(optional(whitespace()))
        }
    }

    p! {
        line_internal_whitespace() -> (), {
            skip_many1(satisfy(|c: char| c.is_whitespace() && c != '\n'))
        }
    }

    wrapper! {
        lex_inline(parser), {
            optional(line_internal_whitespace())
                .with(parser)
                .skip(optional(line_internal_whitespace()))
        }
    }

    p! {
        integer() -> usize, {
            recognize(skip_many1(digit())).and_then(|digits: &str| digits.parse::<usize>())
        }
    }

}
