use std::borrow::Cow;

#[ssgen_derive::scaffold_error]
pub(crate) enum GatedError {
    #[cfg(unix)]
    #[error("Unix error{}: {source}", format_context(.context))]
    Unix { source: std::fmt::Error, context: Option<Cow<'static, str>> },

    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u8, GatedError> {
    raw.parse::<u8>().context("parsing level")
}

fn main() {
    assert_eq!(parse("7").ok(), Some(7));
    let err = parse("x").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (parsing level): "));
}
