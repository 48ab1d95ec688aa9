use cdmi_derive::cdmi_error;
use std::borrow::Cow;

#[cdmi_error]
pub enum DemoError {
    #[error("I/O failure{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Format failure{}: {source}", format_context(.context))]
    Format { source: std::fmt::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("boom")).context("reading demo file")
}

fn main() {
    let err = read().unwrap_err();
    assert!(matches!(err, DemoError::Io { context: Some(_), .. }));

    let err: DemoError = "plain message".into();
    assert_eq!(err.to_string(), "Internal error: plain message");

    let err = Err::<(), _>(DemoError::from(std::fmt::Error)).context("late").unwrap_err();
    assert!(err.to_string().starts_with("Format failure (late)"));
}
