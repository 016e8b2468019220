use paywall_derive::paywall_error;
use std::borrow::Cow;

#[paywall_error]
pub enum LookupError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Record missing{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), LookupError> {
    let io: Result<(), std::io::Error> = Err(std::io::Error::other("disk"));
    io.context("Reading fixture")?;
    Ok(())
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading fixture): disk");

    let internal: LookupError = "boom".into();
    let internal = Err::<(), _>(internal).context("late").unwrap_err();
    assert_eq!(internal.to_string(), "Internal error (late): boom");
}
