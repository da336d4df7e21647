use ssgen_derive::scaffold_error;
use std::borrow::Cow;
use std::path::PathBuf;

#[scaffold_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("File already exists: {}", .path.display())]
    Collision { path: PathBuf },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<(), DemoError> {
    let failure: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
    failure.context("reading template")?;
    Ok(())
}

fn main() {
    let err = read_missing().unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading template): boom");

    let plain: DemoError = std::io::Error::other("raw").into();
    assert_eq!(plain.to_string(), "IO error: raw");

    let internal: DemoError = "oops".into();
    let internal = Err::<(), _>(internal).context("rendering").unwrap_err();
    assert_eq!(internal.to_string(), "Internal error (rendering): oops");

    let owned: DemoError = String::from("owned").into();
    assert_eq!(owned.to_string(), "Internal error: owned");

    let collision = Err::<(), _>(DemoError::Collision { path: PathBuf::from("subsys-a.h") })
        .context("ignored")
        .unwrap_err();
    assert_eq!(collision.to_string(), "File already exists: subsys-a.h");
}
