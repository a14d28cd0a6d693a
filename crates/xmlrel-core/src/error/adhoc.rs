/// Free-form error built by the `err!` and `bail!` macros or by string
/// context.
#[derive(Debug)]
pub(super) struct Adhoc {
    message: Box<str>,
}

impl Adhoc {
    pub(super) fn new(message: impl Into<String>) -> Adhoc {
        Adhoc {
            message: message.into().into(),
        }
    }
}

impl std::error::Error for Adhoc {}

impl core::fmt::Display for Adhoc {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}
