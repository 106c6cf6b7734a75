use std::fmt;

#[derive(Debug)]
pub struct StringError(pub &'static str);

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for StringError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_message() {
        let err = StringError("Fail to take partition");
        assert_eq!(err.to_string(), "Fail to take partition");

        let boxed: anyhow::Error = err.into();
        assert_eq!(boxed.to_string(), "Fail to take partition");
    }
}
