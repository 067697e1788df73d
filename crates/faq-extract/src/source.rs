use std::borrow::Cow;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::error::{ExtractError, ExtractResult};
use crate::fixture::RANNA_FAQ;

/// Where the markdown document comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentSource {
    #[default]
    Embedded,
    File(PathBuf),
    Stdin,
}

impl DocumentSource {
    /// `-` selects stdin, anything else is a file path.
    pub fn from_arg(arg: PathBuf) -> Self {
        if arg == PathBuf::from("-") {
            DocumentSource::Stdin
        } else {
            DocumentSource::File(arg)
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DocumentSource::Embedded => "embedded FAQ document".to_string(),
            DocumentSource::File(path) => path.display().to_string(),
            DocumentSource::Stdin => "stdin".to_string(),
        }
    }
}

pub fn load_document(source: &DocumentSource) -> ExtractResult<Cow<'static, str>> {
    match source {
        DocumentSource::Embedded => Ok(Cow::Borrowed(RANNA_FAQ)),
        DocumentSource::File(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Read {
                path: path.clone(),
                source,
            })?;
            Ok(Cow::Owned(content))
        }
        DocumentSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(ExtractError::Stdin)?;
            Ok(Cow::Owned(buffer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn dash_selects_stdin() {
        assert_eq!(DocumentSource::from_arg("-".into()), DocumentSource::Stdin);
        assert_eq!(
            DocumentSource::from_arg("faq.md".into()),
            DocumentSource::File("faq.md".into())
        );
    }

    #[test]
    fn embedded_source_borrows_fixture() {
        let loaded = load_document(&DocumentSource::Embedded).unwrap();
        assert!(matches!(loaded, Cow::Borrowed(_)));
        assert!(loaded.contains("## 1. About Ranna"));
    }

    #[test]
    fn reads_file_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("faq.md");
        std::fs::write(&path, "## Hours\n**Open?**\nYes\n").unwrap();

        let loaded = load_document(&DocumentSource::File(path)).unwrap();
        assert_eq!(loaded, "## Hours\n**Open?**\nYes\n");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_document(&DocumentSource::File("does/not/exist.md".into())).unwrap_err();
        assert!(matches!(err, ExtractError::Read { .. }));
    }
}
