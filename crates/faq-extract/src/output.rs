use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{ExtractError, ExtractResult};
use crate::model::Section;

pub const DEFAULT_OUTPUT_FILE: &str = "Ranna_FAQ_complete.json";

/// Render sections as a JSON array with two-space indentation. Non-ASCII text
/// is written literally and there is no trailing newline.
pub fn render_json(sections: &[Section]) -> ExtractResult<String> {
    Ok(serde_json::to_string_pretty(sections)?)
}

/// Render `sections` and write them to `path`, replacing any existing file.
pub fn write_json(path: &Path, sections: &[Section]) -> ExtractResult<()> {
    let rendered = render_json(sections)?;
    write_atomic(path, &rendered)
}

pub fn write_atomic(path: &Path, content: &str) -> ExtractResult<()> {
    let tmp_path = unique_tmp_path(path);
    let write_err = |source| ExtractError::Write {
        path: path.to_path_buf(),
        source,
    };

    let written = File::create(&tmp_path).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(err));
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(err));
    }

    Ok(())
}

fn unique_tmp_path(path: &Path) -> PathBuf {
    let mut counter = 0u32;
    loop {
        let candidate = if counter == 0 {
            path.with_extension("tmp")
        } else {
            path.with_extension(format!("tmp{counter}"))
        };

        if !candidate.exists() {
            return candidate;
        }

        counter += 1;
    }
}
