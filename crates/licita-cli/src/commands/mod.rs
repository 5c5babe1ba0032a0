pub mod consolidate;
pub mod rules;
pub mod split;

use licita_core::error::LicitaError;
use licita_core::rules::builtin;
use licita_core::rules::schema::KeywordRuleSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A rendered file and where it goes.
pub type Output = (PathBuf, Vec<u8>);

/// Write rendered outputs into `dir`, all or nothing.
///
/// Every buffer is first written to a temporary file in `dir`; the files are
/// moved into place only once all of them are on disk. If moving one fails,
/// the outputs already moved are removed again.
pub fn write_outputs(dir: &Path, outputs: &[Output]) -> Result<(), LicitaError> {
    std::fs::create_dir_all(dir)?;

    let mut staged = Vec::with_capacity(outputs.len());
    for (path, bytes) in outputs {
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;
        staged.push((file, path));
    }

    let mut placed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (file, path) in staged {
        if let Err(e) = file.persist(path) {
            for done in &placed {
                if let Err(cleanup) = std::fs::remove_file(done) {
                    tracing::warn!(
                        path = %done.display(),
                        error = %cleanup,
                        "could not remove output"
                    );
                }
            }
            tracing::debug!(path = %path.display(), "output not written, run rolled back");
            return Err(LicitaError::Io(e.error));
        }
        placed.push(path);
    }

    for (path, bytes) in outputs {
        tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    }
    Ok(())
}

/// Load the custom rule file when given, otherwise the builtin table.
pub fn load_rules(rule_file: Option<PathBuf>) -> Result<KeywordRuleSet, LicitaError> {
    match rule_file {
        Some(path) => licita_core::rules::load_ruleset(&path),
        None => builtin::default_ruleset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_are_written_with_their_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("CATEGORIAS_SEPARADAS");
        let outputs = vec![
            (out.join("A.xlsx"), b"first".to_vec()),
            (out.join("B.xlsx"), b"second".to_vec()),
        ];

        write_outputs(&out, &outputs).unwrap();

        assert_eq!(std::fs::read(out.join("A.xlsx")).unwrap(), b"first");
        assert_eq!(std::fs::read(out.join("B.xlsx")).unwrap(), b"second");
        // no temporary files left behind
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }

    #[test]
    fn blocked_output_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the second workbook should go cannot be replaced
        std::fs::create_dir(dir.path().join("B.xlsx")).unwrap();
        let outputs = vec![
            (dir.path().join("A.xlsx"), b"first".to_vec()),
            (dir.path().join("B.xlsx"), b"second".to_vec()),
        ];

        let result = write_outputs(dir.path(), &outputs);

        assert!(matches!(result, Err(LicitaError::Io(_))));
        assert!(!dir.path().join("A.xlsx").exists());
        let left: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(left, vec![std::ffi::OsString::from("B.xlsx")]);
    }
}
