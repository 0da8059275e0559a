use std::path::Path;

use crate::pipeline::Outcome;

/// Counts the `.smali` files below `dir`. Unreadable entries are skipped.
pub fn count_smali_files(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().filter(|s| *s == "smali").is_some()
        })
        .count()
}

/// Logs how much smali a successful run produced and returns the file count.
/// An empty output tree is only worth a warning, the tools reported success.
pub fn report(outcome: &Outcome) -> usize {
    let count = count_smali_files(&outcome.smali_dir);
    if count == 0 {
        log::warn!(
            "No smali files were produced in {}",
            outcome.smali_dir.display()
        );
    } else {
        log::info!(
            "Disassembled {} into {count} smali files in {}",
            outcome.dex_path.display(),
            outcome.smali_dir.display()
        );
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_nested_smali_files() -> std::io::Result<()> {
        let temp = tempfile::tempdir()?;
        let package = temp.path().join("com").join("example");
        std::fs::create_dir_all(&package)?;
        std::fs::write(
            package.join("MainActivity.smali"),
            ".class public Lcom/example/MainActivity;\n",
        )?;
        std::fs::write(package.join("R.smali"), ".class public final Lcom/example/R;\n")?;
        std::fs::write(package.join("notes.txt"), "not smali")?;
        std::fs::create_dir_all(temp.path().join("empty.smali"))?;

        assert_eq!(count_smali_files(temp.path()), 2);
        Ok(())
    }

    #[test]
    fn missing_directory_counts_nothing() {
        assert_eq!(
            count_smali_files(Path::new("/nonexistent/apk2smali/output")),
            0
        );
    }

    #[test]
    fn report_counts_output() -> std::io::Result<()> {
        let temp = tempfile::tempdir()?;
        let outcome = Outcome {
            dex_path: temp.path().join("extracted").join("classes.dex"),
            smali_dir: temp.path().join("smali"),
        };
        std::fs::create_dir_all(&outcome.smali_dir)?;
        assert_eq!(report(&outcome), 0);

        std::fs::write(outcome.smali_dir.join("A.smali"), ".class public LA;\n")?;
        assert_eq!(report(&outcome), 1);
        Ok(())
    }
}
