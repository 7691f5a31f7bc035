// crates/jsprep/src/batch.rs
//
// Batch directory mode: mirror srcdir into dstdir, parsing every `.js`
// file and copying everything else byte-for-byte. One engine handles the
// whole tree, so definitions carry over from file to file.

use std::fs;
use std::io;
use std::path::Path;

use jsprep_engine::Preprocessor;
use log::debug;
use walkdir::WalkDir;

use crate::CliError;

/// True when `dir` (relative to srcdir, forward slashes, empty for the
/// root) is an excluded directory or sits anywhere under one.
fn is_excluded(dir: &str, excludes: &[String]) -> bool {
    excludes
        .iter()
        .any(|e| dir == e || dir.starts_with(&format!("{}/", e)))
}

/// Process the whole tree and return the number of parsed files. Copied
/// files do not count.
pub fn process_tree(
    engine: &mut Preprocessor,
    srcdir: &Path,
    dstdir: &Path,
    excludes: &[String],
) -> Result<usize, CliError> {
    let mut count = 0;

    for entry in WalkDir::new(srcdir).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(srcdir).unwrap_or(entry.path());
        let dir = match relative.parent() {
            Some(parent) => parent.to_string_lossy().replace('\\', "/"),
            None => String::new(),
        };
        if is_excluded(&dir, excludes) {
            debug!("excluded: {}", entry.path().display());
            continue;
        }

        let out_path = dstdir.join(relative);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !entry.file_name().to_string_lossy().ends_with(".js") {
            println!(
                "Copying {} -> {}",
                entry.path().display(),
                out_path.display()
            );
            fs::copy(entry.path(), &out_path)?;
            continue;
        }

        println!(
            "Processing {} -> {}",
            entry.path().display(),
            out_path.display()
        );
        let output = engine.parse_file(entry.path())?;
        fs::write(&out_path, output)?;
        count += 1;
    }

    println!("Processed {} files.", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_exclusion_rules() {
        let excludes = vec!["vendor".to_string(), "third/party".to_string()];
        assert!(is_excluded("vendor", &excludes));
        assert!(is_excluded("vendor/js", &excludes));
        assert!(is_excluded("third/party/lib", &excludes));
        assert!(!is_excluded("vendored", &excludes));
        assert!(!is_excluded("third", &excludes));
        assert!(!is_excluded("", &excludes));
    }

    #[test]
    fn test_tree_is_mirrored() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir_all(src.join("lib")).unwrap();
        fs::write(
            src.join("app.js"),
            "//@define A 1\n//@if A\nkeep();\n//@end\n",
        )
        .unwrap();
        fs::write(src.join("lib/util.js"), "util();\n").unwrap();
        fs::write(src.join("style.css"), "body {}\n").unwrap();

        let mut engine = Preprocessor::new();
        let count = process_tree(&mut engine, &src, &dst, &[]).unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read_to_string(dst.join("app.js")).unwrap(), "keep();\n");
        assert_eq!(
            fs::read_to_string(dst.join("lib/util.js")).unwrap(),
            "util();\n"
        );
        assert_eq!(
            fs::read_to_string(dst.join("style.css")).unwrap(),
            "body {}\n"
        );
    }

    #[test]
    fn test_excluded_directory_is_skipped() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir_all(src.join("vendor/deep")).unwrap();
        fs::write(src.join("main.js"), "main();\n").unwrap();
        fs::write(src.join("vendor/lib.js"), "lib();\n").unwrap();
        fs::write(src.join("vendor/deep/more.js"), "more();\n").unwrap();

        let mut engine = Preprocessor::new();
        let count =
            process_tree(&mut engine, &src, &dst, &["vendor".to_string()]).unwrap();

        assert_eq!(count, 1);
        assert!(dst.join("main.js").exists());
        assert!(!dst.join("vendor").join("lib.js").exists());
        assert!(!dst.join("vendor").join("deep").join("more.js").exists());
    }

    #[test]
    fn test_definitions_carry_across_files() {
        // Files are visited in name order, so `a_defs.js` runs first.
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a_defs.js"), "//@define SHARED 1\n").unwrap();
        fs::write(
            src.join("b_use.js"),
            "//@ifdef SHARED\nshared();\n//@end\n",
        )
        .unwrap();

        let mut engine = Preprocessor::new();
        process_tree(&mut engine, &src, &dst, &[]).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a_defs.js")).unwrap(), "");
        assert_eq!(
            fs::read_to_string(dst.join("b_use.js")).unwrap(),
            "shared();\n"
        );
    }
}
