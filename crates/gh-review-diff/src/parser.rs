//! Parse unified diff format (as returned by the GitHub API).

use crate::model::{FileChange, FileStatus};
use thiserror::Error;
use unidiff::{Hunk, PatchSet, PatchedFile};

/// Errors that can occur during diff parsing.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Failed to parse diff: {0}")]
    ParseFailed(String),
    #[error("Diff contains no file entries")]
    NoFiles,
}

/// Parse a unified diff string into per-file change records.
///
/// Fails when the text cannot be parsed as a unified diff, or when it
/// yields no file entries at all; there is no partial parse.
pub fn parse_diff(diff_text: &str) -> Result<Vec<FileChange>, DiffError> {
    let mut patch_set = PatchSet::new();
    patch_set
        .parse(diff_text)
        .map_err(|e| DiffError::ParseFailed(e.to_string()))?;

    let files: Vec<FileChange> = patch_set.files().iter().map(parse_patched_file).collect();

    if files.is_empty() {
        return Err(DiffError::NoFiles);
    }

    Ok(files)
}

fn parse_patched_file(file: &PatchedFile) -> FileChange {
    let target = clean_path(&file.target_file);
    let source = clean_path(&file.source_file);

    let mut change = FileChange::new(&target);
    change.status = determine_status(&source, &target);

    // On deletions the target is /dev/null; address the file by its old path.
    if change.status == FileStatus::Deleted {
        change.path = source.clone();
    } else if source != target && !source.is_empty() && source != "/dev/null" {
        change.old_path = Some(source);
    }

    for hunk in file.hunks() {
        append_hunk_text(&mut change.patch, hunk);

        for line in hunk.lines() {
            let content = strip_newline(&line.value);
            match line.line_type.as_str() {
                "+" => {
                    if let Some(n) = line.target_line_no {
                        change.added_lines.push((n as u32, content));
                    }
                }
                "-" => {
                    if let Some(n) = line.source_line_no {
                        change.deleted_lines.push((n as u32, content));
                    }
                }
                _ => {}
            }
        }
    }

    change.additions = change.added_lines.len();
    change.deletions = change.deleted_lines.len();
    change
}

/// Reconstruct the raw hunk text for diagnostics.
fn append_hunk_text(out: &mut String, hunk: &Hunk) {
    out.push_str(&format!(
        "@@ -{},{} +{},{} @@",
        hunk.source_start, hunk.source_length, hunk.target_start, hunk.target_length
    ));
    if !hunk.section_header.is_empty() {
        out.push(' ');
        out.push_str(&hunk.section_header);
    }
    out.push('\n');

    for line in hunk.lines() {
        out.push_str(&line.line_type);
        out.push_str(strip_newline(&line.value).as_str());
        out.push('\n');
    }
}

fn strip_newline(value: &str) -> String {
    value.trim_end_matches('\n').trim_end_matches('\r').to_string()
}

fn determine_status(source: &str, target: &str) -> FileStatus {
    if source == "/dev/null" || source.is_empty() {
        FileStatus::Added
    } else if target == "/dev/null" || target.is_empty() {
        FileStatus::Deleted
    } else if source != target {
        FileStatus::Renamed
    } else {
        FileStatus::Modified
    }
}

/// Path a parsed file is addressed by: the new path, or the old path for
/// deletions. Shared with the line-map builder so both index files the
/// same way.
pub(crate) fn parsed_file_path(file: &PatchedFile) -> String {
    let target = clean_path(&file.target_file);
    let source = clean_path(&file.source_file);
    if target == "/dev/null" || target.is_empty() {
        source
    } else {
        target
    }
}

/// Clean the path by removing a/b prefixes from git diff output.
fn clean_path(path: &str) -> String {
    let path = path.trim();

    if let Some(stripped) = path.strip_prefix("a/") {
        return stripped.to_string();
    }
    if let Some(stripped) = path.strip_prefix("b/") {
        return stripped.to_string();
    }

    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_DIFF: &str = r#"diff --git a/src/main.rs b/src/main.rs
index abc123..def456 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,5 +1,6 @@ fn main()
 fn main() {
     println!("Hello");
+    println!("World");
 }

diff --git a/src/lib.rs b/src/lib.rs
index 111222..333444 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -10,7 +10,6 @@ impl Foo {
 impl Foo {
     fn bar(&self) {
-        // old comment
         self.do_thing();
     }
 }
"#;

    #[test]
    fn test_parse_simple_diff() {
        let files = parse_diff(SAMPLE_DIFF).unwrap();
        assert_eq!(files.len(), 2);

        let file1 = &files[0];
        assert_eq!(file1.path, "src/main.rs");
        assert_eq!(file1.status, FileStatus::Modified);
        assert_eq!(file1.additions, 1);
        assert_eq!(file1.deletions, 0);
        assert_eq!(file1.added_lines, vec![(3, "    println!(\"World\");".to_string())]);

        let file2 = &files[1];
        assert_eq!(file2.path, "src/lib.rs");
        assert_eq!(file2.additions, 0);
        assert_eq!(file2.deletions, 1);
        assert_eq!(file2.deleted_lines, vec![(12, "        // old comment".to_string())]);
    }

    #[test]
    fn test_parse_new_file() {
        let diff = r#"diff --git a/new_file.rs b/new_file.rs
new file mode 100644
index 0000000..abc1234
--- /dev/null
+++ b/new_file.rs
@@ -0,0 +1,3 @@
+fn new_function() {
+    // new code
+}
"#;

        let files = parse_diff(diff).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Added);
        assert_eq!(files[0].additions, 3);
        assert_eq!(
            files[0].added_lines.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_parse_deleted_file() {
        let diff = r#"diff --git a/old_file.rs b/old_file.rs
deleted file mode 100644
index abc1234..0000000
--- a/old_file.rs
+++ /dev/null
@@ -1,3 +0,0 @@
-fn old_function() {
-    // old code
-}
"#;

        let files = parse_diff(diff).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Deleted);
        assert_eq!(files[0].path, "old_file.rs");
        assert_eq!(files[0].deletions, 3);
    }

    #[test]
    fn test_parse_renamed_file() {
        let diff = r#"diff --git a/old_name.rs b/new_name.rs
similarity index 95%
rename from old_name.rs
rename to new_name.rs
index abc123..def456 100644
--- a/old_name.rs
+++ b/new_name.rs
@@ -1,3 +1,3 @@
 fn example() {
-    // old
+    // new
 }
"#;

        let files = parse_diff(diff).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "new_name.rs");
        assert_eq!(files[0].old_path, Some("old_name.rs".to_string()));
        assert_eq!(files[0].status, FileStatus::Renamed);
    }

    #[test]
    fn test_added_line_numbers_round_trip() {
        // Added-only diff: parsed numbers must match the hunk header exactly,
        // contiguous and without duplicates.
        let diff = r#"diff --git a/app.py b/app.py
index abc123..def456 100644
--- a/app.py
+++ b/app.py
@@ -9,0 +10,3 @@
+def f():
+    x = 1
+    return x
"#;
        let files = parse_diff(diff).unwrap();
        let numbers: Vec<u32> = files[0].added_lines.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![10, 11, 12]);
    }

    #[test]
    fn test_no_files_is_an_error() {
        assert!(matches!(parse_diff(""), Err(DiffError::NoFiles)));
        assert!(matches!(
            parse_diff("this is not a diff\njust some text\n"),
            Err(_)
        ));
    }

    #[test]
    fn test_raw_patch_retained() {
        let files = parse_diff(SAMPLE_DIFF).unwrap();
        assert!(files[0].patch.contains("@@ -1,5 +1,6 @@"));
        assert!(files[0].patch.contains("+    println!(\"World\");"));
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("a/src/main.rs"), "src/main.rs");
        assert_eq!(clean_path("b/src/main.rs"), "src/main.rs");
        assert_eq!(clean_path("src/main.rs"), "src/main.rs");
        assert_eq!(clean_path("/dev/null"), "/dev/null");
    }
}
