//! Copyright header stamper for source trees
//!
//! Walks a directory tree and makes sure every file with the target
//! extension starts with the header line, prepending it when missing.

use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Header line required at the top of every C# script
pub const COPYRIGHT_HEADER: &str = "// Copyright (c) Meta Platforms, Inc. and affiliates.";

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOutcome {
    /// First line already contained the header
    AlreadyPresent,
    /// Header line was prepended
    Inserted,
}

/// Summary of a stamping run
#[derive(Debug, Clone, Default)]
pub struct StampReport {
    /// Root directory that was scanned
    pub root: PathBuf,
    /// Files whose extension matched
    pub files_scanned: usize,
    /// Files that received the header
    pub stamped: Vec<PathBuf>,
    /// Files that already had it
    pub already_present: usize,
}

/// Check whether the text after the final '.' in the file name equals `extension`
///
/// The comparison is case-sensitive: `Foo.CS` does not match `cs`.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .is_some_and(|(_, ext)| ext == extension)
}

/// Check whether `content`'s first line contains `header`
pub fn first_line_has_header(content: &str, header: &str) -> bool {
    content.split('\n').next().unwrap_or_default().contains(header)
}

/// Read up to and including the first newline
fn read_first_line(file: &File) -> std::io::Result<String> {
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    Ok(line)
}

/// Ensure a single file starts with `header`
///
/// The file is rewritten in place as `header + "\n" + original content`.
pub fn stamp_file(path: &Path, header: &str) -> Result<StampOutcome> {
    let read_err = |e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    };
    let write_err = |e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(read_err)?;

    let first_line = read_first_line(&file).map_err(read_err)?;
    if first_line_has_header(&first_line, header) {
        return Ok(StampOutcome::AlreadyPresent);
    }

    // Re-read from the start; the buffered first-line read moved the cursor.
    let mut content = String::new();
    file.seek(SeekFrom::Start(0)).map_err(read_err)?;
    file.read_to_string(&mut content).map_err(read_err)?;

    let stamped = format!("{header}\n{content}");
    file.seek(SeekFrom::Start(0)).map_err(write_err)?;
    file.write_all(stamped.as_bytes()).map_err(write_err)?;
    file.set_len(stamped.len() as u64).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    Ok(StampOutcome::Inserted)
}

/// Report whether a file is missing the header, without modifying it
pub fn is_missing_header(path: &Path, header: &str) -> Result<bool> {
    let first_line = File::open(path)
        .and_then(|f| read_first_line(&f))
        .map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(!first_line_has_header(&first_line, header))
}

/// Collect every regular file under `root` whose extension matches
///
/// Symlinks are not followed and are skipped along with any other
/// non-regular entry. The first traversal error aborts the walk.
pub fn find_source_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Stamp every matching file under `root`
pub fn stamp_tree(root: &Path, extension: &str, header: &str) -> Result<StampReport> {
    let mut report = StampReport {
        root: root.to_path_buf(),
        ..Default::default()
    };

    for path in find_source_files(root, extension)? {
        info!(path = %path.display(), "checking header");
        report.files_scanned += 1;

        match stamp_file(&path, header)? {
            StampOutcome::Inserted => report.stamped.push(path),
            StampOutcome::AlreadyPresent => {
                debug!(path = %path.display(), "header already present");
                report.already_present += 1;
            }
        }
    }

    info!(
        scanned = report.files_scanned,
        stamped = report.stamped.len(),
        "header stamping complete"
    );
    Ok(report)
}

/// List matching files under `root` that lack the header
pub fn check_tree(root: &Path, extension: &str, header: &str) -> Result<Vec<PathBuf>> {
    let mut missing = Vec::new();
    for path in find_source_files(root, extension)? {
        if is_missing_header(&path, header)? {
            missing.push(path);
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("Scripts/Foo.cs"), "cs"));
        assert!(has_extension(Path::new("Foo.Editor.cs"), "cs"));
        assert!(has_extension(Path::new(".cs"), "cs"));
        assert!(!has_extension(Path::new("Foo.CS"), "cs"));
        assert!(!has_extension(Path::new("Foo.txt"), "cs"));
        assert!(!has_extension(Path::new("Foo.cs.meta"), "cs"));
        assert!(!has_extension(Path::new("dir.cs/Makefile"), "cs"));
        assert!(!has_extension(Path::new("cs"), "cs"));
    }

    #[test]
    fn test_first_line_has_header() {
        assert!(first_line_has_header(
            "// Copyright (c) Meta Platforms, Inc. and affiliates.\nusing System;",
            COPYRIGHT_HEADER
        ));
        assert!(first_line_has_header(
            "\u{feff}// Copyright (c) Meta Platforms, Inc. and affiliates.\r\n",
            COPYRIGHT_HEADER
        ));
        assert!(!first_line_has_header(
            "using System;\n// Copyright (c) Meta Platforms, Inc. and affiliates.",
            COPYRIGHT_HEADER
        ));
        assert!(!first_line_has_header("", COPYRIGHT_HEADER));
    }

    #[test]
    fn test_stamp_file_prepends_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Player.cs");
        let original = "using UnityEngine;\r\n\r\npublic class Player {}\n";
        write(&path, original);

        assert_eq!(
            stamp_file(&path, COPYRIGHT_HEADER).unwrap(),
            StampOutcome::Inserted
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{COPYRIGHT_HEADER}\n{original}")
        );
    }

    #[test]
    fn test_stamp_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Empty.cs");
        write(&path, "");

        stamp_file(&path, COPYRIGHT_HEADER).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{COPYRIGHT_HEADER}\n")
        );
    }

    #[test]
    fn test_stamp_file_leaves_headered_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Ship.cs");
        let original = format!("{COPYRIGHT_HEADER}\nclass Ship {{}}\n");
        write(&path, &original);

        assert_eq!(
            stamp_file(&path, COPYRIGHT_HEADER).unwrap(),
            StampOutcome::AlreadyPresent
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_headered_file_with_invalid_utf8_body_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Legacy.cs");
        let mut original = format!("{COPYRIGHT_HEADER}\n// caf").into_bytes();
        original.extend_from_slice(&[0xe9, b'\n', 0xff]);
        fs::write(&path, &original).unwrap();

        assert_eq!(
            stamp_file(&path, COPYRIGHT_HEADER).unwrap(),
            StampOutcome::AlreadyPresent
        );
        assert_eq!(fs::read(&path).unwrap(), original);

        assert!(check_tree(dir.path(), "cs", COPYRIGHT_HEADER)
            .unwrap()
            .is_empty());
        let report = stamp_tree(dir.path(), "cs", COPYRIGHT_HEADER).unwrap();
        assert_eq!(report.already_present, 1);
        assert_eq!(fs::read(&path).unwrap(), original);
    }

    #[test]
    fn test_stamp_file_preserves_long_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Big.cs");
        let original: String = (0..2000).map(|i| format!("// line {i}\n")).collect();
        write(&path, &original);

        stamp_file(&path, COPYRIGHT_HEADER).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{COPYRIGHT_HEADER}\n{original}")
        );
    }

    #[test]
    fn test_stamp_tree_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("A.cs"), "class A {}\n");
        write(&root.join("nested/deeper/B.cs"), "class B {}\n");
        write(&root.join("Upper.CS"), "class Upper {}\n");
        write(&root.join("notes.txt"), "notes\n");

        let report = stamp_tree(root, "cs", COPYRIGHT_HEADER).unwrap();

        assert_eq!(report.files_scanned, 2);
        assert_eq!(report.stamped.len(), 2);
        assert_eq!(report.already_present, 0);
        assert!(fs::read_to_string(root.join("nested/deeper/B.cs"))
            .unwrap()
            .starts_with(COPYRIGHT_HEADER));
        assert_eq!(
            fs::read_to_string(root.join("Upper.CS")).unwrap(),
            "class Upper {}\n"
        );
        assert_eq!(fs::read_to_string(root.join("notes.txt")).unwrap(), "notes\n");
    }

    #[test]
    fn test_stamp_tree_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("A.cs"), "class A {}\n");
        write(&root.join("sub/B.cs"), "class B {}");

        stamp_tree(root, "cs", COPYRIGHT_HEADER).unwrap();
        let first_a = fs::read(root.join("A.cs")).unwrap();
        let first_b = fs::read(root.join("sub/B.cs")).unwrap();

        let report = stamp_tree(root, "cs", COPYRIGHT_HEADER).unwrap();
        assert!(report.stamped.is_empty());
        assert_eq!(report.already_present, 2);
        assert_eq!(fs::read(root.join("A.cs")).unwrap(), first_a);
        assert_eq!(fs::read(root.join("sub/B.cs")).unwrap(), first_b);
    }

    #[test]
    fn test_stamp_tree_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = stamp_tree(&dir.path().join("missing"), "cs", COPYRIGHT_HEADER);
        assert!(matches!(result, Err(Error::WalkDir(_))));
    }

    #[test]
    fn test_stamp_tree_aborts_on_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Bad.cs"), [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let result = stamp_tree(dir.path(), "cs", COPYRIGHT_HEADER);
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_stamp_tree_skips_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        write(&outside.path().join("Linked.cs"), "class Linked {}\n");
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("Linked.cs"),
            dir.path().join("Alias.cs"),
        )
        .unwrap();

        let report = stamp_tree(dir.path(), "cs", COPYRIGHT_HEADER).unwrap();
        assert_eq!(report.files_scanned, 0);
        assert_eq!(
            fs::read_to_string(outside.path().join("Linked.cs")).unwrap(),
            "class Linked {}\n"
        );
    }

    #[test]
    fn test_check_tree_reports_without_modifying() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(&root.join("Done.cs"), &format!("{COPYRIGHT_HEADER}\nclass Done {{}}\n"));
        write(&root.join("Todo.cs"), "class Todo {}\n");

        let missing = check_tree(root, "cs", COPYRIGHT_HEADER).unwrap();
        assert_eq!(missing, vec![root.join("Todo.cs")]);
        assert_eq!(
            fs::read_to_string(root.join("Todo.cs")).unwrap(),
            "class Todo {}\n"
        );
    }
}
