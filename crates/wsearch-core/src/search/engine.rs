use std::io;
use std::path::Path;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use walkdir::{DirEntry, WalkDir};

use super::matcher::{LineMatcher, classify_content};
use super::root::WorkspaceRoot;
use super::types::{SearchOutcome, SkipReason, SkippedFile};
use crate::config::SearchLimits;
use crate::error::{Result, WsearchError};

/// Search every text file under `root` for lines containing `query`.
///
/// Blocking; callers on an async runtime should run it through
/// `spawn_blocking`. An empty query yields no matches without touching the
/// filesystem.
pub fn search_workspace(
    root: &WorkspaceRoot,
    query: &str,
    limits: &SearchLimits,
    token: &CancellationToken,
) -> Result<SearchOutcome> {
    search_with_reader(root, query, limits, token, |path| std::fs::read(path))
}

fn search_with_reader<R>(
    root: &WorkspaceRoot,
    query: &str,
    limits: &SearchLimits,
    token: &CancellationToken,
    mut read: R,
) -> Result<SearchOutcome>
where
    R: FnMut(&Path) -> io::Result<Vec<u8>>,
{
    let matcher = LineMatcher::new(query);
    let mut outcome = SearchOutcome::default();

    if matcher.is_empty() {
        tracing::debug!("Empty query, skipping walk");
        return Ok(outcome);
    }

    let started = Instant::now();
    let timeout = limits.timeout();

    // One level past the cap so cut-off entries can be reported
    let walker = WalkDir::new(root.path())
        .sort_by_file_name()
        .follow_links(false)
        .max_depth(limits.max_depth.saturating_add(1))
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, limits));

    for entry in walker {
        if token.is_cancelled() {
            return Err(WsearchError::Cancelled);
        }
        if started.elapsed() > timeout {
            return Err(WsearchError::SearchTimedOut {
                elapsed_ms: started.elapsed().as_millis(),
            });
        }

        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                if let Some(path) = e.path() {
                    outcome.skipped.push(SkippedFile {
                        file: root.relative(path),
                        reason: SkipReason::Unreadable,
                    });
                }
                continue;
            }
        };

        if entry.depth() > limits.max_depth {
            if !outcome.truncated {
                tracing::debug!("Depth limit of {} reached", limits.max_depth);
            }
            outcome.truncated = true;
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }

        let rel_path = root.relative(entry.path());
        if file_type.is_symlink() {
            tracing::debug!("Not following symlink {}", rel_path);
            outcome.skipped.push(SkippedFile {
                file: rel_path,
                reason: SkipReason::Symlink,
            });
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        if outcome.scanned_files >= limits.max_files {
            tracing::debug!("Scan limit of {} files reached", limits.max_files);
            outcome.truncated = true;
            break;
        }
        outcome.scanned_files += 1;

        let content = match read_text(&entry, limits, &mut read) {
            Ok(c) => c,
            Err(reason) => {
                if reason == SkipReason::Unreadable {
                    tracing::warn!("Skipping unreadable file {}", rel_path);
                } else {
                    tracing::debug!("Skipping {} ({:?})", rel_path, reason);
                }
                outcome.skipped.push(SkippedFile {
                    file: rel_path,
                    reason,
                });
                continue;
            }
        };

        if token.is_cancelled() {
            return Err(WsearchError::Cancelled);
        }

        let remaining = limits.max_matches - outcome.matches.len();
        let mut found = matcher.scan(&rel_path, &content, remaining + 1);
        if found.len() > remaining {
            found.truncate(remaining);
            outcome.matches.extend(found);
            outcome.truncated = true;
            break;
        }
        outcome.matches.extend(found);
    }

    tracing::debug!(
        "Scanned {} files, {} matches in {:?}",
        outcome.scanned_files,
        outcome.matches.len(),
        started.elapsed()
    );

    Ok(outcome)
}

fn is_excluded(entry: &DirEntry, limits: &SearchLimits) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && limits
            .exclude_dirs
            .iter()
            .any(|name| entry.file_name().to_string_lossy() == name.as_str())
}

fn read_text<R>(
    entry: &DirEntry,
    limits: &SearchLimits,
    read: &mut R,
) -> std::result::Result<String, SkipReason>
where
    R: FnMut(&Path) -> io::Result<Vec<u8>>,
{
    let metadata = entry.metadata().map_err(|_| SkipReason::Unreadable)?;
    if metadata.len() > limits.max_file_bytes {
        return Err(SkipReason::TooLarge);
    }
    let bytes = read(entry.path()).map_err(|_| SkipReason::Unreadable)?;
    classify_content(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Match;
    use wsearch_testkit::{temp_dir_in_workspace, write_file, write_sample_workspace};

    fn run(root: &std::path::Path, query: &str, limits: &SearchLimits) -> Result<SearchOutcome> {
        let root = WorkspaceRoot::open(root).unwrap();
        search_workspace(&root, query, limits, &CancellationToken::new())
    }

    #[test]
    fn test_sample_workspace_scenario() {
        let temp = temp_dir_in_workspace();
        write_sample_workspace(temp.path());
        let limits = SearchLimits::default();

        let app = run(temp.path(), "App", &limits).unwrap();
        assert_eq!(
            app.matches,
            vec![Match {
                file: "src/App.tsx".to_string(),
                line: 10,
                preview: "const App = () => {".to_string(),
            }]
        );

        let func = run(temp.path(), "function", &limits).unwrap();
        assert_eq!(func.matches.len(), 1);
        assert_eq!(func.matches[0].file, "src/components/Editor.tsx");
        assert_eq!(func.matches[0].line, 42);
        assert_eq!(func.matches[0].preview, "function handleSave() {");

        let none = run(temp.path(), "zzz-no-match", &limits).unwrap();
        assert!(none.matches.is_empty());
        assert!(!none.truncated);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let temp = temp_dir_in_workspace();
        write_sample_workspace(temp.path());

        let lower = run(temp.path(), "handlesave", &SearchLimits::default()).unwrap();
        let upper = run(temp.path(), "HANDLESAVE", &SearchLimits::default()).unwrap();
        assert_eq!(lower.matches.len(), 1);
        assert_eq!(lower.matches, upper.matches);
    }

    #[test]
    fn test_every_matching_line_reported_once() {
        let temp = temp_dir_in_workspace();
        write_file(temp.path(), "a.txt", "todo one\nnothing\n  TODO two  \ntodo");

        let outcome = run(temp.path(), "todo", &SearchLimits::default()).unwrap();
        let lines: Vec<usize> = outcome.matches.iter().map(|m| m.line).collect();
        assert_eq!(lines, vec![1, 3, 4]);
        assert_eq!(outcome.matches[1].preview, "TODO two");
    }

    #[test]
    fn test_traversal_order_is_sorted_depth_first() {
        let temp = temp_dir_in_workspace();
        write_file(temp.path(), "b.txt", "needle");
        write_file(temp.path(), "a/z.txt", "needle");
        write_file(temp.path(), "a/b/c.txt", "needle");
        write_file(temp.path(), "c.txt", "needle\nneedle");

        let outcome = run(temp.path(), "needle", &SearchLimits::default()).unwrap();
        let files: Vec<(&str, usize)> = outcome
            .matches
            .iter()
            .map(|m| (m.file.as_str(), m.line))
            .collect();
        assert_eq!(
            files,
            vec![
                ("a/b/c.txt", 1),
                ("a/z.txt", 1),
                ("b.txt", 1),
                ("c.txt", 1),
                ("c.txt", 2),
            ]
        );
    }

    #[test]
    fn test_repeated_search_is_deterministic() {
        let temp = temp_dir_in_workspace();
        write_sample_workspace(temp.path());

        let first = run(temp.path(), "e", &SearchLimits::default()).unwrap();
        let second = run(temp.path(), "e", &SearchLimits::default()).unwrap();
        assert!(!first.matches.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_workspace_yields_no_matches() {
        let temp = temp_dir_in_workspace();
        let outcome = run(temp.path(), "anything", &SearchLimits::default()).unwrap();
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.scanned_files, 0);
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let temp = temp_dir_in_workspace();
        write_sample_workspace(temp.path());

        let outcome = run(temp.path(), "", &SearchLimits::default()).unwrap();
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.scanned_files, 0);
    }

    #[test]
    fn test_binary_and_large_files_are_skipped() {
        let temp = temp_dir_in_workspace();
        std::fs::write(temp.path().join("blob.bin"), b"needle\0\x01\x02").unwrap();
        write_file(temp.path(), "big.txt", &"needle\n".repeat(100));
        write_file(temp.path(), "small.txt", "needle");

        let limits = SearchLimits {
            max_file_bytes: 64,
            ..SearchLimits::default()
        };
        let outcome = run(temp.path(), "needle", &limits).unwrap();

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].file, "small.txt");
        assert_eq!(
            outcome.skipped,
            vec![
                SkippedFile {
                    file: "big.txt".to_string(),
                    reason: SkipReason::TooLarge,
                },
                SkippedFile {
                    file: "blob.bin".to_string(),
                    reason: SkipReason::Binary,
                },
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let temp = temp_dir_in_workspace();
        let outside = temp_dir_in_workspace();
        write_file(outside.path(), "secret.txt", "needle");
        write_file(temp.path(), "inside.txt", "needle");
        std::os::unix::fs::symlink(outside.path(), temp.path().join("linked_dir")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            temp.path().join("linked.txt"),
        )
        .unwrap();

        let outcome = run(temp.path(), "needle", &SearchLimits::default()).unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].file, "inside.txt");
        assert!(
            outcome
                .skipped
                .iter()
                .all(|s| s.reason == SkipReason::Symlink)
        );
        assert_eq!(outcome.skipped.len(), 2);
    }

    #[test]
    fn test_excluded_directories_are_not_descended() {
        let temp = temp_dir_in_workspace();
        write_file(temp.path(), "node_modules/pkg/index.js", "needle");
        write_file(temp.path(), "src/main.js", "needle");

        let limits = SearchLimits {
            exclude_dirs: vec!["node_modules".to_string()],
            ..SearchLimits::default()
        };
        let outcome = run(temp.path(), "needle", &limits).unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].file, "src/main.js");
    }

    #[test]
    fn test_match_cap_truncates() {
        let temp = temp_dir_in_workspace();
        write_file(temp.path(), "a.txt", "x\nx\nx");
        write_file(temp.path(), "b.txt", "x");

        let exact = SearchLimits {
            max_matches: 4,
            ..SearchLimits::default()
        };
        let outcome = run(temp.path(), "x", &exact).unwrap();
        assert_eq!(outcome.matches.len(), 4);
        assert!(!outcome.truncated);

        let capped = SearchLimits {
            max_matches: 2,
            ..SearchLimits::default()
        };
        let outcome = run(temp.path(), "x", &capped).unwrap();
        assert_eq!(outcome.matches.len(), 2);
        assert!(outcome.truncated);
    }

    #[test]
    fn test_scan_cap_keeps_partial_matches() {
        let temp = temp_dir_in_workspace();
        for i in 0..5 {
            write_file(temp.path(), &format!("f{}.txt", i), "needle");
        }

        let limits = SearchLimits {
            max_files: 3,
            ..SearchLimits::default()
        };
        let outcome = run(temp.path(), "needle", &limits).unwrap();
        assert!(outcome.truncated);
        assert_eq!(outcome.scanned_files, 3);
        assert_eq!(outcome.matches.len(), 3);
    }

    #[test]
    fn test_depth_cap() {
        let temp = temp_dir_in_workspace();
        write_file(temp.path(), "top.txt", "needle");
        write_file(temp.path(), "a/b/deep.txt", "needle");

        let limits = SearchLimits {
            max_depth: 2,
            ..SearchLimits::default()
        };
        let outcome = run(temp.path(), "needle", &limits).unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].file, "top.txt");
        assert!(outcome.truncated);

        let deep_enough = SearchLimits {
            max_depth: 3,
            ..SearchLimits::default()
        };
        let outcome = run(temp.path(), "needle", &deep_enough).unwrap();
        assert_eq!(outcome.matches.len(), 2);
        assert!(!outcome.truncated);
    }

    #[test]
    fn test_unreadable_file_does_not_abort_walk() {
        let temp = temp_dir_in_workspace();
        write_file(temp.path(), "a.txt", "needle");
        write_file(temp.path(), "b.txt", "needle");
        write_file(temp.path(), "c.txt", "needle");
        let root = WorkspaceRoot::open(temp.path()).unwrap();

        let outcome = search_with_reader(
            &root,
            "needle",
            &SearchLimits::default(),
            &CancellationToken::new(),
            |path| {
                if path.ends_with("b.txt") {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
                } else {
                    std::fs::read(path)
                }
            },
        )
        .unwrap();

        let files: Vec<&str> = outcome.matches.iter().map(|m| m.file.as_str()).collect();
        assert_eq!(files, vec!["a.txt", "c.txt"]);
        assert_eq!(outcome.scanned_files, 3);
        assert_eq!(
            outcome.skipped,
            vec![SkippedFile {
                file: "b.txt".to_string(),
                reason: SkipReason::Unreadable,
            }]
        );
    }

    #[test]
    fn test_slow_walk_times_out() {
        let temp = temp_dir_in_workspace();
        for i in 0..5 {
            write_file(temp.path(), &format!("f{}.txt", i), "needle");
        }
        let root = WorkspaceRoot::open(temp.path()).unwrap();
        let limits = SearchLimits {
            timeout_ms: 5,
            ..SearchLimits::default()
        };

        let err = search_with_reader(
            &root,
            "needle",
            &limits,
            &CancellationToken::new(),
            |path| {
                std::thread::sleep(std::time::Duration::from_millis(20));
                std::fs::read(path)
            },
        )
        .unwrap_err();
        assert!(matches!(err, WsearchError::SearchTimedOut { elapsed_ms } if elapsed_ms >= 5));
    }

    #[test]
    fn test_cancelled_search() {
        let temp = temp_dir_in_workspace();
        write_sample_workspace(temp.path());
        let root = WorkspaceRoot::open(temp.path()).unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let err = search_workspace(&root, "App", &SearchLimits::default(), &token).unwrap_err();
        assert!(matches!(err, WsearchError::Cancelled));
    }
}
