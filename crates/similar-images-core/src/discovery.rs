use crossbeam::channel::{select, Sender};
use log::{debug, trace};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;
use crate::group::TaskGroup;

/// Returns if the given path has one of the given extensions (case-insensitive)
pub fn has_image_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => extensions
            .iter()
            .any(|wanted| wanted.as_ref().eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Lazily walk `root`, yielding regular files with a supported extension.
///
/// Symlinks are not followed and are skipped like any other non-regular entry.
/// Traversal errors are yielded as they occur; the caller decides whether to stop.
pub fn image_paths<'a, S: AsRef<str>>(
    root: &Path,
    extensions: &'a [S],
) -> impl Iterator<Item = Result<PathBuf>> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && has_image_extension(entry.path(), extensions) {
                    Some(Ok(entry.into_path()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
}

/// Feed image paths under `root` into `sender` until the walk ends, fails, or
/// the group is cancelled. Returns the number of paths handed off.
pub fn discover<S: AsRef<str>>(
    root: &Path,
    extensions: &[S],
    group: &TaskGroup,
    sender: Sender<PathBuf>,
) -> Result<usize> {
    let mut emitted = 0;

    for path in image_paths(root, extensions) {
        if group.is_cancelled() {
            break;
        }
        let path = path?;
        trace!("Discovered {}", path.display());

        select! {
            send(sender, path) -> res => {
                // All workers are gone; nothing left to feed
                if res.is_err() {
                    break;
                }
                emitted += 1;
            }
            recv(group.done()) -> _ => break,
        }
    }

    debug!("Discovery finished after {} paths", emitted);
    Ok(emitted)
}

// -- Tests --
