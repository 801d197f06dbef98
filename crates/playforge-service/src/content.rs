//! Game content staging and serving helpers.
//!
//! Uploaded game content lives under the content directory, one
//! subdirectory per game. On first access the content is staged (copied)
//! into the serving cache; subsequent requests read straight from the
//! cache. The per-game lock discipline around staging lives in the play
//! handler; this module is the filesystem half.

use std::path::{Path, PathBuf};

/// Map a requested file to its content type. Unknown extensions fall back
/// to a binary stream.
#[must_use]
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("html") => "text/html",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Resolve a client-supplied relative path against `root`, refusing any
/// path that escapes it. Both sides are canonicalized, so `..` segments and
/// symlinks cannot step outside the staged directory.
///
/// Returns `None` if the file does not exist or resolves outside `root`.
#[must_use]
pub fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let root = root.canonicalize().ok()?;
    let candidate = root.join(relative).canonicalize().ok()?;

    if candidate.starts_with(&root) && candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

/// Copy a directory tree from `src` to `dst`. Blocking; callers run it on
/// the blocking pool.
///
/// # Errors
///
/// Returns an error if any read or write fails.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn content_types_cover_the_web_set() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html");
        assert_eq!(content_type_for(Path::new("game.JS")), "application/javascript");
        assert_eq!(content_type_for(Path::new("style.css")), "text/css");
        assert_eq!(content_type_for(Path::new("sprite.png")), "image/png");
        assert_eq!(content_type_for(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("anim.gif")), "image/gif");
        assert_eq!(content_type_for(Path::new("engine.wasm")), "application/wasm");
        assert_eq!(content_type_for(Path::new("data.bin")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("Makefile")), "application/octet-stream");
    }

    #[test]
    fn resolve_rejects_traversal_and_missing_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("staged");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "x").unwrap();

        assert!(resolve_within(&root, "index.html").is_some());
        assert!(resolve_within(&root, "missing.html").is_none());
        assert!(resolve_within(&root, "../secret.txt").is_none());
        assert!(resolve_within(&root, "..").is_none());
    }

    #[test]
    fn copy_replicates_nested_tree() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        std::fs::create_dir_all(src.path().join("assets")).unwrap();
        std::fs::write(src.path().join("index.html"), "top").unwrap();
        std::fs::write(src.path().join("assets/sprite.png"), "img").unwrap();

        let staged = dst.path().join("staged");
        copy_dir_recursive(src.path(), &staged).unwrap();

        assert_eq!(std::fs::read_to_string(staged.join("index.html")).unwrap(), "top");
        assert_eq!(
            std::fs::read_to_string(staged.join("assets/sprite.png")).unwrap(),
            "img"
        );
    }
}
