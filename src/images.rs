//! Rewrites the targets of Markdown images (`![alt](target)`).

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};

lazy_static::lazy_static! {
    static ref ANY_IMAGE: Regex =
        Regex::new(r"!\[(.*?)\]\((.*?/)*(.*?)\)").expect("couldn't compile regex");
    static ref RELATIVE_IMAGE_FILE: Regex =
        Regex::new(r"!\[(.*?)\]\(([^/].*?/)*([^/]*?)\)").expect("couldn't compile regex");
    static ref RELATIVE_IMAGE: Regex =
        Regex::new(r"!\[(.*?)\]\(([^/].*?)\)").expect("couldn't compile regex");
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let resolved = if path.as_os_str().is_empty() {
        std::env::current_dir()
    } else {
        std::path::absolute(path)
    };
    resolved
        .map(|resolved| clean(&resolved))
        .map_err(|source| Error::AbsolutePath {
            path: path.to_path_buf(),
            source,
        })
}

/// Drops `.` and folds `..` into its parent, without touching the filesystem.
fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other),
        }
    }
    cleaned
}

fn dir_prefix(dir: &Path) -> String {
    let dir = dir.to_string_lossy();
    match dir.trim_end_matches('/') {
        "" if dir.starts_with('/') => String::new(),
        trimmed => trimmed.to_string(),
    }
}

/// Drops the directories of every image and, when `dir` is given, puts the
/// file name under `dir` instead.
pub fn strip_or_prefix(text: &str, dir: Option<&str>) -> String {
    let dir = dir.filter(|d| !d.is_empty());
    ANY_IMAGE
        .replace_all(text, |caps: &Captures| match dir {
            Some(dir) => format!("![{}]({}/{})", &caps[1], dir, &caps[3]),
            None => format!("![{}]({})", &caps[1], &caps[3]),
        })
        .into_owned()
}

/// Moves relative images into `dir`, made absolute, keeping only their file names.
pub fn into_directory(text: &str, dir: &Path) -> Result<String> {
    let prefix = dir_prefix(&absolute(dir)?);
    Ok(RELATIVE_IMAGE_FILE
        .replace_all(text, |caps: &Captures| {
            format!("![{}]({}/{})", &caps[1], prefix, &caps[3])
        })
        .into_owned())
}

/// Anchors relative images on the absolute directory of the Markdown `file`.
pub fn relative_to_file(text: &str, file: &Path) -> Result<String> {
    let parent = file.parent().unwrap_or_else(|| Path::new(""));
    let prefix = dir_prefix(&absolute(parent)?);
    Ok(RELATIVE_IMAGE
        .replace_all(text, |caps: &Captures| {
            format!("![{}]({}/{})", &caps[1], prefix, &caps[2])
        })
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_are_stripped_without_image_dir() {
        let text = "See ![a chart](img/2020/chart.png) and ![logo](logo.svg).";
        assert_eq!(
            strip_or_prefix(text, None),
            "See ![a chart](chart.png) and ![logo](logo.svg)."
        );
        assert_eq!(strip_or_prefix(text, Some("")), strip_or_prefix(text, None));
    }

    #[test]
    fn image_dir_prefixes_file_names() {
        assert_eq!(
            strip_or_prefix("![x](../pics/a.png)", Some("media")),
            "![x](media/a.png)"
        );
    }

    #[test]
    fn links_are_left_alone() {
        let text = "[not an image](docs/page.html)";
        assert_eq!(strip_or_prefix(text, Some("media")), text);
    }

    #[test]
    fn dollar_signs_are_literal() {
        assert_eq!(
            strip_or_prefix("![x](a/b.png)", Some("$HOME")),
            "![x]($HOME/b.png)"
        );
    }

    #[test]
    fn into_directory_uses_absolute_dir() {
        let out = into_directory("![x](pics/a.png)", Path::new("/srv/images/")).unwrap();
        assert_eq!(out, "![x](/srv/images/a.png)");
    }

    #[test]
    fn parent_components_are_folded() {
        assert_eq!(clean(Path::new("/srv/a/./b/../../imgs")), PathBuf::from("/srv/imgs"));
        assert_eq!(clean(Path::new("/../x")), PathBuf::from("/x"));

        let out = into_directory("![x](a.png)", Path::new("/srv/docs/../imgs")).unwrap();
        assert_eq!(out, "![x](/srv/imgs/a.png)");
    }

    #[test]
    fn relative_image_dir_is_resolved_from_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let expected = cwd.parent().unwrap_or(&cwd).join("imgs");
        let out = into_directory("![x](pics/a.png)", Path::new("../imgs")).unwrap();
        assert_eq!(out, format!("![x]({}/a.png)", expected.display()));
    }

    #[test]
    fn into_directory_skips_absolute_targets() {
        let text = "![x](/already/there.png)";
        assert_eq!(into_directory(text, Path::new("/srv")).unwrap(), text);
    }

    #[test]
    fn relative_to_file_keeps_subdirectories() {
        let out = relative_to_file("![x](pics/a.png)", Path::new("/home/me/doc/report.md")).unwrap();
        assert_eq!(out, "![x](/home/me/doc/pics/a.png)");
    }

    #[test]
    fn relative_to_bare_file_name_uses_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let out = relative_to_file("![x](a.png)", Path::new("report.md")).unwrap();
        assert_eq!(out, format!("![x]({}/a.png)", cwd.display()));
    }

    #[test]
    fn relative_to_file_skips_absolute_targets() {
        let text = "![x](/abs/a.png)";
        assert_eq!(relative_to_file(text, Path::new("/doc/r.md")).unwrap(), text);
    }
}
