use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the documents picked up from a source tree.
pub const MARKDOWN_EXTENSION: &str = "md";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid source directory: {0}")]
    InvalidSourceDir(PathBuf),
    #[error("{path} is not a relative path under {root}")]
    NotRelative { path: PathBuf, root: PathBuf },
}

/// Read a document and return its content
pub fn read_file(relative_path: &RelativePath, root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(|source| IoError::Read {
        path: absolute_path,
        source,
    })
}

/// Write content to a file, creating parent directories if needed
pub fn write_file(relative_path: &RelativePath, root: &Path, content: &str) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(|source| IoError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&absolute_path, content).map_err(|source| IoError::Write {
        path: absolute_path,
        source,
    })
}

/// Scan for markdown files under `root`, returned relative to it in sorted order
pub fn scan_markdown_files(root: &Path) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_source_dir(root)?;

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;

    let mut relative = files
        .into_iter()
        .map(|path| to_relative(&path, root))
        .collect::<Result<Vec<_>, _>>()?;
    relative.sort();
    Ok(relative)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let read_error = |source| IoError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let entries = fs::read_dir(dir).map_err(read_error)?;

    for entry in entries {
        let path = entry.map_err(read_error)?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && ext == MARKDOWN_EXTENSION
        {
            files.push(path);
        }
    }

    Ok(())
}

fn to_relative(path: &Path, root: &Path) -> Result<RelativePathBuf, IoError> {
    let not_relative = || IoError::NotRelative {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };
    let stripped = path.strip_prefix(root).map_err(|_| not_relative())?;
    RelativePathBuf::from_path(stripped).map_err(|_| not_relative())
}

/// Where the rendered form of `source` lands, relative to the output root
pub fn output_path(source: &RelativePath, extension: &str) -> RelativePathBuf {
    source.with_extension(extension)
}

pub fn validate_source_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidSourceDir(path.to_path_buf()));
    }

    Ok(())
}
