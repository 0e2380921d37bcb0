//! `package.json` access.
//!
//! The manifest is kept as an order-preserving JSON object so that a version bump
//! rewrites only the `version` value; the indentation and trailing newline of the
//! original file are detected on read and reproduced on write.

use {
    super::fs::write_atomic,
    crate::{error::ReleaseError, Result},
    semver::Version,
    serde::Serialize,
    serde_json::{ser::PrettyFormatter, Map, Serializer, Value},
    std::{
        collections::BTreeMap,
        fs, io,
        path::{Path, PathBuf},
    },
};

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    Dependencies,
    DevDependencies,
    PeerDependencies,
}

impl DependencyKind {
    pub fn key(self) -> &'static str {
        match self {
            Self::Dependencies => "dependencies",
            Self::DevDependencies => "devDependencies",
            Self::PeerDependencies => "peerDependencies",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct JsonStyle {
    indent: String,
    trailing_newline: bool,
}

impl JsonStyle {
    fn detect(content: &str) -> Self {
        let indent = content
            .lines()
            .skip(1)
            .map(|line| {
                let trimmed = line.trim_start_matches([' ', '\t']);
                &line[..line.len() - trimmed.len()]
            })
            .find(|indent| !indent.is_empty())
            .unwrap_or("  ")
            .to_string();
        Self {
            indent,
            trailing_newline: content.ends_with('\n'),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: PathBuf,
    doc: Map<String, Value>,
    style: JsonStyle,
}

impl Manifest {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE)
    }

    pub fn exists_in(dir: &Path) -> bool {
        Self::path_in(dir).is_file()
    }

    /// Reads `<dir>/package.json`. A manifest must be a JSON object with a string
    /// `name`; `version` is checked only when asked for.
    pub fn read(dir: &Path) -> Result<Self> {
        Self::load(dir, true)
    }

    /// Like [`Self::read`] but `name` may be absent, as in a private workspace
    /// root. [`Self::name`] is then empty.
    pub fn read_unnamed(dir: &Path) -> Result<Self> {
        Self::load(dir, false)
    }

    fn load(dir: &Path, require_name: bool) -> Result<Self> {
        let path = Self::path_in(dir);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ReleaseError::ManifestMissing {
                    path: dir.to_path_buf(),
                });
            }
            Err(e) => return Err(ReleaseError::io(path, e)),
        };
        Self::parse(path, &content, require_name)
    }

    fn parse(path: PathBuf, content: &str, require_name: bool) -> Result<Self> {
        let malformed = |reason: String| ReleaseError::ManifestMalformed {
            path: path.clone(),
            reason,
        };

        let value: Value = serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;
        let Value::Object(doc) = value else {
            return Err(malformed("expected a JSON object".to_string()));
        };
        match doc.get("name") {
            Some(Value::String(name)) if !name.is_empty() => {}
            None if !require_name => {}
            _ => return Err(malformed("missing string field 'name'".to_string())),
        }

        Ok(Self {
            style: JsonStyle::detect(content),
            path,
            doc,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.doc
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn raw_version(&self) -> Option<&str> {
        self.doc.get("version").and_then(Value::as_str)
    }

    pub fn version(&self) -> Result<Version> {
        let raw = self
            .raw_version()
            .ok_or_else(|| ReleaseError::ManifestMalformed {
                path: self.path.clone(),
                reason: "missing string field 'version'".to_string(),
            })?;
        Version::parse(raw).map_err(|e| ReleaseError::ManifestMalformed {
            path: self.path.clone(),
            reason: format!("invalid version '{raw}': {e}"),
        })
    }

    pub fn is_private(&self) -> bool {
        self.doc
            .get("private")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn dependencies(&self, kind: DependencyKind) -> BTreeMap<String, String> {
        self.doc
            .get(kind.key())
            .and_then(Value::as_object)
            .map(|deps| {
                deps.iter()
                    .filter_map(|(name, range)| {
                        range.as_str().map(|r| (name.clone(), r.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Updates `version` in place; the key keeps its position when present.
    pub fn set_version(&mut self, version: &Version) {
        self.doc
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(self.style.indent.as_bytes());
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        self.doc
            .serialize(&mut serializer)
            .map_err(|e| ReleaseError::ManifestMalformed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let mut out = String::from_utf8_lossy(&buf).into_owned();
        if self.style.trailing_newline {
            out.push('\n');
        }
        Ok(out)
    }

    /// Serializes fully in memory, then replaces the file atomically.
    pub fn write(&self) -> Result<()> {
        let content = self.to_json_string()?;
        write_atomic(&self.path, &content)
    }
}
