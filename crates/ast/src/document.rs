use crate::error::{AstError, Result};
use crate::node::{AstNode, Preorder, RawNode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a sample (or its source file) lives: exactly one of a local path or
/// a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SampleLocator {
    Path(PathBuf),
    Url(String),
}

impl SampleLocator {
    /// Build a locator from optional parts. Empty strings count as absent.
    pub fn from_parts(path: Option<&str>, url: Option<&str>) -> Result<Self> {
        let path = path.filter(|p| !p.is_empty());
        let url = url.filter(|u| !u.is_empty());
        match (path, url) {
            (Some(path), None) => Ok(Self::Path(PathBuf::from(path))),
            (None, Some(url)) => Ok(Self::Url(url.to_string())),
            (Some(_), Some(_)) => Err(AstError::input(
                "expected either path or url, got both",
            )),
            (None, None) => Err(AstError::input("expected either path or url argument")),
        }
    }

    /// Interpret a CLI/HTTP argument: `http(s)://` means URL, anything else
    /// is a path
    #[must_use]
    pub fn parse_arg(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    /// Identity string used to label embeddings
    #[must_use]
    pub fn identity(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

impl fmt::Display for SampleLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Serialize)]
struct DocumentOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    nodes: &'a [AstNode],
}

/// Parsed AST sidecar: the location of the source file plus its node forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstDocument {
    pub source: SampleLocator,
    pub nodes: Vec<AstNode>,
}

impl AstDocument {
    #[must_use]
    pub const fn new(source: SampleLocator, nodes: Vec<AstNode>) -> Self {
        Self { source, nodes }
    }

    /// Parse a sidecar, validating the locator and every node category.
    ///
    /// Nesting depth is not limited: the JSON recursion limit is off and the
    /// parser grows its stack on demand.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_raw(parse_raw(&mut serde_json::Deserializer::from_str(json))?)
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_raw(parse_raw(&mut serde_json::Deserializer::from_slice(bytes))?)
    }

    fn from_raw(raw: RawDocument) -> Result<Self> {
        let source = SampleLocator::from_parts(raw.path.as_deref(), raw.url.as_deref())?;
        let nodes = raw
            .nodes
            .into_iter()
            .map(AstNode::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { source, nodes })
    }

    pub fn to_json_string(&self) -> Result<String> {
        let out = match &self.source {
            SampleLocator::Path(path) => DocumentOut {
                path: Some(path.display().to_string()),
                url: None,
                nodes: &self.nodes,
            },
            SampleLocator::Url(url) => DocumentOut {
                path: None,
                url: Some(url),
                nodes: &self.nodes,
            },
        };
        Ok(serde_json::to_string(&out)?)
    }

    /// Pre-order walk over every node
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(&self.nodes)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }
}

fn parse_raw<'de, R>(de: &mut serde_json::Deserializer<R>) -> Result<RawDocument>
where
    R: serde_json::de::Read<'de>,
{
    de.disable_recursion_limit();
    let raw = RawDocument::deserialize(serde_stacker::Deserializer::new(&mut *de))?;
    de.end()?;
    Ok(raw)
}
