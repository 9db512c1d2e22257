use crate::config::SampleConfig;
use crate::document::{AstDocument, SampleLocator};
use crate::error::Result;
use crate::flatten::{CategoryTraces, Flattener};
use crate::node::AstNode;
use crate::source::{decode_source, SourceText};
use std::path::{Path, PathBuf};

/// Reads the bytes behind a locator
pub trait SourceFetcher {
    fn fetch(&self, locator: &SampleLocator) -> Result<Vec<u8>>;
}

/// Reads local files directly and URLs over blocking HTTP
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFetcher;

impl SourceFetcher for DefaultFetcher {
    fn fetch(&self, locator: &SampleLocator) -> Result<Vec<u8>> {
        match locator {
            SampleLocator::Path(path) => Ok(std::fs::read(path)?),
            SampleLocator::Url(url) => {
                log::debug!("Loading {url}");
                let response = reqwest::blocking::get(url)?.error_for_status()?;
                Ok(response.bytes()?.to_vec())
            }
        }
    }
}

/// A decoded source sample: sidecar, raw source bytes and text.
///
/// Immutable once built; every view is derived from the same instance.
#[derive(Debug, Clone)]
pub struct SourceSample {
    sidecar: SampleLocator,
    document: AstDocument,
    raw: Vec<u8>,
    text: SourceText,
}

impl SourceSample {
    /// Load the sidecar at `sidecar`, then the source file it points at
    pub fn load(sidecar: SampleLocator, config: &SampleConfig) -> Result<Self> {
        Self::load_with(&DefaultFetcher, sidecar, config)
    }

    pub fn load_with(
        fetcher: &dyn SourceFetcher,
        sidecar: SampleLocator,
        config: &SampleConfig,
    ) -> Result<Self> {
        log::info!("Loading sample {sidecar}");
        let document = AstDocument::from_json_slice(&fetcher.fetch(&sidecar)?)?;
        let source = resolve_source(&sidecar, &document.source, config);
        let raw = fetcher.fetch(&source)?;
        Self::from_parts(sidecar, document, raw, config)
    }

    /// Build a sample from already-loaded parts
    pub fn from_parts(
        sidecar: SampleLocator,
        document: AstDocument,
        raw: Vec<u8>,
        config: &SampleConfig,
    ) -> Result<Self> {
        let text = SourceText::new(decode_source(&raw, config.latin1_fallback)?);
        log::debug!(
            "Sample {sidecar}: {} bytes, {} chars, {} nodes",
            raw.len(),
            text.char_len(),
            document.node_count()
        );
        Ok(Self {
            sidecar,
            document,
            raw,
            text,
        })
    }

    /// Build a sample from a sidecar JSON string and source text held in
    /// memory
    pub fn from_strings(sidecar_json: &str, source: &str) -> Result<Self> {
        let document = AstDocument::from_json_str(sidecar_json)?;
        let sidecar = document.source.clone();
        Self::from_parts(
            sidecar,
            document,
            source.as_bytes().to_vec(),
            &SampleConfig::default(),
        )
    }

    /// Identity used to label this sample's embedding
    #[must_use]
    pub fn identity(&self) -> String {
        self.sidecar.identity()
    }

    #[must_use]
    pub const fn sidecar(&self) -> &SampleLocator {
        &self.sidecar
    }

    #[must_use]
    pub const fn document(&self) -> &AstDocument {
        &self.document
    }

    #[must_use]
    pub fn nodes(&self) -> &[AstNode] {
        &self.document.nodes
    }

    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    #[must_use]
    pub const fn text(&self) -> &SourceText {
        &self.text
    }

    /// Flatten this sample's AST into category traces
    pub fn flatten(&self) -> Result<CategoryTraces> {
        Flattener::new(&self.text).flatten(&self.document.nodes)
    }
}

fn resolve_source(
    sidecar: &SampleLocator,
    source: &SampleLocator,
    config: &SampleConfig,
) -> SampleLocator {
    let (SampleLocator::Path(sidecar_path), SampleLocator::Path(source_path)) = (sidecar, source)
    else {
        return source.clone();
    };
    if !config.resolve_relative_to_sidecar || source_path.is_absolute() || source_path.exists() {
        return source.clone();
    }
    let candidate: PathBuf = sidecar_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(source_path);
    if candidate.exists() {
        log::debug!(
            "Resolved source {} relative to sidecar as {}",
            source_path.display(),
            candidate.display()
        );
        SampleLocator::Path(candidate)
    } else {
        source.clone()
    }
}
