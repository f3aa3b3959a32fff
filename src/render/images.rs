//! Image resolution before pagination.
//!
//! Intrinsic image sizes change every height the oracle reports, so this
//! stage must finish before the first measurement. An image that cannot be
//! resolved is replaced by a fixed-size placeholder; resolution never fails
//! the run.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Block, ImageRef, Inline, List, ListItem};

/// Height of the placeholder substituted for a missing image.
pub const PLACEHOLDER_HEIGHT: f32 = 100.0;

/// Extensions tried for image references without one.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];

/// An image reference resolved to a loadable source.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    /// Loadable source (file path or URL)
    pub src: String,

    /// Intrinsic width in pixels, if known
    pub width: Option<f32>,

    /// Intrinsic height in pixels, if known
    pub height: Option<f32>,
}

impl ResolvedImage {
    /// Create a resolved image without known size.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            width: None,
            height: None,
        }
    }

    /// Set the intrinsic size.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Resolves image references found in the document.
pub trait ImageResolver {
    /// Resolve one reference (path, link text or URL).
    fn resolve(&self, src: &str) -> Result<ResolvedImage>;
}

impl<T: ImageResolver + ?Sized> ImageResolver for &T {
    fn resolve(&self, src: &str) -> Result<ResolvedImage> {
        (**self).resolve(src)
    }
}

/// Resolves images against a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsImageResolver {
    base_dir: PathBuf,
}

impl FsImageResolver {
    /// Create a resolver rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Get the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Candidate paths for a reference, in lookup order.
    pub fn candidates(&self, src: &str) -> Vec<PathBuf> {
        let link = src.split('|').next().unwrap_or(src).trim();
        let path = self.base_dir.join(normalize_link(link));

        if path.extension().is_some() {
            return vec![path];
        }
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| path.with_extension(ext))
            .collect()
    }
}

impl ImageResolver for FsImageResolver {
    fn resolve(&self, src: &str) -> Result<ResolvedImage> {
        if is_remote(src) {
            return Ok(ResolvedImage::new(src));
        }

        let path = self
            .candidates(src)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| Error::ImageResolve(format!("Image not found: {}", src)))?;

        let resolved = ResolvedImage::new(path.to_string_lossy());
        match imagesize::size(&path) {
            Ok(size) => Ok(resolved.with_size(size.width as f32, size.height as f32)),
            Err(e) => {
                log::debug!("no intrinsic size for {}: {}", path.display(), e);
                Ok(resolved)
            }
        }
    }
}

/// Whether a source is a remote URL left untouched by resolution.
pub fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("data:")
}

/// Drop `.` segments and fold `..` into the preceding segment.
///
/// A leading `..` with nothing to fold into is kept.
pub fn normalize_link(link: &str) -> PathBuf {
    let mut parts: Vec<&str> = Vec::new();
    for part in link.split('/') {
        match part {
            "" | "." => {}
            ".." if parts.last().map_or(false, |p| *p != "..") => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.into_iter().collect()
}

/// Resolve every image in `blocks`, substituting placeholders for failures.
pub fn resolve_images<R: ImageResolver + ?Sized>(blocks: Vec<Block>, resolver: &R) -> Vec<Block> {
    map_images(blocks, &mut |image| match resolver.resolve(&image.src) {
        Ok(resolved) => apply(image, resolved),
        Err(e) => placeholder(&image, &e),
    })
}

/// Resolve every image with async filesystem reads.
///
/// Completes fully before returning, so pagination never sees a
/// half-resolved document.
#[cfg(feature = "async")]
pub async fn resolve_images_async(blocks: Vec<Block>, resolver: &FsImageResolver) -> Vec<Block> {
    let mut resolved = Vec::new();
    for src in collect_sources(&blocks) {
        let result = resolve_async(resolver, &src).await;
        resolved.push((src, result));
    }

    map_images(blocks, &mut |image| {
        match resolved.iter().find(|(src, _)| *src == image.src) {
            Some((_, Ok(found))) => apply(image, found.clone()),
            Some((_, Err(e))) => placeholder(&image, e),
            None => Inline::Image(image),
        }
    })
}

#[cfg(feature = "async")]
async fn resolve_async(resolver: &FsImageResolver, src: &str) -> Result<ResolvedImage> {
    if is_remote(src) {
        return Ok(ResolvedImage::new(src));
    }
    for path in resolver.candidates(src) {
        if let Ok(bytes) = tokio::fs::read(&path).await {
            let resolved = ResolvedImage::new(path.to_string_lossy());
            return Ok(match imagesize::blob_size(&bytes) {
                Ok(size) => resolved.with_size(size.width as f32, size.height as f32),
                Err(_) => resolved,
            });
        }
    }
    Err(Error::ImageResolve(format!("Image not found: {}", src)))
}

#[cfg(feature = "async")]
fn collect_sources(blocks: &[Block]) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    let mut visit = |content: &[Inline]| {
        for inline in content {
            if let Inline::Image(image) = inline {
                if !sources.contains(&image.src) {
                    sources.push(image.src.clone());
                }
            }
        }
    };
    for block in blocks {
        match block {
            Block::Heading { content, .. } | Block::Generic { content, .. } => visit(content),
            Block::List(list) => list.items.iter().for_each(|item| visit(&item.content)),
            Block::CodeBlock { .. } | Block::Rule => {}
        }
    }
    sources
}

fn apply(image: ImageRef, resolved: ResolvedImage) -> Inline {
    Inline::Image(ImageRef {
        src: resolved.src,
        alt: image.alt,
        width: resolved.width.or(image.width),
        height: resolved.height.or(image.height),
    })
}

fn placeholder(image: &ImageRef, error: &Error) -> Inline {
    log::warn!("{}; substituting placeholder", error);
    Inline::Placeholder {
        message: format!("Image not found: {}", image.src),
        height: PLACEHOLDER_HEIGHT,
    }
}

fn map_images(blocks: Vec<Block>, f: &mut dyn FnMut(ImageRef) -> Inline) -> Vec<Block> {
    let mut map_content = |content: Vec<Inline>| -> Vec<Inline> {
        content
            .into_iter()
            .map(|inline| match inline {
                Inline::Image(image) => f(image),
                other => other,
            })
            .collect()
    };

    blocks
        .into_iter()
        .map(|block| match block {
            Block::Heading { level, content } => Block::Heading {
                level,
                content: map_content(content),
            },
            Block::Generic { kind, content } => Block::Generic {
                kind,
                content: map_content(content),
            },
            Block::List(list) => {
                let items = list
                    .items
                    .into_iter()
                    .map(|item| ListItem::from_inlines(map_content(item.content)))
                    .collect();
                Block::List(List::new(list.ordered, list.start, items))
            }
            other => other,
        })
        .collect()
}
