//! Link classification for directory listings and catalog pages.

/// File extension that marks a dependency descriptor.
pub const DESCRIPTOR_EXTENSION: &str = ".pom";

/// Self and parent directory markers found in listings.
const DIRECTORY_MARKERS: [&str; 4] = [".", "./", "..", "../"];

/// What a classified link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A descriptor document (`*.pom`).
    Descriptor,
    /// Any other file: archives, checksums, signatures, metadata.
    Artifact,
}

/// How the raw reference was written in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkOrigin {
    /// Already an absolute `http(s)://` URL, kept unchanged.
    Absolute,
    /// Relative to the listing it was found in.
    Relative,
}

/// A raw reference normalized into an absolute, fetchable link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedLink {
    /// Absolute URL.
    pub url: String,
    /// Descriptor or plain artifact file.
    pub kind: LinkKind,
    /// Whether the reference was absolute or resolved against a directory.
    pub origin: LinkOrigin,
}

impl NormalizedLink {
    /// True when the link names a descriptor.
    pub fn is_descriptor(&self) -> bool {
        self.kind == LinkKind::Descriptor
    }
}

/// Classify `raw` as found in the listing of `context_dir`.
///
/// Directory markers (`.`, `./`, `..`, `../`), empty references and
/// query/fragment-only references (listing sort links) are not links and
/// yield `None`. Absolute URLs are returned unchanged; anything else is
/// joined onto `context_dir`.
///
/// # Example
///
/// ```
/// use m2v_schema::{classify, LinkKind, LinkOrigin};
///
/// let dir = "https://repo1.maven.org/maven2/com/google/dagger/dagger/2.50";
/// let link = classify("dagger-2.50.pom", dir).unwrap();
/// assert_eq!(link.url, format!("{dir}/dagger-2.50.pom"));
/// assert_eq!(link.kind, LinkKind::Descriptor);
/// assert_eq!(link.origin, LinkOrigin::Relative);
///
/// assert!(classify("../", dir).is_none());
/// ```
pub fn classify(raw: &str, context_dir: &str) -> Option<NormalizedLink> {
    let raw = raw.trim();
    if raw.is_empty() || DIRECTORY_MARKERS.contains(&raw) || raw.starts_with(['?', '#']) {
        return None;
    }

    let (url, origin) = if is_absolute_url(raw) {
        (raw.to_string(), LinkOrigin::Absolute)
    } else {
        (
            format!("{}/{raw}", context_dir.trim_end_matches('/')),
            LinkOrigin::Relative,
        )
    };

    let kind = if is_descriptor(&url) {
        LinkKind::Descriptor
    } else {
        LinkKind::Artifact
    };

    Some(NormalizedLink { url, kind, origin })
}

/// True for `http://` and `https://` URLs.
pub fn is_absolute_url(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}

/// True when the link's file name ends in the descriptor extension.
pub fn is_descriptor(link: &str) -> bool {
    file_name(link).ends_with(DESCRIPTOR_EXTENSION)
}

/// Final path segment of a link (empty for links ending in `/`).
pub fn file_name(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or("")
}

/// The enclosing directory of a link: everything before the final `/`.
///
/// Returns `None` when there is no final segment to strip.
///
/// # Example
///
/// ```
/// use m2v_schema::parent_directory;
///
/// assert_eq!(
///     parent_directory("https://repo1.maven.org/maven2/a/b/1.0/b-1.0.pom"),
///     Some("https://repo1.maven.org/maven2/a/b/1.0"),
/// );
/// ```
pub fn parent_directory(link: &str) -> Option<&str> {
    let (dir, name) = link.rsplit_once('/')?;
    if name.is_empty() || dir.is_empty() {
        return None;
    }
    // Never strip into the scheme separator.
    if is_absolute_url(link)
        && !dir
            .split_once("://")
            .is_some_and(|(_, host)| !host.is_empty())
    {
        return None;
    }
    Some(dir)
}
