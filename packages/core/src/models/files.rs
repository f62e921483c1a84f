//! Resource types and property names of file, link and site nodes

/// Resource type of an uploaded file node
pub const RT_SAKAI_FILE: &str = "sakai/file";

/// Resource type of a link node pointing at a file
pub const RT_SAKAI_LINK: &str = "sakai/link";

/// Resource type of a file store; download paths are relative to it
pub const RT_FILE_STORE: &str = "sakai/files";

/// Resource type recognized as a site
pub const RT_SITE: &str = "sakai/site";

/// Stable file identifier used in download paths
pub const SAKAI_ID: &str = "sakai:id";

/// Internal link target of a link node
pub const SAKAI_LINK: &str = "sakai:link";

pub const SAKAI_FILENAME: &str = "sakai:filename";

pub const SAKAI_MIMETYPE: &str = "sakai:mimeType";

/// Reference from a link node to its file node
pub const JCR_REFERENCE: &str = "jcr:reference";

pub const JCR_LAST_MODIFIED: &str = "jcr:lastModified";

/// Body size in bytes
pub const LENGTH: &str = "length";

/// Member list of a site node
pub const SITE_MEMBERS: &str = "sakai:members";

/// Scheme prefix of `sakai:link` values
pub const LINK_SCHEME: &str = "jcrinternal:";
