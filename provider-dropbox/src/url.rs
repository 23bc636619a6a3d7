//! Endpoint URL construction
//!
//! `https://{host}/1/{action}[/{root}/{path}][?{query}]`

/// API version prefix shared by every endpoint
const API_VERSION: &str = "1";

/// Builder for a fully-qualified endpoint URL.
///
/// ```
/// use provider_dropbox::url::EndpointUrl;
///
/// let url = EndpointUrl::new("api.dropbox.com", "metadata")
///     .path("sandbox", "/Photos/Summer 2011")
///     .query("list=true")
///     .build();
/// assert_eq!(
///     url,
///     "https://api.dropbox.com/1/metadata/sandbox/Photos/Summer%202011?list=true"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EndpointUrl<'a> {
    host: &'a str,
    action: &'a str,
    path: Option<(&'a str, &'a str)>,
    query: Option<&'a str>,
}

impl<'a> EndpointUrl<'a> {
    pub fn new(host: &'a str, action: &'a str) -> Self {
        Self {
            host,
            action,
            path: None,
            query: None,
        }
    }

    /// Address a file or folder inside `root`.
    pub fn path(mut self, root: &'a str, path: &'a str) -> Self {
        self.path = Some((root, path));
        self
    }

    /// Attach an already-encoded query string. Empty strings are ignored.
    pub fn query(mut self, query: &'a str) -> Self {
        self.query = Some(query);
        self
    }

    pub fn build(&self) -> String {
        let mut url = format!("https://{}/{}/{}", self.host, API_VERSION, self.action);

        if let Some((root, path)) = self.path {
            url.push('/');
            url.push_str(root);
            url.push('/');
            url.push_str(&encode_path(path));
        }

        if let Some(query) = self.query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }

        url
    }
}

/// Percent-encode each path component, keeping the `/` separators.
///
/// Leading slashes are dropped; the caller supplies the one after the root.
pub fn encode_path(path: &str) -> String {
    path.trim_start_matches('/')
        .split('/')
        .map(|component| urlencoding::encode(component).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
