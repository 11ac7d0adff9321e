/// URL utilities
pub mod url {
    use url::Url;

    pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp"];
    pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mov", ".avi", ".wmv", ".webm"];
    /// Hosts that only ever serve media, whatever the path looks like.
    pub const MEDIA_HOSTS: &[&str] = &["imagedelivery.net"];

    /// Extract the lower-cased host from a URL
    pub fn extract_host(url_str: &str) -> Option<String> {
        Url::parse(url_str)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.to_lowercase()))
    }

    /// True if `host` is `allowed` or one of its subdomains.
    pub fn host_matches(host: &str, allowed: &str) -> bool {
        host == allowed
            || host
                .strip_suffix(allowed)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Check if URL points at an image or a video
    pub fn is_media_url(url_str: &str) -> bool {
        if url_str.is_empty() {
            return false;
        }

        let lower = url_str.to_lowercase();
        if IMAGE_EXTENSIONS
            .iter()
            .chain(VIDEO_EXTENSIONS)
            .any(|ext| lower.ends_with(ext))
        {
            return true;
        }

        match extract_host(&lower) {
            Some(host) => MEDIA_HOSTS.iter().any(|allowed| host_matches(&host, allowed)),
            None => false,
        }
    }

    /// Validate an API base URL
    pub fn is_valid_api_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }
}

/// Text utilities
pub mod text {
    /// Length in characters, not bytes.
    pub fn char_len(text: &str) -> usize {
        text.chars().count()
    }

    /// Truncate for log and terminal output
    pub fn preview(text: &str, max_chars: usize) -> String {
        if char_len(text) <= max_chars {
            return text.replace('\n', " ");
        }
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut.replace('\n', " ").trim_end())
    }
}
