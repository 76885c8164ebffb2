//! Upstream URL construction and key redaction.

use reqwest::Url;

use super::error::RelayError;

const REDACTED: &str = "[HIDDEN]";

/// `{upstream}/chat/{model}/{message}/key={api_key}`, segments percent-encoded.
pub fn chat_url(upstream: &Url, model: &str, message: &str, api_key: &str) -> Result<Url, RelayError> {
    let mut url = upstream.clone();
    url.path_segments_mut()
        .map_err(|_| RelayError::InvalidUrl(upstream.to_string()))?
        .pop_if_empty()
        .push("chat")
        .push(model)
        .push(message)
        .push(&format!("key={}", api_key));
    Ok(url)
}

/// `{upstream}/{path}` with `query` appended verbatim.
pub fn passthrough_url(upstream: &Url, path: &str, query: Option<&str>) -> Result<Url, RelayError> {
    let base = upstream.as_str().trim_end_matches('/');
    let mut raw = format!("{}/{}", base, path.trim_start_matches('/'));
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        raw.push('?');
        raw.push_str(q);
    }
    Url::parse(&raw).map_err(|_| RelayError::InvalidUrl(raw))
}

/// URL text safe for logs: the key (raw or in its `key=` segment) becomes `[HIDDEN]`.
pub fn redact(url: &Url, api_key: &str) -> String {
    let mut text = url.as_str().to_string();
    if let Some(start) = text.find("/key=") {
        let value_start = start + "/key=".len();
        let value_end = text[value_start..]
            .find(['/', '?', '#'])
            .map(|i| value_start + i)
            .unwrap_or(text.len());
        text.replace_range(value_start..value_end, REDACTED);
    }
    if api_key.is_empty() {
        text
    } else {
        text.replace(api_key, REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream() -> Url {
        Url::parse("https://meeeapi.vercel.app").unwrap()
    }

    #[test]
    fn chat_url_injects_key() {
        let url = chat_url(&upstream(), "a4", "hola amigo", "sk123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://meeeapi.vercel.app/chat/a4/hola%20amigo/key=sk123"
        );
    }

    #[test]
    fn chat_url_encodes_slashes_in_message() {
        let url = chat_url(&upstream(), "a4", "1/2?", "k").unwrap();
        assert!(url.as_str().contains("/chat/a4/1%2F2%3F/key=k"));
    }

    #[test]
    fn passthrough_keeps_query() {
        let url = passthrough_url(&upstream(), "models/list", Some("page=2")).unwrap();
        assert_eq!(url.as_str(), "https://meeeapi.vercel.app/models/list?page=2");
        let url = passthrough_url(&upstream(), "/x", Some("")).unwrap();
        assert_eq!(url.as_str(), "https://meeeapi.vercel.app/x");
    }

    #[test]
    fn redact_hides_key() {
        let url = chat_url(&upstream(), "a4", "hi", "secret key").unwrap();
        let logged = redact(&url, "secret key");
        assert!(!logged.contains("secret"));
        assert!(logged.ends_with("/key=[HIDDEN]"));
    }

    #[test]
    fn redact_hides_raw_key_elsewhere() {
        let url = Url::parse("https://up.example/chat/a4/sk999").unwrap();
        assert_eq!(redact(&url, "sk999"), "https://up.example/chat/a4/[HIDDEN]");
    }
}
