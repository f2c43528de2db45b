use super::{CmsApi, CmsError, ContentItem, normalize_key};
use crate::config::CmsConfig;
use once_cell::sync::OnceCell;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// Blocking REST client for the CMS content API.
///
/// The bearer token is fetched with the client-credentials grant on first use
/// and reused for the lifetime of the client.
pub struct CmsClient {
    config: CmsConfig,
    http: Client,
    token: OnceCell<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct VersionList {
    #[serde(default)]
    items: Vec<ContentItem>,
}

impl CmsClient {
    pub fn new(config: CmsConfig) -> Result<Self, CmsError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            config,
            http,
            token: OnceCell::new(),
        })
    }

    /// Appends each segment to the base URL, percent-encoding `/`, `?` and `%`.
    fn url(&self, segments: &[&str]) -> Result<Url, CmsError> {
        if !self.config.is_configured() {
            return Err(CmsError::NotConfigured);
        }
        let mut url = Url::parse(&self.config.base_url).map_err(|err| {
            CmsError::InvalidBaseUrl(format!("{}: {err}", self.config.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| CmsError::InvalidBaseUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn access_token(&self) -> Result<Option<&str>, CmsError> {
        if !self.config.has_credentials() {
            return Ok(None);
        }
        self.token
            .get_or_try_init(|| self.fetch_token())
            .map(|token| Some(token.as_str()))
    }

    fn fetch_token(&self) -> Result<String, CmsError> {
        let url = self.url(&["oauth", "token"])?;
        debug!(client_id = %self.config.client_id, "requesting access token");
        let response = self
            .http
            .post(url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CmsError::Auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }
        let token: TokenResponse = response.json()?;
        info!("obtained CMS access token");
        Ok(token.access_token)
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, CmsError> {
        let request = match self.access_token()? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        read_response(request.send()?)
    }

    fn get_version(
        &self,
        key: &str,
        version: &str,
        locale: Option<&str>,
    ) -> Result<ContentItem, CmsError> {
        let url = self.url(&version_path(key, version)?)?;
        debug!(%url, ?locale, "fetching content version");
        let value = self.send(with_locale(self.http.get(url), locale))?;
        Ok(serde_json::from_value(value)?)
    }

    fn get_latest(&self, key: &str, locale: Option<&str>) -> Result<ContentItem, CmsError> {
        let url = self.url(&versions_path(key)?)?;
        debug!(%url, ?locale, "fetching latest content version");
        let request = with_locale(self.http.get(url).query(&[("pageSize", "1")]), locale);
        let list: VersionList = serde_json::from_value(self.send(request)?)?;
        list.items
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::not_found(key))
    }
}

impl CmsApi for CmsClient {
    fn get_content(
        &self,
        key: &str,
        version: Option<&str>,
        locale: Option<&str>,
    ) -> Result<ContentItem, CmsError> {
        let key = normalize_key(key);
        match version {
            Some(version) => self.get_version(&key, version, locale),
            None => self.get_latest(&key, locale),
        }
    }

    fn create_content(&self, content: &ContentItem) -> Result<ContentItem, CmsError> {
        let url = self.url(&["content"])?;
        debug!(%url, content_type = ?content.content_type, "creating content");
        let value = self.send(self.http.post(url).json(content))?;
        Ok(serde_json::from_value(value)?)
    }

    fn create_content_version(&self, content: &ContentItem) -> Result<ContentItem, CmsError> {
        let key = content
            .key
            .as_deref()
            .map(normalize_key)
            .ok_or(CmsError::MissingKey)?;
        let url = self.url(&versions_path(&key)?)?;
        debug!(%url, locale = ?content.locale, "creating content version");
        let value = self.send(self.http.post(url).json(content))?;
        Ok(serde_json::from_value(value)?)
    }

    fn update_content(
        &self,
        key: &str,
        version: &str,
        updates: &Value,
        locale: Option<&str>,
    ) -> Result<ContentItem, CmsError> {
        let key = normalize_key(key);
        let url = self.url(&version_path(&key, version)?)?;
        debug!(%url, ?locale, "updating content version");
        let request = with_locale(self.http.patch(url), locale)
            .header(CONTENT_TYPE, MERGE_PATCH_JSON)
            .body(serde_json::to_vec(updates)?);
        let value = self.send(request)?;
        Ok(serde_json::from_value(value)?)
    }
}

fn versions_path(key: &str) -> Result<Vec<&str>, CmsError> {
    Ok(vec!["content", path_segment(key)?, "versions"])
}

fn version_path<'a>(key: &'a str, version: &'a str) -> Result<Vec<&'a str>, CmsError> {
    let mut path = versions_path(key)?;
    path.push(path_segment(version.trim())?);
    Ok(path)
}

/// Dot segments would be dropped by the URL encoder and shift the endpoint.
fn path_segment(value: &str) -> Result<&str, CmsError> {
    match value {
        "" | "." | ".." => Err(CmsError::InvalidPathSegment(value.to_string())),
        _ => Ok(value),
    }
}

fn with_locale(request: RequestBuilder, locale: Option<&str>) -> RequestBuilder {
    match locale {
        Some(locale) if !locale.trim().is_empty() => request.query(&[("locale", locale.trim())]),
        _ => request,
    }
}

fn read_response(response: Response) -> Result<Value, CmsError> {
    let status = response.status();
    let text = response.text()?;
    if !status.is_success() {
        return Err(CmsError::Http {
            status: status.as_u16(),
            body: parse_body(&text),
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
