//! Memoizing client for the appc metadata service.
//!
//! Every accessor hits the network at most once per client. The raw manifest
//! bytes and their decoded form are cached separately, so asking for the json
//! and then for the structure still costs a single request.

use crate::appc::{AnnotationSet, ImageManifest, PodManifest};
use crate::config::Config;
use crate::error::{MetadataError, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::StatusCode;

pub const METADATA_FLAVOR_HEADER: &str = "Metadata-Flavor";
pub const METADATA_FLAVOR: &str = "AppContainer";

const POD_UUID: &str = "pod/uuid";
const POD_ANNOTATIONS: &str = "pod/annotations";
const POD_MANIFEST: &str = "pod/manifest";

pub struct MetadataClient {
    config: Config,
    http: Client,
    uuid: OnceCell<String>,
    pod_annotations: OnceCell<AnnotationSet>,
    pod_manifest_json: OnceCell<Vec<u8>>,
    pod_manifest: OnceCell<PodManifest>,
    app_image_id: OnceCell<String>,
    app_annotations: OnceCell<AnnotationSet>,
    app_image_manifest_json: OnceCell<Vec<u8>>,
    app_image_manifest: OnceCell<ImageManifest>,
}

impl MetadataClient {
    pub fn new(config: Config) -> Result<MetadataClient> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|source| {
                MetadataError::Transport {
                    url: config.metadata_url.clone(),
                    source,
                }
            })?;

        Ok(MetadataClient {
            config,
            http,
            uuid: OnceCell::new(),
            pod_annotations: OnceCell::new(),
            pod_manifest_json: OnceCell::new(),
            pod_manifest: OnceCell::new(),
            app_image_id: OnceCell::new(),
            app_annotations: OnceCell::new(),
            app_image_manifest_json: OnceCell::new(),
            app_image_manifest: OnceCell::new(),
        })
    }

    pub fn from_env() -> Result<MetadataClient> {
        MetadataClient::new(Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn app_name(&self) -> &str {
        &self.config.app_name
    }

    /// GETs `path` below the metadata root. A 404 is `Ok(None)`; any other
    /// non-200 status is an error carrying the response body.
    pub fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let url = self.config.url_for(path);
        debug!("GET {}", url);

        let resp = self.http
            .get(&url)
            .header(METADATA_FLAVOR_HEADER, METADATA_FLAVOR)
            .send()
            .map_err(|source| {
                MetadataError::Transport {
                    url: url.clone(),
                    source,
                }
            })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!("{} not found", path);
            return Ok(None);
        }
        if status != StatusCode::OK {
            let body = diagnostic_body(resp.text());
            return Err(MetadataError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes()
            .map_err(|source| MetadataError::Transport { url, source })?;
        Ok(Some(body.to_vec()))
    }

    fn fetch_required(&self, path: &str) -> Result<Vec<u8>> {
        match self.fetch(path)? {
            Some(body) => Ok(body),
            None => {
                Err(MetadataError::Status {
                    path: path.to_string(),
                    status: StatusCode::NOT_FOUND.as_u16(),
                    body: String::new(),
                })
            }
        }
    }

    fn fetch_trimmed(&self, path: &str) -> Result<String> {
        let body = self.fetch_required(path)?;
        Ok(String::from_utf8_lossy(&body).trim().to_string())
    }

    fn fetch_annotations(&self, path: &str) -> Result<AnnotationSet> {
        match self.fetch(path)? {
            Some(body) => {
                serde_json::from_slice(&body).map_err(|source| {
                    MetadataError::Decode {
                        path: path.to_string(),
                        source,
                    }
                })
            }
            None => {
                // no annotations published for this scope
                Ok(AnnotationSet::new())
            }
        }
    }

    fn app_path(&self, rest: &str) -> String {
        format!("apps/{}/{}", self.config.app_name, rest)
    }

    pub fn uuid(&self) -> Result<&str> {
        cached(&self.uuid, POD_UUID, || self.fetch_trimmed(POD_UUID)).map(String::as_str)
    }

    pub fn pod_annotations(&self) -> Result<&AnnotationSet> {
        cached(&self.pod_annotations,
               POD_ANNOTATIONS,
               || self.fetch_annotations(POD_ANNOTATIONS))
    }

    pub fn pod_annotation(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.pod_annotations()?.get(name))
    }

    pub fn pod_annotation_or_empty(&self, name: &str) -> Result<&str> {
        Ok(self.pod_annotation(name)?.unwrap_or(""))
    }

    pub fn pod_annotation_or<'a>(&'a self, name: &str, default: &'a str) -> Result<&'a str> {
        Ok(self.pod_annotation(name)?.unwrap_or(default))
    }

    pub fn must_pod_annotation(&self, name: &str) -> Result<&str> {
        self.pod_annotation(name)?.ok_or_else(|| {
            MetadataError::AnnotationNotFound {
                scope: "pod",
                name: name.to_string(),
            }
        })
    }

    pub fn pod_manifest_raw(&self) -> Result<&[u8]> {
        cached(&self.pod_manifest_json,
               POD_MANIFEST,
               || self.fetch_required(POD_MANIFEST))
            .map(Vec::as_slice)
    }

    pub fn pod_manifest_json(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(self.pod_manifest_raw()?).into_owned())
    }

    pub fn pod_manifest(&self) -> Result<&PodManifest> {
        cached(&self.pod_manifest, "decoded pod/manifest", || {
            serde_json::from_slice(self.pod_manifest_raw()?).map_err(|source| {
                MetadataError::Decode {
                    path: POD_MANIFEST.to_string(),
                    source,
                }
            })
        })
    }

    pub fn app_image_id(&self) -> Result<&str> {
        let path = self.app_path("image/id");
        cached(&self.app_image_id,
               &path,
               || self.fetch_trimmed(&path))
            .map(String::as_str)
    }

    pub fn app_image_manifest_raw(&self) -> Result<&[u8]> {
        let path = self.app_path("image/manifest");
        cached(&self.app_image_manifest_json,
               &path,
               || self.fetch_required(&path))
            .map(Vec::as_slice)
    }

    pub fn app_image_manifest_json(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(self.app_image_manifest_raw()?).into_owned())
    }

    pub fn app_image_manifest(&self) -> Result<&ImageManifest> {
        cached(&self.app_image_manifest, "decoded image manifest", || {
            serde_json::from_slice(self.app_image_manifest_raw()?).map_err(|source| {
                MetadataError::Decode {
                    path: self.app_path("image/manifest"),
                    source,
                }
            })
        })
    }

    pub fn app_annotations(&self) -> Result<&AnnotationSet> {
        let path = self.app_path("annotations");
        cached(&self.app_annotations,
               &path,
               || self.fetch_annotations(&path))
    }

    pub fn app_annotation(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.app_annotations()?.get(name))
    }

    pub fn app_annotation_or_empty(&self, name: &str) -> Result<&str> {
        Ok(self.app_annotation(name)?.unwrap_or(""))
    }

    pub fn app_annotation_or<'a>(&'a self, name: &str, default: &'a str) -> Result<&'a str> {
        Ok(self.app_annotation(name)?.unwrap_or(default))
    }

    pub fn must_app_annotation(&self, name: &str) -> Result<&str> {
        self.app_annotation(name)?.ok_or_else(|| {
            MetadataError::AnnotationNotFound {
                scope: "app",
                name: name.to_string(),
            }
        })
    }
}

/// Returns the cached value, filling the cell with `init` on first use.
fn cached<'a, T, F>(cell: &'a OnceCell<T>, what: &str, init: F) -> Result<&'a T>
    where F: FnOnce() -> Result<T>
{
    if let Some(value) = cell.get() {
        debug!("{} served from cache", what);
        return Ok(value);
    }
    cell.get_or_try_init(init)
}

/// Body text for an unexpected status. A failed read is reported in place of
/// the body rather than dropped.
fn diagnostic_body(body: reqwest::Result<String>) -> String {
    match body {
        Ok(body) => body,
        Err(e) => format!("<unable to read response body: {}>", e),
    }
}
