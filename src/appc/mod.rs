//! Subset of the appc schema served by the metadata endpoint.
//!
//! Only the fields a workload can reasonably inspect about itself are modelled;
//! anything else in the documents is ignored on decode.

mod annotations;

pub use self::annotations::AnnotationSet;

use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodManifest {
    #[serde(rename = "acVersion")]
    pub ac_version: String,
    #[serde(rename = "acKind")]
    pub ac_kind: String,
    #[serde(default)]
    pub apps: Vec<RuntimeApp>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
    #[serde(default)]
    pub isolators: Vec<Isolator>,
    #[serde(default)]
    pub annotations: AnnotationSet,
    #[serde(default)]
    pub ports: Vec<ExposedPort>,
}

impl PodManifest {
    pub fn app(&self, name: &str) -> Option<&RuntimeApp> {
        self.apps.iter().find(|app| app.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeApp {
    pub name: String,
    pub image: RuntimeImage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<App>,
    #[serde(default)]
    pub mounts: Vec<Mount>,
    #[serde(default)]
    pub annotations: AnnotationSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub id: String,
    #[serde(default)]
    pub labels: Vec<NameValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageManifest {
    #[serde(rename = "acKind")]
    pub ac_kind: String,
    #[serde(rename = "acVersion")]
    pub ac_version: String,
    pub name: String,
    #[serde(default)]
    pub labels: Vec<NameValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<App>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(rename = "pathWhitelist", default)]
    pub path_whitelist: Vec<String>,
    #[serde(default)]
    pub annotations: AnnotationSet,
}

impl ImageManifest {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|kv| kv.name == name)
            .map(|kv| kv.value.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub exec: Vec<String>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub group: String,
    #[serde(rename = "eventHandlers", default)]
    pub event_handlers: Vec<EventHandler>,
    #[serde(default)]
    pub environment: Vec<NameValue>,
    #[serde(rename = "workingDirectory", default)]
    pub working_directory: String,
    #[serde(default)]
    pub isolators: Vec<Isolator>,
    #[serde(rename = "mountPoints", default)]
    pub mount_points: Vec<MountPoint>,
    #[serde(default)]
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventHandler {
    pub name: String,
    #[serde(default)]
    pub exec: Vec<String>,
}

/// Isolator values are kind-specific, so they're kept as raw json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Isolator {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub protocol: String,
    pub port: u16,
    #[serde(default = "default_port_count")]
    pub count: u32,
    #[serde(rename = "socketActivated", default)]
    pub socket_activated: bool,
}

fn default_port_count() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExposedPort {
    pub name: String,
    #[serde(rename = "hostPort")]
    pub host_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountPoint {
    pub name: String,
    pub path: String,
    #[serde(rename = "readOnly", default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mount {
    pub volume: String,
    // older pod manifests call this mountPoint
    #[serde(alias = "mountPoint", default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "readOnly", default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "imageName", alias = "app")]
    pub image_name: String,
    #[serde(rename = "imageID", default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<NameValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        NameValue {
            name: name.into(),
            value: value.into(),
        }
    }
}
