//! Text templates evaluated against the metadata client.
//!
//! Templates use Jinja2 syntax (via minijinja). The client is exposed through a
//! fixed table of functions, e.g. `{{ UUID() }}` or
//! `{{ AppAnnotationOr("version", "dev") }}`; nothing else is in scope.

use crate::client::MetadataClient;
use crate::error::{MetadataError, Result};
use minijinja::{context, AutoEscape, Environment, Error, ErrorKind, Value};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;

/// Names of the functions available inside a template.
pub const FUNCTIONS: &[&str] = &[
    "UUID",
    "PodAnnotation",
    "MustPodAnnotation",
    "PodAnnotationOr",
    "PodManifestJSON",
    "PodManifest",
    "AppName",
    "AppImageID",
    "AppImageManifestJSON",
    "AppImageManifest",
    "AppAnnotation",
    "MustAppAnnotation",
    "AppAnnotationOr",
];

/// Path that makes [`Renderer::render_file`] read standard input.
pub const STDIN_PATH: &str = "-";

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(client: Arc<MetadataClient>) -> Renderer {
        let mut env = Environment::new();
        // output is plain text, and must match the template byte for byte
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        register_functions(&mut env, client);
        Renderer { env }
    }

    pub fn functions(&self) -> &'static [&'static str] {
        FUNCTIONS
    }

    /// Renders a literal template string.
    pub fn render_str(&self, source: &str) -> Result<String> {
        self.render_named("<expand>", source)
    }

    /// Renders the template at `path`, or standard input for `-`.
    pub fn render_file(&self, path: &str) -> Result<String> {
        let source = if path == STDIN_PATH {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            fs::read_to_string(path)?
        };
        self.render_named(path, &source)
    }

    fn render_named(&self, name: &str, source: &str) -> Result<String> {
        debug!("rendering template {}", name);
        let tmpl = self.env.template_from_named_str(name, source)?;
        Ok(tmpl.render(context! {})?)
    }
}

fn template_error(err: MetadataError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

fn text(res: Result<&str>) -> std::result::Result<String, Error> {
    res.map(str::to_string).map_err(template_error)
}

fn register_functions(env: &mut Environment<'static>, client: Arc<MetadataClient>) {
    let c = client.clone();
    env.add_function("UUID", move || text(c.uuid()));

    let c = client.clone();
    env.add_function("PodAnnotation",
                     move |name: String| text(c.pod_annotation_or_empty(&name)));
    let c = client.clone();
    env.add_function("MustPodAnnotation",
                     move |name: String| text(c.must_pod_annotation(&name)));
    let c = client.clone();
    env.add_function("PodAnnotationOr", move |name: String, default: String| {
        text(c.pod_annotation_or(&name, &default))
    });

    let c = client.clone();
    env.add_function("PodManifestJSON",
                     move || c.pod_manifest_json().map_err(template_error));
    let c = client.clone();
    env.add_function("PodManifest", move || {
        c.pod_manifest()
            .map(Value::from_serialize)
            .map_err(template_error)
    });

    let c = client.clone();
    env.add_function("AppName", move || c.app_name().to_string());
    let c = client.clone();
    env.add_function("AppImageID", move || text(c.app_image_id()));
    let c = client.clone();
    env.add_function("AppImageManifestJSON",
                     move || c.app_image_manifest_json().map_err(template_error));
    let c = client.clone();
    env.add_function("AppImageManifest", move || {
        c.app_image_manifest()
            .map(Value::from_serialize)
            .map_err(template_error)
    });

    let c = client.clone();
    env.add_function("AppAnnotation",
                     move |name: String| text(c.app_annotation_or_empty(&name)));
    let c = client.clone();
    env.add_function("MustAppAnnotation",
                     move |name: String| text(c.must_app_annotation(&name)));
    let c = client;
    env.add_function("AppAnnotationOr", move |name: String, default: String| {
        text(c.app_annotation_or(&name, &default))
    });
}
