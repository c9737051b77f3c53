use assert_cmd::Command;
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_NAME: &str = "reduce-worker";
pub const POD_UUID: &str = "26E56A04-F590-11E4-A66F-D7B3DD9DA696";
pub const POD_MANIFEST: &str = r#"{
    "acVersion": "0.5.1",
    "acKind": "PodManifest",
    "apps": [
        {
            "name": "reduce-worker",
            "image": {
                "name": "example.com/reduce-worker",
                "id": "sha512-8d3fffddf79e9a232ffd19f9ccaa4d6b37a6a243dbe0f23137b108a043d9da13"
            },
            "annotations": [{"name": "foo", "value": "baz"}]
        }
    ],
    "annotations": [{"name": "ip-address", "value": "10.1.2.3"}]
}"#;

/// Metadata service stub. Runs on its own runtime so the binary under test
/// can be driven synchronously.
pub struct MetadataStub {
    server: MockServer,
    rt: Runtime,
}

impl MetadataStub {
    pub fn start() -> Self {
        let rt = Runtime::new().expect("create runtime");
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    pub fn serve(&self, rel: &str, status: u16, body: &str) {
        let mock = Mock::given(method("GET"))
            .and(path(format!("/acMetadata/v1/{}", rel)))
            .and(header("Metadata-Flavor", "AppContainer"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body));
        self.rt.block_on(mock.mount(&self.server));
    }

    pub fn requests(&self) -> usize {
        self.rt
            .block_on(self.server.received_requests())
            .map(|reqs| reqs.len())
            .unwrap_or(0)
    }

    /// `mdc` with the metadata environment pointing at this stub.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("mdc").expect("mdc binary");
        cmd.env("AC_METADATA_URL", self.server.uri())
            .env("AC_APP_NAME", APP_NAME)
            .env_remove("AC_METADATA_TIMEOUT")
            .env_remove("RUST_LOG");
        cmd
    }
}
