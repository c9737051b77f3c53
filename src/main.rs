#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use ac_mdc::error::{MetadataError, Result};
use ac_mdc::{MetadataClient, Renderer};
use docopt::Docopt;
use log::LevelFilter;
use std::io::{self, Write};
use std::sync::Arc;

const USAGE: &str = "
Usage:
    mdc [options] uuid
    mdc [options] annotation <name> [<default>]
    mdc [options] manifest
    mdc [options] image-id
    mdc [options] image-manifest
    mdc [options] app-annotation <name> [<default>]
    mdc [options] render <path>
    mdc [options] expand <template>
    mdc help

Options:
    --debug    log metadata requests to stderr

The metadata service is located through AC_METADATA_URL and AC_APP_NAME.
A render path of - reads the template from stdin.
";

#[derive(Debug, Deserialize)]
struct Args {
    flag_debug: bool,
    cmd_uuid: bool,
    cmd_annotation: bool,
    cmd_manifest: bool,
    cmd_image_id: bool,
    cmd_image_manifest: bool,
    cmd_app_annotation: bool,
    cmd_render: bool,
    cmd_expand: bool,
    cmd_help: bool,
    arg_name: String,
    arg_default: Option<String>,
    arg_path: String,
    arg_template: String,
}

fn main() {
    let args = std::env::args().collect();
    std::process::exit(run(args));
}

fn usage() {
    eprintln!("{}", USAGE.trim());
}

fn wants_help(argv: &[String]) -> bool {
    match argv.get(1).map(String::as_str) {
        None => true,
        Some("help") | Some("--help") | Some("-help") | Some("-h") => true,
        _ => false,
    }
}

/// Options are only recognised before the subcommand, so annotation names
/// and defaults are taken verbatim even when they start with `-`.
fn parse_args(argv: Vec<String>) -> std::result::Result<Args, docopt::Error> {
    Docopt::new(USAGE).and_then(|d| d.help(false).options_first(true).argv(argv).deserialize())
}

fn run(argv: Vec<String>) -> i32 {
    if wants_help(&argv) {
        usage();
        return 0;
    }

    let args = match parse_args(argv) {
        Ok(args) => args,
        Err(_) => {
            usage();
            return 1;
        }
    };
    if args.cmd_help {
        usage();
        return 0;
    }

    {
        let mut logger = env_logger::Builder::new();
        if args.flag_debug {
            logger.filter_level(LevelFilter::Debug);
        } else {
            logger.filter_level(LevelFilter::Warn);
        }
        logger.parse_default_env();
        if let Err(e) = logger.try_init() {
            eprintln!("unable to init logger: {}", e);
        }
    }
    debug!("called with args: {:?}", args);

    // configuration is checked before any request goes out
    let client = match MetadataClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            return 1;
        }
    };

    debug!("metadata service at {} for app {}",
           client.config().metadata_url,
           client.app_name());

    match execute(&args, Arc::new(client)) {
        Ok(()) => 0,
        Err(e) => {
            report(&e);
            1
        }
    }
}

fn report(err: &MetadataError) {
    match *err {
        MetadataError::Status { ref path, status, ref body } => {
            eprintln!("\nERROR: GET {}", path);
            eprintln!("HTTP {}", status);
            eprintln!("{}", body);
        }
        ref e if e.is_config() => eprintln!("FATAL: {}", e),
        ref e => eprintln!("ERROR: {}", e),
    }
}

/// Picks the annotation value, falling back to the default given on the
/// command line. Without either the lookup is an error.
fn annotation_or_default<'a>(found: Option<&'a str>,
                             default: Option<&'a str>,
                             scope: &'static str,
                             name: &str)
                             -> Result<&'a str> {
    found.or(default).ok_or_else(|| {
        MetadataError::AnnotationNotFound {
            scope,
            name: name.to_string(),
        }
    })
}

fn execute(args: &Args, client: Arc<MetadataClient>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.cmd_uuid {
        writeln!(out, "{}", client.uuid()?)?;
    } else if args.cmd_annotation {
        let value = annotation_or_default(client.pod_annotation(&args.arg_name)?,
                                          args.arg_default.as_deref(),
                                          "pod",
                                          &args.arg_name)?;
        writeln!(out, "{}", value)?;
    } else if args.cmd_manifest {
        writeln!(out, "{}", client.pod_manifest_json()?)?;
    } else if args.cmd_image_id {
        writeln!(out, "{}", client.app_image_id()?)?;
    } else if args.cmd_image_manifest {
        writeln!(out, "{}", client.app_image_manifest_json()?)?;
    } else if args.cmd_app_annotation {
        let value = annotation_or_default(client.app_annotation(&args.arg_name)?,
                                          args.arg_default.as_deref(),
                                          "app",
                                          &args.arg_name)?;
        writeln!(out, "{}", value)?;
    } else if args.cmd_render {
        let rendered = Renderer::new(client).render_file(&args.arg_path)?;
        write!(out, "{}", rendered)?;
    } else if args.cmd_expand {
        let rendered = Renderer::new(client).render_str(&args.arg_template)?;
        write!(out, "{}", rendered)?;
    }
    out.flush()?;
    Ok(())
}
