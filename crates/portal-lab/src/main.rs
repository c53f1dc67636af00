#![forbid(unsafe_code)]

//! Portal Lab binary entry point.

use std::sync::Arc;

use portal_gateway::{Gateway, HttpGateway, HttpGatewayConfig, InMemoryGateway};
use portal_lab::{LabConfig, LabModel, Opts, logging};
use portal_model::{DragConfig, ImageCache};
use portal_runtime::{Program, ProgramConfig, SystemClock};

fn main() {
    let opts = Opts::parse();

    if let Some(path) = &opts.log_file
        && let Err(e) = logging::init(path, opts.log_json)
    {
        eprintln!("Could not open log file {}: {e}", path.display());
        std::process::exit(1);
    }

    let gateway: Arc<dyn Gateway> = if opts.offline {
        tracing::info!(seed = opts.seed, "using offline roster");
        Arc::new(InMemoryGateway::seeded(opts.seed))
    } else {
        let config = HttpGatewayConfig {
            base_url: opts.api_url.clone(),
            ..HttpGatewayConfig::default()
        };
        match HttpGateway::new(config) {
            Ok(gw) => Arc::new(gw),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    };

    let model = LabModel::new(
        gateway,
        ImageCache::new(),
        Arc::new(SystemClock),
        LabConfig {
            debounce: opts.debounce(),
            drag: DragConfig::default(),
            ..LabConfig::default()
        },
    );
    let config = ProgramConfig {
        mouse: opts.mouse,
        ..ProgramConfig::default()
    };

    let result = Program::new(model, config).and_then(|program| program.run());
    if let Err(e) = result {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
