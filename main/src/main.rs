use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use display::touch::Rotation;
use display::{CairoSvg, Display, FbPanel};
use engine::{PanelCmdData, PanelHandle};
use lcars_shared::Message;
use structopt::StructOpt;

mod config;
mod layout;
mod mqtt;
mod panel;
mod render;
mod theme;

#[derive(StructOpt, Debug)]
#[structopt(name = "lcars-panel")]
struct CmdLineOptions {
    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Draw a centred test shape ("square" or "circle") and exit
    #[structopt(long)]
    probe: Option<String>,

    /// Fill the probe shape instead of outlining it
    #[structopt(long)]
    fill: bool,

    /// Seed a few demo messages, render one frame and exit
    #[structopt(long)]
    sample: bool,

    /// Render into an SVG file instead of the framebuffer
    #[structopt(long, parse(from_os_str))]
    svg: Option<PathBuf>,

    /// Logical width used with --svg
    #[structopt(long, default_value = "800")]
    width: usize,

    /// Logical height used with --svg
    #[structopt(long, default_value = "480")]
    height: usize,
}

const SAMPLE_MESSAGES: &[(&str, &str)] = &[
    (
        "home/lcars_panel/engineering",
        r#"{"message":"Warp core output holding at 98 percent","source":"engineering","importance":"warning"}"#,
    ),
    (
        "home/lcars_panel/bridge",
        r#"{"message":"All stations report ready","source":"bridge","importance":"control"}"#,
    ),
    ("home/lcars_panel/door", "open"),
];

async fn wait_for_signal(shutdown: Arc<AtomicBool>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate()).ok();
    tokio::select! {
        _ = tokio::signal::ctrl_c() => log::info!("Received CTRL_C signal, exiting..."),
        _ = async {
            match term.as_mut() {
                Some(t) => { t.recv().await; }
                None => std::future::pending().await,
            }
        } => log::info!("Received TERM signal, exiting..."),
    }
    shutdown.store(true, Ordering::Relaxed);
}

async fn run_app<D: Display>(
    mut display: D,
    opts: CmdLineOptions,
    config: config::Config,
    rotation: Rotation,
) {
    if let Some(shape) = &opts.probe {
        if let Err(e) = panel::render_probe(&mut display, shape, opts.fill) {
            log::error!("Probe rendering failed: {:?}", e);
        }
        return;
    }

    let handle = PanelHandle::new(config.panel.history);
    let mut panel = match panel::Panel::new(display, handle.clone(), &config, rotation) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Panel initialization failed: {:?}", e);
            return;
        }
    };

    if opts.sample {
        for (topic, payload) in SAMPLE_MESSAGES {
            if let Some(m) = Message::from_payload(topic, payload.as_bytes()) {
                handle.send(PanelCmdData::Message(m)).await;
            }
        }
        if let Err(e) = panel.render_frame().await {
            log::error!("Sample rendering failed: {:?}", e);
        }
        return;
    }

    mqtt::start(&config.mqtt, handle.clone());

    let shutdown = Arc::new(AtomicBool::new(false));
    tokio::spawn(wait_for_signal(Arc::clone(&shutdown)));

    if let Err(e) = panel.run(shutdown).await {
        log::error!("Panel loop failed: {:?}", e);
    }
    if let Err(e) = panel.blank() {
        log::error!("Blanking the display failed: {:?}", e);
    }
}

#[tokio::main]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let cmd_line_opt = CmdLineOptions::from_args();
    log::debug!("Parsed cmd line parameters:\n{:#?}", &cmd_line_opt);

    let config = match &cmd_line_opt.config {
        Some(path) => match config::read_toml_config(path) {
            Some(c) => c,
            None => {
                log::error!("Cannot continue without the requested config");
                return;
            }
        },
        None => config::Config::default(),
    };

    let rotation = match Rotation::from_degrees(config.panel.rotate) {
        Some(r) => r,
        None => {
            log::warn!("Unsupported rotation {}, using 0", config.panel.rotate);
            Rotation::Deg0
        }
    };

    if let Some(path) = cmd_line_opt.svg.clone() {
        // The SVG backend draws in logical coordinates already.
        let svg = CairoSvg::new(cmd_line_opt.width, cmd_line_opt.height, path);
        run_app(svg, cmd_line_opt, config, rotation).await;
    } else {
        match FbPanel::new(&config.panel.device, rotation) {
            Ok(fb) => run_app(fb, cmd_line_opt, config, rotation).await,
            Err(e) => log::error!("Cannot open framebuffer {}: {:?}", &config.panel.device, e),
        }
    }
}
