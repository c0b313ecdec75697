//! Host-side helper.
//!
//! `pixel_mask serve` builds the WASM bundle into `static/pkg`, serves
//! `static/` over HTTP and (if available) exposes it via ngrok.
//! `pixel_mask preview` runs the mask on the CPU over a still image, which is
//! handy for tuning a profile without a browser.

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::PathBuf;
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context, Result};
    use clap::{Args, Parser, Subcommand};
    use log::{info, warn};

    use pixel_mask::{mask, EffectAdapter, Frame, InputMode, MaskProfile, Resolution, Vec2};

    #[derive(Parser)]
    #[command(name = "pixel_mask")]
    #[command(about = "Dev server and offline preview for the pixel mask", long_about = None)]
    #[command(version)]
    struct Cli {
        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Build the WASM bundle and serve static/
        Serve {
            /// Port for the local HTTP server
            #[arg(long, default_value_t = 8000)]
            port: u16,

            /// Skip building with wasm-pack and serve what is there
            #[arg(long)]
            no_build: bool,

            /// Do not try to start an ngrok tunnel
            #[arg(long)]
            no_tunnel: bool,
        },

        /// Apply the mask to an image on the CPU
        Preview(PreviewArgs),
    }

    #[derive(Args)]
    struct PreviewArgs {
        /// Source image (any format the `image` crate decodes)
        input: PathBuf,

        /// Where to write the masked image
        output: PathBuf,

        /// Focus x in image pixels from the left (default: center)
        #[arg(long)]
        x: Option<f32>,

        /// Focus y in image pixels from the top (default: center)
        #[arg(long)]
        y: Option<f32>,

        /// JSON mask profile; defaults to the built-in one
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use the touch-layout config instead of the desktop one
        #[arg(long)]
        mobile: bool,

        /// Device pixel ratio the profile is scaled by
        #[arg(long, default_value_t = 1.0)]
        dpr: f32,

        /// Use the hover-gated preset
        #[arg(long)]
        legacy: bool,

        /// Report the model as hovered (only matters with --legacy)
        #[arg(long)]
        hovered: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        match Cli::parse().command {
            Commands::Serve {
                port,
                no_build,
                no_tunnel,
            } => serve(port, no_build, no_tunnel),
            Commands::Preview(args) => preview(&args),
        }
    }

    fn serve(port: u16, no_build: bool, no_tunnel: bool) -> Result<()> {
        if !no_build {
            info!("building WASM pkg …");
            match Command::new("wasm-pack")
                .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
                .status()
            {
                Ok(st) if st.success() => {}
                Ok(st) => bail!("wasm-pack finished with {st}"),
                Err(_) => warn!(
                    "wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/); \
                     serving possibly stale artifacts"
                ),
            }
        }

        info!("serving static/ at http://127.0.0.1:{port}");
        let mut server = Command::new("python3")
            .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("start python3 http.server")?;

        if !no_tunnel {
            match Command::new("ngrok")
                .args(["http", &port.to_string()])
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .spawn()
            {
                Ok(_) => info!("ngrok tunnel starting …"),
                Err(_) => warn!("ngrok not found; install it to expose the site over the internet"),
            }
        }

        let status = server.wait().context("wait for http server")?;
        info!("http server exited with {status}");
        Ok(())
    }

    fn preview(args: &PreviewArgs) -> Result<()> {
        let img = image::open(&args.input)
            .with_context(|| format!("decode {}", args.input.display()))?
            .to_rgb8();
        let (w, h) = img.dimensions();
        let frame = Frame::from_fn(w as usize, h as usize, |x, y| {
            let p = img.get_pixel(x as u32, y as u32);
            ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32
        });

        let profile = match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("read {}", path.display()))?;
                MaskProfile::from_json(&json)?
            }
            None => MaskProfile::default(),
        };
        let mode = if args.mobile {
            InputMode::Mobile
        } else {
            InputMode::Desktop
        };
        let mut config = profile.for_mode(mode, args.dpr);
        if args.legacy {
            config = config.as_legacy();
        }

        let resolution = Resolution::new(w as f32, h as f32);
        let center = resolution.center();
        let focus = Vec2::new(args.x.unwrap_or(center.x), args.y.unwrap_or(center.y));
        let mut adapter = EffectAdapter::new(config, resolution);
        adapter.set_focus(resolution.flip_y(focus));
        adapter.set_hovered(args.hovered);
        info!(
            "masking {}x{} at ({}, {}) with {:?}",
            w,
            h,
            focus.x,
            focus.y,
            adapter.config()
        );

        let out = mask::apply(&adapter.uniforms(), &frame);
        let mut buf = image::RgbImage::new(w, h);
        for (x, y, px) in buf.enumerate_pixels_mut() {
            let p = out.get(x as usize, y as usize);
            *px = image::Rgb([(p >> 16) as u8, (p >> 8) as u8, p as u8]);
        }
        buf.save(&args.output)
            .with_context(|| format!("write {}", args.output.display()))?;
        info!("wrote {}", args.output.display());
        Ok(())
    }
}
