//! Render every kernel and method combination over a surveyed field.
//!
//! Run with: cargo run --package heatmap-renderer --example render_all_modes -- [output_dir]
//! Set RUST_LOG=debug to see per-render details.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use geo_projection::Sizing;
use heatmap_renderer::{
    render_geo_heatmap, GeoHeatmapRequest, Kernel, MethodKind, RenderOptions,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/heatmap-modes"));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let field = test_utils::fixtures::small_plot();
    let samples = test_utils::fixtures::small_plot_samples();

    for kernel in Kernel::ALL {
        for method in MethodKind::ALL {
            let options = RenderOptions::default()
                .with_kernel(kernel.name())
                .with_method(method.name());
            let request = GeoHeatmapRequest::new(field.clone(), samples.clone(), Sizing::width(400))
                .with_options(options);
            let rendered = render_geo_heatmap(&request)
                .with_context(|| format!("rendering {} / {}", kernel, method))?;

            let path = out_dir.join(format!("{}_{}.png", kernel, method));
            fs::write(&path, &rendered.png)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                kernel = %kernel,
                method = %method,
                width = rendered.width,
                height = rendered.height,
                path = %path.display(),
                "Rendered"
            );
        }
    }

    Ok(())
}
