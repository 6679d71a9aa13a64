use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use idxd_layout::cli;
use idxd_layout::controller::{DetailView, GridView, LayoutEvent};
use idxd_layout::scanner::{FileScanner, MeasureQueue, MeasureRequest, ScanConfig};
use idxd_layout::{LayoutBox, LayoutConfig};

fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "idxd_layout=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let code = match run() {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let Some(args) = cli::maybe_parse_args()? else {
        println!("{}", cli::USAGE);
        return Ok(());
    };

    let mut config = LayoutConfig::from_env().context("Invalid layout environment")?;
    args.apply(&mut config);
    config.validate().context("Invalid layout arguments")?;
    debug!(?config, "Layout configuration");

    let items = FileScanner::with_config(ScanConfig {
        recursive: args.recursive,
        ..ScanConfig::default()
    })
    .scan(&args.path)?;

    let mut grid = GridView::from_config(&config);
    grid.on_viewport_resized(args.width);
    let handles = grid.present(items);

    let mut queue = MeasureQueue::new(args.workers)?;
    for (item, handle) in grid.items().iter().zip(&handles) {
        queue.request(MeasureRequest {
            handle: handle.clone(),
            path: item.path.clone(),
            media_type: item.media_type,
        });
    }
    queue.close();

    let mut measured = 0usize;
    for event in queue.results().iter() {
        match event {
            LayoutEvent::Measured { handle, native } => {
                if grid.on_measured(&handle, native).is_some() {
                    measured += 1;
                }
            }
            LayoutEvent::BoxChanged { handle, .. } => {
                debug!(path = %handle.key.display(), "Grid owns cell boxes, ignoring");
            }
        }
    }

    info!(
        items = grid.items().len(),
        measured,
        rows = grid.rows().len(),
        height = grid.total_height(0.0),
        "Layout complete"
    );

    print_grid(&grid);
    if let Some(container) = args.viewer {
        print_viewer(&grid, container);
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_grid(grid: &GridView) {
    for row in grid.rows() {
        println!(
            "row={} height={} items={}",
            row.row_index,
            row.height_px,
            row.items.len()
        );
        for cell in &row.items {
            let name = display_name(&cell.media_path);
            match grid.engine().geometry(&cell.media_path) {
                Some(g) => println!(
                    "  {} x={:.1} box={:.1}x{:.1} orientation={} scale={:.4} css=\"{}\"",
                    name,
                    cell.offset_left,
                    cell.display_w,
                    cell.display_h,
                    g.orientation.to_exif(),
                    g.scale,
                    g.css_transform()
                ),
                None => println!(
                    "  {} x={:.1} box={:.1}x{:.1} pending",
                    name, cell.offset_left, cell.display_w, cell.display_h
                ),
            }
        }
    }
}

fn print_viewer(grid: &GridView, container: LayoutBox) {
    let Some(item) = grid.items().first() else {
        println!("viewer: no items");
        return;
    };

    let mut viewer = DetailView::new();
    viewer.on_container_resized(container);
    viewer.show(item);

    match viewer.geometry() {
        Some(g) => {
            let m = g.affine();
            println!(
                "viewer {} container={}x{} scale={:.4} matrix=({:.4}, {:.4}, {:.4}, {:.4}, {:.2}, {:.2}) css=\"{}\"",
                display_name(&item.path),
                container.width,
                container.height,
                g.scale,
                m.a,
                m.b,
                m.c,
                m.d,
                m.e,
                m.f,
                g.css_transform()
            );
        }
        None => println!("viewer {} pending", display_name(&item.path)),
    }
}
