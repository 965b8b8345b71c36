use anyhow::Result;

use multiview_engine::logging::{init_logging, LoggingConfig};
use multiview_viewer::{tutorial, MultiViewer};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut viewer = MultiViewer::new(2, 2)?.title("Multiview - Drawables");
    tutorial::populate(&mut viewer, &mut rand::thread_rng())?;

    viewer.run()
}
