//! Main application entry point (native).
//!
//! Plays a short scripted interaction on the demo pickers and writes the
//! resulting markup to the path given as the first argument, or to stdout.

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting RingDial demo");

    if let Err(err) = run(std::env::args().nth(1)) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(feature = "native")]
fn run(output: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut demo = ringdial_app::Demo::standard()?;

    let mut script = demo.drag_script(0, 245.0);
    script.extend(demo.click_script(1, 90.0));
    let applied = demo.play(&script)?;
    log::info!("Applied {applied} updates");

    let markup = demo.markup();
    match output {
        Some(path) => {
            std::fs::write(&path, markup)?;
            log::info!("Wrote {path}");
        }
        None => print!("{markup}"),
    }
    Ok(())
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
