//! Ledgefall headless entry point
//!
//! Runs a scripted session against the simulation core and prints the final
//! world snapshot. A render/input shell drives `Simulation` the same way.
//!
//! Usage: `ledgefall [settings.json] [--seed N] [--frames N]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ledgefall (native) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser shells embed the library directly
}

#[cfg(not(target_arch = "wasm32"))]
struct Args {
    settings_path: Option<String>,
    seed: Option<u64>,
    frames: u32,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut args = Args {
        settings_path: None,
        seed: None,
        frames: 600,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = Some(value.parse()?);
            }
            "--frames" => {
                let value = iter.next().ok_or("--frames needs a value")?;
                args.frames = value.parse()?;
            }
            path => args.settings_path = Some(path.to_string()),
        }
    }
    Ok(args)
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use ledgefall::consts::SIM_DT;
    use ledgefall::sim::{GameEvent, Intent, LevelParams, generate_layout};
    use ledgefall::{SimSettings, Simulation};

    let args = parse_args()?;

    let mut settings = match &args.settings_path {
        Some(path) => {
            log::info!("Loading settings from {path}");
            SimSettings::from_json(&std::fs::read_to_string(path)?)?
        }
        None => SimSettings::full_game(),
    };
    if let Some(seed) = args.seed {
        let layout = generate_layout(
            seed,
            &settings.platform,
            settings.player.start_position.x,
            &LevelParams::default(),
        )?;
        layout.apply_to(&mut settings);
    }

    let mut sim = Simulation::new(settings)?;

    // Walk right, hop every second, fire every half second
    for frame in 0..args.frames {
        let intent = Intent {
            horizontal: 1.0,
            jump: frame % 60 == 30,
            fire: frame % 30 == 0,
            ..Default::default()
        };
        sim.frame(&intent, SIM_DT);

        for event in sim.drain_events() {
            match event {
                GameEvent::Won | GameEvent::Lost { .. } => log::info!("{event:?}"),
                _ => log::debug!("{event:?}"),
            }
        }
        if sim.state().phase.is_over() {
            break;
        }
    }

    let state = sim.state();
    log::info!(
        "Finished: {:?} after {} ticks, hp {}/{}, lives {}",
        state.phase,
        state.time_ticks,
        state.player.hp,
        state.player.max_hp,
        state.player.lives
    );
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}
