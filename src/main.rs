//! Ritual Runner entry point
//!
//! The playable build runs in the browser (see `web.rs`). Natively this
//! runs a short scripted session headless and logs what happens.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ritual_runner::audio::NullAudio;
    use ritual_runner::consts::MAX_FRAME_DT;
    use ritual_runner::platform::{Key, ManualScheduler};
    use ritual_runner::{Game, Settings};

    env_logger::init();
    log::info!("Ritual Runner (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    let mut game = Game::new(Settings::load(), ManualScheduler::new(), NullAudio);
    let frame_ms = f64::from(MAX_FRAME_DT) * 1000.0 / 3.0;
    let mut now = 0.0;
    let run_frames = |game: &mut Game<ManualScheduler, NullAudio>, now: &mut f64, frames: u32| {
        for _ in 0..frames {
            let Some(handle) = game.scheduler_mut().take_pending() else {
                break;
            };
            game.on_frame(handle, *now);
            *now += frame_ms;
        }
    };

    game.start();
    game.key_down(Key::Right, false);
    run_frames(&mut game, &mut now, 240);

    let script = [
        "world/barriers/ObsidianWall.asset",
        "core/subsystems/Physics.dll",
        "textures/environment/backgrounds/Background.png",
    ];
    for path in script {
        match game.delete_resource(path, now) {
            Ok(consequence) => log::info!("{} -> {:?}", path, consequence),
            Err(e) => log::warn!("{}: {}", path, e),
        }
        run_frames(&mut game, &mut now, 120);
    }

    let world = game.world();
    log::info!(
        "Scene {} at ({:.1}, {:.1}), fade {:.2}, progress {:.0}%",
        world.current_scene,
        world.player.pos.x,
        world.player.pos.y,
        world.fade_level,
        game.progress()
    );

    if let Err(e) = game.delete_resource("core/runtime/System.exe", now) {
        log::warn!("{}", e);
    }
    log::info!("Final state: {:?}", game.state());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::init`, this is just to satisfy the compiler
}
