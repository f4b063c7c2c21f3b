/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use config::GameConfig;
use sim::event::GameEvent;
use sim::level::{load_defs, Levels};
use sim::session::{Phase, Session};
use ui::input::{InputQueue, KeyAction};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();

    let defs = load_defs(&config.levels_dir);
    let levels = Levels::from_defs(&defs);
    let mut session = Session::new(levels, config.boss.health, config.boss.contact_damage);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing PipeWarp!");
    println!("Coins: {}   Steps: {}", session.player.coins, session.player.steps);
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputQueue::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    loop {
        input.drain_events();

        while let Some(action) = input.pop() {
            match session.phase {
                Phase::Title => match action {
                    KeyAction::Confirm => session.start(),
                    KeyAction::Quit => return Ok(()),
                    _ => {}
                },
                Phase::Playing => match action {
                    KeyAction::Step(mv) => {
                        let events = session.turn(Some(mv))?;
                        process_sound_events(sound, &events);
                    }
                    KeyAction::Unrecognized => {
                        // Still one processed input event: the step counts.
                        let events = session.turn(None)?;
                        process_sound_events(sound, &events);
                    }
                    KeyAction::Restart => session.restart_level(),
                    KeyAction::WarpFinal => session.warp_to_final(),
                    KeyAction::Quit => return Ok(()),
                    KeyAction::Confirm => {}
                },
                Phase::Victory => match action {
                    KeyAction::Confirm | KeyAction::Quit => return Ok(()),
                    _ => {}
                },
            }
        }

        // Message fade runs on wall-clock ticks, not on turns.
        if last_tick.elapsed() >= tick_rate {
            session.tick_message();
            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::CoinPicked { .. } => sfx.play_coin(),
            GameEvent::AllCoinsCollected { .. } => sfx.play_item(),
            GameEvent::ItemPicked { .. } => sfx.play_item(),
            GameEvent::Warped { .. } => sfx.play_warp(),
            GameEvent::LevelEntered { .. } => sfx.play_door(),
            GameEvent::BossStruck { .. } => sfx.play_boss_hit(),
            GameEvent::BossDefeated => sfx.play_victory(),
        }
    }
}
