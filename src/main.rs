//! Meteor Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent, TouchEvent};

    use meteor_dodge::audio::AudioManager;
    use meteor_dodge::highscores;
    use meteor_dodge::renderer::CanvasRenderer;
    use meteor_dodge::settings::GOLD_SKIN_UNLOCK_SCORE;
    use meteor_dodge::sim::{Difficulty, FrameInput, GameEvent, GamePhase, World, step};
    use meteor_dodge::{Settings, Skin};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Game instance holding all state
    struct Game {
        world: World,
        rng: Pcg32,
        input: FrameInput,
        settings: Settings,
        skin: Skin,
        audio: AudioManager,
        renderer: CanvasRenderer,
    }

    impl Game {
        fn new(renderer: CanvasRenderer) -> Self {
            let settings = Settings::load();
            let seed = js_sys::Date::now() as u64;
            let mut rng = Pcg32::seed_from_u64(seed);
            let high = highscores::load(settings.difficulty);
            let world = World::new(
                settings.difficulty,
                settings.player_speed_scale,
                high,
                &mut rng,
            );

            Self {
                world,
                rng,
                input: FrameInput::default(),
                settings,
                skin: Settings::load_skin(),
                audio: AudioManager::new(),
                renderer,
            }
        }

        /// One animation frame: step the simulation, dispatch events,
        /// paint.
        fn frame(&mut self, now_ms: f64) {
            let events = step(&mut self.world, &self.input, now_ms, &mut self.rng);

            // One-shot signals are consumed by exactly one step
            self.input.start = false;
            self.input.restart = false;

            for event in events {
                self.audio.play(event);
                if event == GameEvent::GameOverReached {
                    self.on_game_over();
                }
            }

            self.renderer.render(&self.world, self.skin, now_ms);
        }

        fn on_game_over(&mut self) {
            // The sim already folded the final score into its cached high
            // score when it was a new best; writing the cache back is
            // monotonic either way.
            highscores::store(self.world.difficulty, self.world.high_score);

            if self.world.final_score() >= GOLD_SKIN_UNLOCK_SCORE {
                Settings::set_skin_unlocked(true);
            }
        }

        /// Space/Enter means "start" before a run and "restart" after one.
        fn press_action(&mut self) {
            match self.world.phase {
                GamePhase::NotStarted => self.input.start = true,
                GamePhase::GameOver => self.input.restart = true,
                GamePhase::Running => {}
            }
        }

        fn change_difficulty(&mut self, difficulty: Difficulty) {
            self.settings.difficulty = difficulty;
            self.settings.save();
            self.world
                .set_difficulty(difficulty, highscores::load(difficulty));
        }

        fn change_player_speed(&mut self, scale: f32) {
            self.settings.player_speed_scale = scale;
            self.settings.save();
            self.world.player_speed_scale = scale;
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) {
        web_sys::window()
            .unwrap()
            .request_animation_frame(f.as_ref().unchecked_ref())
            .unwrap();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        let document = web_sys::window().unwrap().document().unwrap();
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("missing #gameCanvas")
            .dyn_into()
            .expect("#gameCanvas is not a canvas");

        let Some(renderer) = CanvasRenderer::new(&canvas) else {
            log::error!("Failed to acquire 2D canvas context");
            return;
        };

        let game = Rc::new(RefCell::new(Game::new(renderer)));
        setup_input_handlers(&canvas, game.clone());
        setup_settings_handlers(game.clone());

        // Animation frame loop
        let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let loop_game = game.clone();
        *g.borrow_mut() = Some(Closure::new(move |now: f64| {
            loop_game.borrow_mut().frame(now);
            request_animation_frame(f.borrow().as_ref().unwrap());
        }));
        request_animation_frame(g.borrow().as_ref().unwrap());

        log::info!("Meteor Dodge running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Keyboard held-direction flags plus the start/restart one-shots
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if matches!(
                    code.as_str(),
                    "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Space"
                ) {
                    event.prevent_default();
                }

                let mut g = game.borrow_mut();
                // Browsers gate audio behind a user gesture
                g.audio.resume();

                match code.as_str() {
                    "ArrowRight" | "KeyD" => g.input.right = true,
                    "ArrowLeft" | "KeyA" => g.input.left = true,
                    "Space" | "Enter" => g.press_action(),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowRight" | "KeyD" => g.input.right = false,
                    "ArrowLeft" | "KeyA" => g.input.left = false,
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: left/right half of the canvas steers; any tap doubles as
        // the start/restart press
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().item(0) else {
                    return;
                };

                let rect = canvas_clone.get_bounding_client_rect();
                let x = touch.client_x() as f64 - rect.left();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.press_action();
                g.input.left = x < rect.width() / 2.0;
                g.input.right = !g.input.left;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().item(0) else {
                    return;
                };

                let rect = canvas_clone.get_bounding_client_rect();
                let x = touch.client_x() as f64 - rect.left();
                let mut g = game.borrow_mut();
                g.input.left = x < rect.width() / 2.0;
                g.input.right = !g.input.left;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut g = game.borrow_mut();
                g.input.left = false;
                g.input.right = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_settings_handlers(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Difficulty radio buttons
        let radios = document.get_elements_by_name("difficulty");
        for i in 0..radios.length() {
            let Some(radio) = radios
                .item(i)
                .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };

            let game = game.clone();
            let radio_clone = radio.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(difficulty) = Difficulty::from_key(&radio_clone.value()) else {
                    log::warn!("Unknown difficulty: {}", radio_clone.value());
                    return;
                };
                game.borrow_mut().change_difficulty(difficulty);
                let _ = radio_clone.blur();
            });
            let _ =
                radio.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Player speed slider (live, no reset)
        if let Some(range) = document
            .get_element_by_id("playerSpeedRange")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            let game = game.clone();
            let range_clone = range.clone();
            let label = document.get_element_by_id("playerSpeedVal");
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Ok(scale) = range_clone.value().parse::<f32>() else {
                    return;
                };
                game.borrow_mut().change_player_speed(scale);
                if let Some(label) = &label {
                    label.set_text_content(Some(&format!("{:.1}", scale)));
                }
            });
            let _ =
                range.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Cosmetic skin picker; the gold option stays locked until earned
        if let Some(select) = document
            .get_element_by_id("skinSelect")
            .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
        {
            let game = game.clone();
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(skin) = Skin::from_str(&select_clone.value()) else {
                    return;
                };
                if skin == Skin::Gold && !Settings::skin_unlocked() {
                    log::info!("Gold skin still locked");
                    select_clone.set_value(Skin::Classic.as_str());
                    return;
                }
                Settings::save_skin(skin);
                game.borrow_mut().skin = skin;
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Entry is the wasm-bindgen start hook
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Meteor Dodge is a browser game - build with --target wasm32-unknown-unknown");
    println!("Meteor Dodge runs in the browser. Build the wasm target and open index.html.");
}
