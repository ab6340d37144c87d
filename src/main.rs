//! Dash Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement,
    };

    use dash_runner::frame_delta_ms;
    use dash_runner::persistence::BestScore;
    use dash_runner::platform::{LocalStorage, PlatformSleeper};
    use dash_runner::scores::{
        HttpTransport, Leaderboard, ScoreClient, Source, SubmitGate, format_relative_date,
        format_score,
    };
    use dash_runner::settings::Settings;
    use dash_runner::sim::{GameEvent, GamePhase, GameState, ParticleField, TickInput, tick};

    type WebScoreClient = ScoreClient<HttpTransport, LocalStorage, PlatformSleeper>;

    /// Everything the frame loop touches
    struct Game {
        state: GameState,
        input: TickInput,
        best: BestScore,
        storage: LocalStorage,
        last_time: f64,
        /// Ended-phase UI already shown for this run
        game_over_shown: bool,
        submit: SubmitGate,
    }

    impl Game {
        fn new(settings: &Settings, storage: LocalStorage, seed: u64) -> Self {
            let particles = ParticleField::new(seed, settings.max_particles());
            Self {
                state: GameState::with_particles(seed, settings.tuning.clone(), particles),
                input: TickInput::default(),
                best: BestScore::load(&storage),
                storage,
                last_time: 0.0,
                game_over_shown: false,
                submit: SubmitGate::default(),
            }
        }

        fn update(&mut self, dt_ms: f32) {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt_ms);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::Started => {
                        self.game_over_shown = false;
                        self.submit.reset();
                    }
                    GameEvent::Collided { .. } => {
                        if self.best.record(self.state.score, &mut self.storage) {
                            log::info!("New best score: {}", self.state.score);
                        }
                    }
                    _ => {}
                }
            }
        }

        fn render(&self, ctx: &CanvasRenderingContext2d) {
            let tuning = &self.state.tuning;
            let (w, h) = (tuning.world_width as f64, tuning.world_height as f64);

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str("#101826");
            ctx.fill_rect(0.0, 0.0, w, h);

            let ground = tuning.ground_y() as f64;
            ctx.set_fill_style_str("#2c3e50");
            ctx.fill_rect(0.0, ground, w, h - ground);

            ctx.set_fill_style_str("#e74c3c");
            for rect in self.state.obstacle_rects() {
                ctx.fill_rect(
                    rect.min.x as f64,
                    rect.min.y as f64,
                    rect.size.x as f64,
                    rect.size.y as f64,
                );
            }

            let actor = self.state.actor_rect();
            ctx.set_fill_style_str("#3498db");
            ctx.fill_rect(
                actor.min.x as f64,
                actor.min.y as f64,
                actor.size.x as f64,
                actor.size.y as f64,
            );

            for p in self.state.particles() {
                ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
                ctx.set_fill_style_str(p.color.css());
                ctx.fill_rect(p.pos.x as f64 - 2.0, p.pos.y as f64 - 2.0, 4.0, 4.0);
            }
            ctx.set_global_alpha(1.0);
        }

        fn update_hud(&mut self, document: &Document) {
            set_text(document, "hud-score", &format_score(self.state.score));
            set_text(document, "hud-level", &self.state.level.to_string());
            set_text(document, "hud-best", &format_score(self.best.score));
            if let Some(bar) = document.get_element_by_id("level-progress") {
                let pct = self.state.level_progress() * 100.0;
                let _ = bar.set_attribute("style", &format!("width: {:.0}%", pct));
            }

            let phase = self.state.phase;
            set_visible(document, "start-screen", phase == GamePhase::Start);
            set_visible(document, "pause-menu", phase == GamePhase::Paused);
            set_visible(document, "game-over", phase == GamePhase::Ended);

            if phase == GamePhase::Ended && !self.game_over_shown {
                self.game_over_shown = true;
                set_text(document, "final-score", &format_score(self.state.score));
                set_text(document, "final-level", &self.state.level.to_string());
                set_text(document, "submit-status", "");
                set_submit_enabled(document, true);
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_submit_enabled(document: &Document, enabled: bool) {
        if let Some(btn) = document
            .get_element_by_id("submit-btn")
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        {
            btn.set_disabled(!enabled);
        }
    }

    fn get_document() -> Result<Document, JsValue> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Dash Runner starting...");

        let document = get_document()?;
        set_visible(&document, "loading", false);

        let storage = LocalStorage::open().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let settings = Settings::load(&storage);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        canvas.set_width(settings.tuning.world_width as u32);
        canvas.set_height(settings.tuning.world_height as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(&settings, storage.clone(), seed)));
        log::info!("Game initialized with seed: {}", seed);

        let client = ScoreClient::http(settings.client.clone(), storage)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let client = Rc::new(client);

        setup_input_handlers(&canvas, game.clone())?;
        setup_game_over_panel(&document, game.clone(), client.clone());
        setup_pause_menu(&document, game.clone());
        setup_auto_pause(game.clone())?;

        // Push anything a previous offline session left behind
        {
            let client = client.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match client.sync_local_scores().await {
                    Ok(report) if report.synced > 0 => {
                        log::info!("Synced {} offline score(s)", report.synced);
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Offline scores not synced: {}", e),
                }
                refresh_leaderboard(&client).await;
            });
        }

        request_animation_frame(game, Rc::new(ctx));

        log::info!("Dash Runner running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Don't steal keys from the name field
                if event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some()
                {
                    return;
                }
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        g.input.jump = true;
                    }
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "Enter" | "r" | "R" => g.input.restart = true,
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Click/tap to jump
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.jump = true;
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.jump = true;
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ctx: Rc<CanvasRenderingContext2d>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, ctx, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ctx: Rc<CanvasRenderingContext2d>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let dt = frame_delta_ms(g.last_time, time);
            g.last_time = time;

            g.update(dt);
            g.render(&ctx);
            if let Ok(document) = get_document() {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game, ctx);
    }

    async fn refresh_leaderboard(client: &WebScoreClient) {
        match client.default_leaderboard().await {
            Ok(board) => {
                if let Err(e) = render_leaderboard(&board) {
                    log::warn!("Leaderboard render failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("Leaderboard unavailable: {}", e),
        }
    }

    fn render_leaderboard(board: &Leaderboard) -> Result<(), JsValue> {
        let document = get_document()?;
        let Some(list) = document.get_element_by_id("leaderboard-list") else {
            return Ok(());
        };
        list.set_text_content(None);

        let now = chrono::Utc::now();
        for (rank, entry) in board.entries.iter().enumerate() {
            let row = document.create_element("li")?;
            if entry.is_local() {
                row.set_class_name("local");
            }
            row.set_text_content(Some(&format!(
                "{}. {} - {} (L{}) {}",
                rank + 1,
                entry.player_name,
                format_score(entry.score),
                entry.level,
                format_relative_date(entry.timestamp, now),
            )));
            list.append_child(&row)?;
        }

        let source = match board.source {
            Source::Remote => "Online",
            Source::Local => "Offline (this device)",
        };
        set_text(&document, "leaderboard-source", source);
        Ok(())
    }

    fn on_click(document: &Document, id: &str, mut f: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| f());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_game_over_panel(document: &Document, game: Rc<RefCell<Game>>, client: Rc<WebScoreClient>) {
        {
            let game = game.clone();
            on_click(document, "restart-btn", move || {
                game.borrow_mut().input.restart = true;
            });
        }

        {
            let game = game.clone();
            on_click(document, "menu-btn", move || {
                game.borrow_mut().state.return_to_start();
            });
        }

        {
            let client = client.clone();
            on_click(document, "submit-btn", move || {
                let Ok(doc) = get_document() else {
                    return;
                };
                let (score, level) = {
                    let mut g = game.borrow_mut();
                    if g.state.phase != GamePhase::Ended || !g.submit.try_begin() {
                        return;
                    }
                    (g.state.score, g.state.level)
                };
                let input = doc
                    .get_element_by_id("player-name")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
                let name = input.as_ref().map(|i| i.value()).unwrap_or_default();
                set_text(&doc, "submit-status", "Submitting...");
                set_submit_enabled(&doc, false);

                let client = client.clone();
                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = client.submit(&name, score as i64, level as i64).await;
                    let saved = result.is_ok();
                    game.borrow_mut().submit.finish(saved);

                    let status = match result {
                        Ok(sub) if sub.source == Source::Remote => "Score submitted!".to_string(),
                        Ok(_) => "Server offline - saved on this device".to_string(),
                        Err(e) => e.to_string(),
                    };
                    if let Ok(document) = get_document() {
                        set_text(&document, "submit-status", &status);
                        // Stays disabled once the run is saved
                        set_submit_enabled(&document, !saved);
                    }
                    if saved && let Some(input) = input {
                        input.set_value("");
                    }
                    refresh_leaderboard(&client).await;
                });
            });
        }

        {
            let client = client.clone();
            on_click(document, "sync-btn", move || {
                let client = client.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let status = match client.sync_local_scores().await {
                        Ok(report) => format!("Synced {} of {}", report.synced, report.attempted),
                        Err(e) => e.to_string(),
                    };
                    if let Ok(document) = get_document() {
                        set_text(&document, "submit-status", &status);
                    }
                    refresh_leaderboard(&client).await;
                });
            });
        }

        on_click(document, "clear-scores-btn", move || {
            if let Err(e) = client.clear_local_scores() {
                log::warn!("Could not clear local scores: {}", e);
            }
            let client = client.clone();
            wasm_bindgen_futures::spawn_local(async move {
                refresh_leaderboard(&client).await;
            });
        });
    }

    fn setup_pause_menu(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "resume-btn", move || {
            game.borrow_mut().input.pause = true;
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = get_document()?;

        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && g.state.is_running()
                {
                    g.state.pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.is_running() {
                    g.state.pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Headless run: a simple bot plays one game, then the score goes through
/// the leaderboard client like it would in the browser.
#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    use dash_runner::persistence::{BestScore, FileStore};
    use dash_runner::scores::{ScoreClient, Source, format_score};
    use dash_runner::settings::Settings;
    use dash_runner::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Dash Runner (native) starting...");

    let data_dir = std::env::var("DASH_RUNNER_DATA").unwrap_or_else(|_| ".dash-runner".to_string());
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        log::warn!("Could not create {}: {}", data_dir, e);
    }
    let mut store = FileStore::new(&data_dir);
    let settings = Settings::load(&store);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed, settings.tuning.clone());
    state.start();

    const MAX_TICKS: u64 = 20_000;
    let frame_ms = dash_runner::consts::DEFAULT_FRAME_MS;
    while state.phase == GamePhase::Running && state.time_ticks < MAX_TICKS {
        let actor = state.actor_rect();
        let lookahead = state.speed() * 9.0;
        let jump = state.obstacles.iter().any(|o| {
            let gap = o.pos.x - actor.right();
            (0.0..lookahead).contains(&gap)
        });
        tick(&mut state, &TickInput { jump, ..TickInput::default() }, frame_ms);
        state.drain_events();
    }

    println!(
        "Run over after {} ticks: score {}, level {}",
        state.time_ticks,
        format_score(state.score),
        state.level
    );

    let mut best = BestScore::load(&store);
    if best.record(state.score, &mut store) {
        println!("New best score!");
    }

    let name = std::env::args().nth(1).unwrap_or_else(|| "Bot".to_string());
    let client = match ScoreClient::http(settings.client.clone(), store) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Could not build HTTP client: {}", e);
            return;
        }
    };

    match client.submit(&name, state.score as i64, state.level as i64).await {
        Ok(sub) => match sub.source {
            Source::Remote => println!("Score submitted to {}", settings.client.base_url),
            Source::Local => println!("Server offline, score saved in {}", data_dir),
        },
        Err(e) => println!("Score not saved: {}", e),
    }

    if let Ok(board) = client.default_leaderboard().await {
        println!("Leaderboard ({:?}):", board.source);
        for (rank, entry) in board.entries.iter().enumerate() {
            println!(
                "{:>3}. {:<20} {:>10}  L{}",
                rank + 1,
                entry.player_name,
                format_score(entry.score),
                entry.level
            );
        }
    }
}
